use grocery_planner_core::Config;

use super::{print_json, CliResult};

pub fn run() -> CliResult {
    let directory = Config::load()?.store_directory();
    print_json(&directory.stores())
}
