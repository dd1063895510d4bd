//! Grocery list commands.

use clap::Subcommand;
use grocery_planner_core::{CoreError, GroceryItem};

use super::{open_planner, print_json, CliResult};

#[derive(Subcommand, Debug)]
pub enum ListAction {
    /// Add an item to a user's list
    Add {
        /// User ID
        user: String,
        /// Item name
        name: String,
        /// Quantity, free text (e.g. "2 lbs")
        #[arg(long)]
        quantity: Option<String>,
        /// Category (e.g. "produce")
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a user's list
    Show {
        /// User ID
        user: String,
        /// Only items not yet picked up
        #[arg(long)]
        pending: bool,
    },
    /// Mark an item as picked up
    Check {
        /// User ID
        user: String,
        /// Item ID
        item: String,
    },
}

pub fn run(action: ListAction) -> CliResult {
    let planner = open_planner()?;

    match action {
        ListAction::Add {
            user,
            name,
            quantity,
            category,
        } => {
            let mut list = planner.grocery_list(&user)?;
            let mut item = GroceryItem::new(name);
            item.quantity = quantity;
            item.category = category;
            list.items.push(item);
            print_json(&planner.save_grocery_list(list)?)?;
        }
        ListAction::Show { user, pending } => {
            let list = planner.grocery_list(&user)?;
            if pending {
                let items: Vec<_> = list.pending_items().collect();
                print_json(&items)?;
            } else {
                print_json(&list)?;
            }
        }
        ListAction::Check { user, item } => {
            let mut list = planner.grocery_list(&user)?;
            if !list.complete_item(&item) {
                return Err(CoreError::not_found("item", item).into());
            }
            print_json(&planner.save_grocery_list(list)?)?;
        }
    }
    Ok(())
}
