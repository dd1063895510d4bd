//! Per-user grocery lists.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StoredTimestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl GroceryItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            quantity: None,
            category: None,
            completed: false,
        }
    }
}

/// One shopping list per user. Saving replaces the previous list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryList {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<GroceryItem>,
    #[serde(default)]
    pub created_at: StoredTimestamp,
    #[serde(default)]
    pub updated_at: StoredTimestamp,
}

impl GroceryList {
    /// An empty list, returned when the user has not saved one yet.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            items: Vec::new(),
            created_at: StoredTimestamp::now(),
            updated_at: StoredTimestamp::now(),
        }
    }

    pub fn pending_items(&self) -> impl Iterator<Item = &GroceryItem> {
        self.items.iter().filter(|item| !item.completed)
    }

    /// Mark an item as picked up. Returns false when no item has that id.
    pub fn complete_item(&mut self, item_id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                item.completed = true;
                true
            }
            None => false,
        }
    }
}
