//! # Recycle Ledger
//!
//! Soft-deleted menu items, grouped into a fixed set of buckets.
//! Entries are kept in deletion order and only leave the ledger when
//! restored. There is no eviction: `expired_at` is a display label.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::menu::MenuItem;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum RecycleCategory {
    Http,
    Schema,
    Request,
}

impl RecycleCategory {
    pub const ALL: [RecycleCategory; 3] = [
        RecycleCategory::Http,
        RecycleCategory::Schema,
        RecycleCategory::Request,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RecycleCategory::Http => "endpoints",
            RecycleCategory::Schema => "schemas",
            RecycleCategory::Request => "requests",
        }
    }
}

/// Who performed a deletion. Display metadata only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl Default for Creator {
    fn default() -> Self {
        Self {
            id: "local".to_string(),
            name: "Local User".to_string(),
            username: "local".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecycleEntry {
    /// Id of the entry itself, distinct from `deleted_item.id`.
    pub id: String,
    pub deleted_item: MenuItem,
    pub creator: Creator,
    pub expired_at: String,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RecycleBucket {
    #[serde(default)]
    pub list: Vec<RecycleEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RecycleLedger {
    #[serde(default)]
    http: RecycleBucket,
    #[serde(default)]
    schema: RecycleBucket,
    #[serde(default)]
    request: RecycleBucket,
}

impl RecycleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, category: RecycleCategory) -> &[RecycleEntry] {
        &self.bucket(category).list
    }

    fn bucket(&self, category: RecycleCategory) -> &RecycleBucket {
        match category {
            RecycleCategory::Http => &self.http,
            RecycleCategory::Schema => &self.schema,
            RecycleCategory::Request => &self.request,
        }
    }

    fn bucket_mut(&mut self, category: RecycleCategory) -> &mut RecycleBucket {
        match category {
            RecycleCategory::Http => &mut self.http,
            RecycleCategory::Schema => &mut self.schema,
            RecycleCategory::Request => &mut self.request,
        }
    }

    /// True if `category` already holds an entry for the menu item `item_id`.
    pub fn holds_item(&self, category: RecycleCategory, item_id: &str) -> bool {
        self.entries(category)
            .iter()
            .any(|entry| entry.deleted_item.id == item_id)
    }

    /// Appends `entry` to `category`. Returns false (and drops the entry)
    /// when the bucket already archives the same menu item.
    pub fn archive(&mut self, category: RecycleCategory, entry: RecycleEntry) -> bool {
        if self.holds_item(category, &entry.deleted_item.id) {
            return false;
        }
        self.bucket_mut(category).list.push(entry);
        true
    }

    /// Removes and returns the entry with id `entry_id` from `category`.
    pub fn take(&mut self, category: RecycleCategory, entry_id: &str) -> Option<RecycleEntry> {
        let list = &mut self.bucket_mut(category).list;
        let idx = list.iter().position(|entry| entry.id == entry_id)?;
        Some(list.remove(idx))
    }

    pub fn len(&self) -> usize {
        RecycleCategory::ALL
            .iter()
            .map(|c| self.entries(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
