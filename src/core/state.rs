//! # Application State
//!
//! Core business state for apimenu. No I/O handles live here; the remote
//! store and the ledger file belong to the dispatcher.
//!
//! ```text
//! App
//! ├── store: Store                  // catalog snapshot + recycle ledger
//! ├── ids: Arc<dyn IdGenerator>     // fresh ids for items and entries
//! ├── creator: Creator              // attribution for deletions
//! ├── retention_label: String       // "expires in" label on entries
//! ├── project_id: String            // project the catalog belongs to
//! ├── status_message: String        // last user-facing notification
//! ├── error: Option<String>         // last failure, if any
//! └── loaded: bool                  // catalog fetched at least once
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::ids::{IdGenerator, RandomKey};
use crate::core::recycle::Creator;
use crate::core::store::Store;

pub const DEFAULT_RETENTION_LABEL: &str = "30 days";

pub struct App {
    pub store: Store,
    pub ids: Arc<dyn IdGenerator>,
    pub creator: Creator,
    pub retention_label: String,
    pub project_id: String,
    pub status_message: String,
    pub error: Option<String>,
    pub loaded: bool,
}

impl App {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store: Store::new(),
            ids,
            creator: Creator::default(),
            retention_label: DEFAULT_RETENTION_LABEL.to_string(),
            project_id: "1".to_string(),
            status_message: String::from("Catalog not loaded"),
            error: None,
            loaded: false,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(Arc::new(RandomKey));
        app.creator = config.creator.clone();
        app.retention_label = config.retention_label.clone();
        app.project_id = config.project_id.clone();
        app
    }

    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }
}
