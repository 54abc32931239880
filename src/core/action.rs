//! # Actions
//!
//! Everything that can happen to the catalog becomes an `Action`.
//! User drops a node? That's `Action::MoveMenuItem { .. }`.
//! A background sync fails? That's `Action::RemoteFailed { .. }`.
//!
//! The `update()` function takes the current state and an action, swaps in
//! the new snapshot, and returns the effects the caller must run. No I/O
//! happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effects
//! ```
//!
//! Rejected actions leave the store untouched and only set a status.

use log::{debug, info, warn};

use crate::core::menu::{MenuItem, MenuPatch};
use crate::core::recycle::{RecycleCategory, RecycleLedger};
use crate::core::state::App;
use crate::core::store::{DropPosition, MoveError};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Full listing fetched from the remote store.
    CatalogLoaded(Vec<MenuItem>),
    /// Ledger read back from local storage.
    LedgerLoaded(RecycleLedger),
    AddMenuItem(MenuItem),
    RemoveMenuItem {
        id: String,
    },
    UpdateMenuItem(MenuPatch),
    RestoreMenuItem {
        restore_id: String,
        category: RecycleCategory,
    },
    MoveMenuItem {
        drag_key: String,
        drop_key: String,
        drop_position: DropPosition,
    },
    /// A fire-and-forget remote call failed. Local state is kept.
    RemoteFailed {
        call: String,
        error: String,
    },
}

/// A write the remote store should learn about.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Create(MenuItem),
    Update(MenuPatch),
    Reparent { id: String, parent_id: Option<String> },
    Delete(String),
}

impl RemoteCall {
    pub fn describe(&self) -> String {
        match self {
            RemoteCall::Create(item) => format!("create {}", item.id),
            RemoteCall::Update(patch) => format!("update {}", patch.id),
            RemoteCall::Reparent { id, .. } => format!("move {id}"),
            RemoteCall::Delete(id) => format!("delete {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Remote(RemoteCall),
    /// The recycle ledger changed and should be written out.
    SaveLedger,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::CatalogLoaded(items) => {
            let ledger = app.store.ledger().clone();
            app.store = crate::core::store::Store::from_remote(items).with_ledger(ledger);
            app.loaded = true;
            app.error = None;
            app.status_message = format!("Loaded {} menu items", app.store.len());
            info!("{}", app.status_message);
            vec![]
        }
        Action::LedgerLoaded(ledger) => {
            debug!("Ledger loaded with {} entries", ledger.len());
            app.store = std::mem::take(&mut app.store).with_ledger(ledger);
            vec![]
        }
        Action::AddMenuItem(item) => match app.store.add(item.clone()) {
            Ok(next) => {
                app.store = next;
                app.status_message = format!("Added {}", item.name);
                vec![Effect::Remote(RemoteCall::Create(item))]
            }
            Err(e) => {
                warn!("Add rejected: {}", e);
                app.status_message = format!("Cannot add: {e}");
                vec![]
            }
        },
        Action::RemoveMenuItem { id } => {
            let Some(removal) = app.store.remove(
                &id,
                app.ids.as_ref(),
                &app.creator,
                &app.retention_label,
            ) else {
                debug!("Remove ignored: {} not found", id);
                return vec![];
            };
            app.store = removal.store;
            app.status_message = format!(
                "Removed {} items, {} moved to recycle bin",
                removal.removed.len(),
                removal.archived
            );
            info!("{} (root {})", app.status_message, id);
            vec![Effect::Remote(RemoteCall::Delete(id)), Effect::SaveLedger]
        }
        Action::UpdateMenuItem(mut patch) => match app.store.update(&patch) {
            Some(next) => {
                app.store = next;
                app.status_message = format!("Updated {}", patch.id);
                // An empty name keeps the old one locally, so never send it
                patch.name = patch.name.filter(|name| !name.is_empty());
                vec![Effect::Remote(RemoteCall::Update(patch))]
            }
            None => {
                debug!("Update ignored: {} not found", patch.id);
                vec![]
            }
        },
        Action::RestoreMenuItem {
            restore_id,
            category,
        } => {
            let Some(restoration) = app.store.restore(&restore_id, category) else {
                debug!("Restore ignored: no entry {} in {:?}", restore_id, category);
                return vec![];
            };
            app.store = restoration.store;
            let mut effects = vec![Effect::SaveLedger];
            match restoration.restored {
                Some(item) => {
                    app.status_message = format!("Restored {}", item.name);
                    effects.insert(0, Effect::Remote(RemoteCall::Create(item)));
                }
                None => {
                    app.status_message = "Item already in catalog; entry discarded".to_string();
                }
            }
            effects
        }
        Action::MoveMenuItem {
            drag_key,
            drop_key,
            drop_position,
        } => {
            let old_parent = app
                .store
                .get(&drag_key)
                .and_then(|item| item.parent_id.clone());
            match app.store.move_item(&drag_key, &drop_key, drop_position) {
                Ok(next) => {
                    app.store = next;
                    let new_parent = app
                        .store
                        .get(&drag_key)
                        .and_then(|item| item.parent_id.clone());
                    app.status_message = format!("Moved {drag_key}");
                    if new_parent == old_parent {
                        return vec![];
                    }
                    vec![Effect::Remote(RemoteCall::Reparent {
                        id: drag_key,
                        parent_id: new_parent,
                    })]
                }
                Err(MoveError::NotFound(id)) => {
                    debug!("Move abandoned: {} no longer in catalog", id);
                    vec![]
                }
                Err(e) => {
                    warn!("Move rejected: {}", e);
                    app.status_message = format!("Cannot move: {e}");
                    vec![]
                }
            }
        }
        Action::RemoteFailed { call, error } => {
            warn!("Remote {} failed: {}", call, error);
            app.status_message = format!("Sync failed ({call}); local changes kept");
            app.error = Some(error);
            vec![]
        }
    }
}
