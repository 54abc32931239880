//! # Catalog Dispatcher
//!
//! The only way to change a catalog. `Catalog` owns the `App`, runs every
//! command through `core::action::update`, and carries out the returned
//! effects:
//!
//! - remote writes go to a background writer task, in command order, and are
//!   never awaited by the command itself (local state wins)
//! - writer failures come back as `Action::RemoteFailed` and are applied the
//!   next time the catalog is touched
//! - ledger changes are written to the ledger file synchronously
//!
//! ```text
//! command ─► update() ─► new snapshot
//!                │
//!                └─► effects ─► writer task ─► RemoteStore
//!                                   │
//!            RemoteFailed ◄─────────┘
//! ```

use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use log::{debug, info, warn};
use tokio::sync::{mpsc as async_mpsc, oneshot};

use crate::core::action::{Action, Effect, RemoteCall, update};
use crate::core::ledger_file;
use crate::core::menu::{MenuItem, MenuPatch};
use crate::core::recycle::RecycleCategory;
use crate::core::state::App;
use crate::core::store::{DropPosition, Store};
use crate::remote::{RemoteError, RemoteStore};

enum Job {
    Call(RemoteCall),
    Flush(oneshot::Sender<()>),
}

pub struct Catalog {
    app: App,
    remote: Arc<dyn RemoteStore>,
    ledger_path: Option<PathBuf>,
    jobs: async_mpsc::UnboundedSender<Job>,
    failures: mpsc::Receiver<Action>,
}

impl Catalog {
    /// Must be called inside a tokio runtime: it starts the writer task.
    pub fn new(app: App, remote: Arc<dyn RemoteStore>) -> Self {
        let (failure_tx, failures) = mpsc::channel();
        let jobs = spawn_writer(remote.clone(), failure_tx);
        Self {
            app,
            remote,
            ledger_path: None,
            jobs,
            failures,
        }
    }

    /// Loads the ledger stored at `path` and keeps it there from now on.
    /// An unreadable file is logged and replaced on the next save.
    pub fn with_ledger_file(mut self, path: PathBuf) -> Self {
        match ledger_file::load_ledger(&path) {
            Ok(ledger) => self.dispatch(Action::LedgerLoaded(ledger)),
            Err(e) => warn!("Failed to load ledger {}: {}", path.display(), e),
        }
        self.ledger_path = Some(path);
        self
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn store(&self) -> &Store {
        &self.app.store
    }

    /// Replaces the local catalog with the remote listing.
    pub async fn load(&mut self) -> Result<(), RemoteError> {
        info!("Loading catalog from {} store", self.remote.name());
        let items = self.remote.list_all().await?;
        self.dispatch(Action::CatalogLoaded(items));
        Ok(())
    }

    /// Adds `item`, assigning a fresh id when `item.id` is empty.
    /// Returns the id if the item made it into the catalog.
    pub fn add_menu_item(&mut self, mut item: MenuItem) -> Option<String> {
        if item.id.is_empty() {
            item.id = self.app.next_id();
        }
        let id = item.id.clone();
        let before = self.app.store.len();
        self.dispatch(Action::AddMenuItem(item));
        (self.app.store.len() > before).then_some(id)
    }

    pub fn remove_menu_item(&mut self, id: &str) {
        self.dispatch(Action::RemoveMenuItem { id: id.to_string() });
    }

    pub fn update_menu_item(&mut self, patch: MenuPatch) {
        self.dispatch(Action::UpdateMenuItem(patch));
    }

    pub fn restore_menu_item(&mut self, restore_id: &str, category: RecycleCategory) {
        self.dispatch(Action::RestoreMenuItem {
            restore_id: restore_id.to_string(),
            category,
        });
    }

    pub fn move_menu_item(&mut self, drag_key: &str, drop_key: &str, drop_position: DropPosition) {
        self.dispatch(Action::MoveMenuItem {
            drag_key: drag_key.to_string(),
            drop_key: drop_key.to_string(),
            drop_position,
        });
    }

    pub fn dispatch(&mut self, action: Action) {
        self.drain_failures();
        debug!("Dispatching: {:?}", action);
        let effects = update(&mut self.app, action);
        self.run_effects(effects);
    }

    /// Applies remote failures reported since the last command.
    pub fn drain_failures(&mut self) {
        while let Ok(action) = self.failures.try_recv() {
            let effects = update(&mut self.app, action);
            self.run_effects(effects);
        }
    }

    /// Waits until every remote write queued so far has finished, then
    /// applies any failures.
    pub async fn settle(&mut self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.jobs.send(Job::Flush(done_tx)).is_ok() && done_rx.await.is_err() {
            warn!("Remote writer stopped before flushing");
        }
        self.drain_failures();
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Remote(call) => {
                    if self.jobs.send(Job::Call(call)).is_err() {
                        warn!("Remote writer is gone; dropping remote call");
                    }
                }
                Effect::SaveLedger => self.save_ledger(),
            }
        }
    }

    fn save_ledger(&self) {
        let Some(path) = &self.ledger_path else {
            return;
        };
        if let Err(e) = ledger_file::save_ledger(path, self.app.store.ledger()) {
            warn!("Failed to save ledger {}: {}", path.display(), e);
        }
    }
}

fn spawn_writer(
    remote: Arc<dyn RemoteStore>,
    failures: mpsc::Sender<Action>,
) -> async_mpsc::UnboundedSender<Job> {
    let (tx, mut rx) = async_mpsc::unbounded_channel::<Job>();
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            match job {
                Job::Call(call) => {
                    let description = call.describe();
                    match execute(remote.as_ref(), &call).await {
                        Ok(()) => debug!("Remote {} ok", description),
                        Err(e) => {
                            warn!("Remote {} failed: {}", description, e);
                            if failures
                                .send(Action::RemoteFailed {
                                    call: description,
                                    error: e.to_string(),
                                })
                                .is_err()
                            {
                                warn!("Failed to report remote failure: catalog dropped");
                            }
                        }
                    }
                }
                Job::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("Remote writer stopped");
    });
    tx
}

async fn execute(remote: &dyn RemoteStore, call: &RemoteCall) -> Result<(), RemoteError> {
    match call {
        RemoteCall::Create(item) => remote.create(item).await,
        RemoteCall::Update(patch) => remote.update(patch).await,
        RemoteCall::Reparent { id, parent_id } => remote.reparent(id, parent_id.as_deref()).await,
        RemoteCall::Delete(id) => remote.delete(id).await,
    }
}
