//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::action::RemoteCall;
use crate::core::ids::SequentialIds;
use crate::core::menu::{MenuItem, MenuItemType, MenuPatch};
use crate::core::state::App;
use crate::remote::{RemoteError, RemoteStore};

/// A remote that serves a fixed listing and records every write.
pub struct RecordingRemote {
    listing: Vec<MenuItem>,
    calls: Mutex<Vec<RemoteCall>>,
    fail_writes: bool,
}

impl RecordingRemote {
    pub fn with_listing(listing: Vec<MenuItem>) -> Self {
        Self {
            listing,
            calls: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    /// Lists fine, rejects every write with a network error.
    pub fn failing(listing: Vec<MenuItem>) -> Self {
        Self {
            fail_writes: true,
            ..Self::with_listing(listing)
        }
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RemoteCall) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_writes {
            return Err(RemoteError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for RecordingRemote {
    fn name(&self) -> &str {
        "recording"
    }

    async fn list_all(&self) -> Result<Vec<MenuItem>, RemoteError> {
        Ok(self.listing.clone())
    }

    async fn create(&self, item: &MenuItem) -> Result<(), RemoteError> {
        self.record(RemoteCall::Create(item.clone()))
    }

    async fn update(&self, patch: &MenuPatch) -> Result<(), RemoteError> {
        self.record(RemoteCall::Update(patch.clone()))
    }

    async fn reparent(&self, id: &str, parent_id: Option<&str>) -> Result<(), RemoteError> {
        self.record(RemoteCall::Reparent {
            id: id.to_string(),
            parent_id: parent_id.map(str::to_string),
        })
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.record(RemoteCall::Delete(id.to_string()))
    }
}

/// Creates a test App with deterministic ids (`id1`, `id2`, ...).
pub fn test_app() -> App {
    App::new(Arc::new(SequentialIds::new("id")))
}

/// ```text
/// f1  (folder)
/// └── l1  (endpoint)
/// l2  (endpoint)
/// sf  (schema folder)
/// └── s1  (schema)
/// q1  (request)
/// ```
pub fn sample_catalog() -> Vec<MenuItem> {
    vec![
        MenuItem::new("f1", "Users", MenuItemType::ApiDetailFolder),
        MenuItem::new("l1", "Get user", MenuItemType::ApiDetail)
            .with_parent("f1")
            .with_data(serde_json::json!({ "method": "GET", "path": "/users/{id}" })),
        MenuItem::new("l2", "Health", MenuItemType::ApiDetail),
        MenuItem::new("sf", "Models", MenuItemType::ApiSchemaFolder),
        MenuItem::new("s1", "User", MenuItemType::ApiSchema).with_parent("sf"),
        MenuItem::new("q1", "Ping", MenuItemType::HttpRequest),
    ]
}
