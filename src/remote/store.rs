use std::fmt;

use async_trait::async_trait;

use crate::core::menu::{MenuItem, MenuPatch};

/// Errors that can occur talking to the remote catalog store.
/// None of them roll back local state; they are reported and dropped.
#[derive(Debug)]
pub enum RemoteError {
    /// Client misconfigured (bad URL, bad TLS setup).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Non-success HTTP status.
    Api { status: u16, message: String },
    /// HTTP 200 but the envelope carried a failure code.
    Rejected { code: i64, message: String },
    /// Failed to parse the response body.
    Parse(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Config(msg) => write!(f, "config error: {msg}"),
            RemoteError::Network(msg) => write!(f, "network error: {msg}"),
            RemoteError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            RemoteError::Rejected { code, message } => {
                write!(f, "request rejected (code {code}): {message}")
            }
            RemoteError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// The server side of the catalog. Writes are acknowledgements only;
/// the server keeps no recycle bin.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns the name of the store, for logs.
    fn name(&self) -> &str;

    /// Full catalog fetch.
    async fn list_all(&self) -> Result<Vec<MenuItem>, RemoteError>;

    async fn create(&self, item: &MenuItem) -> Result<(), RemoteError>;

    async fn update(&self, patch: &MenuPatch) -> Result<(), RemoteError>;

    /// Persists a new parent for `id` (`None` = top level).
    async fn reparent(&self, id: &str, parent_id: Option<&str>) -> Result<(), RemoteError>;

    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
}
