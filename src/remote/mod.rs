pub mod http;
pub mod store;

pub use http::HttpRemoteStore;
pub use store::{RemoteError, RemoteStore};
