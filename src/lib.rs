//! apimenu library exports for testing

pub mod core;
pub mod dispatch;
pub mod remote;
pub mod tree;

#[cfg(test)]
pub mod test_support;

pub use dispatch::Catalog;
