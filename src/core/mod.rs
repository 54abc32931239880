//! # Core Catalog Logic
//!
//! This module contains apimenu's business logic.
//! It knows nothing about HTTP, terminals, or files beyond the ledger.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Store (snapshot)     │
//!                    │  • Action (commands)    │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  Pure snapshot edits.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │  Catalog   │      │   Remote   │      │    CLI     │
//!     │ dispatcher │      │   store    │      │  (clap)    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`menu`]: `MenuItem` and the type classification
//! - [`store`]: the `Store` snapshot and its pure tree operations
//! - [`recycle`]: the recycle ledger
//! - [`state`]: the `App` struct, all catalog state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer

pub mod action;
pub mod config;
pub mod ids;
pub mod ledger_file;
pub mod menu;
pub mod recycle;
pub mod state;
pub mod store;
