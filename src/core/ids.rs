//! Opaque id generation for new menu items and recycle entries.

use std::sync::atomic::{AtomicU64, Ordering};

const KEY_DIGITS: usize = 16;

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random 16-digit numeric keys, the format the remote store hands out.
#[derive(Debug, Default)]
pub struct RandomKey;

impl IdGenerator for RandomKey {
    fn next_id(&self) -> String {
        let n = uuid::Uuid::new_v4().as_u128() % 10u128.pow(KEY_DIGITS as u32);
        format!("{n:0width$}", width = KEY_DIGITS)
    }
}

/// Deterministic ids (`<prefix>1`, `<prefix>2`, ...).
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}
