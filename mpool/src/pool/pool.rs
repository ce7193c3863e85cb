//! Message pool - deduplicated, content-addressed pending set
//!
//! ## Features
//!
//! - **Content-addressed dedup**: adding a message that is already pending is
//!   a successful no-op; CID equality is message identity
//! - **O(1) lookup**: by message CID via `HashMap`
//! - **Consistent snapshots**: `pending` copies the set out under a read lock
//! - **Zero-copy hand-off**: entries are `Arc<Message>` so snapshots are O(n)
//!   pointer clones
//!
//! ## Thread Safety
//!
//! All operations are safe under concurrent invocation. Mutators take the
//! write lock for the duration of one mutation; `pending`, `get`, and `has`
//! take the read lock. The lock is never held across a block-store call or
//! any user code, so reorg processing cannot block message ingress.
//!
//! The pool is unbounded and ephemeral: admission control and persistence
//! belong to the layers above.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::error::Result;
use crate::state::{cid::Cid, message::Message};

struct PoolInner {
    /// All pending messages indexed by CID
    by_cid: HashMap<Cid, Arc<Message>>,
    /// Statistics: total messages added
    stats_added: u64,
    /// Statistics: total messages removed
    stats_removed: u64,
}

/// Thread-safe set of pending messages, keyed by CID.
pub struct MessagePool {
    inner: RwLock<PoolInner>,
}

impl MessagePool {
    /// Creates a new, empty message pool.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PoolInner {
                by_cid: HashMap::new(),
                stats_added: 0,
                stats_removed: 0,
            }),
        }
    }

    /// Adds a message to the pool and returns its CID.
    ///
    /// Idempotent: adding a message whose CID is already present keeps the
    /// existing entry and succeeds. The CID is computed once, outside the
    /// lock; the only failure mode is canonical encoding.
    pub fn add(&self, msg: Arc<Message>) -> Result<Cid> {
        let cid = msg.cid()?;
        self.insert_resolved(cid, msg);
        Ok(cid)
    }

    /// Publishes a message under a CID that has already been computed.
    ///
    /// Used by the reconciler to reinstate messages from abandoned blocks
    /// without re-encoding them, which keeps the commit phase infallible.
    pub(crate) fn insert_resolved(&self, cid: Cid, msg: Arc<Message>) {
        let mut inner = self.inner.write();
        if let Entry::Vacant(e) = inner.by_cid.entry(cid) {
            e.insert(msg);
            inner.stats_added += 1;
        }
    }

    /// Removes the message with the given CID, if present.
    ///
    /// Removing an absent CID is a successful no-op.
    pub fn remove(&self, cid: &Cid) {
        let mut inner = self.inner.write();
        if inner.by_cid.remove(cid).is_some() {
            inner.stats_removed += 1;
        }
    }

    /// Returns the message with the given CID, if present.
    pub fn get(&self, cid: &Cid) -> Option<Arc<Message>> {
        self.inner.read().by_cid.get(cid).cloned()
    }

    /// Returns whether a message with the given CID is pending.
    pub fn has(&self, cid: &Cid) -> bool {
        self.inner.read().by_cid.contains_key(cid)
    }

    /// Returns a snapshot of every pending message.
    ///
    /// The snapshot is consistent: it reflects the pool at one point between
    /// entry and exit of this call. Mutations after it returns are not
    /// visible in it. Order is unspecified.
    pub fn pending(&self) -> Vec<Arc<Message>> {
        self.inner.read().by_cid.values().cloned().collect()
    }

    /// Returns the current number of pending messages.
    pub fn len(&self) -> usize {
        self.inner.read().by_cid.len()
    }

    /// Returns true if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().by_cid.is_empty()
    }

    /// Returns statistics about the pool.
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.read();
        PoolStats {
            current_size: inner.by_cid.len(),
            total_added: inner.stats_added,
            total_removed: inner.stats_removed,
        }
    }
}

impl Default for MessagePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the message pool.
#[derive(Debug, Clone)]
pub struct PoolStats {
    /// Current number of pending messages
    pub current_size: usize,
    /// Total messages added since creation
    pub total_added: u64,
    /// Total messages removed since creation
    pub total_removed: u64,
}
