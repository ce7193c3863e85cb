//! Pending-message pool and chain-reorg reconciliation.
//!
//! This crate holds the set of messages a node has accepted but not yet seen
//! included in the canonical chain, and keeps that set consistent when the
//! node's view of the chain head changes.
//!
//! ## Architecture
//!
//!
//! ingress (user/gossip) ──► MessagePool ◄──[add/remove]── update_message_pool
//!                                                              │
//!                                                         ChainWalker
//!                                                              │
//!                                                         BlockLoader (store)
//!
//!
//! ## Data Flow
//!
//! 1. Messages enter the pool via [`MessagePool::add`], keyed by their CID
//! 2. When the head moves from `old` to `new`, [`update_message_pool`] walks
//!    both branches back to their common ancestor
//! 3. Messages mined only on the abandoned branch are reinstated into the pool
//! 4. Messages mined on the adopted branch are removed from the pool
//!
//! ## Thread Safety
//!
//! The pool is safe for concurrent use from many threads. The reconciler
//! never holds the pool lock while loading blocks, so reorg processing does
//! not block message ingress.

pub mod chain;
pub mod error;
pub mod pool;
pub mod state;
pub mod storage;

pub use chain::{BlockLoader, CancelToken, ChainDiff, update_message_pool, walk_chain_diff};
pub use error::{Error, Result};
pub use pool::{MessagePool, PoolStats};
pub use state::{
    address::Address,
    block::{Block, BlockHeader},
    cid::Cid,
    message::Message,
};
pub use storage::store::BlockStore;

#[cfg(test)]
mod tests;
