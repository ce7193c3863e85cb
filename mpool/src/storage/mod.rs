//! Persistent block store.
//!
//! Content-addressed block storage backed by redb, keyed and valued by the
//! same canonical encoding that defines block CIDs. The store is the node's
//! source of truth for chain topology and implements
//! [`BlockLoader`](crate::chain::BlockLoader) for the reorg walker. The pool
//! itself is never persisted.

pub mod store;
pub mod tables;
