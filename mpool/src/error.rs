//! Core error types

use thiserror::Error;

use crate::state::cid::Cid;

/// Core error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A block required by the reorg walk could not be resolved.
    #[error("block not found: {0}")]
    BlockNotFound(Cid),

    /// A loaded block's parent linkage is structurally invalid.
    #[error("malformed block {cid}: {reason}")]
    Malformed { cid: Cid, reason: String },

    /// The block loader failed for a reason other than a missing block.
    #[error(transparent)]
    Loader(#[from] anyhow::Error),

    /// Canonical encoding of a message or block failed.
    #[error("canonical encoding failed: {0}")]
    Codec(#[source] rkyv::rancor::Error),

    /// The update was cancelled between walk steps.
    #[error("update cancelled")]
    Cancelled,

    /// A commit was interrupted, leaving the pool partially reconciled.
    /// Only reachable for interleaved commit strategies; the reconciler in
    /// this crate resolves the full plan before its first pool mutation.
    #[error("reconcile incomplete: {reinstated} reinstated, {removed} removed before failure")]
    ReconcileIncomplete { reinstated: usize, removed: usize },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
