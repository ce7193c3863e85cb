//! Chain Walk and Reorg Reconciliation
//!
//! When the canonical head moves, the pool must forget messages that the new
//! branch commits and take back messages that only the abandoned branch
//! committed. The walker computes that difference; the reconciler applies it.

mod cancel;
mod loader;
mod reconcile;
mod walker;

pub use cancel::CancelToken;
pub use loader::BlockLoader;
pub use reconcile::update_message_pool;
pub use walker::{ChainDiff, walk_chain_diff};
