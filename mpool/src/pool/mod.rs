//! Message Pool - Pending Message Set
//!
//! Holds messages accepted by the node but not yet included in the canonical
//! chain, keyed by CID. Safe for concurrent use: gossip handlers, local
//! submitters, and the reorg reconciler all mutate the same pool.

mod pool;

pub use pool::{MessagePool, PoolStats};
