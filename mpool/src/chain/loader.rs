use std::sync::Arc;

use anyhow::Result;

use crate::state::{block::Block, cid::Cid};

/// Capability to resolve a block by its CID.
///
/// This is the only view of chain topology the core has: no depth index, no
/// head tracking, no cross-update caching. `Ok(None)` means the CID does not
/// resolve to a block; `Err` is an infrastructure failure.
///
/// Loads must be deterministic: repeated loads of the same CID return
/// identical blocks.
pub trait BlockLoader {
    fn load_block(&self, cid: &Cid) -> Result<Option<Block>>;
}

impl<L: BlockLoader + ?Sized> BlockLoader for &L {
    fn load_block(&self, cid: &Cid) -> Result<Option<Block>> {
        (**self).load_block(cid)
    }
}

impl<L: BlockLoader + ?Sized> BlockLoader for Arc<L> {
    fn load_block(&self, cid: &Cid) -> Result<Option<Block>> {
        (**self).load_block(cid)
    }
}
