use rkyv::{Archive, Deserialize, Serialize};

use crate::error::Result;
use crate::state::{canonical_bytes, cid::Cid, message::Message};

/// [`BlockHeader`] represents the header of a block.
#[derive(Archive, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    /// Distance from genesis. Genesis has height 0; a child is always
    /// strictly higher than its parent.
    pub height: u64,
    /// The CID of the parent block, or `None` for a genesis block
    pub parent: Option<Cid>,
    /// The timestamp of the block, as measured by the peer that mined it
    pub timestamp: u64,
}

/// [`Block`] represents a block in the chain.
///
/// A block carries its header and the messages it commits, in mining order.
/// Blocks form an append-only tree: every block has exactly one parent, so
/// ancestry is a set of paths converging on genesis. The block store owns
/// blocks; the pool never does.
#[derive(Archive, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The header of the block
    pub header: BlockHeader,
    /// The messages committed by this block
    pub messages: Vec<Message>,
}

impl Block {
    /// Creates a genesis block: height 0, no parent.
    pub fn genesis(messages: Vec<Message>, timestamp: u64) -> Self {
        Self {
            header: BlockHeader {
                height: 0,
                parent: None,
                timestamp,
            },
            messages,
        }
    }

    /// Creates a block extending the given parent.
    pub fn next(parent: Cid, parent_height: u64, messages: Vec<Message>, timestamp: u64) -> Self {
        Self {
            header: BlockHeader {
                height: parent_height + 1,
                parent: Some(parent),
                timestamp,
            },
            messages,
        }
    }

    /// Computes the content identifier of the block.
    pub fn cid(&self) -> Result<Cid> {
        let bytes = canonical_bytes(self)?;
        Ok(Cid::digest(&bytes))
    }

    /// Returns the height of the block
    #[inline]
    pub fn height(&self) -> u64 {
        self.header.height
    }

    /// Returns the CID of the parent block, if any
    #[inline]
    pub fn parent(&self) -> Option<&Cid> {
        self.header.parent.as_ref()
    }

    /// Returns whether the block is a genesis block
    pub fn is_genesis(&self) -> bool {
        self.header.parent.is_none()
    }
}
