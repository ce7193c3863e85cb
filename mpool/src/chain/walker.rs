//! Chain walker: symmetric difference of two branches.
//!
//! Given two heads, walks both branches back to their common ancestor and
//! reports which messages appear on one side only. The walker is pure with
//! respect to the pool; it only reads blocks through a [`BlockLoader`].

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::chain::{cancel::CancelToken, loader::BlockLoader};
use crate::error::{Error, Result};
use crate::state::{block::Block, cid::Cid, message::Message};

/// The message-level difference between two branches of the chain.
///
/// `dropped` and `added` are disjoint: a message mined on both branches is in
/// neither set, since adopting the new branch neither reinstates nor removes
/// it.
#[derive(Debug, Default)]
pub struct ChainDiff {
    /// Messages committed on the abandoned branch only, with their payloads
    pub dropped: HashMap<Cid, Arc<Message>>,
    /// CIDs of messages committed on the adopted branch only
    pub added: HashSet<Cid>,
}

impl ChainDiff {
    /// Returns true if the two branches commit identical message sets.
    pub fn is_empty(&self) -> bool {
        self.dropped.is_empty() && self.added.is_empty()
    }
}

/// A traversal pointer moving from a head toward genesis.
///
/// `None` models the virtual ancestor above genesis: once a cursor steps past
/// a genesis block it is exhausted, and two exhausted cursors have met on
/// fully disjoint chains.
struct Cursor {
    at: Option<(Cid, Block)>,
}

impl Cursor {
    fn start<L: BlockLoader>(loader: &L, head: Cid) -> Result<Self> {
        let block = load_required(loader, &head)?;
        Ok(Self {
            at: Some((head, block)),
        })
    }

    fn cid(&self) -> Option<Cid> {
        self.at.as_ref().map(|(cid, _)| *cid)
    }

    fn height(&self) -> Option<u64> {
        self.at.as_ref().map(|(_, block)| block.height())
    }

    /// Moves the cursor to the parent of its current block.
    fn step<L: BlockLoader>(&mut self, loader: &L) -> Result<()> {
        let Some((_, block)) = self.at.take() else {
            return Ok(());
        };
        if let Some(parent_cid) = block.header.parent {
            let parent = load_required(loader, &parent_cid)?;
            // A parent at or above its child's height would let the walk
            // cycle; reject the linkage instead.
            if parent.height() >= block.height() {
                return Err(Error::Malformed {
                    cid: parent_cid,
                    reason: format!(
                        "parent height {} is not below child height {}",
                        parent.height(),
                        block.height()
                    ),
                });
            }
            self.at = Some((parent_cid, parent));
        }
        Ok(())
    }
}

fn load_required<L: BlockLoader>(loader: &L, cid: &Cid) -> Result<Block> {
    match loader.load_block(cid) {
        Ok(Some(block)) => Ok(block),
        Ok(None) => Err(Error::BlockNotFound(*cid)),
        Err(e) => Err(Error::Loader(e)),
    }
}

/// Computes the [`ChainDiff`] between the branches ending at `old_head` and
/// `new_head`.
///
/// Both cursors move backward, the deeper side first so they meet at the
/// common ancestor rather than passing it; at equal depth both advance. Each
/// block visited on the old side contributes its messages (with payloads) to
/// the dropped working set, each block on the new side its CIDs to the added
/// working set, and the final sets are the two set differences.
///
/// When `old_head == new_head` the diff is empty and the loader is never
/// invoked. Cancellation is observed between steps; a cancelled walk leaves
/// no trace.
pub fn walk_chain_diff<L: BlockLoader>(
    loader: &L,
    old_head: &Cid,
    new_head: &Cid,
    cancel: &CancelToken,
) -> Result<ChainDiff> {
    if old_head == new_head {
        return Ok(ChainDiff::default());
    }

    let mut old = Cursor::start(loader, *old_head)?;
    let mut new = Cursor::start(loader, *new_head)?;

    let mut old_msgs: HashMap<Cid, Arc<Message>> = HashMap::new();
    let mut new_cids: HashSet<Cid> = HashSet::new();

    while old.cid() != new.cid() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let step_old = match (old.height(), new.height()) {
            (Some(o), Some(n)) => o >= n,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let step_new = match (old.height(), new.height()) {
            (Some(o), Some(n)) => n >= o,
            (None, Some(_)) => true,
            (_, None) => false,
        };

        if step_old {
            if let Some((_, block)) = &old.at {
                for msg in &block.messages {
                    let cid = msg.cid()?;
                    old_msgs
                        .entry(cid)
                        .or_insert_with(|| Arc::new(msg.clone()));
                }
            }
            old.step(loader)?;
        }
        if step_new {
            if let Some((_, block)) = &new.at {
                for msg in &block.messages {
                    new_cids.insert(msg.cid()?);
                }
            }
            new.step(loader)?;
        }
    }

    let old_cids: HashSet<Cid> = old_msgs.keys().copied().collect();
    let added: HashSet<Cid> = new_cids.difference(&old_cids).copied().collect();
    old_msgs.retain(|cid, _| !new_cids.contains(cid));

    Ok(ChainDiff {
        dropped: old_msgs,
        added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_helpers::{MemoryBlockStore, MessageFactory, cids_of};

    /// Loader for asserting a code path never touches the store.
    struct PanicLoader;

    impl BlockLoader for PanicLoader {
        fn load_block(&self, cid: &Cid) -> anyhow::Result<Option<Block>> {
            panic!("unexpected load of {cid}");
        }
    }

    #[test]
    fn same_head_is_empty_without_loading() {
        let head = Cid::from_bytes([9u8; 32]);
        let diff = walk_chain_diff(&PanicLoader, &head, &head, &CancelToken::new()).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn extension_has_no_dropped() {
        let store = MemoryBlockStore::new();
        let mut factory = MessageFactory::new();
        let m = factory.messages(3);

        let old = store.chain(None, &[vec![m[0].clone()]]);
        let new = store.chain(Some(&old[0]), &[vec![m[1].clone()], vec![m[2].clone()]]);

        let diff =
            walk_chain_diff(&store, &old[0].0, &new[1].0, &CancelToken::new()).unwrap();
        assert!(diff.dropped.is_empty());
        assert_eq!(diff.added, cids_of(&[m[1].clone(), m[2].clone()]));
    }

    #[test]
    fn truncation_has_no_added() {
        let store = MemoryBlockStore::new();
        let mut factory = MessageFactory::new();
        let m = factory.messages(3);

        let chain = store.chain(
            None,
            &[vec![m[0].clone()], vec![m[1].clone()], vec![m[2].clone()]],
        );

        let diff =
            walk_chain_diff(&store, &chain[2].0, &chain[0].0, &CancelToken::new()).unwrap();
        assert!(diff.added.is_empty());
        assert_eq!(
            diff.dropped.keys().copied().collect::<HashSet<_>>(),
            cids_of(&[m[1].clone(), m[2].clone()])
        );
    }

    #[test]
    fn disjoint_chains_meet_above_genesis() {
        let store = MemoryBlockStore::new();
        let mut factory = MessageFactory::new();
        let m = factory.messages(3);

        let old = store.chain(None, &[vec![m[0].clone()]]);
        let new = store.chain(None, &[vec![m[1].clone()], vec![m[2].clone()]]);

        let diff =
            walk_chain_diff(&store, &old[0].0, &new[1].0, &CancelToken::new()).unwrap();
        assert_eq!(
            diff.dropped.keys().copied().collect::<HashSet<_>>(),
            cids_of(&m[..1])
        );
        assert_eq!(diff.added, cids_of(&m[1..]));
    }

    #[test]
    fn shared_messages_are_in_neither_set() {
        let store = MemoryBlockStore::new();
        let mut factory = MessageFactory::new();
        let m = factory.messages(3);

        // m[0] is mined on both branches
        let old = store.chain(None, &[vec![m[0].clone(), m[1].clone()]]);
        let new = store.chain(None, &[vec![m[0].clone(), m[2].clone()]]);

        let diff =
            walk_chain_diff(&store, &old[0].0, &new[0].0, &CancelToken::new()).unwrap();
        assert_eq!(
            diff.dropped.keys().copied().collect::<HashSet<_>>(),
            cids_of(&[m[1].clone()])
        );
        assert_eq!(diff.added, cids_of(&[m[2].clone()]));

        let shared = m[0].cid().unwrap();
        assert!(!diff.dropped.contains_key(&shared));
        assert!(!diff.added.contains(&shared));
    }

    #[test]
    fn dropped_and_added_are_disjoint() {
        let store = MemoryBlockStore::new();
        let mut factory = MessageFactory::new();
        let m = factory.messages(7);

        let shared = store.chain(None, &[vec![m[0].clone()]]);
        let old = store.chain(
            Some(&shared[0]),
            &[vec![m[1].clone(), m[2].clone()], vec![m[3].clone()]],
        );
        let new = store.chain(
            Some(&shared[0]),
            &[vec![m[2].clone(), m[4].clone()], vec![m[5].clone(), m[6].clone()]],
        );

        let diff =
            walk_chain_diff(&store, &old[1].0, &new[1].0, &CancelToken::new()).unwrap();
        for cid in diff.dropped.keys() {
            assert!(!diff.added.contains(cid));
        }
        assert_eq!(
            diff.dropped.keys().copied().collect::<HashSet<_>>(),
            cids_of(&[m[1].clone(), m[3].clone()])
        );
        assert_eq!(
            diff.added,
            cids_of(&[m[4].clone(), m[5].clone(), m[6].clone()])
        );
    }

    #[test]
    fn dropped_payloads_are_resolved() {
        let store = MemoryBlockStore::new();
        let mut factory = MessageFactory::new();
        let m = factory.messages(2);

        let old = store.chain(None, &[vec![m[0].clone(), m[1].clone()]]);
        let new = store.chain(None, &[vec![]]);

        let diff =
            walk_chain_diff(&store, &old[0].0, &new[0].0, &CancelToken::new()).unwrap();
        for msg in &m {
            let cid = msg.cid().unwrap();
            assert_eq!(diff.dropped.get(&cid).map(|a| (**a).clone()), Some(msg.clone()));
        }
    }

    #[test]
    fn missing_block_is_reported() {
        let store = MemoryBlockStore::new();
        let mut factory = MessageFactory::new();
        let m = factory.messages(1);

        let old = store.chain(None, &[vec![m[0].clone()]]);
        let missing = Cid::from_bytes([7u8; 32]);

        let err =
            walk_chain_diff(&store, &old[0].0, &missing, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, Error::BlockNotFound(cid) if cid == missing));
    }

    #[test]
    fn missing_interior_block_is_reported() {
        let store = MemoryBlockStore::new();
        let chain = store.chain(None, &[vec![], vec![], vec![]]);
        let other = store.chain(None, &[vec![]]);

        store.forget(&chain[1].0);

        let err = walk_chain_diff(&store, &chain[2].0, &other[0].0, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, Error::BlockNotFound(cid) if cid == chain[1].0));
    }

    #[test]
    fn malformed_parent_height_is_reported() {
        let store = MemoryBlockStore::new();
        let genesis = Block::genesis(vec![], 1_000);
        let genesis_cid = store.put(genesis.clone());

        // Child claims the same height as its parent
        let child = Block {
            header: crate::state::block::BlockHeader {
                height: 0,
                parent: Some(genesis_cid),
                timestamp: 1_001,
            },
            messages: vec![],
        };
        let child_cid = store.put(child);
        let other = store.chain(None, &[vec![]]);

        let err = walk_chain_diff(&store, &child_cid, &other[0].0, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn cancellation_is_observed_between_steps() {
        let store = MemoryBlockStore::new();
        let old = store.chain(None, &[vec![]]);
        let new = store.chain(None, &[vec![], vec![]]);

        let cancel = CancelToken::new();
        cancel.cancel();

        let err = walk_chain_diff(&store, &old[0].0, &new[1].0, &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
