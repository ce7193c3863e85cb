//! Reorg reconciliation: apply a head transition to the message pool.

use slog::Logger;

use crate::chain::{cancel::CancelToken, loader::BlockLoader, walker::walk_chain_diff};
use crate::error::{Error, Result};
use crate::pool::MessagePool;
use crate::state::cid::Cid;

/// Reconciles the pool with a canonical-head transition from `old_head` to
/// `new_head`.
///
/// Messages committed only on the abandoned branch return to the pool so
/// they can be mined again; messages committed on the adopted branch leave
/// it. Messages on both branches are untouched.
///
/// The walk happens without the pool lock, and any walk error returns with
/// the pool unchanged. The commit works from a fully resolved plan and takes
/// the lock once per message; reinstatements all precede removals.
/// Cancellation is observed between walk steps and once more before the
/// commit, never during it.
///
/// Not atomic against concurrent `add`/`remove` from other callers: the
/// result is as if each reinstatement and removal interleaved individually
/// with them.
pub fn update_message_pool<L: BlockLoader>(
    cancel: &CancelToken,
    pool: &MessagePool,
    loader: &L,
    old_head: &Cid,
    new_head: &Cid,
    logger: &Logger,
) -> Result<()> {
    let diff = walk_chain_diff(loader, old_head, new_head, cancel)?;

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let reinstated = diff.dropped.len();
    let removed = diff.added.len();

    for (cid, msg) in diff.dropped {
        slog::trace!(logger, "Reinstating message from abandoned branch"; "cid" => %cid);
        pool.insert_resolved(cid, msg);
    }
    for cid in &diff.added {
        slog::trace!(logger, "Removing message committed on adopted branch"; "cid" => %cid);
        pool.remove(cid);
    }

    slog::debug!(
        logger,
        "Message pool reconciled";
        "old_head" => %old_head,
        "new_head" => %new_head,
        "reinstated" => reinstated,
        "removed" => removed,
        "pool_size" => pool.len(),
    );

    Ok(())
}
