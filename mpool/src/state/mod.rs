use rkyv::{api::high::HighSerializer, ser::allocator::ArenaHandle, util::AlignedVec};

use crate::error::{Error, Result};

pub mod address;
pub mod block;
pub mod cid;
pub mod message;

/// Canonical byte encoding shared by everything that is content-addressed.
/// Two values encode to the same bytes iff they are the same value.
pub(crate) fn canonical_bytes<T>(value: &T) -> Result<AlignedVec>
where
    T: for<'a> rkyv::Serialize<HighSerializer<AlignedVec, ArenaHandle<'a>, rkyv::rancor::Error>>,
{
    rkyv::to_bytes::<rkyv::rancor::Error>(value).map_err(Error::Codec)
}
