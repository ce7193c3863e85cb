use rkyv::{Archive, Deserialize, Serialize};

use crate::error::Result;
use crate::state::{address::Address, canonical_bytes, cid::Cid};

/// [`Message`] is a transaction pending inclusion in a block.
///
/// The pool treats the body as opaque: it never validates nonces, balances,
/// or signatures, and it never mutates a message. Identity is the CID of the
/// canonical encoding, so any two structurally equal messages are the same
/// message.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    /// The sender of the message
    pub from: Address,
    /// The recipient of the message
    pub to: Address,
    /// The amount transferred
    pub value: u64,
    /// The sender's nonce. Incremental; validated upstream, carried here
    /// only as payload.
    pub nonce: u64,
    /// The method invoked on the recipient
    pub method: String,
    /// Method parameters, already encoded
    pub params: Vec<u8>,
}

impl Message {
    pub fn new(
        from: Address,
        to: Address,
        value: u64,
        nonce: u64,
        method: impl Into<String>,
        params: Vec<u8>,
    ) -> Self {
        Self {
            from,
            to,
            value,
            nonce,
            method: method.into(),
            params,
        }
    }

    /// Computes the content identifier of the message.
    ///
    /// Deterministic across hosts: the same message always hashes to the
    /// same CID. The only fallible step is canonical encoding.
    pub fn cid(&self) -> Result<Cid> {
        let bytes = canonical_bytes(self)?;
        Ok(Cid::digest(&bytes))
    }
}
