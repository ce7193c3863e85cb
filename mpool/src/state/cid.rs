use rkyv::{Archive, Deserialize, Serialize};

pub const CID_LENGTH: usize = blake3::OUT_LEN;

/// A content identifier: the blake3 hash of a value's canonical encoding.
///
/// Two messages (or blocks) with equal CID are the same message; CID
/// equality is definitional for identity everywhere in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Deserialize, Serialize)]
pub struct Cid(pub [u8; CID_LENGTH]);

impl Cid {
    /// Creates a CID from raw bytes
    pub fn from_bytes(bytes: [u8; CID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Hashes a canonical encoding into a CID
    pub fn digest(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Returns the bytes of the CID
    pub fn as_bytes(&self) -> &[u8; CID_LENGTH] {
        &self.0
    }
}

impl std::fmt::Display for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display first 8 bytes in hex
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl AsRef<[u8]> for Cid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
