//! Content hashing for fingerprints using blake3.
//!
//! The fingerprint embedded in a file name is the front of the hex digest,
//! truncated to `hash_length` characters. Shorter fingerprints trade
//! collision resistance for shorter names; the length is configurable.

/// Number of hex characters in a full digest.
pub const MAX_HASH_LENGTH: usize = 64;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash the full byte content.
    #[inline]
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// First `len` hex characters of the digest (clamped to the digest size).
    pub fn truncated(self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len.min(MAX_HASH_LENGTH));
        hex
    }
}

/// Fingerprint of `content`: the first `len` hex characters of its digest.
#[inline]
pub fn fingerprint(content: &[u8], len: usize) -> String {
    ContentHash::of(content).truncated(len)
}
