mod hashers;
mod pow_hashers;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::fmt::{Debug, Display, Formatter};
use std::str::{self, FromStr};

pub use hashers::{Hasher, HasherBase, MerkleBranchHash, TransactionHash};
pub use pow_hashers::BlockHash;

pub const HASH_SIZE: usize = 32;

/// A 256-bit hash kept in serialization (little-endian) byte order.
///
/// Text form follows the uint256 convention: bytes are printed in reverse, so the
/// most significant byte of the number comes first.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default, PartialOrd, Ord)]
pub struct Hash([u8; HASH_SIZE]);

pub const ZERO_HASH: Hash = Hash([0; HASH_SIZE]);

impl Hash {
    #[inline(always)]
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    #[inline(always)]
    pub const fn as_bytes(&self) -> [u8; HASH_SIZE] {
        self.0
    }

    #[inline(always)]
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut out = [0u8; HASH_SIZE];
        out.copy_from_slice(bytes);
        Hash(out)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Parses a hex string which must be a const-compatible literal; panics on invalid input.
    pub const fn from_static_hex(hex_str: &str) -> Self {
        let hex = hex_str.as_bytes();
        assert!(hex.len() == HASH_SIZE * 2, "hash literal must have 64 hex digits");
        let mut out = [0u8; HASH_SIZE];
        let mut i = 0;
        while i < HASH_SIZE {
            let hi = hex_digit(hex[2 * i]);
            let lo = hex_digit(hex[2 * i + 1]);
            // text is reversed relative to the stored byte order
            out[HASH_SIZE - 1 - i] = (hi << 4) | lo;
            i += 1;
        }
        Hash(out)
    }
}

const fn hex_digit(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in hash literal"),
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        let mut hex = [0u8; HASH_SIZE * 2];
        hex::encode_to_slice(reversed, &mut hex).map_err(|_| std::fmt::Error)?;
        f.write_str(str::from_utf8(&hex).map_err(|_| std::fmt::Error)?)
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Hash {
    type Err = hex::FromHexError;

    fn from_str(hash_str: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(hash_str, &mut bytes)?;
        bytes.reverse();
        Ok(Hash(bytes))
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Hash::from_str(&s).map_err(D::Error::custom)
    }
}
