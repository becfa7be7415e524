use crate::{Hash, Hasher, HasherBase};

/// X11 over the 80-byte block header, the block identity and proof of work hash.
///
/// X11 has no incremental form, so the hasher buffers the header until finalized.
#[derive(Clone, Default)]
pub struct BlockHash(Vec<u8>);

impl BlockHash {
    #[inline]
    pub fn new() -> Self {
        Self(Vec::with_capacity(80))
    }

    pub fn write<A: AsRef<[u8]>>(&mut self, data: A) {
        self.0.extend_from_slice(data.as_ref());
    }

    #[inline]
    pub fn finalize(self) -> Hash {
        Hash::from_bytes(rs_x11_hash::get_x11_hash(&self.0))
    }
}

impl HasherBase for BlockHash {
    #[inline(always)]
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        self.write(data);
        self
    }
}

impl Hasher for BlockHash {
    #[inline(always)]
    fn finalize(self) -> Hash {
        BlockHash::finalize(self)
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionHash;

    /// Serializes a version 1 header with a zero previous hash
    fn genesis_header(merkle: &str, timestamp: u32, bits: u32, nonce: u32) -> Vec<u8> {
        let mut header = Vec::with_capacity(80);
        header.extend_from_slice(&1i32.to_le_bytes());
        header.extend_from_slice(&[0u8; 32]);
        header.extend_from_slice(&Hash::from_static_hex(merkle).as_bytes());
        header.extend_from_slice(&timestamp.to_le_bytes());
        header.extend_from_slice(&bits.to_le_bytes());
        header.extend_from_slice(&nonce.to_le_bytes());
        header
    }

    #[test]
    fn test_x11_header_vectors() {
        struct Test {
            name: &'static str,
            header: Vec<u8>,
            expected: Hash,
        }

        let tests = vec![
            Test {
                name: "genix genesis",
                header: genesis_header("3ed2fa1e72f3c4160cc9b4870cc91aa8e8b90db08274d2fec8565ed5c8e87311", 1549043100, 0x1e0ffff0, 2084844903),
                expected: Hash::from_static_hex("000006874678aa53f78b7676ced0f443cd22ae8917199b5ec14d0b7b7df7b93d"),
            },
            Test {
                name: "dash genesis",
                header: genesis_header("e0028eb9648db56b1ac77cf090b99048a8007e2bb64b68f092c03c7f56a662c7", 1390095618, 0x1e0ffff0, 28917698),
                expected: Hash::from_static_hex("00000ffd590b1485b3caadc19b22e6379c733355108f107a430458cdf3407ab6"),
            },
        ];

        for test in tests {
            assert_eq!(test.header.len(), 80, "{}", test.name);
            assert_eq!(BlockHash::hash(&test.header), test.expected, "{}", test.name);
            // Transaction and merkle hashing stays on double SHA-256
            assert_ne!(TransactionHash::hash(&test.header), test.expected, "{}", test.name);
        }
    }

    #[test]
    fn test_buffered_updates() {
        let header = [7u8; 80];
        let mut hasher = BlockHash::new();
        hasher.update(&header[..4]).update(&header[4..]);
        assert_eq!(hasher.clone().finalize(), BlockHash::hash(header));
        hasher.reset();
        assert_eq!(Hasher::finalize(hasher), BlockHash::hash(b""));
    }
}
