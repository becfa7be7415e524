use crate::Hash;
use sha2::{Digest, Sha256};

pub trait HasherBase {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self;
}

pub trait Hasher: HasherBase + Clone + Default {
    fn finalize(self) -> Hash;
    fn reset(&mut self);
    #[inline(always)]
    fn hash<A: AsRef<[u8]>>(data: A) -> Hash {
        let mut hasher = Self::default();
        hasher.update(data);
        hasher.finalize()
    }
}

macro_rules! double_sha256_hasher {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Default)]
        pub struct $name(Sha256);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Sha256::new())
            }

            pub fn write<A: AsRef<[u8]>>(&mut self, data: A) {
                self.0.update(data.as_ref());
            }

            #[inline(always)]
            pub fn finalize(self) -> Hash {
                let first = self.0.finalize();
                let second = Sha256::digest(first);
                Hash::from_slice(&second)
            }
        }

        impl HasherBase for $name {
            #[inline(always)]
            fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
                self.write(data);
                self
            }
        }

        impl Hasher for $name {
            #[inline(always)]
            fn finalize(self) -> Hash {
                // delegate to the inherent method
                $name::finalize(self)
            }

            #[inline(always)]
            fn reset(&mut self) {
                *self = Self::new();
            }
        }
    };
}

double_sha256_hasher!(
    /// Hashes the legacy serialization of a transaction
    TransactionHash
);
double_sha256_hasher!(
    /// Combines two merkle tree nodes
    MerkleBranchHash
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_double_sha256_vectors() {
        struct Test {
            name: &'static str,
            data: &'static [u8],
            expected: &'static str,
        }

        // expected values are in display (reversed) order
        let tests = vec![
            Test { name: "empty", data: b"", expected: "56944c5d3f98413ef45cf54545538103cc9f298e0575820ad3591376e2e0f65d" },
            Test { name: "hello", data: b"hello", expected: "503d8319a48348cdc610a582f7bf754b5833df65038606eb48510790dfc99595" },
        ];

        for test in tests {
            let expected = Hash::from_str(test.expected).unwrap();
            assert_eq!(TransactionHash::hash(test.data), expected, "{}", test.name);
            assert_eq!(MerkleBranchHash::hash(test.data), expected, "{}", test.name);
        }
    }

    #[test]
    fn test_incremental_update_matches_one_shot() {
        let mut hasher = MerkleBranchHash::new();
        hasher.update(b"hel").update(b"lo");
        assert_eq!(hasher.clone().finalize(), MerkleBranchHash::hash(b"hello"));
        hasher.reset();
        assert_eq!(Hasher::finalize(hasher), MerkleBranchHash::hash(b""));
    }
}
