use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum AddressError {
    #[error("no registered prefix matches the given bytes")]
    NoMatchingClass,

    #[error("more than one address class matches the given bytes")]
    AmbiguousEncoding,

    #[error("invalid payload length {found} for {class}")]
    InvalidPayloadLength { class: AddressClass, found: usize },

    #[error("prefix for {0} is empty")]
    EmptyPrefix(AddressClass),

    #[error("{0} and {1} share the same prefix")]
    DuplicatePrefix(AddressClass, AddressClass),

    #[error("base58 decoding failed: {0}")]
    Base58(String),
}

pub type AddressResult<T> = std::result::Result<T, AddressError>;

/// Logical key or address type carried behind a base58 prefix
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressClass {
    PubkeyAddress,
    ScriptAddress,
    SecretKey,
    ExtPublicKey,
    ExtSecretKey,
}

impl AddressClass {
    pub const ALL: [AddressClass; 5] =
        [AddressClass::PubkeyAddress, AddressClass::ScriptAddress, AddressClass::SecretKey, AddressClass::ExtPublicKey, AddressClass::ExtSecretKey];

    /// Accepted payload lengths following the prefix.
    ///
    /// Secret keys carry an optional trailing compression marker; extended keys carry the
    /// BIP32 depth, parent fingerprint, child number, chain code and key material.
    pub fn payload_lens(&self) -> &'static [usize] {
        match self {
            AddressClass::PubkeyAddress | AddressClass::ScriptAddress => &[20],
            AddressClass::SecretKey => &[32, 33],
            AddressClass::ExtPublicKey | AddressClass::ExtSecretKey => &[74],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressClass::PubkeyAddress => "pubkey-address",
            AddressClass::ScriptAddress => "script-address",
            AddressClass::SecretKey => "secret-key",
            AddressClass::ExtPublicKey => "ext-public-key",
            AddressClass::ExtSecretKey => "ext-secret-key",
        }
    }
}

impl Display for AddressClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-network base58 prefix table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Base58Prefixes {
    pub pubkey_address: &'static [u8],
    pub script_address: &'static [u8],
    pub secret_key: &'static [u8],
    pub ext_public_key: &'static [u8],
    pub ext_secret_key: &'static [u8],
}

impl Base58Prefixes {
    pub fn prefix(&self, class: AddressClass) -> &'static [u8] {
        match class {
            AddressClass::PubkeyAddress => self.pubkey_address,
            AddressClass::ScriptAddress => self.script_address,
            AddressClass::SecretKey => self.secret_key,
            AddressClass::ExtPublicKey => self.ext_public_key,
            AddressClass::ExtSecretKey => self.ext_secret_key,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AddressClass, &'static [u8])> + '_ {
        AddressClass::ALL.into_iter().map(|class| (class, self.prefix(class)))
    }

    /// Checks that every class has a non-empty prefix and no two classes share one
    pub fn validate(&self) -> AddressResult<()> {
        for (i, (class, prefix)) in self.iter().enumerate() {
            if prefix.is_empty() {
                return Err(AddressError::EmptyPrefix(class));
            }
            if let Some((other, _)) = self.iter().skip(i + 1).find(|(_, other)| *other == prefix) {
                return Err(AddressError::DuplicatePrefix(class, other));
            }
        }
        Ok(())
    }

    pub fn encode(&self, class: AddressClass, payload: &[u8]) -> AddressResult<Vec<u8>> {
        if !class.payload_lens().contains(&payload.len()) {
            return Err(AddressError::InvalidPayloadLength { class, found: payload.len() });
        }
        let prefix = self.prefix(class);
        let mut out = Vec::with_capacity(prefix.len() + payload.len());
        out.extend_from_slice(prefix);
        out.extend_from_slice(payload);
        Ok(out)
    }

    /// Splits prefixed bytes into their class and payload.
    ///
    /// A class matches when its prefix leads the bytes and the remainder has one of its
    /// payload lengths. Exactly one class must match.
    pub fn decode(&self, bytes: &[u8]) -> AddressResult<(AddressClass, Vec<u8>)> {
        let mut matches = self.iter().filter(|(class, prefix)| {
            bytes.starts_with(prefix) && class.payload_lens().contains(&(bytes.len() - prefix.len()))
        });
        match (matches.next(), matches.next()) {
            (Some((class, prefix)), None) => Ok((class, bytes[prefix.len()..].to_vec())),
            (Some(_), Some(_)) => Err(AddressError::AmbiguousEncoding),
            (None, _) => Err(AddressError::NoMatchingClass),
        }
    }

    /// Base58check text form of `prefix ‖ payload`
    pub fn encode_check(&self, class: AddressClass, payload: &[u8]) -> AddressResult<String> {
        Ok(bs58::encode(self.encode(class, payload)?).with_check().into_string())
    }

    pub fn decode_check(&self, encoded: &str) -> AddressResult<(AddressClass, Vec<u8>)> {
        let bytes = bs58::decode(encoded).with_check(None).into_vec().map_err(|err| AddressError::Base58(err.to_string()))?;
        self.decode(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{
        ChaCha8Rng,
        rand_core::{RngCore, SeedableRng},
    };

    const PREFIXES: Base58Prefixes = Base58Prefixes {
        pubkey_address: &[98],
        script_address: &[11],
        secret_key: &[127],
        ext_public_key: &[0x04, 0x88, 0xB2, 0x1E],
        ext_secret_key: &[0x04, 0x88, 0xAD, 0xE4],
    };

    #[test]
    fn test_decode_inverts_encode() {
        let mut rng = ChaCha8Rng::from_seed([3; 32]);
        for class in AddressClass::ALL {
            for &len in class.payload_lens() {
                for _ in 0..64 {
                    let mut payload = vec![0u8; len];
                    rng.fill_bytes(&mut payload);
                    let encoded = PREFIXES.encode(class, &payload).unwrap();
                    assert_eq!(PREFIXES.decode(&encoded).unwrap(), (class, payload.clone()));
                    let text = PREFIXES.encode_check(class, &payload).unwrap();
                    assert_eq!(PREFIXES.decode_check(&text).unwrap(), (class, payload));
                }
            }
        }
    }

    #[test]
    fn test_decode_failures() {
        assert_eq!(PREFIXES.decode(&[]), Err(AddressError::NoMatchingClass));
        assert_eq!(PREFIXES.decode(&[0x55; 21]), Err(AddressError::NoMatchingClass));
        // right prefix, wrong length
        assert_eq!(PREFIXES.decode(&[98; 22]), Err(AddressError::NoMatchingClass));
        assert_eq!(
            PREFIXES.encode(AddressClass::PubkeyAddress, &[0; 19]),
            Err(AddressError::InvalidPayloadLength { class: AddressClass::PubkeyAddress, found: 19 })
        );

        let mut text = PREFIXES.encode_check(AddressClass::ScriptAddress, &[7; 20]).unwrap();
        let last = text.pop().unwrap();
        text.push(if last == '2' { '3' } else { '2' });
        assert!(matches!(PREFIXES.decode_check(&text), Err(AddressError::Base58(_))));
    }

    #[test]
    fn test_validate() {
        assert_eq!(PREFIXES.validate(), Ok(()));

        let duplicate = Base58Prefixes { secret_key: &[98], ..PREFIXES };
        assert_eq!(duplicate.validate(), Err(AddressError::DuplicatePrefix(AddressClass::PubkeyAddress, AddressClass::SecretKey)));

        let empty = Base58Prefixes { ext_secret_key: &[], ..PREFIXES };
        assert_eq!(empty.validate(), Err(AddressError::EmptyPrefix(AddressClass::ExtSecretKey)));
    }

    #[test]
    fn test_ambiguous_tables_are_detected_on_decode() {
        // same prefix and overlapping payload lengths can only be told apart by validate()
        let ambiguous = Base58Prefixes { script_address: &[98], ..PREFIXES };
        assert_eq!(ambiguous.decode(&[98; 21]), Err(AddressError::AmbiguousEncoding));
    }
}
