pub mod uint;

use thiserror::Error;

construct_uint!(Uint256, 4);
construct_uint!(Uint320, 5);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UintError {
    #[error("hex string of length {0} does not fit the integer width")]
    InvalidLength(usize),

    #[error("invalid hex string: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("value does not fit in the target type")]
    Overflow,
}

/// Result of decoding a compact `nBits` value.
///
/// `negative` and `overflow` mirror the sign bit and exponent checks of the compact format.
/// Consensus code treats either flag as an invalid target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactTarget {
    pub target: Uint256,
    pub negative: bool,
    pub overflow: bool,
}

impl CompactTarget {
    pub fn is_valid(&self) -> bool {
        !self.negative && !self.overflow && !self.target.is_zero()
    }
}

impl Uint256 {
    /// Decodes the floating-point style compact target encoding.
    ///
    /// The top byte is the size in bytes, the low 23 bits the mantissa and bit 23 a sign.
    pub fn decode_compact(bits: u32) -> CompactTarget {
        let size = bits >> 24;
        let mut word = bits & 0x007f_ffff;
        let target = if size <= 3 {
            word >>= 8 * (3 - size);
            Uint256::from_u64(word as u64)
        } else {
            Uint256::from_u64(word as u64) << (8 * (size - 3))
        };
        let negative = word != 0 && (bits & 0x0080_0000) != 0;
        let overflow = word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));
        CompactTarget { target, negative, overflow }
    }

    /// Lenient decoding: negative or overflowing encodings yield zero.
    pub fn from_compact_target_bits(bits: u32) -> Self {
        let decoded = Self::decode_compact(bits);
        if decoded.negative || decoded.overflow { Uint256::ZERO } else { decoded.target }
    }

    pub fn compact_target_bits(self) -> u32 {
        let mut size = self.bits().div_ceil(8);
        let mut compact = if size <= 3 { (self.as_u64() << (8 * (3 - size))) as u32 } else { (self >> (8 * (size - 3))).as_u64() as u32 };
        // keep the mantissa positive by moving the sign bit into the exponent
        if compact & 0x0080_0000 != 0 {
            compact >>= 8;
            size += 1;
        }
        compact | (size << 24)
    }
}

impl From<Uint256> for Uint320 {
    fn from(value: Uint256) -> Self {
        let mut limbs = [0u64; Uint320::LIMBS];
        limbs[..Uint256::LIMBS].copy_from_slice(&value.0);
        Uint320(limbs)
    }
}

impl TryFrom<Uint320> for Uint256 {
    type Error = UintError;

    fn try_from(value: Uint320) -> Result<Self, Self::Error> {
        if value.0[Uint256::LIMBS..].iter().any(|&limb| limb != 0) {
            return Err(UintError::Overflow);
        }
        let mut limbs = [0u64; Uint256::LIMBS];
        limbs.copy_from_slice(&value.0[..Uint256::LIMBS]);
        Ok(Uint256(limbs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_round_trip_known_values() {
        struct Test {
            bits: u32,
            target: &'static str,
        }

        let tests = vec![
            Test { bits: 0x1e0ffff0, target: "0x00000ffff0000000000000000000000000000000000000000000000000000000" },
            Test { bits: 0x1d00ffff, target: "0x00000000ffff0000000000000000000000000000000000000000000000000000" },
            Test { bits: 0x207fffff, target: "0x7fffff0000000000000000000000000000000000000000000000000000000000" },
            Test { bits: 0x01120000, target: "0x12" },
            Test { bits: 0x02123400, target: "0x1234" },
            Test { bits: 0x05009234, target: "0x92340000" },
        ];

        for test in tests {
            let expected: Uint256 = test.target.parse().unwrap();
            assert_eq!(Uint256::from_compact_target_bits(test.bits), expected, "decoding {:#010x}", test.bits);
            assert_eq!(expected.compact_target_bits(), test.bits, "encoding {:#x}", expected);
        }
    }

    #[test]
    fn test_compact_flags() {
        let negative = Uint256::decode_compact(0x04923456);
        assert!(negative.negative);
        assert!(!negative.is_valid());
        assert_eq!(Uint256::from_compact_target_bits(0x04923456), Uint256::ZERO);

        let overflow = Uint256::decode_compact(0xff123456);
        assert!(overflow.overflow);
        assert!(!overflow.is_valid());

        // a zero mantissa is neither negative nor overflowing, only empty
        let empty = Uint256::decode_compact(0x01803456);
        assert!(!empty.negative && !empty.overflow);
        assert!(!empty.is_valid());
    }

    #[test]
    fn test_widening_conversions() {
        let max = Uint320::from(Uint256::MAX);
        assert_eq!(Uint256::try_from(max), Ok(Uint256::MAX));
        let wide = max.overflowing_mul_u64(16).0;
        assert_eq!(Uint256::try_from(wide), Err(UintError::Overflow));
    }
}
