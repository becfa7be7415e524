/// Defines a fixed-width unsigned integer made of little-endian `u64` limbs.
///
/// Only the operations needed by target and chain-work arithmetic are provided. Arithmetic
/// operators panic on overflow, the `overflowing_*` methods report it instead.
#[macro_export]
macro_rules! construct_uint {
    ($name:ident, $n_words:literal) => {
        /// Little-endian large integer type
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub [u64; $n_words]);

        #[allow(unused)]
        impl $name {
            pub const ZERO: Self = $name([0; $n_words]);
            pub const MAX: Self = $name([u64::MAX; $n_words]);
            pub const LIMBS: usize = $n_words;
            pub const BITS: u32 = $n_words * u64::BITS;
            pub const BYTES: usize = $n_words * 8;

            #[inline]
            pub const fn from_u64(n: u64) -> Self {
                let mut limbs = [0u64; $n_words];
                limbs[0] = n;
                $name(limbs)
            }

            #[inline]
            pub fn as_u64(self) -> u64 {
                self.0[0]
            }

            #[inline]
            pub fn is_zero(self) -> bool {
                self.0.iter().all(|&limb| limb == 0)
            }

            /// Number of significant bits, zero for zero
            #[inline]
            pub fn bits(&self) -> u32 {
                match self.0.iter().rposition(|&limb| limb != 0) {
                    Some(i) => (i as u32 + 1) * u64::BITS - self.0[i].leading_zeros(),
                    None => 0,
                }
            }

            #[inline]
            pub fn overflowing_shl(self, shift: u32) -> (Self, bool) {
                if shift >= Self::BITS {
                    return (Self::ZERO, true);
                }
                let (limb_shift, bit_shift) = ((shift / 64) as usize, shift % 64);
                let mut out = [0u64; $n_words];
                for i in (limb_shift..$n_words).rev() {
                    let src = i - limb_shift;
                    out[i] = self.0[src] << bit_shift;
                    if bit_shift > 0 && src > 0 {
                        out[i] |= self.0[src - 1] >> (64 - bit_shift);
                    }
                }
                ($name(out), false)
            }

            #[inline]
            pub fn overflowing_shr(self, shift: u32) -> (Self, bool) {
                if shift >= Self::BITS {
                    return (Self::ZERO, true);
                }
                let (limb_shift, bit_shift) = ((shift / 64) as usize, shift % 64);
                let mut out = [0u64; $n_words];
                for i in 0..$n_words - limb_shift {
                    let src = i + limb_shift;
                    out[i] = self.0[src] >> bit_shift;
                    if bit_shift > 0 && src + 1 < $n_words {
                        out[i] |= self.0[src + 1] << (64 - bit_shift);
                    }
                }
                ($name(out), false)
            }

            #[inline]
            pub fn overflowing_add(self, other: Self) -> (Self, bool) {
                let mut out = [0u64; $n_words];
                let mut carry = 0u128;
                for i in 0..$n_words {
                    let sum = self.0[i] as u128 + other.0[i] as u128 + carry;
                    out[i] = sum as u64;
                    carry = sum >> 64;
                }
                ($name(out), carry != 0)
            }

            #[inline]
            pub fn overflowing_sub(self, other: Self) -> (Self, bool) {
                let mut out = [0u64; $n_words];
                let mut borrow = false;
                for i in 0..$n_words {
                    let (diff, b1) = self.0[i].overflowing_sub(other.0[i]);
                    let (diff, b2) = diff.overflowing_sub(borrow as u64);
                    out[i] = diff;
                    borrow = b1 | b2;
                }
                ($name(out), borrow)
            }

            #[inline]
            pub fn overflowing_mul_u64(self, other: u64) -> (Self, bool) {
                let mut out = [0u64; $n_words];
                let mut carry = 0u128;
                for i in 0..$n_words {
                    let product = self.0[i] as u128 * other as u128 + carry;
                    out[i] = product as u64;
                    carry = product >> 64;
                }
                ($name(out), carry != 0)
            }

            /// Schoolbook multiplication truncated to the type width
            #[inline]
            pub fn overflowing_mul(self, other: Self) -> (Self, bool) {
                let mut out = [0u64; $n_words];
                let mut overflow = false;
                for j in 0..$n_words {
                    if other.0[j] == 0 {
                        continue;
                    }
                    let mut carry = 0u128;
                    for i in 0..$n_words {
                        if i + j >= $n_words {
                            overflow |= self.0[i] != 0;
                            continue;
                        }
                        let acc = self.0[i] as u128 * other.0[j] as u128 + out[i + j] as u128 + carry;
                        out[i + j] = acc as u64;
                        carry = acc >> 64;
                    }
                    overflow |= carry != 0;
                }
                ($name(out), overflow)
            }

            /// Returns `(quotient, remainder)`; panics when `other` is zero
            #[inline]
            pub fn div_rem_u64(self, other: u64) -> (Self, u64) {
                assert_ne!(other, 0, "attempted to divide by zero");
                let mut out = [0u64; $n_words];
                let mut rem = 0u128;
                for i in (0..$n_words).rev() {
                    let cur = (rem << 64) | self.0[i] as u128;
                    out[i] = (cur / other as u128) as u64;
                    rem = cur % other as u128;
                }
                ($name(out), rem as u64)
            }

            /// Bitwise long division returning `(quotient, remainder)`; panics when `other` is zero
            #[inline]
            pub fn div_rem(self, other: Self) -> (Self, Self) {
                let divisor_bits = other.bits();
                assert_ne!(divisor_bits, 0, "attempted to divide by zero");
                let dividend_bits = self.bits();
                if dividend_bits < divisor_bits {
                    return (Self::ZERO, self);
                }
                let mut quotient = Self::ZERO;
                let mut remainder = self;
                let mut shift = dividend_bits - divisor_bits;
                let mut divisor = other.overflowing_shl(shift).0;
                loop {
                    if remainder >= divisor {
                        remainder = remainder.overflowing_sub(divisor).0;
                        quotient.0[(shift / 64) as usize] |= 1 << (shift % 64);
                    }
                    if shift == 0 {
                        break;
                    }
                    divisor = divisor.overflowing_shr(1).0;
                    shift -= 1;
                }
                (quotient, remainder)
            }

            pub fn from_le_bytes(bytes: [u8; $n_words * 8]) -> Self {
                let mut out = [0u64; $n_words];
                for (limb, chunk) in out.iter_mut().zip(bytes.chunks_exact(8)) {
                    let mut word = [0u8; 8];
                    word.copy_from_slice(chunk);
                    *limb = u64::from_le_bytes(word);
                }
                $name(out)
            }

            pub fn to_le_bytes(self) -> [u8; $n_words * 8] {
                let mut out = [0u8; $n_words * 8];
                for (chunk, limb) in out.chunks_exact_mut(8).zip(self.0) {
                    chunk.copy_from_slice(&limb.to_le_bytes());
                }
                out
            }

            pub fn from_be_bytes(mut bytes: [u8; $n_words * 8]) -> Self {
                bytes.reverse();
                Self::from_le_bytes(bytes)
            }

            pub fn to_be_bytes(self) -> [u8; $n_words * 8] {
                let mut out = self.to_le_bytes();
                out.reverse();
                out
            }
        }

        impl Ord for $name {
            #[inline]
            fn cmp(&self, other: &$name) -> core::cmp::Ordering {
                // limbs are little-endian so the most significant limb is last
                Iterator::cmp(self.0.iter().rev(), other.0.iter().rev())
            }
        }

        impl PartialOrd for $name {
            #[inline]
            fn partial_cmp(&self, other: &$name) -> Option<core::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl PartialEq<u64> for $name {
            #[inline]
            fn eq(&self, other: &u64) -> bool {
                *self == $name::from_u64(*other)
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(n: u64) -> Self {
                $name::from_u64(n)
            }
        }

        impl core::ops::Add for $name {
            type Output = $name;

            #[inline]
            #[track_caller]
            fn add(self, other: $name) -> $name {
                let (sum, overflow) = self.overflowing_add(other);
                assert!(!overflow, "attempt to add with overflow");
                sum
            }
        }

        impl core::ops::Sub for $name {
            type Output = $name;

            #[inline]
            #[track_caller]
            fn sub(self, other: $name) -> $name {
                let (diff, overflow) = self.overflowing_sub(other);
                assert!(!overflow, "attempt to subtract with overflow");
                diff
            }
        }

        impl core::ops::Mul for $name {
            type Output = $name;

            #[inline]
            #[track_caller]
            fn mul(self, other: $name) -> $name {
                let (product, overflow) = self.overflowing_mul(other);
                assert!(!overflow, "attempt to multiply with overflow");
                product
            }
        }

        impl core::ops::Mul<u64> for $name {
            type Output = $name;

            #[inline]
            #[track_caller]
            fn mul(self, other: u64) -> $name {
                let (product, overflow) = self.overflowing_mul_u64(other);
                assert!(!overflow, "attempt to multiply with overflow");
                product
            }
        }

        impl core::ops::Div for $name {
            type Output = $name;

            #[inline]
            fn div(self, other: $name) -> $name {
                self.div_rem(other).0
            }
        }

        impl core::ops::Div<u64> for $name {
            type Output = $name;

            #[inline]
            fn div(self, other: u64) -> $name {
                self.div_rem_u64(other).0
            }
        }

        impl core::ops::Shl<u32> for $name {
            type Output = $name;

            #[inline]
            fn shl(self, shift: u32) -> $name {
                self.overflowing_shl(shift).0
            }
        }

        impl core::ops::Shr<u32> for $name {
            type Output = $name;

            #[inline]
            fn shr(self, shift: u32) -> $name {
                self.overflowing_shr(shift).0
            }
        }

        impl core::ops::Not for $name {
            type Output = $name;

            #[inline]
            fn not(self) -> $name {
                $name(self.0.map(|limb| !limb))
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = $name;

            #[inline]
            fn bitand(mut self, other: $name) -> $name {
                self.0.iter_mut().zip(other.0).for_each(|(a, b)| *a &= b);
                self
            }
        }

        impl core::ops::BitOr for $name {
            type Output = $name;

            #[inline]
            fn bitor(mut self, other: $name) -> $name {
                self.0.iter_mut().zip(other.0).for_each(|(a, b)| *a |= b);
                self
            }
        }

        impl core::fmt::LowerHex for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                let hex = $crate::uint::hex::encode(self.to_be_bytes());
                let digits = hex.trim_start_matches('0');
                f.pad_integral(true, "0x", if digits.is_empty() { "0" } else { digits })
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self)
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::UintError;

            /// Parses a big-endian hex string, with or without a `0x` prefix
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                if digits.is_empty() || digits.len() > $n_words * 16 {
                    return Err($crate::UintError::InvalidLength(digits.len()));
                }
                let padded = format!("{:0>width$}", digits, width = $n_words * 16);
                let mut bytes = [0u8; $n_words * 8];
                $crate::uint::hex::decode_to_slice(padded, &mut bytes)?;
                Ok(Self::from_be_bytes(bytes))
            }
        }
    };
}

#[doc(hidden)]
pub use hex;
