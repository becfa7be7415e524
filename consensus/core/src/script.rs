//! Consumer side of the external script verification library.
//!
//! The interpreter itself lives behind a C ABI. This module fixes the flag bit positions and
//! error codes of that ABI, and exposes it through the [`ScriptVerifier`] trait.

use std::os::raw::{c_int, c_uchar, c_uint};
use thiserror::Error;

/// Version reported by the library this crate was built against
pub const SCRIPT_VERIFY_API_VER: u32 = 0;

bitflags::bitflags! {
    /// Script verification flags understood by the library.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScriptVerifyFlags: u32 {
        const NONE = 0;
        /// Evaluate pay-to-script-hash subscripts (BIP16)
        const P2SH = 1 << 0;
        /// Enforce strict DER signatures (BIP66)
        const DERSIG = 1 << 2;
        /// Require the CHECKMULTISIG dummy argument to be empty (BIP147)
        const NULLDUMMY = 1 << 4;
        /// Enable CHECKLOCKTIMEVERIFY (BIP65)
        const CHECKLOCKTIMEVERIFY = 1 << 9;
        /// Enable CHECKSEQUENCEVERIFY (BIP112)
        const CHECKSEQUENCEVERIFY = 1 << 10;
        const ALL = Self::P2SH.bits()
            | Self::DERSIG.bits()
            | Self::NULLDUMMY.bits()
            | Self::CHECKLOCKTIMEVERIFY.bits()
            | Self::CHECKSEQUENCEVERIFY.bits();
    }
}

/// Error codes returned across the boundary. Code `0` means success and has no variant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptVerifyError {
    #[error("input index out of range")]
    TxIndex,

    #[error("serialized transaction size does not match the given length")]
    TxSizeMismatch,

    #[error("transaction deserialization failed")]
    TxDeserialize,

    #[error("unknown verification flags")]
    InvalidFlags,

    #[error("unrecognized error code {0}")]
    UnknownCode(i32),
}

impl ScriptVerifyError {
    pub fn code(&self) -> i32 {
        match self {
            ScriptVerifyError::TxIndex => 1,
            ScriptVerifyError::TxSizeMismatch => 2,
            ScriptVerifyError::TxDeserialize => 3,
            ScriptVerifyError::InvalidFlags => 4,
            ScriptVerifyError::UnknownCode(code) => *code,
        }
    }

    /// Maps a raw code to `Ok(())` or the matching error
    pub fn check_code(code: i32) -> Result<(), ScriptVerifyError> {
        match code {
            0 => Ok(()),
            1 => Err(ScriptVerifyError::TxIndex),
            2 => Err(ScriptVerifyError::TxSizeMismatch),
            3 => Err(ScriptVerifyError::TxDeserialize),
            4 => Err(ScriptVerifyError::InvalidFlags),
            other => Err(ScriptVerifyError::UnknownCode(other)),
        }
    }
}

pub type ScriptVerifyResult<T> = std::result::Result<T, ScriptVerifyError>;

pub trait ScriptVerifier: Send + Sync {
    /// API version of the underlying library
    fn version(&self) -> u32;

    /// Verifies input `n_in` of the serialized transaction `tx_to` against `script_pubkey`
    fn verify_script(&self, script_pubkey: &[u8], tx_to: &[u8], n_in: u32, flags: ScriptVerifyFlags) -> ScriptVerifyResult<bool>;
}

/// Rejects flag bits outside [`ScriptVerifyFlags::ALL`] and otherwise delegates to `verifier`.
///
/// Errors reported by the verifier are returned as is.
pub fn verify_script_with_flags<V: ScriptVerifier + ?Sized>(
    verifier: &V,
    script_pubkey: &[u8],
    tx_to: &[u8],
    n_in: u32,
    flags: u32,
) -> ScriptVerifyResult<bool> {
    let flags = ScriptVerifyFlags::from_bits(flags).ok_or(ScriptVerifyError::InvalidFlags)?;
    verifier.verify_script(script_pubkey, tx_to, n_in, flags)
}

/// `int verify_script(const unsigned char *script_pubkey, unsigned int script_pubkey_len,
/// const unsigned char *tx_to, unsigned int tx_to_len, unsigned int n_in, unsigned int flags, int *err)`
pub type RawVerifyScriptFn =
    unsafe extern "C" fn(*const c_uchar, c_uint, *const c_uchar, c_uint, c_uint, c_uint, *mut c_int) -> c_int;

/// `unsigned int version(void)`
pub type RawVersionFn = unsafe extern "C" fn() -> c_uint;

/// Adapts the raw C entry points of a loaded verification library
#[derive(Clone, Copy)]
pub struct ExternScriptVerifier {
    verify: RawVerifyScriptFn,
    version: RawVersionFn,
}

impl ExternScriptVerifier {
    /// # Safety
    /// Both pointers must reference functions with the documented C signatures which remain
    /// valid for the lifetime of the returned value.
    pub unsafe fn new(verify: RawVerifyScriptFn, version: RawVersionFn) -> Self {
        Self { verify, version }
    }
}

impl ScriptVerifier for ExternScriptVerifier {
    fn version(&self) -> u32 {
        // SAFETY: guaranteed by the contract of `ExternScriptVerifier::new`
        unsafe { (self.version)() }
    }

    fn verify_script(&self, script_pubkey: &[u8], tx_to: &[u8], n_in: u32, flags: ScriptVerifyFlags) -> ScriptVerifyResult<bool> {
        let script_len = c_uint::try_from(script_pubkey.len()).map_err(|_| ScriptVerifyError::TxDeserialize)?;
        let tx_len = c_uint::try_from(tx_to.len()).map_err(|_| ScriptVerifyError::TxSizeMismatch)?;
        let mut err: c_int = 0;
        // SAFETY: both buffers outlive the call and their lengths are passed alongside
        let ok = unsafe { (self.verify)(script_pubkey.as_ptr(), script_len, tx_to.as_ptr(), tx_len, n_in, flags.bits(), &mut err) };
        ScriptVerifyError::check_code(err)?;
        Ok(ok == 1)
    }
}
