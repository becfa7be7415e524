pub mod consensus {
    //!
    //! A module for constants which directly impact consensus on every network.
    //!

    use genix_math::Uint256;

    //
    // ~~~~~~~~~~~~~~~~~~~~~~~~~ Proof of work limits ~~~~~~~~~~~~~~~~~~~~~~~~~
    //

    /// Highest target of the public networks: `00000fff...ff`, i.e. 2^236 - 1
    pub const MAINNET_POW_LIMIT: Uint256 = Uint256([u64::MAX, u64::MAX, u64::MAX, 0x0000_0fff_ffff_ffff]);

    /// Highest regtest target: `7fff...ff`, i.e. 2^255 - 1
    pub const REGTEST_POW_LIMIT: Uint256 = Uint256([u64::MAX, u64::MAX, u64::MAX, 0x7fff_ffff_ffff_ffff]);

    //
    // ~~~~~~~~~~~~~~~~~~~~~~~~~ Median time ~~~~~~~~~~~~~~~~~~~~~~~~~
    //

    /// Number of trailing blocks whose timestamps form the past median time
    pub const MEDIAN_TIME_SPAN: usize = 11;

    //
    // ~~~~~~~~~~~~~~~~~~~~~~~~~ Versionbits ~~~~~~~~~~~~~~~~~~~~~~~~~
    //

    /// Top bits of a block version which signals deployments
    pub const VERSIONBITS_TOP_BITS: i32 = 0x2000_0000;

    /// Mask selecting the top bits compared against [`VERSIONBITS_TOP_BITS`]
    pub const VERSIONBITS_TOP_MASK: i32 = 0xE000_0000_u32 as i32;

    /// Number of bits available for deployments (0..=28)
    pub const VERSIONBITS_NUM_BITS: u8 = 29;

    //
    // ~~~~~~~~~~~~~~~~~~~ Dark Gravity Wave v3 ~~~~~~~~~~~~~~~~~~~
    //

    /// Number of trailing blocks averaged by DGW
    pub const DGW_PAST_BLOCKS: u64 = 24;

    /// With min-difficulty blocks allowed, a gap this long (seconds) resets the target to the limit
    pub const DGW_MIN_DIFFICULTY_RESET_GAP: i64 = 2 * 60 * 60;

    /// With min-difficulty blocks allowed, a gap of this many spacings relaxes the target
    pub const DGW_MIN_DIFFICULTY_SPACING_FACTOR: i64 = 4;

    /// Factor by which the previous target is relaxed after a long gap
    pub const DGW_MIN_DIFFICULTY_TARGET_FACTOR: u64 = 10;

    //
    // ~~~~~~~~~~~~~~~~~~~ Zawy LWMA ~~~~~~~~~~~~~~~~~~~
    //

    /// Solve times are capped at this many target spacings
    pub const LWMA_SOLVETIME_LIMIT_FACTOR: i64 = 6;

    /// The weighted solve time sum never drops below `window * weight / LWMA_WEIGHTED_TIME_FLOOR_DIVISOR`
    pub const LWMA_WEIGHTED_TIME_FLOOR_DIVISOR: u64 = 3;
}

pub mod genesis {
    //!
    //! Fixed inputs of the genesis coinbase transaction, shared by all networks.
    //!

    /// Message embedded in the genesis coinbase input
    pub const GENESIS_COINBASE_MESSAGE: &str = "Junior";

    /// Value pushed first in the genesis coinbase input (the compact bits `0x1d00ffff`)
    pub const GENESIS_COINBASE_HEIGHT_MARKER: u32 = 486_604_799;

    /// Script number pushed after the height marker
    pub const GENESIS_COINBASE_EXTRA_NONCE: u8 = 4;

    /// Uncompressed-length public key paid by the genesis output
    pub const GENESIS_OUTPUT_PUBKEY: [u8; 65] = [
        0x03, 0x28, 0x9c, 0x09, 0x33, 0xf7, 0xed, 0x53, 0xfc, 0x99, 0x6d, 0xe0, 0xc2, 0x52, 0xcd, 0x6b, 0xbf, 0x9e, 0x9b, 0x81, 0x61,
        0xdc, 0xda, 0x76, 0x15, 0xc2, 0x50, 0x3d, 0xbd, 0x5d, 0x48, 0xf0, 0x2b, 0xdb, 0x72, 0xbd, 0x21, 0x6a, 0xf2, 0x6b, 0x68, 0x15,
        0xe0, 0xb2, 0xf5, 0x03, 0x81, 0x10, 0x09, 0x16, 0xa7, 0xeb, 0x7b, 0x1a, 0x88, 0xae, 0xb8, 0xde, 0xbb, 0x08, 0x03, 0x25, 0x0d,
        0x84, 0x01,
    ];
}

pub mod policy {
    //!
    //! Node policy defaults which do not affect consensus but differ per network.
    //!

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct PolicyParams {
        /// Reject non-standard transactions from the mempool
        pub require_standard: bool,

        /// Run expensive internal consistency checks by default
        pub default_consistency_checks: bool,

        /// Blocks are mined only when requested through RPC
        pub mine_blocks_on_demand: bool,

        /// Mining is refused while the node has no peers
        pub mining_requires_peers: bool,

        /// A tip older than this (seconds) means the node is still syncing
        pub max_tip_age: i64,

        /// Delay (seconds) before requesting headers from peers after startup
        pub delay_get_headers_time: i64,

        /// Maximum number of transactions a mixing pool accepts
        pub pool_max_transactions: u32,

        /// Fulfilled network requests are remembered this long (seconds)
        pub fulfilled_request_expire_time: i64,
    }

    pub const MAINNET_POLICY: PolicyParams = PolicyParams {
        require_standard: true,
        default_consistency_checks: false,
        mine_blocks_on_demand: false,
        mining_requires_peers: false,
        max_tip_age: 6 * 60 * 60,
        delay_get_headers_time: 24 * 60 * 60,
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 60 * 60,
    };

    pub const TESTNET_POLICY: PolicyParams = MAINNET_POLICY;

    pub const REGTEST_POLICY: PolicyParams = PolicyParams {
        require_standard: false,
        default_consistency_checks: true,
        mine_blocks_on_demand: true,
        mining_requires_peers: false,
        max_tip_age: 6 * 60 * 60,
        delay_get_headers_time: 0,
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 5 * 60,
    };
}

#[cfg(test)]
mod tests {
    use super::consensus::{MAINNET_POW_LIMIT, REGTEST_POW_LIMIT, VERSIONBITS_TOP_BITS, VERSIONBITS_TOP_MASK};
    use genix_math::Uint256;

    #[test]
    fn test_pow_limit_consts() {
        let one = Uint256::from_u64(1);
        assert_eq!(MAINNET_POW_LIMIT, (one << 236) - one);
        assert_eq!(REGTEST_POW_LIMIT, (one << 255) - one);
        assert_eq!(MAINNET_POW_LIMIT.compact_target_bits(), 0x1e0fffff);
    }

    #[test]
    fn test_versionbits_masks() {
        assert_eq!(VERSIONBITS_TOP_MASK as u32, 0xe000_0000);
        assert_eq!(VERSIONBITS_TOP_BITS & VERSIONBITS_TOP_MASK, VERSIONBITS_TOP_BITS);
    }
}
