use genix_consensus_core::{
    config::params::{
        DGW_MIN_DIFFICULTY_RESET_GAP, DGW_MIN_DIFFICULTY_SPACING_FACTOR, DGW_MIN_DIFFICULTY_TARGET_FACTOR, DGW_PAST_BLOCKS,
        DifficultyAlgorithm, LWMA_SOLVETIME_LIMIT_FACTOR, LWMA_WEIGHTED_TIME_FLOOR_DIVISOR, Params,
    },
    errors::difficulty::{DifficultyError, DifficultyResult},
    header::HeaderView,
};
use genix_core::log::trace;
use genix_hashes::Hash;
use genix_math::{Uint256, Uint320};

/// Computes the compact target required of the next block.
///
/// History slices are ordered oldest first and end with the current tip. An empty slice means
/// the next block is the genesis block.
#[derive(Clone, Debug)]
pub struct DifficultyManager {
    pow_limit: Uint256,
    pow_limit_bits: u32,
    target_spacing: i64,
    allow_min_difficulty_blocks: bool,
    no_retargeting: bool,
    algorithm: DifficultyAlgorithm,
    lwma_window: u64,
    lwma_weight: u64,
}

impl DifficultyManager {
    pub fn new(params: &Params) -> Self {
        Self {
            pow_limit: params.pow_limit,
            pow_limit_bits: params.pow_limit.compact_target_bits(),
            target_spacing: params.pow_target_spacing as i64,
            allow_min_difficulty_blocks: params.pow_allow_min_difficulty_blocks,
            no_retargeting: params.pow_no_retargeting,
            algorithm: params.difficulty_algorithm(),
            lwma_window: params.zawy_lwma_averaging_window,
            lwma_weight: params.zawy_lwma_adjusted_weight,
        }
    }

    pub fn pow_limit_bits(&self) -> u32 {
        self.pow_limit_bits
    }

    /// Number of trailing headers the active algorithm reads once past its warm-up heights
    pub fn required_history_len(&self) -> usize {
        match self.algorithm {
            DifficultyAlgorithm::DarkGravityWave => DGW_PAST_BLOCKS as usize,
            DifficultyAlgorithm::ZawyLwma => self.lwma_window as usize + 1,
        }
    }

    /// Returns the compact target of the block following the last header of `history`.
    ///
    /// `tip_height` is the height of that last header and `next_timestamp` the timestamp of the
    /// block being built or validated.
    pub fn calculate_difficulty_bits<H: HeaderView>(&self, tip_height: u64, history: &[H], next_timestamp: i64) -> DifficultyResult<u32> {
        if history.is_empty() || self.no_retargeting {
            return Ok(self.pow_limit_bits);
        }
        match self.algorithm {
            DifficultyAlgorithm::DarkGravityWave => self.dark_gravity_wave(tip_height, history, next_timestamp),
            DifficultyAlgorithm::ZawyLwma => self.zawy_lwma(tip_height, history),
        }
    }

    /// Dark Gravity Wave v3
    pub fn dark_gravity_wave<H: HeaderView>(&self, tip_height: u64, history: &[H], next_timestamp: i64) -> DifficultyResult<u32> {
        if tip_height < DGW_PAST_BLOCKS {
            return Ok(self.pow_limit_bits);
        }
        let window = trailing(history, DGW_PAST_BLOCKS as usize)?;
        let tip = &window[window.len() - 1];

        if self.allow_min_difficulty_blocks {
            let gap = next_timestamp.saturating_sub(tip.timestamp());
            if gap > DGW_MIN_DIFFICULTY_RESET_GAP {
                return Ok(self.pow_limit_bits);
            }
            if gap > self.target_spacing * DGW_MIN_DIFFICULTY_SPACING_FACTOR {
                let relaxed = target_of(tip) * DGW_MIN_DIFFICULTY_TARGET_FACTOR;
                return Ok(self.clamp_to_limit(relaxed));
            }
        }

        let mut past_target_avg = Uint320::ZERO;
        for (count, header) in (1u64..).zip(window.iter().rev()) {
            let target = target_of(header);
            past_target_avg = if count == 1 { target } else { (past_target_avg * count + target) / (count + 1) };
        }

        let target_timespan = DGW_PAST_BLOCKS as i64 * self.target_spacing;
        let actual_timespan = tip.timestamp().saturating_sub(window[0].timestamp()).clamp(target_timespan / 3, target_timespan * 3);
        let new_target = past_target_avg * actual_timespan as u64 / target_timespan as u64;
        Ok(self.clamp_to_limit(new_target))
    }

    /// Zawy's linearly weighted moving average
    pub fn zawy_lwma<H: HeaderView>(&self, tip_height: u64, history: &[H]) -> DifficultyResult<u32> {
        let (n, k) = (self.lwma_window, self.lwma_weight);
        if n == 0 || k == 0 {
            return Err(DifficultyError::InvalidWindowParams { window: n, weight: k });
        }
        if tip_height < n {
            return Ok(self.pow_limit_bits);
        }
        // The first solve time is measured from the header preceding the window
        let window = trailing(history, n as usize + 1)?;

        let solvetime_limit = LWMA_SOLVETIME_LIMIT_FACTOR * self.target_spacing;
        let divisor = k * n * n;
        let mut weighted_solvetimes: i64 = 0;
        let mut sum_target = Uint320::ZERO;
        for (j, pair) in (1i64..).zip(window.windows(2)) {
            let solvetime = pair[1].timestamp().saturating_sub(pair[0].timestamp()).min(solvetime_limit);
            weighted_solvetimes = weighted_solvetimes.saturating_add(solvetime.saturating_mul(j));
            sum_target = sum_target + Uint320::from(Uint256::from_compact_target_bits(pair[1].bits()) / divisor);
        }

        let floor = (n * k / LWMA_WEIGHTED_TIME_FLOOR_DIVISOR).max(1);
        let weighted_solvetimes = (weighted_solvetimes.max(0) as u64).max(floor);
        Ok(self.clamp_to_limit(sum_target * weighted_solvetimes))
    }

    fn clamp_to_limit(&self, target: Uint320) -> u32 {
        match Uint256::try_from(target) {
            Ok(target) if target <= self.pow_limit => target.compact_target_bits(),
            _ => {
                trace!("Target {target:x} exceeds the proof of work limit, clamping");
                self.pow_limit_bits
            }
        }
    }
}

fn target_of<H: HeaderView>(header: &H) -> Uint320 {
    Uint256::from_compact_target_bits(header.bits()).into()
}

fn trailing<H>(history: &[H], len: usize) -> DifficultyResult<&[H]> {
    if history.len() < len {
        return Err(DifficultyError::InsufficientHistory { required: len, found: history.len() });
    }
    Ok(&history[history.len() - len..])
}

/// Expected number of hashes needed to find a block with the given compact target, `2^256 / (target + 1)`
pub fn calc_work(bits: u32) -> Uint256 {
    let decoded = Uint256::decode_compact(bits);
    if !decoded.is_valid() {
        return Uint256::ZERO;
    }
    let target = decoded.target;
    // 2^256 does not fit, but 2^256 / (target + 1) == ~target / (target + 1) + 1
    let one = Uint256::from_u64(1);
    (!target / (target + one)) + one
}

/// Whether `hash`, read as a little-endian integer, meets the compact target `bits`.
///
/// Targets that are negative, zero, overflowing or above `pow_limit` never pass.
pub fn check_proof_of_work(hash: Hash, bits: u32, pow_limit: Uint256) -> bool {
    let decoded = Uint256::decode_compact(bits);
    if !decoded.is_valid() || decoded.target > pow_limit {
        return false;
    }
    Uint256::from_le_bytes(hash.as_bytes()) <= decoded.target
}

#[cfg(test)]
mod tests {
    use super::*;
    use genix_consensus_core::{
        config::{
            ConfigBuilder,
            params::{GENESIS, MAINNET_PARAMS, REGTEST_PARAMS, TESTNET_GENESIS, TESTNET_PARAMS},
        },
        header::CompactHeaderData,
    };
    use rand::Rng;
    use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

    const BITS: u32 = 0x1e0ffff0;

    fn steady_history(len: usize, start: i64, spacing: i64, bits: u32) -> Vec<CompactHeaderData> {
        (0..len as i64).map(|i| CompactHeaderData::new(1, start + i * spacing, bits)).collect()
    }

    fn history_from_timestamps(timestamps: &[i64], bits: u32) -> Vec<CompactHeaderData> {
        timestamps.iter().map(|&ts| CompactHeaderData::new(1, ts, bits)).collect()
    }

    #[test]
    fn test_dark_gravity_wave() {
        struct Test {
            name: &'static str,
            history: Vec<CompactHeaderData>,
            tip_height: u64,
            expected: u32,
        }

        let manager = DifficultyManager::new(&MAINNET_PARAMS);
        let limit = MAINNET_PARAMS.pow_limit.compact_target_bits();
        let tests = vec![
            Test { name: "below warm-up height", history: steady_history(24, 0, 30, BITS), tip_height: 23, expected: limit },
            Test { name: "on schedule", history: steady_history(24, 1_000_000, 30, BITS), tip_height: 24, expected: 0x1e0f5546 },
            Test { name: "on schedule, harder target", history: steady_history(30, 1_000_000, 30, 0x1c0ffff0), tip_height: 500, expected: 0x1c0f5546 },
            Test { name: "identical timestamps", history: steady_history(24, 1_000_000, 0, BITS), tip_height: 100, expected: 0x1e055550 },
            Test { name: "timestamps going backwards", history: steady_history(24, 1_000_000, -30, BITS), tip_height: 100, expected: 0x1e055550 },
            Test { name: "slow blocks clamp to the limit", history: steady_history(24, 1_000_000, 3600, BITS), tip_height: 100, expected: limit },
        ];

        for test in tests {
            let next_timestamp = test.history.last().unwrap().timestamp + 30;
            assert_eq!(manager.calculate_difficulty_bits(test.tip_height, &test.history, next_timestamp), Ok(test.expected), "{}", test.name);
        }
    }

    #[test]
    fn test_dark_gravity_wave_min_difficulty_blocks() {
        let params = ConfigBuilder::new(MAINNET_PARAMS).edit_consensus_params(|p| p.pow_allow_min_difficulty_blocks = true).build();
        let manager = DifficultyManager::new(&params);
        let limit = params.pow_limit.compact_target_bits();

        let history = steady_history(24, 1_000_000, 30, 0x1c0ffff0);
        let tip_time = history.last().unwrap().timestamp;

        assert_eq!(manager.calculate_difficulty_bits(50, &history, tip_time + 30), Ok(0x1c0f5546));
        // More than four spacings: the tip target is relaxed tenfold
        assert_eq!(manager.calculate_difficulty_bits(50, &history, tip_time + 121), Ok(0x1d009fff));
        // More than two hours: back to the limit
        assert_eq!(manager.calculate_difficulty_bits(50, &history, tip_time + 7201), Ok(limit));

        // Relaxing an easy target never passes the limit
        let history = steady_history(24, 1_000_000, 30, BITS);
        assert_eq!(manager.calculate_difficulty_bits(50, &history, tip_time + 121), Ok(limit));
    }

    #[test]
    fn test_zawy_lwma() {
        let params = ConfigBuilder::new(REGTEST_PARAMS)
            .edit_consensus_params(|p| {
                p.pow_no_retargeting = false;
                p.pow_target_spacing = 30;
                p.zawy_lwma_averaging_window = 3;
                p.zawy_lwma_adjusted_weight = 2;
            })
            .build();
        let manager = DifficultyManager::new(&params);
        assert_eq!(manager.required_history_len(), 4);

        // Target 2^200; solve times 30, 60 and 400 (capped at 180) weigh to 690
        let history = history_from_timestamps(&[1000, 1030, 1090, 1490], 0x1a010000);
        assert_eq!(manager.calculate_difficulty_bits(10, &history, 1520), Ok(0x1a72ffff));

        // Warm-up heights stay at the limit
        assert_eq!(manager.calculate_difficulty_bits(2, &history, 1520), Ok(params.pow_limit.compact_target_bits()));

        assert_eq!(
            manager.calculate_difficulty_bits(10, &history[1..], 1520),
            Err(DifficultyError::InsufficientHistory { required: 4, found: 3 })
        );

        let zero_weight = ConfigBuilder::new(params.params.clone()).edit_consensus_params(|p| p.zawy_lwma_adjusted_weight = 0).build();
        assert_eq!(
            DifficultyManager::new(&zero_weight).calculate_difficulty_bits(10, &history, 1520),
            Err(DifficultyError::InvalidWindowParams { window: 3, weight: 0 })
        );
    }

    #[test]
    fn test_zawy_lwma_weighted_time_floor() {
        let params = ConfigBuilder::new(REGTEST_PARAMS).edit_consensus_params(|p| p.pow_no_retargeting = false).build();
        let manager = DifficultyManager::new(&params);
        let len = manager.required_history_len();
        assert_eq!(len, 66);

        // All solve times zero: the weighted sum is raised to 65 * 3927 / 3 = 85085
        let history = steady_history(len, 1_000_000, 0, 0x1d00ffff);
        assert_eq!(manager.calculate_difficulty_bits(1000, &history, 1_000_000), Ok(0x1c5554ff));

        // Timestamps running backwards clamp the same way
        let history = steady_history(len, 1_000_000, -120, 0x1d00ffff);
        assert_eq!(manager.calculate_difficulty_bits(1000, &history, 1_000_000), Ok(0x1c5554ff));
    }

    #[test]
    fn test_no_retargeting() {
        let manager = DifficultyManager::new(&REGTEST_PARAMS);
        let history = steady_history(200, 0, 1, 0x1a010000);
        assert_eq!(manager.calculate_difficulty_bits(199, &history, 200), Ok(0x207fffff));
        assert_eq!(manager.calculate_difficulty_bits::<CompactHeaderData>(0, &[], 0), Ok(0x207fffff));
    }

    #[test]
    fn test_insufficient_history() {
        let manager = DifficultyManager::new(&MAINNET_PARAMS);
        let history = steady_history(10, 0, 30, BITS);
        assert_eq!(
            manager.calculate_difficulty_bits(100, &history, 330),
            Err(DifficultyError::InsufficientHistory { required: 24, found: 10 })
        );
    }

    #[test]
    fn test_target_never_exceeds_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for params in [MAINNET_PARAMS, REGTEST_PARAMS] {
            // Regtest settings exercise LWMA with retargeting enabled
            let config = ConfigBuilder::new(params).edit_consensus_params(|p| p.pow_no_retargeting = false).build();
            let manager = DifficultyManager::new(&config);
            let len = manager.required_history_len();

            for _ in 0..500 {
                let mut timestamp = rng.gen_range(-1_000_000i64..1_000_000);
                let history = (0..len)
                    .map(|_| {
                        // Zero and negative solve times included
                        timestamp += rng.gen_range(-600i64..=3600);
                        let shift = rng.gen_range(0..config.pow_limit.bits());
                        let target = (config.pow_limit >> shift).max(Uint256::from_u64(1));
                        CompactHeaderData::new(1, timestamp, target.compact_target_bits())
                    })
                    .collect::<Vec<_>>();
                let next_timestamp = timestamp + rng.gen_range(-600i64..=10_000);
                let bits = manager.calculate_difficulty_bits(10_000, &history, next_timestamp).unwrap();
                assert!(Uint256::from_compact_target_bits(bits) <= config.pow_limit, "{bits:#x}");
            }
        }
    }

    #[test]
    fn test_calc_work() {
        assert_eq!(calc_work(0x1d00ffff), Uint256::from_u64(0x1_0001_0001));
        assert_eq!(calc_work(0x207fffff), Uint256::from_u64(2));
        // Negative and zero targets carry no work
        assert_eq!(calc_work(0x04923456), Uint256::ZERO);
        assert_eq!(calc_work(0), Uint256::ZERO);
        assert!(calc_work(0x1c0ffff0) > calc_work(BITS));
    }

    #[test]
    fn test_check_proof_of_work() {
        for (params, genesis) in [(MAINNET_PARAMS, GENESIS), (TESTNET_PARAMS, TESTNET_GENESIS)] {
            let block = genesis.build();
            assert!(check_proof_of_work(block.hash(), block.header.bits, params.pow_limit), "{}", params.net);
        }

        struct Test {
            name: &'static str,
            hash: Hash,
            bits: u32,
            expected: bool,
        }

        let limit = MAINNET_PARAMS.pow_limit;
        let tests = vec![
            Test { name: "equal to the target", hash: Hash::from_static_hex("00000ffff0000000000000000000000000000000000000000000000000000000"), bits: BITS, expected: true },
            Test { name: "one above the target", hash: Hash::from_static_hex("00000ffff0000000000000000000000000000000000000000000000000000001"), bits: BITS, expected: false },
            Test { name: "zero target", hash: Hash::from_static_hex("0000000000000000000000000000000000000000000000000000000000000000"), bits: 0, expected: false },
            Test { name: "negative target", hash: Hash::from_static_hex("0000000000000000000000000000000000000000000000000000000000000000"), bits: 0x04923456, expected: false },
            Test { name: "target above the limit", hash: Hash::from_static_hex("0000000000000000000000000000000000000000000000000000000000000001"), bits: 0x207fffff, expected: false },
        ];

        for test in tests {
            assert_eq!(check_proof_of_work(test.hash, test.bits, limit), test.expected, "{}", test.name);
        }
    }
}
