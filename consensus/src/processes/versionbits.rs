//! BIP9 style soft-fork deployment tracking.
//!
//! Chains are passed as slices where `chain[h]` is the header at height `h`; the last header is
//! the tip, and queries describe the block that would follow it. A deployment's state changes
//! only at period boundaries, so states are cached by the height of the first block of each
//! period.

use crate::processes::past_median_time::past_median_time_at;
use genix_consensus_core::{
    config::params::{Deployment, DeploymentId, Deployments, Params, VERSIONBITS_TOP_BITS, VERSIONBITS_TOP_MASK},
    header::HeaderView,
};
use genix_core::log::debug;
use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, HashMap},
    fmt::{Display, Formatter},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThresholdState {
    /// The genesis state of every deployment
    Defined,
    Started,
    LockedIn,
    /// Final
    Active,
    /// Final
    Failed,
}

impl Display for ThresholdState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ThresholdState::Defined => "defined",
            ThresholdState::Started => "started",
            ThresholdState::LockedIn => "locked_in",
            ThresholdState::Active => "active",
            ThresholdState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Signaling progress within the period of a given block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdStatistics {
    pub period: u64,
    pub threshold: u64,
    /// Blocks of the period up to and including the block
    pub elapsed: u64,
    /// Signaling blocks among the elapsed ones
    pub count: u64,
    /// Whether the threshold can still be reached within the period
    pub possible: bool,
}

/// Whether `version` signals for the deployment with the given bit mask.
///
/// Versions without the versionbits top bits never signal.
pub fn is_signaling(version: i32, mask: u32) -> bool {
    (version & VERSIONBITS_TOP_MASK) == VERSIONBITS_TOP_BITS && (version as u32 & mask) != 0
}

type StateCache = BTreeMap<u64, ThresholdState>;

/// Evaluates deployment states over a single chain.
///
/// The state cache assumes every query describes the same chain; call
/// [`VersionBitsManager::truncate_cache`] after a reorganization.
pub struct VersionBitsManager {
    deployments: Deployments,
    miner_confirmation_window: u64,
    rule_change_activation_threshold: u64,
    cache: RwLock<HashMap<DeploymentId, StateCache>>,
}

impl VersionBitsManager {
    pub fn new(params: &Params) -> Self {
        Self {
            deployments: params.deployments,
            miner_confirmation_window: params.miner_confirmation_window,
            rule_change_activation_threshold: params.rule_change_activation_threshold,
            cache: Default::default(),
        }
    }

    fn period(&self, deployment: &Deployment) -> u64 {
        deployment.period(self.miner_confirmation_window)
    }

    fn threshold(&self, deployment: &Deployment) -> u64 {
        deployment.threshold(self.rule_change_activation_threshold)
    }

    /// State of the block following the tip of `chain`
    pub fn state_for<H: HeaderView>(&self, id: DeploymentId, chain: &[H]) -> ThresholdState {
        let deployment = self.deployments.get(id);
        let next_height = chain.len() as u64;
        let period_start = next_height - next_height % self.period(deployment);
        self.state_at_period_start(id, period_start, chain)
    }

    pub fn is_active<H: HeaderView>(&self, id: DeploymentId, chain: &[H]) -> bool {
        self.state_for(id, chain) == ThresholdState::Active
    }

    /// Height of the first block whose state equals that of the block following the tip
    pub fn state_since_height<H: HeaderView>(&self, id: DeploymentId, chain: &[H]) -> u64 {
        let state = self.state_for(id, chain);
        if state == ThresholdState::Defined {
            return 0;
        }
        let period = self.period(self.deployments.get(id));
        let next_height = chain.len() as u64;
        let mut period_start = next_height - next_height % period;
        while period_start >= period && self.state_at_period_start(id, period_start - period, chain) == state {
            period_start -= period;
        }
        period_start
    }

    /// Signaling statistics of the period containing the tip of `chain`
    pub fn statistics<H: HeaderView>(&self, id: DeploymentId, chain: &[H]) -> Option<ThresholdStatistics> {
        let deployment = self.deployments.get(id);
        let (period, threshold) = (self.period(deployment), self.threshold(deployment));
        if chain.is_empty() {
            return None;
        }
        let elapsed = chain.len() as u64 % period;
        let count = chain[chain.len() - elapsed as usize..].iter().filter(|header| is_signaling(header.version(), deployment.mask())).count() as u64;
        Some(ThresholdStatistics { period, threshold, elapsed, count, possible: period - threshold >= elapsed - count })
    }

    /// Block version for the block following the tip, signaling every started or locked-in deployment
    pub fn compute_block_version<H: HeaderView>(&self, chain: &[H]) -> i32 {
        self.deployments
            .iter()
            .filter(|(id, _)| matches!(self.state_for(*id, chain), ThresholdState::Started | ThresholdState::LockedIn))
            .fold(VERSIONBITS_TOP_BITS, |version, (_, deployment)| version | deployment.mask() as i32)
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Drops cached states which depend on blocks at `height` or above
    pub fn truncate_cache(&self, height: u64) {
        for states in self.cache.write().values_mut() {
            states.split_off(&(height + 1));
        }
    }

    fn state_at_period_start<H: HeaderView>(&self, id: DeploymentId, period_start: u64, chain: &[H]) -> ThresholdState {
        let deployment = self.deployments.get(id);
        let period = self.period(deployment);
        let mtp_before = |start: u64| past_median_time_at(chain, start - 1).unwrap_or(i64::MIN);

        // Walk back until a state is known
        let mut pending = Vec::new();
        let mut cursor = period_start;
        let cached = {
            let cache = self.cache.read();
            let states = cache.get(&id);
            loop {
                if let Some(&state) = states.and_then(|states| states.get(&cursor)) {
                    break Some(state);
                }
                if cursor == 0 || mtp_before(cursor) < deployment.start_time {
                    break None;
                }
                pending.push(cursor);
                cursor -= period;
            }
        };

        let mut computed = Vec::with_capacity(pending.len() + 1);
        let mut state = cached.unwrap_or_else(|| {
            computed.push((cursor, ThresholdState::Defined));
            ThresholdState::Defined
        });

        // Walk forward
        while let Some(start) = pending.pop() {
            let mtp = mtp_before(start);
            let next = match state {
                ThresholdState::Defined if mtp >= deployment.timeout => ThresholdState::Failed,
                ThresholdState::Defined if mtp >= deployment.start_time => ThresholdState::Started,
                ThresholdState::Started if mtp >= deployment.timeout => ThresholdState::Failed,
                ThresholdState::Started => {
                    let signaling = chain[(start - period) as usize..start as usize]
                        .iter()
                        .filter(|header| is_signaling(header.version(), deployment.mask()))
                        .count() as u64;
                    if signaling >= self.threshold(deployment) { ThresholdState::LockedIn } else { ThresholdState::Started }
                }
                ThresholdState::LockedIn => ThresholdState::Active,
                other => other,
            };
            if next != state {
                debug!("Deployment {} moved from {state} to {next} at height {start}", id.name());
            }
            state = next;
            computed.push((start, state));
        }

        if !computed.is_empty() {
            self.cache.write().entry(id).or_default().extend(computed);
        }
        state
    }
}
