use genix_consensus_core::{config::params::MEDIAN_TIME_SPAN, header::HeaderView};
use itertools::Itertools;

/// Median timestamp of the last [`MEDIAN_TIME_SPAN`] headers of `history` (fewer near genesis).
///
/// Returns `None` for an empty history.
pub fn calc_past_median_time<H: HeaderView>(history: &[H]) -> Option<i64> {
    let timestamps = history.iter().rev().take(MEDIAN_TIME_SPAN).map(|header| header.timestamp()).sorted_unstable().collect_vec();
    timestamps.get(timestamps.len() / 2).copied()
}

/// Past median time of the block at `height`, where `chain[h]` is the header at height `h`
pub fn past_median_time_at<H: HeaderView>(chain: &[H], height: u64) -> Option<i64> {
    let end = usize::try_from(height).ok()?.checked_add(1)?;
    calc_past_median_time(chain.get(..end)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use genix_consensus_core::header::CompactHeaderData;

    fn headers(timestamps: &[i64]) -> Vec<CompactHeaderData> {
        timestamps.iter().map(|&ts| CompactHeaderData::new(1, ts, 0x207fffff)).collect()
    }

    #[test]
    fn test_past_median_time() {
        struct Test {
            name: &'static str,
            timestamps: Vec<i64>,
            expected: Option<i64>,
        }

        let tests = vec![
            Test { name: "empty", timestamps: vec![], expected: None },
            Test { name: "single", timestamps: vec![7], expected: Some(7) },
            Test { name: "even count takes the upper middle", timestamps: vec![1, 2, 3, 4], expected: Some(3) },
            Test { name: "unsorted", timestamps: vec![50, 10, 40, 20, 30], expected: Some(30) },
            Test { name: "only the last eleven count", timestamps: (0..20).map(|i| i * 100).collect(), expected: Some(1400) },
            Test { name: "negative timestamps", timestamps: vec![-5, -1, -3], expected: Some(-3) },
        ];

        for test in tests {
            assert_eq!(calc_past_median_time(&headers(&test.timestamps)), test.expected, "{}", test.name);
        }
    }

    #[test]
    fn test_past_median_time_at_height() {
        let chain = headers(&(0..30).map(|i| 1000 + i * 10).collect::<Vec<_>>());
        assert_eq!(past_median_time_at(&chain, 0), Some(1000));
        assert_eq!(past_median_time_at(&chain, 4), Some(1020));
        assert_eq!(past_median_time_at(&chain, 29), Some(1240));
        assert_eq!(past_median_time_at(&chain, 30), None);
    }
}
