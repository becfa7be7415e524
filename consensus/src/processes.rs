pub mod difficulty;
pub mod past_median_time;
pub mod versionbits;
