pub mod block;
pub mod config;
pub mod errors;
pub mod hashing;
pub mod header;
pub mod merkle;
pub mod network;
pub mod script;
pub mod tx;

/// Height of a block above genesis
pub type BlockHeight = u64;
