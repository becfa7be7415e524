pub mod args;
pub mod daemon;
