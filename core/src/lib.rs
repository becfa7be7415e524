extern crate self as genix_core;

pub mod log;
