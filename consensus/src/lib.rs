//! Header-history driven consensus rules: difficulty retargeting, past median time and
//! versionbits deployment tracking.
//!
//! Every computation here takes an ordered slice of headers (oldest first) and is a pure
//! function of it. The only state kept is the versionbits cache, which callers must truncate
//! when the chain they evaluate is reorganized.

pub mod processes;
