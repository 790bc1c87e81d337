//! Random-number streams and variate generation
//!
//! - **RandomStreams**: independent reproducible uniform streams, one per purpose
//! - **RandomVariateGenerator**: exponential, truncated-normal and constant durations
//! - **ServiceProcess / ArrivalProcess**: generators bound to their own streams

pub mod streams;
pub mod variates;

pub use streams::*;
pub use variates::*;
