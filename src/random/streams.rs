//! Independent, reproducible random-number streams
//!
//! Every purpose that consumes randomness (the arrival process, each service
//! process, each routing decision, each tie-break) draws from its own stream.
//! A stream's generator is seeded from `(seed, stream index)` alone, so its
//! sequence does not depend on which other streams exist or in which order
//! they were first used.

use crate::types::StreamId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// A family of independent uniform streams indexed by [`StreamId`]
#[derive(Debug, Clone)]
pub struct RandomStreams {
    seed: u64,
    streams: HashMap<StreamId, StdRng>,
}

impl RandomStreams {
    /// Create a stream family from a base seed
    pub fn new(seed: u64) -> Self {
        Self { seed, streams: HashMap::new() }
    }

    /// Base seed of the family
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generator bound to one stream, created on first use
    pub fn stream(&mut self, id: StreamId) -> &mut StdRng {
        let seed = self.seed;
        self.streams.entry(id).or_insert_with(|| Self::derive(seed, id))
    }

    /// Next uniform draw in `[0, 1)` from the given stream
    pub fn uniform(&mut self, id: StreamId) -> f64 {
        self.stream(id).gen::<f64>()
    }

    /// Number of streams touched so far
    pub fn active_streams(&self) -> usize {
        self.streams.len()
    }

    fn derive(seed: u64, id: StreamId) -> StdRng {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&seed.to_le_bytes());
        key[8..12].copy_from_slice(&id.0.to_le_bytes());
        StdRng::from_seed(key)
    }
}
