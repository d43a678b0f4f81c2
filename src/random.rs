//! Injectable randomness.
//!
//! Every random draw in the engine comes from an RNG derived from the
//! session seed and a [`StreamKey`]. Streams never share state, so any
//! building or station can be generated on any thread in any order and
//! still produce the same values.

use rand::rngs::{OsRng, StdRng};
use rand::{SeedableRng, TryRngCore};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::EngineError;

/// Independent random streams used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Floors,
    Electricity,
    Water,
    Weather,
    Session,
}

impl Stream {
    fn tag(self) -> u64 {
        match self {
            Stream::Floors => 0x464c_4f4f,
            Stream::Electricity => 0x454c_4543,
            Stream::Water => 0x5741_5445,
            Stream::Weather => 0x5745_4154,
            Stream::Session => 0x5345_5353,
        }
    }
}

/// Identifies one deterministic sub-stream.
///
/// `entity` is a building hash or station id; `index` is usually the
/// timestamp index within the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamKey {
    pub stream: Stream,
    pub entity: u64,
    pub index: u64,
}

impl StreamKey {
    pub fn new(stream: Stream, entity: u64, index: u64) -> Self {
        Self {
            stream,
            entity,
            index,
        }
    }
}

/// Source of seeded RNGs handed to generators.
///
/// Implementations must be pure functions of the key: asking twice for
/// the same key yields two RNGs producing identical sequences.
pub trait RandomSource: Send + Sync {
    /// Returns a fresh RNG for the given stream key.
    fn rng(&self, key: StreamKey) -> StdRng;

    /// Master seed this source was built from.
    fn seed(&self) -> u64;
}

/// Default [`RandomSource`] mixing a master seed with stream keys.
#[derive(Debug, Clone, Copy)]
pub struct SeededSource {
    seed: u64,
}

impl SeededSource {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Draws a master seed from the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RandomSource`] if the OS entropy source fails.
    pub fn from_os() -> Result<Self, EngineError> {
        let seed = OsRng
            .try_next_u64()
            .map_err(|e| EngineError::RandomSource(e.to_string()))?;
        Ok(Self::new(seed))
    }
}

impl RandomSource for SeededSource {
    fn rng(&self, key: StreamKey) -> StdRng {
        StdRng::seed_from_u64(mix(self.seed, key))
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

/// Platform-independent 64-bit hash of an identifier.
pub fn stable_hash(value: &str) -> u64 {
    xxh3_64(value.as_bytes())
}

fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn mix(seed: u64, key: StreamKey) -> u64 {
    let h = splitmix64(seed ^ key.stream.tag());
    let h = splitmix64(h ^ key.entity);
    splitmix64(h ^ key.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn draw(source: &impl RandomSource, key: StreamKey) -> Vec<u64> {
        let mut rng = source.rng(key);
        (0..8).map(|_| rng.random::<u64>()).collect()
    }

    #[test]
    fn same_key_same_sequence() {
        let source = SeededSource::new(42);
        let key = StreamKey::new(Stream::Electricity, 7, 3);
        assert_eq!(draw(&source, key), draw(&source, key));
    }

    #[test]
    fn streams_are_independent() {
        let source = SeededSource::new(42);
        let elec = draw(&source, StreamKey::new(Stream::Electricity, 7, 3));
        let water = draw(&source, StreamKey::new(Stream::Water, 7, 3));
        let next = draw(&source, StreamKey::new(Stream::Electricity, 7, 4));
        assert_ne!(elec, water);
        assert_ne!(elec, next);
    }

    #[test]
    fn different_seeds_diverge() {
        let key = StreamKey::new(Stream::Weather, 1, 0);
        assert_ne!(
            draw(&SeededSource::new(1), key),
            draw(&SeededSource::new(2), key)
        );
    }

    #[test]
    fn stable_hash_is_deterministic() {
        assert_eq!(stable_hash("way/123"), stable_hash("way/123"));
        assert_ne!(stable_hash("way/123"), stable_hash("way/124"));
    }

    #[test]
    fn os_seed_is_available() {
        assert!(SeededSource::from_os().is_ok());
    }
}
