//! Counter/key state shared by all engines.

use crate::backend::{PhiloxBackend, WordArray};
use crate::mulhilo::{high32, low32};
use crate::round::{skip4, skip_subsequence};

/// Philox state: a 128-bit counter and a 64-bit key.
///
/// This is the entire mutable state of a vector engine. It is `Copy` and
/// owned by exactly one engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct PhiloxState<B: PhiloxBackend> {
    /// Counter words, word 0 least significant.
    pub counter: B::Counter,
    /// Key words.
    pub key: B::Key,
}

impl<B: PhiloxBackend> PhiloxState<B> {
    /// Zero counter, key taken from the low and high halves of `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            counter: B::Counter::default(),
            key: B::Key::from_words([low32(seed), high32(seed)]),
        }
    }

    /// State positioned at `block` within `subsequence` for `seed`.
    pub fn positioned(seed: u64, subsequence: u64, block: u64) -> Self {
        let mut state = Self::from_seed(seed);
        skip_subsequence(&mut state.counter, subsequence);
        skip4(&mut state.counter, block);
        state
    }

    /// Build from plain words.
    pub fn from_words(counter: [u32; 4], key: [u32; 2]) -> Self {
        Self {
            counter: B::Counter::from_words(counter),
            key: B::Key::from_words(key),
        }
    }

    /// Copy out as plain words.
    pub fn into_words(self) -> ([u32; 4], [u32; 2]) {
        (self.counter.into_words(), self.key.into_words())
    }

    /// Re-store the same state in another backend.
    pub fn convert<B2: PhiloxBackend>(self) -> PhiloxState<B2> {
        let (counter, key) = self.into_words();
        PhiloxState::from_words(counter, key)
    }
}
