//! Single-word Philox engine.

use std::marker::PhantomData;

use super::{ParamsCheck, PhiloxEngine, PhiloxState, RandomSource, BLOCK_WORDS};
use crate::backend::{PhiloxBackend, WordArray};
use crate::config::EngineConfig;
use crate::params::PhiloxParams;
use crate::round::{advance_counter, n_rounds, skip4};

/// Philox engine returning one 32-bit word per call.
///
/// A block of four words is computed at a time and handed out word by word,
/// so reading this engine is bit-identical to flattening the blocks of a
/// [`PhiloxVector`](super::PhiloxVector) constructed with the same seed and
/// subsequence.
///
/// The `offset` given at construction counts words, not blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiloxSingle<P: PhiloxParams, B: PhiloxBackend> {
    /// Counter of the cached block.
    state: PhiloxState<B>,
    block: [u32; BLOCK_WORDS],
    /// Next word to hand out; `BLOCK_WORDS` means the block is used up.
    position: usize,
    _params: PhantomData<P>,
}

impl<P: PhiloxParams, B: PhiloxBackend> PhiloxSingle<P, B> {
    /// Create an engine for `seed`, starting `offset` words into `subsequence`.
    pub fn new(seed: u64, subsequence: u64, offset: u64) -> Self {
        let state = PhiloxState::positioned(seed, subsequence, offset / BLOCK_WORDS as u64);
        let mut engine = Self::from_state(state);
        engine.position = (offset % BLOCK_WORDS as u64) as usize;
        engine
    }

    /// Create an engine at the start of subsequence 0.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, 0, 0)
    }

    /// Create an engine from a configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.seed, config.subsequence, config.offset)
    }

    /// Resume at word 0 of the block for `state`'s counter.
    ///
    /// To resume mid-block use [`from_state_at`](Self::from_state_at) with
    /// [`position`](Self::position), or [`from_checkpoint`](Self::from_checkpoint).
    pub fn from_state(state: PhiloxState<B>) -> Self {
        let () = ParamsCheck::<P, B>::OK;

        let mut engine = Self {
            state,
            block: [0; BLOCK_WORDS],
            position: 0,
            _params: PhantomData,
        };
        engine.compute_block();
        engine
    }

    /// Resume at word `position` of the block for `state`'s counter.
    ///
    /// Positions past the block continue into the following blocks.
    pub fn from_state_at(state: PhiloxState<B>, position: usize) -> Self {
        let mut engine = Self::from_state(state);
        engine.skip(position as u64);
        engine
    }

    /// Resume from a [`checkpoint`](Self::checkpoint).
    pub fn from_checkpoint((state, position): (PhiloxState<B>, usize)) -> Self {
        Self::from_state_at(state, position)
    }

    /// Next pseudorandom word.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        if self.position == BLOCK_WORDS {
            advance_counter(&mut self.state.counter);
            self.compute_block();
            self.position = 0;
        }

        let word = self.block[self.position];
        self.position += 1;
        word
    }

    /// Skip `n` words in O(1).
    pub fn skip(&mut self, n: u64) {
        let words = BLOCK_WORDS as u64;
        let within = self.position as u64 + n % words;
        let blocks = n / words + within / words;

        self.position = (within % words) as usize;
        if blocks > 0 {
            skip4(&mut self.state.counter, blocks);
            self.compute_block();
        }
    }

    /// Counter and key of the block holding the next word.
    pub fn state(&self) -> PhiloxState<B> {
        let mut state = self.state;
        if self.position == BLOCK_WORDS {
            advance_counter(&mut state.counter);
        }
        state
    }

    /// Index of the next word within the block of [`state`](Self::state).
    pub fn position(&self) -> usize {
        self.position % BLOCK_WORDS
    }

    /// Everything needed to resume exactly at the next word.
    pub fn checkpoint(&self) -> (PhiloxState<B>, usize) {
        (self.state(), self.position())
    }

    /// Smallest word this engine returns.
    pub const fn min(&self) -> u32 {
        0
    }

    /// Largest word this engine returns.
    pub const fn max(&self) -> u32 {
        u32::MAX
    }

    #[inline]
    fn compute_block(&mut self) {
        self.block = n_rounds::<P, _, _>(&self.state.counter, &self.state.key).into_words();
    }
}

impl<P: PhiloxParams, B: PhiloxBackend> Default for PhiloxSingle<P, B> {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl<P: PhiloxParams, B: PhiloxBackend> PhiloxEngine for PhiloxSingle<P, B> {
    type Params = P;
    type Backend = B;
    type Output = u32;

    fn generate(&mut self) -> u32 {
        self.next_u32()
    }

    fn skip(&mut self, n: u64) {
        PhiloxSingle::skip(self, n)
    }

    fn state(&self) -> PhiloxState<B> {
        PhiloxSingle::state(self)
    }
}

impl<P: PhiloxParams, B: PhiloxBackend> RandomSource for PhiloxSingle<P, B> {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        PhiloxSingle::next_u32(self)
    }
}
