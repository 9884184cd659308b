//! Vector-output Philox engine.

use std::marker::PhantomData;

use super::{ParamsCheck, PhiloxEngine, PhiloxState, BLOCK_WORDS};
use crate::backend::{PhiloxBackend, WordArray};
use crate::config::EngineConfig;
use crate::params::PhiloxParams;
use crate::round::{advance_counter, n_rounds, skip4};

/// Philox engine returning a full block of four words per call.
///
/// The internal state is only a counter and a key; the caller owns the
/// returned block. `offset` and [`skip`](Self::skip) count whole blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiloxVector<P: PhiloxParams, B: PhiloxBackend> {
    /// Counter of the block the next call returns.
    state: PhiloxState<B>,
    _params: PhantomData<P>,
}

impl<P: PhiloxParams, B: PhiloxBackend> PhiloxVector<P, B> {
    /// Create an engine for `seed`, starting `offset` blocks into `subsequence`.
    ///
    /// The first call returns block `offset` itself. Engines that advance the
    /// counter before computing start one block later for the same arguments.
    pub fn new(seed: u64, subsequence: u64, offset: u64) -> Self {
        Self::from_state(PhiloxState::positioned(seed, subsequence, offset))
    }

    /// Create an engine at the start of subsequence 0.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, 0, 0)
    }

    /// Create an engine from a configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.seed, config.subsequence, config.offset)
    }

    /// Resume from a state; the next call returns the block for its counter.
    pub fn from_state(state: PhiloxState<B>) -> Self {
        let () = ParamsCheck::<P, B>::OK;

        Self {
            state,
            _params: PhantomData,
        }
    }

    /// Next block in the backend's counter representation.
    #[inline]
    pub fn next_block(&mut self) -> B::Counter {
        let block = n_rounds::<P, _, _>(&self.state.counter, &self.state.key);
        advance_counter(&mut self.state.counter);
        block
    }

    /// Next block of four pseudorandom words.
    #[inline]
    pub fn next_vector(&mut self) -> [u32; BLOCK_WORDS] {
        self.next_block().into_words()
    }

    /// Skip `offset` whole blocks in O(1).
    pub fn skip(&mut self, offset: u64) {
        skip4(&mut self.state.counter, offset);
    }

    /// Current counter and key.
    pub fn state(&self) -> PhiloxState<B> {
        self.state
    }

    /// Smallest word this engine returns.
    pub const fn min(&self) -> u32 {
        0
    }

    /// Largest word this engine returns.
    pub const fn max(&self) -> u32 {
        u32::MAX
    }
}

impl<P: PhiloxParams, B: PhiloxBackend> Default for PhiloxVector<P, B> {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl<P: PhiloxParams, B: PhiloxBackend> PhiloxEngine for PhiloxVector<P, B> {
    type Params = P;
    type Backend = B;
    type Output = [u32; BLOCK_WORDS];

    fn generate(&mut self) -> [u32; BLOCK_WORDS] {
        self.next_vector()
    }

    fn skip(&mut self, n: u64) {
        PhiloxVector::skip(self, n)
    }

    fn state(&self) -> PhiloxState<B> {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ArrayBackend, NativeVectorBackend, Uint4};
    use crate::params::{Philox4x32x10Params, Philox4x32x7Params};

    type Vector = PhiloxVector<Philox4x32x10Params, ArrayBackend>;

    #[test]
    fn test_golden_block() {
        let mut rng = Vector::new(42, 12345, 6789);
        assert_eq!(
            rng.next_vector(),
            [0xECD4_6C71, 0x2204_C975, 0xB3EF_C52E, 0x979A_7AC9]
        );
        assert_eq!(
            rng.next_vector(),
            [0xEDE0_4408, 0x2BD4_3F66, 0x44C8_29DA, 0x7657_334C]
        );
    }

    #[test]
    fn test_call_advances_counter_by_one() {
        let mut rng = Vector::new(1, 2, 3);
        assert_eq!(rng.state().counter, [3, 0, 2, 0]);
        rng.next_vector();
        assert_eq!(rng.state().counter, [4, 0, 2, 0]);
        assert_eq!(rng.state().key, [1, 0]);
    }

    #[test]
    fn test_native_block_type() {
        let mut rng = PhiloxVector::<Philox4x32x10Params, NativeVectorBackend>::default();
        assert_eq!(
            rng.next_block(),
            Uint4::new(0x6627_E8D5, 0xE169_C58D, 0xBC57_AC4C, 0x9B00_DBD8)
        );
    }

    #[test]
    fn test_round_count_changes_output() {
        let mut ten = Vector::default();
        let mut seven = PhiloxVector::<Philox4x32x7Params, ArrayBackend>::default();
        assert_ne!(ten.next_vector(), seven.next_vector());
    }

    #[test]
    fn test_skip_matches_stepping() {
        let mut skipped = Vector::new(3, 0, 0);
        let mut stepped = skipped;

        skipped.skip(17);
        for _ in 0..17 {
            stepped.next_vector();
        }

        assert_eq!(skipped.state(), stepped.state());
        assert_eq!(skipped.next_vector(), stepped.next_vector());
    }

    #[test]
    fn test_from_state_resumes() {
        let mut rng = Vector::new(11, 22, 33);
        rng.next_vector();
        let checkpoint = rng.state();
        let expected = rng.next_vector();

        let mut resumed = Vector::from_state(checkpoint);
        assert_eq!(resumed.next_vector(), expected);
    }
}
