//! Stateless Philox engine.

use std::marker::PhantomData;

use super::{ParamsCheck, PhiloxState, BLOCK_WORDS};
use crate::backend::{PhiloxBackend, WordArray};
use crate::params::PhiloxParams;
use crate::round::n_rounds;

/// Philox as a pure function of `(counter, key)`.
///
/// Holds no state at all; the caller supplies the counter and key for every
/// call. Useful when the counter is derived directly from a thread index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiloxStateless<P: PhiloxParams, B: PhiloxBackend> {
    _marker: PhantomData<(P, B)>,
}

impl<P: PhiloxParams, B: PhiloxBackend> PhiloxStateless<P, B> {
    /// Create the engine.
    pub fn new() -> Self {
        let () = ParamsCheck::<P, B>::OK;

        Self {
            _marker: PhantomData,
        }
    }

    /// Block for an explicit counter and key.
    #[inline]
    pub fn generate(&self, counter: &B::Counter, key: &B::Key) -> B::Counter {
        n_rounds::<P, _, _>(counter, key)
    }

    /// Block number `block` of `subsequence` for `seed`.
    ///
    /// Equals the `block`-th call of a vector engine built with
    /// `(seed, subsequence, 0)`.
    pub fn generate_at(&self, seed: u64, subsequence: u64, block: u64) -> [u32; BLOCK_WORDS] {
        let state = PhiloxState::<B>::positioned(seed, subsequence, block);
        self.generate(&state.counter, &state.key).into_words()
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

impl<P: PhiloxParams, B: PhiloxBackend> Default for PhiloxStateless<P, B> {
    fn default() -> Self {
        Self::new()
    }
}
