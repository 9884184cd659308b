//! Philox engines.
//!
//! Every engine is a plain owned value: a counter, a key, and for the
//! single-word engine a cached output block. There is no shared state, so
//! one engine per logical thread needs no synchronisation.
//!
//! - [`PhiloxVector`] returns a whole 4-word block per call.
//! - [`PhiloxSingle`] returns one word per call and computes a new block every
//!   fourth call.
//! - [`PhiloxStateless`] maps an explicit `(counter, key)` to its block.

mod single;
mod state;
mod stateless;
mod vector;

pub use single::PhiloxSingle;
pub use state::PhiloxState;
pub use stateless::PhiloxStateless;
pub use vector::PhiloxVector;

use crate::backend::PhiloxBackend;
use crate::params::PhiloxParams;

/// Number of output words per block for the supported 4x32 configuration.
pub const BLOCK_WORDS: usize = 4;

/// Common interface of the stateful Philox engines.
pub trait PhiloxEngine {
    /// Algorithm parameters.
    type Params: PhiloxParams;
    /// Counter/key storage.
    type Backend: PhiloxBackend;
    /// Value returned by one invocation.
    type Output;

    /// Produce the next output and advance.
    fn generate(&mut self) -> Self::Output;

    /// Skip `n` outputs in O(1).
    fn skip(&mut self, n: u64);

    /// Counter and key of the block the next output comes from.
    fn state(&self) -> PhiloxState<Self::Backend>;

    /// Smallest word an engine can return.
    fn min(&self) -> u32 {
        0
    }

    /// Largest word an engine can return.
    fn max(&self) -> u32 {
        u32::MAX
    }
}

/// A stream of uniformly distributed 32-bit words.
///
/// This is what distributions consume.
pub trait RandomSource {
    /// Next raw word.
    fn next_u32(&mut self) -> u32;

    /// Next 64-bit value built from two consecutive words, first word low.
    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    /// Fill `dest` with consecutive words.
    fn fill_u32(&mut self, dest: &mut [u32]) {
        for word in dest.iter_mut() {
            *word = self.next_u32();
        }
    }
}

/// Build-time check shared by the engines: the parameters are legal and
/// the backend stores that many counter words.
///
/// Lives outside [`PhiloxParams`] so implementors cannot replace it.
pub(crate) struct ParamsCheck<P, B>(std::marker::PhantomData<(P, B)>);

impl<P: PhiloxParams, B: PhiloxBackend> ParamsCheck<P, B> {
    pub(crate) const OK: () = {
        assert!(P::ROUNDS > 0, "Number of Philox rounds must be > 0.");
        assert!(
            P::COUNTER_SIZE % 2 == 0,
            "Philox counter size must be an even number."
        );
        assert!(
            P::COUNTER_SIZE <= 16,
            "Philox SP network is not specified for sizes > 16."
        );
        assert!(
            P::WIDTH % 8 == 0,
            "Philox number width in bits must be a multiple of 8."
        );
        assert!(P::WIDTH == 32, "Philox implemented only for 32 bit numbers.");
        assert!(
            P::COUNTER_SIZE == B::COUNTER_WORDS,
            "Philox backend storage does not match the counter size."
        );
        assert!(
            P::COUNTER_SIZE == BLOCK_WORDS,
            "Philox round function is implemented only for counters of width == 4."
        );
    };
}
