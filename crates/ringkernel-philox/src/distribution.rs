//! Uniform real distribution over `[0, 1)`.
//!
//! Only the top mantissa-width bits of the engine output are used, scaled by
//! an exact power of two, so the result can never round up to `1.0`.

use std::marker::PhantomData;

use crate::engine::{RandomSource, BLOCK_WORDS};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating-point types [`UniformReal`] can produce.
pub trait UniformFloat: sealed::Sealed + Copy + PartialOrd + Send + Sync + 'static {
    /// Raw words consumed per sample.
    const WORDS_PER_SAMPLE: usize;

    /// Map the first `WORDS_PER_SAMPLE` words of `words` into `[0, 1)`.
    fn from_words(words: &[u32]) -> Self;
}

impl UniformFloat for f32 {
    const WORDS_PER_SAMPLE: usize = 1;

    #[inline]
    fn from_words(words: &[u32]) -> Self {
        // upper 24 bits fill the f32 mantissa exactly
        (words[0] >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }
}

impl UniformFloat for f64 {
    const WORDS_PER_SAMPLE: usize = 2;

    #[inline]
    fn from_words(words: &[u32]) -> Self {
        let combined = ((words[0] as u64) << 32) | words[1] as u64;
        // upper 53 bits fill the f64 mantissa exactly
        (combined >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Uniform distribution on `[0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformReal<T: UniformFloat> {
    _marker: PhantomData<T>,
}

impl<T: UniformFloat> UniformReal<T> {
    /// Create the distribution.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Draw one value from a word source.
    #[inline]
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> T {
        let mut words = [0u32; 2];
        rng.fill_u32(&mut words[..T::WORDS_PER_SAMPLE]);
        T::from_words(&words)
    }

    /// Fill `dest` with draws from a word source.
    pub fn fill<R: RandomSource + ?Sized>(&self, rng: &mut R, dest: &mut [T]) {
        for value in dest.iter_mut() {
            *value = self.sample(rng);
        }
    }

    /// Number of values one 4-word block yields.
    pub const fn per_block() -> usize {
        BLOCK_WORDS / T::WORDS_PER_SAMPLE
    }

    /// Map a whole engine block; `dest` receives [`per_block`](Self::per_block) values.
    pub fn from_block(&self, block: &[u32; BLOCK_WORDS], dest: &mut [T]) {
        for (value, words) in dest
            .iter_mut()
            .zip(block.chunks_exact(T::WORDS_PER_SAMPLE))
        {
            *value = T::from_words(words);
        }
    }
}
