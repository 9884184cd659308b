//! Storage backends for the Philox counter and key.
//!
//! A backend only decides how the words are laid out in memory. The round,
//! bump, increment and skip arithmetic in [`crate::round`] is written once
//! against [`WordArray`], so every backend produces bit-identical output.
//!
//! - [`ArrayBackend`]: plain `[u32; 4]` / `[u32; 2]` arrays (host default).
//! - [`NativeVectorBackend`]: `uint4` / `uint2` style structs with named lanes
//!   and vector alignment, the layout a GPU kernel sees.

mod array;
mod native;

use std::fmt::Debug;
use std::ops::{Index, IndexMut};

use bytemuck::Pod;

pub use array::ArrayBackend;
pub use native::{NativeVectorBackend, Uint2, Uint4};

/// Fixed-size sequence of `N` 32-bit words with array-like element access.
///
/// Element 0 is the least significant word whenever the sequence is treated
/// as a multi-word integer.
pub trait WordArray<const N: usize>:
    Copy
    + Default
    + Debug
    + PartialEq
    + Eq
    + Pod
    + Send
    + Sync
    + Index<usize, Output = u32>
    + IndexMut<usize>
    + 'static
{
    /// Build from plain words.
    fn from_words(words: [u32; N]) -> Self;

    /// Copy out as plain words.
    fn into_words(self) -> [u32; N];
}

impl<const N: usize> WordArray<N> for [u32; N]
where
    [u32; N]: Pod + Default,
{
    #[inline(always)]
    fn from_words(words: [u32; N]) -> Self {
        words
    }

    #[inline(always)]
    fn into_words(self) -> [u32; N] {
        self
    }
}

/// Storage strategy for the counter and key of a 4-word Philox engine.
pub trait PhiloxBackend:
    Copy + Clone + Default + Debug + PartialEq + Eq + Send + Sync + 'static
{
    /// Counter storage.
    type Counter: WordArray<4>;
    /// Key storage.
    type Key: WordArray<2>;

    /// Counter size this backend stores.
    const COUNTER_WORDS: usize = 4;

    /// Which backend this is.
    const KIND: BackendKind;
}

/// Closed set of available storage strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Generic fixed-size arrays.
    Array,
    /// Platform-native small vectors.
    NativeVector,
}

impl BackendKind {
    /// Human-readable backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Array => "array",
            BackendKind::NativeVector => "native-vector",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend used by the `Philox4x32x10*` aliases.
#[cfg(not(feature = "native-vector"))]
pub type DefaultBackend = ArrayBackend;

/// Backend used by the `Philox4x32x10*` aliases.
#[cfg(feature = "native-vector")]
pub type DefaultBackend = NativeVectorBackend;
