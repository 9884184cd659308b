//! Philox counter-based pseudorandom number engines.
//!
//! Philox maps a 128-bit counter and a 64-bit key to four 32-bit words
//! through a fixed number of multiply-and-xor rounds. Because each output
//! block is a pure function of `(counter, key)`, any position in any stream
//! is reachable in O(1), and thousands of independent streams can run side by
//! side with no shared state.
//!
//! # Features
//!
//! - **Engines**: single-word, vector (4 words per call) and stateless forms
//! - **Backends**: plain arrays or 16-byte aligned `Uint4`/`Uint2` structs
//!   (the `native-vector` feature makes the latter the default)
//! - **Grid fills**: one engine per logical thread, run on rayon
//! - **GPU**: the same generator as a CUDA kernel (requires `cuda` feature)
//!
//! # Example
//!
//! ```
//! use ringkernel_philox::prelude::*;
//!
//! // Stream 12345 of seed 42, starting 6789 words in
//! let mut rng = Philox4x32x10::new(42, 12345, 6789);
//! let word = rng.next_u32();
//!
//! // Same stream, whole blocks at a time
//! let mut vector = Philox4x32x10Vector::new(42, 12345, 0);
//! let block = vector.next_vector();
//!
//! // Uniform reals in [0, 1)
//! let u: f64 = UniformReal::new().sample(&mut rng);
//! assert!((0.0..1.0).contains(&u));
//! # let _ = (word, block);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod distribution;
pub mod engine;
pub mod gpu;
pub mod grid;
pub mod mulhilo;
pub mod params;
pub mod round;

/// Error types for Philox operations.
#[derive(Debug, thiserror::Error)]
pub enum PhiloxError {
    /// Algorithm parameters rejected at runtime.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Launch or fill configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// CUDA driver, compiler or transfer failure.
    #[cfg(feature = "cuda")]
    #[error("GPU error: {0}")]
    Gpu(String),
}

/// Result type for Philox operations.
pub type Result<T> = std::result::Result<T, PhiloxError>;

/// Philox-4x32-10 returning one word per call.
pub type Philox4x32x10 = PhiloxSingle<Philox4x32x10Params, DefaultBackend>;

/// Philox-4x32-10 returning a 4-word block per call.
pub type Philox4x32x10Vector = PhiloxVector<Philox4x32x10Params, DefaultBackend>;

/// Philox-4x32-10 as a pure function of counter and key.
pub type Philox4x32x10Stateless = PhiloxStateless<Philox4x32x10Params, DefaultBackend>;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::backend::{ArrayBackend, DefaultBackend, NativeVectorBackend};
    pub use crate::config::{EngineConfig, FillConfig};
    pub use crate::distribution::UniformReal;
    pub use crate::engine::{
        PhiloxEngine, PhiloxSingle, PhiloxState, PhiloxStateless, PhiloxVector, RandomSource,
    };
    pub use crate::grid::{LaunchGrid, PhiloxGrid, ThreadIndex};
    pub use crate::params::{Philox4x32x10Params, Philox4x32x7Params, PhiloxParams};
    pub use crate::{
        Philox4x32x10, Philox4x32x10Stateless, Philox4x32x10Vector, PhiloxError, Result,
    };

    #[cfg(feature = "cuda")]
    pub use crate::gpu::GpuPhiloxVector;
}

// Re-exports
pub use backend::{ArrayBackend, DefaultBackend, NativeVectorBackend, PhiloxBackend, Uint2, Uint4};
pub use config::{EngineConfig, FillConfig};
pub use distribution::{UniformFloat, UniformReal};
pub use engine::{
    PhiloxEngine, PhiloxSingle, PhiloxState, PhiloxStateless, PhiloxVector, RandomSource,
    BLOCK_WORDS,
};
pub use grid::{LaunchGrid, PhiloxGrid, ThreadIndex};
pub use params::{ParamsDescriptor, Philox4x32x10Params, Philox4x32x7Params, PhiloxParams};
