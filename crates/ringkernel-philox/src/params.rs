//! Philox algorithm parameters.
//!
//! Parameters are zero-sized marker types carrying associated constants, so an
//! engine's counter size, word width and round count are fixed by its type.
//! Any engine constructor evaluates a constant that checks them, which turns
//! illegal combinations into build errors. Implementors cannot override that
//! check.
//!
//! A legal custom parameter set builds:
//!
//! ```
//! use ringkernel_philox::params::PhiloxParams;
//! use ringkernel_philox::{ArrayBackend, PhiloxVector};
//!
//! #[derive(Debug, Clone, Copy, Default)]
//! struct FiveRounds;
//!
//! impl PhiloxParams for FiveRounds {
//!     const COUNTER_SIZE: usize = 4;
//!     const WIDTH: u32 = 32;
//!     const ROUNDS: u32 = 5;
//! }
//!
//! let mut rng = PhiloxVector::<FiveRounds, ArrayBackend>::new(0, 0, 0);
//! let _ = rng.next_vector();
//! ```
//!
//! Zero rounds:
//!
//! ```compile_fail
//! use ringkernel_philox::params::PhiloxParams;
//! use ringkernel_philox::{ArrayBackend, PhiloxVector};
//!
//! #[derive(Debug, Clone, Copy, Default)]
//! struct ZeroRounds;
//!
//! impl PhiloxParams for ZeroRounds {
//!     const COUNTER_SIZE: usize = 4;
//!     const WIDTH: u32 = 32;
//!     const ROUNDS: u32 = 0;
//! }
//!
//! let _ = PhiloxVector::<ZeroRounds, ArrayBackend>::new(0, 0, 0);
//! ```
//!
//! Odd counter size:
//!
//! ```compile_fail
//! use ringkernel_philox::params::PhiloxParams;
//! use ringkernel_philox::{ArrayBackend, PhiloxSingle};
//!
//! #[derive(Debug, Clone, Copy, Default)]
//! struct OddCounter;
//!
//! impl PhiloxParams for OddCounter {
//!     const COUNTER_SIZE: usize = 3;
//!     const WIDTH: u32 = 32;
//!     const ROUNDS: u32 = 10;
//! }
//!
//! let _ = PhiloxSingle::<OddCounter, ArrayBackend>::new(0, 0, 0);
//! ```
//!
//! Counter size above 16:
//!
//! ```compile_fail
//! use ringkernel_philox::params::PhiloxParams;
//! use ringkernel_philox::{ArrayBackend, PhiloxVector};
//!
//! #[derive(Debug, Clone, Copy, Default)]
//! struct WideCounter;
//!
//! impl PhiloxParams for WideCounter {
//!     const COUNTER_SIZE: usize = 18;
//!     const WIDTH: u32 = 32;
//!     const ROUNDS: u32 = 10;
//! }
//!
//! let _ = PhiloxVector::<WideCounter, ArrayBackend>::new(0, 0, 0);
//! ```
//!
//! Word width not a multiple of 8:
//!
//! ```compile_fail
//! use ringkernel_philox::params::PhiloxParams;
//! use ringkernel_philox::{ArrayBackend, PhiloxStateless};
//!
//! #[derive(Debug, Clone, Copy, Default)]
//! struct TwelveBit;
//!
//! impl PhiloxParams for TwelveBit {
//!     const COUNTER_SIZE: usize = 4;
//!     const WIDTH: u32 = 12;
//!     const ROUNDS: u32 = 10;
//! }
//!
//! let _ = PhiloxStateless::<TwelveBit, ArrayBackend>::new();
//! ```
//!
//! Word width other than 32:
//!
//! ```compile_fail
//! use ringkernel_philox::params::PhiloxParams;
//! use ringkernel_philox::{ArrayBackend, PhiloxVector};
//!
//! #[derive(Debug, Clone, Copy, Default)]
//! struct SixtyFourBit;
//!
//! impl PhiloxParams for SixtyFourBit {
//!     const COUNTER_SIZE: usize = 4;
//!     const WIDTH: u32 = 64;
//!     const ROUNDS: u32 = 10;
//! }
//!
//! let _ = PhiloxVector::<SixtyFourBit, ArrayBackend>::new(0, 0, 0);
//! ```
//!
//! A backend storing a different number of counter words:
//!
//! ```compile_fail
//! use ringkernel_philox::backend::{BackendKind, PhiloxBackend};
//! use ringkernel_philox::{Philox4x32x10Params, PhiloxVector};
//!
//! #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
//! struct TwoWordBackend;
//!
//! impl PhiloxBackend for TwoWordBackend {
//!     type Counter = [u32; 4];
//!     type Key = [u32; 2];
//!     const COUNTER_WORDS: usize = 2;
//!     const KIND: BackendKind = BackendKind::Array;
//! }
//!
//! let _ = PhiloxVector::<Philox4x32x10Params, TwoWordBackend>::new(0, 0, 0);
//! ```

use std::fmt;

use crate::{PhiloxError, Result};

/// Compile-time Philox parameters.
pub trait PhiloxParams: Copy + Default + Send + Sync + 'static {
    /// Number of words in the counter.
    const COUNTER_SIZE: usize;
    /// Width of one counter word in bits.
    const WIDTH: u32;
    /// Number of S-box rounds.
    const ROUNDS: u32;

    /// Runtime view of these parameters.
    fn descriptor() -> ParamsDescriptor {
        ParamsDescriptor {
            counter_size: Self::COUNTER_SIZE,
            width: Self::WIDTH,
            rounds: Self::ROUNDS,
        }
    }
}

/// Philox-4x32-10: four 32-bit counter words, ten rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Philox4x32x10Params;

impl PhiloxParams for Philox4x32x10Params {
    const COUNTER_SIZE: usize = 4;
    const WIDTH: u32 = 32;
    const ROUNDS: u32 = 10;
}

/// Philox-4x32-7, the reduced-round variant that still passes BigCrush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Philox4x32x7Params;

impl PhiloxParams for Philox4x32x7Params {
    const COUNTER_SIZE: usize = 4;
    const WIDTH: u32 = 32;
    const ROUNDS: u32 = 7;
}

/// Parameters carried as data, e.g. when handed to a device kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamsDescriptor {
    /// Number of words in the counter.
    pub counter_size: usize,
    /// Width of one counter word in bits.
    pub width: u32,
    /// Number of S-box rounds.
    pub rounds: u32,
}

impl ParamsDescriptor {
    /// Create a descriptor. Call [`validate`](Self::validate) before use.
    pub const fn new(counter_size: usize, width: u32, rounds: u32) -> Self {
        Self {
            counter_size,
            width,
            rounds,
        }
    }

    /// Apply the build-time parameter checks at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(PhiloxError::InvalidParameter(
                "number of Philox rounds must be > 0".to_string(),
            ));
        }
        if self.counter_size % 2 != 0 {
            return Err(PhiloxError::InvalidParameter(format!(
                "counter size must be even, got {}",
                self.counter_size
            )));
        }
        if self.counter_size > 16 {
            return Err(PhiloxError::InvalidParameter(format!(
                "counter size {} exceeds 16",
                self.counter_size
            )));
        }
        if self.width % 8 != 0 {
            return Err(PhiloxError::InvalidParameter(format!(
                "word width {} is not a multiple of 8",
                self.width
            )));
        }
        if self.width != 32 {
            return Err(PhiloxError::InvalidParameter(format!(
                "only 32-bit words are implemented, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ParamsDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Philox{}x{}-{}",
            self.counter_size, self.width, self.rounds
        )
    }
}
