//! One engine per logical thread, executed on the CPU.
//!
//! A launch is a 1-D grid of `grid_size` blocks with `block_size` threads
//! each, the same shape a device kernel uses. Every logical thread builds its
//! own [`PhiloxVector`] with `subsequence = base_subsequence + global_id` and
//! writes only its own chunk of the output, so results are independent of
//! how rayon schedules the work.

use std::marker::PhantomData;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::backend::{DefaultBackend, PhiloxBackend};
use crate::config::FillConfig;
use crate::distribution::{UniformFloat, UniformReal};
use crate::engine::{PhiloxVector, BLOCK_WORDS};
use crate::params::{Philox4x32x10Params, PhiloxParams};
use crate::{PhiloxError, Result};

/// Identity of one logical thread within a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadIndex {
    /// Block index within the grid.
    pub block_idx: u32,
    /// Thread index within the block.
    pub thread_idx: u32,
    /// Threads per block.
    pub block_dim: u32,
}

impl ThreadIndex {
    /// Create a thread index.
    pub const fn new(block_idx: u32, thread_idx: u32, block_dim: u32) -> Self {
        Self {
            block_idx,
            thread_idx,
            block_dim,
        }
    }

    /// Thread index from a linear global id.
    ///
    /// # Panics
    ///
    /// Panics if `block_dim` is zero. [`LaunchGrid::thread`] never passes a
    /// zero block size.
    pub const fn from_global(global_id: u64, block_dim: u32) -> Self {
        Self {
            block_idx: (global_id / block_dim as u64) as u32,
            thread_idx: (global_id % block_dim as u64) as u32,
            block_dim,
        }
    }

    /// `block_idx * block_dim + thread_idx`.
    #[inline]
    pub const fn global_id(&self) -> u64 {
        self.block_idx as u64 * self.block_dim as u64 + self.thread_idx as u64
    }

    /// Subsequence this thread's engine uses, counted from `base`.
    #[inline]
    pub const fn subsequence(&self, base: u64) -> u64 {
        base.wrapping_add(self.global_id())
    }
}

/// Shape of a 1-D launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaunchGrid {
    /// Number of blocks.
    pub grid_size: u32,
    /// Threads per block.
    pub block_size: u32,
}

impl LaunchGrid {
    /// Create a launch shape; both dimensions must be non-zero.
    pub fn new(grid_size: u32, block_size: u32) -> Result<Self> {
        if block_size == 0 {
            return Err(PhiloxError::InvalidConfig(
                "block size must be > 0".to_string(),
            ));
        }
        if grid_size == 0 {
            return Err(PhiloxError::InvalidConfig(
                "grid size must be > 0".to_string(),
            ));
        }
        Ok(Self {
            grid_size,
            block_size,
        })
    }

    /// Smallest grid with at least `threads` logical threads.
    pub fn for_threads(threads: u64, block_size: u32) -> Result<Self> {
        if block_size == 0 {
            return Err(PhiloxError::InvalidConfig(
                "block size must be > 0".to_string(),
            ));
        }
        let blocks = threads.max(1).div_ceil(block_size as u64);
        let grid_size = u32::try_from(blocks).map_err(|_| {
            PhiloxError::InvalidConfig(format!(
                "{} threads need {} blocks of {}, more than a grid can hold",
                threads, blocks, block_size
            ))
        })?;
        Self::new(grid_size, block_size)
    }

    /// Total logical threads.
    pub const fn total_threads(&self) -> u64 {
        self.grid_size as u64 * self.block_size as u64
    }

    /// Index of logical thread `global_id`.
    pub const fn thread(&self, global_id: u64) -> ThreadIndex {
        ThreadIndex::from_global(global_id, self.block_size)
    }

    /// Run `kernel` once per logical thread, in parallel.
    pub fn for_each_thread<F>(&self, kernel: F)
    where
        F: Fn(ThreadIndex) + Send + Sync,
    {
        let block_size = self.block_size;
        (0..self.total_threads())
            .into_par_iter()
            .for_each(|id| kernel(ThreadIndex::from_global(id, block_size)));
    }
}

/// Fills host buffers using one Philox engine per logical thread.
#[derive(Debug, Clone)]
pub struct PhiloxGrid<P: PhiloxParams = Philox4x32x10Params, B: PhiloxBackend = DefaultBackend> {
    config: FillConfig,
    _marker: PhantomData<(P, B)>,
}

impl<P: PhiloxParams, B: PhiloxBackend> PhiloxGrid<P, B> {
    /// Validate `config` and create the filler.
    pub fn new(config: FillConfig) -> Result<Self> {
        P::descriptor().validate()?;

        if config.block_size == 0 {
            return Err(PhiloxError::InvalidConfig(
                "block size must be > 0".to_string(),
            ));
        }
        if config.blocks_per_thread == 0 {
            return Err(PhiloxError::InvalidConfig(
                "each thread must produce at least one block".to_string(),
            ));
        }

        Ok(Self {
            config,
            _marker: PhantomData,
        })
    }

    /// Fill configuration.
    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Engine owned by logical thread `thread`.
    pub fn engine_for(&self, thread: ThreadIndex) -> PhiloxVector<P, B> {
        PhiloxVector::from_config(&self.config.engine_for(thread.global_id()))
    }

    /// Launch shape needed for `values` outputs at `values_per_block` per block.
    pub fn launch_for(&self, values: usize, values_per_block: usize) -> Result<LaunchGrid> {
        let per_thread = values_per_block * self.config.blocks_per_thread as usize;
        let threads = values.div_ceil(per_thread) as u64;
        LaunchGrid::for_threads(threads, self.config.block_size)
    }

    /// Fill `dest` with raw words.
    ///
    /// Thread `t` writes words `[t * 4 * blocks_per_thread, ...)` from its
    /// own engine.
    pub fn fill_u32(&self, dest: &mut [u32]) -> Result<LaunchGrid> {
        let grid = self.launch_for(dest.len(), BLOCK_WORDS)?;
        let chunk = BLOCK_WORDS * self.config.blocks_per_thread as usize;
        self.log_launch("u32", &grid, dest.len());

        self.run_chunks(dest, chunk, &grid, |engine, out| {
            for block_out in out.chunks_mut(BLOCK_WORDS) {
                let block = engine.next_vector();
                block_out.copy_from_slice(&block[..block_out.len()]);
            }
        });

        Ok(grid)
    }

    /// Fill `dest` with uniform reals in `[0, 1)`.
    pub fn fill_uniform<T: UniformFloat>(&self, dest: &mut [T]) -> Result<LaunchGrid> {
        let per_block = UniformReal::<T>::per_block();
        let grid = self.launch_for(dest.len(), per_block)?;
        let chunk = per_block * self.config.blocks_per_thread as usize;
        self.log_launch(std::any::type_name::<T>(), &grid, dest.len());

        let dist = UniformReal::<T>::new();
        self.run_chunks(dest, chunk, &grid, |engine, out| {
            for values in out.chunks_mut(per_block) {
                let block = engine.next_vector();
                dist.from_block(&block, values);
            }
        });

        Ok(grid)
    }

    fn run_chunks<T, F>(&self, dest: &mut [T], chunk: usize, grid: &LaunchGrid, kernel: F)
    where
        T: Send,
        F: Fn(&mut PhiloxVector<P, B>, &mut [T]) + Send + Sync,
    {
        let run = |(id, out): (usize, &mut [T])| {
            let mut engine = self.engine_for(grid.thread(id as u64));
            kernel(&mut engine, out);
        };

        if grid.total_threads() as usize >= self.config.parallel_threshold {
            dest.par_chunks_mut(chunk).enumerate().for_each(run);
        } else {
            dest.chunks_mut(chunk).enumerate().for_each(run);
        }
    }

    fn log_launch(&self, kind: &str, grid: &LaunchGrid, len: usize) {
        debug!(
            params = %P::descriptor(),
            backend = %B::KIND,
            kind,
            len,
            grid_size = grid.grid_size,
            block_size = grid.block_size,
            "Launching Philox grid fill"
        );
        trace!(
            seed = self.config.seed,
            base_subsequence = self.config.base_subsequence,
            offset = self.config.offset,
            "Grid fill engine identity"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ArrayBackend, NativeVectorBackend};
    use std::sync::atomic::{AtomicU64, Ordering};

    type Grid = PhiloxGrid<Philox4x32x10Params, ArrayBackend>;

    #[test]
    fn test_thread_index_global_id() {
        let t = ThreadIndex::new(3, 5, 256);
        assert_eq!(t.global_id(), 3 * 256 + 5);
        assert_eq!(ThreadIndex::from_global(t.global_id(), 256), t);
        assert_eq!(t.subsequence(1000), 1000 + 3 * 256 + 5);
    }

    #[test]
    #[should_panic]
    fn test_from_global_rejects_zero_block_dim() {
        let _ = ThreadIndex::from_global(5, std::hint::black_box(0));
    }

    #[test]
    fn test_launch_grid_rounds_up() {
        let grid = LaunchGrid::for_threads(1000, 256).unwrap();
        assert_eq!(grid.grid_size, 4);
        assert_eq!(grid.total_threads(), 1024);

        let grid = LaunchGrid::for_threads(0, 64).unwrap();
        assert_eq!(grid.grid_size, 1);
    }

    #[test]
    fn test_launch_grid_rejects_zero_dimensions() {
        assert!(matches!(
            LaunchGrid::new(0, 32),
            Err(PhiloxError::InvalidConfig(_))
        ));
        assert!(matches!(
            LaunchGrid::for_threads(10, 0),
            Err(PhiloxError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_launch_grid_rejects_oversized_grid() {
        assert!(LaunchGrid::for_threads(u64::MAX, 1).is_err());
    }

    #[test]
    fn test_for_each_thread_visits_every_thread_once() {
        let grid = LaunchGrid::new(7, 33).unwrap();
        let count = AtomicU64::new(0);
        let sum = AtomicU64::new(0);

        grid.for_each_thread(|t| {
            count.fetch_add(1, Ordering::Relaxed);
            sum.fetch_add(t.global_id(), Ordering::Relaxed);
        });

        let n = grid.total_threads();
        assert_eq!(count.load(Ordering::Relaxed), n);
        assert_eq!(sum.load(Ordering::Relaxed), n * (n - 1) / 2);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(Grid::new(FillConfig::new(1).with_block_size(0)).is_err());
        assert!(Grid::new(FillConfig::new(1).with_blocks_per_thread(0)).is_err());
    }

    #[test]
    fn test_fill_u32_matches_per_thread_engines() {
        let grid = Grid::new(
            FillConfig::new(42)
                .with_base_subsequence(10)
                .with_block_size(8)
                .with_blocks_per_thread(2),
        )
        .unwrap();

        // 3 full threads and one partial chunk
        let mut out = vec![0u32; 3 * 8 + 5];
        let launch = grid.fill_u32(&mut out).unwrap();
        assert_eq!(launch, LaunchGrid::new(1, 8).unwrap());

        for (t, chunk) in out.chunks(8).enumerate() {
            let mut engine =
                PhiloxVector::<Philox4x32x10Params, ArrayBackend>::new(42, 10 + t as u64, 0);
            let mut expected = engine.next_vector().to_vec();
            expected.extend_from_slice(&engine.next_vector());
            assert_eq!(chunk, &expected[..chunk.len()], "thread {}", t);
        }
    }

    #[test]
    fn test_parallel_and_sequential_fill_agree() {
        let config = FillConfig::new(9).with_block_size(16);
        let parallel = Grid::new(config.clone().with_parallel_threshold(0)).unwrap();
        let sequential = Grid::new(config.with_parallel_threshold(usize::MAX)).unwrap();

        let mut a = vec![0u32; 4096];
        let mut b = vec![0u32; 4096];
        parallel.fill_u32(&mut a).unwrap();
        sequential.fill_u32(&mut b).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_fill_uniform_in_range_and_backend_independent() {
        let config = FillConfig::new(1234).with_block_size(32);
        let array = Grid::new(config.clone()).unwrap();
        let native = PhiloxGrid::<Philox4x32x10Params, NativeVectorBackend>::new(config).unwrap();

        let mut a = vec![0.0f64; 1001];
        let mut b = vec![0.0f64; 1001];
        array.fill_uniform(&mut a).unwrap();
        native.fill_uniform(&mut b).unwrap();

        assert_eq!(a, b);
        assert!(a.iter().all(|u| (0.0..1.0).contains(u)));
    }
}
