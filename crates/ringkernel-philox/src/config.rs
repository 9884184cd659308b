//! Configuration for engines and grid fills.

/// Engine identity: which seed, which stream, and where in the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    /// Generator key.
    pub seed: u64,
    /// Independent stream selector (counter words 2-3).
    pub subsequence: u64,
    /// Starting position within the stream (counter words 0-1).
    ///
    /// Counted in words by the single-word engine and in blocks by the
    /// vector engine.
    pub offset: u64,
}

impl EngineConfig {
    /// Configuration for `seed` at the start of subsequence 0.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Set the subsequence.
    pub fn with_subsequence(mut self, subsequence: u64) -> Self {
        self.subsequence = subsequence;
        self
    }

    /// Set the starting offset.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }
}

/// Configuration for filling buffers with one engine per logical thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillConfig {
    /// Generator key shared by all threads.
    pub seed: u64,
    /// Subsequence of logical thread 0; thread `t` uses `base_subsequence + t`.
    pub base_subsequence: u64,
    /// Block offset applied to every thread's engine.
    pub offset: u64,
    /// Logical threads per block.
    pub block_size: u32,
    /// Blocks of output each logical thread produces.
    pub blocks_per_thread: u32,
    /// Below this many logical threads the fill runs sequentially.
    pub parallel_threshold: usize,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            base_subsequence: 0,
            offset: 0,
            block_size: 256,
            blocks_per_thread: 1,
            parallel_threshold: 1024,
        }
    }
}

impl FillConfig {
    /// Fill configuration for `seed` with default launch shape.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Set the subsequence of logical thread 0.
    pub fn with_base_subsequence(mut self, subsequence: u64) -> Self {
        self.base_subsequence = subsequence;
        self
    }

    /// Set the block offset applied to every engine.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set logical threads per block.
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set output blocks per logical thread.
    pub fn with_blocks_per_thread(mut self, blocks: u32) -> Self {
        self.blocks_per_thread = blocks;
        self
    }

    /// Set the sequential/parallel cut-over.
    pub fn with_parallel_threshold(mut self, threads: usize) -> Self {
        self.parallel_threshold = threads;
        self
    }

    /// Engine configuration of logical thread `global_id`.
    pub fn engine_for(&self, global_id: u64) -> EngineConfig {
        EngineConfig::new(self.seed)
            .with_subsequence(self.base_subsequence.wrapping_add(global_id))
            .with_offset(self.offset)
    }
}
