//! Philox on the GPU.
//!
//! The kernels use the same round function, key schedule and counter layout
//! as the host engines: logical thread `t` runs a vector engine on
//! subsequence `base_subsequence + t` and writes `4 * blocks_per_thread`
//! consecutive words. A device fill therefore matches
//! [`PhiloxGrid`](crate::grid::PhiloxGrid) word for word.

#[cfg(feature = "cuda")]
mod cuda;

#[cfg(feature = "cuda")]
pub use cuda::*;

use crate::config::FillConfig;
use crate::engine::BLOCK_WORDS;
use crate::grid::LaunchGrid;
use crate::mulhilo::{high32, low32};
use crate::params::ParamsDescriptor;
use crate::{PhiloxError, Result};

/// Kernel writing raw words.
pub const FILL_U32_KERNEL: &str = "philox_fill_u32";
/// Kernel writing uniform `f32` values.
pub const FILL_UNIFORM_F32_KERNEL: &str = "philox_fill_uniform_f32";
/// Kernel writing uniform `f64` values.
pub const FILL_UNIFORM_F64_KERNEL: &str = "philox_fill_uniform_f64";

/// CUDA kernel source for Philox-4x32.
///
/// The round count is a kernel argument, so one module serves every
/// parameter set.
pub const PHILOX_KERNEL_SOURCE: &str = r#"
#define PHILOX_M4X32_0 0xD2511F53u
#define PHILOX_M4X32_1 0xCD9E8D57u
#define PHILOX_W32_0 0x9E3779B9u
#define PHILOX_W32_1 0xBB67AE85u

__device__ __forceinline__ uint4 philox_single_round(uint4 ctr, uint2 key) {
    unsigned int hi0 = __umulhi(PHILOX_M4X32_0, ctr.x);
    unsigned int lo0 = PHILOX_M4X32_0 * ctr.x;
    unsigned int hi1 = __umulhi(PHILOX_M4X32_1, ctr.z);
    unsigned int lo1 = PHILOX_M4X32_1 * ctr.z;
    return make_uint4(hi1 ^ ctr.y ^ key.x, lo1, hi0 ^ ctr.w ^ key.y, lo0);
}

__device__ __forceinline__ uint2 philox_bump_key(uint2 key) {
    return make_uint2(key.x + PHILOX_W32_0, key.y + PHILOX_W32_1);
}

__device__ uint4 philox_n_rounds(uint4 ctr, uint2 key, unsigned int rounds) {
    ctr = philox_single_round(ctr, key);
    for (unsigned int r = 1; r < rounds; ++r) {
        key = philox_bump_key(key);
        ctr = philox_single_round(ctr, key);
    }
    return ctr;
}

__device__ __forceinline__ uint4 philox_advance(uint4 ctr) {
    if (++ctr.x == 0u) {
        if (++ctr.y == 0u) {
            if (++ctr.z == 0u) {
                ++ctr.w;
            }
        }
    }
    return ctr;
}

// Counter for block `offset` of subsequence `base + gid`.
__device__ uint4 philox_thread_counter(
    unsigned long long base_subsequence,
    unsigned long long offset
) {
    unsigned long long gid =
        (unsigned long long)blockIdx.x * blockDim.x + threadIdx.x;
    unsigned long long sub = base_subsequence + gid;
    return make_uint4(
        (unsigned int)offset, (unsigned int)(offset >> 32),
        (unsigned int)sub, (unsigned int)(sub >> 32));
}

__device__ __forceinline__ unsigned long long philox_thread_base(unsigned int per_thread) {
    return ((unsigned long long)blockIdx.x * blockDim.x + threadIdx.x) * per_thread;
}

extern "C" __global__ void philox_fill_u32(
    unsigned int* output,
    unsigned long long n,
    unsigned int seed_lo,
    unsigned int seed_hi,
    unsigned long long base_subsequence,
    unsigned long long offset,
    unsigned int blocks_per_thread,
    unsigned int rounds
) {
    unsigned long long base = philox_thread_base(4u * blocks_per_thread);
    if (base >= n) return;

    uint4 ctr = philox_thread_counter(base_subsequence, offset);
    uint2 key = make_uint2(seed_lo, seed_hi);

    for (unsigned int b = 0; b < blocks_per_thread; ++b) {
        uint4 out = philox_n_rounds(ctr, key, rounds);
        ctr = philox_advance(ctr);

        unsigned long long i = base + 4ull * b;
        if (i < n) output[i] = out.x;
        if (i + 1 < n) output[i + 1] = out.y;
        if (i + 2 < n) output[i + 2] = out.z;
        if (i + 3 < n) output[i + 3] = out.w;
    }
}

__device__ __forceinline__ float philox_u32_to_f32(unsigned int x) {
    return (float)(x >> 8) * (1.0f / 16777216.0f);
}

__device__ __forceinline__ double philox_u32x2_to_f64(unsigned int hi, unsigned int lo) {
    unsigned long long combined = ((unsigned long long)hi << 32) | lo;
    return (double)(combined >> 11) * (1.0 / 9007199254740992.0);
}

extern "C" __global__ void philox_fill_uniform_f32(
    float* output,
    unsigned long long n,
    unsigned int seed_lo,
    unsigned int seed_hi,
    unsigned long long base_subsequence,
    unsigned long long offset,
    unsigned int blocks_per_thread,
    unsigned int rounds
) {
    unsigned long long base = philox_thread_base(4u * blocks_per_thread);
    if (base >= n) return;

    uint4 ctr = philox_thread_counter(base_subsequence, offset);
    uint2 key = make_uint2(seed_lo, seed_hi);

    for (unsigned int b = 0; b < blocks_per_thread; ++b) {
        uint4 out = philox_n_rounds(ctr, key, rounds);
        ctr = philox_advance(ctr);

        unsigned long long i = base + 4ull * b;
        if (i < n) output[i] = philox_u32_to_f32(out.x);
        if (i + 1 < n) output[i + 1] = philox_u32_to_f32(out.y);
        if (i + 2 < n) output[i + 2] = philox_u32_to_f32(out.z);
        if (i + 3 < n) output[i + 3] = philox_u32_to_f32(out.w);
    }
}

extern "C" __global__ void philox_fill_uniform_f64(
    double* output,
    unsigned long long n,
    unsigned int seed_lo,
    unsigned int seed_hi,
    unsigned long long base_subsequence,
    unsigned long long offset,
    unsigned int blocks_per_thread,
    unsigned int rounds
) {
    unsigned long long base = philox_thread_base(2u * blocks_per_thread);
    if (base >= n) return;

    uint4 ctr = philox_thread_counter(base_subsequence, offset);
    uint2 key = make_uint2(seed_lo, seed_hi);

    for (unsigned int b = 0; b < blocks_per_thread; ++b) {
        uint4 out = philox_n_rounds(ctr, key, rounds);
        ctr = philox_advance(ctr);

        unsigned long long i = base + 2ull * b;
        if (i < n) output[i] = philox_u32x2_to_f64(out.x, out.y);
        if (i + 1 < n) output[i + 1] = philox_u32x2_to_f64(out.z, out.w);
    }
}
"#;

/// Everything a fill kernel needs besides the output pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelLaunch {
    /// Launch shape.
    pub grid: LaunchGrid,
    /// Number of output values.
    pub len: u64,
    /// Low word of the seed (key word 0).
    pub seed_lo: u32,
    /// High word of the seed (key word 1).
    pub seed_hi: u32,
    /// Subsequence of logical thread 0.
    pub base_subsequence: u64,
    /// Block offset applied to every thread.
    pub offset: u64,
    /// Blocks each thread produces.
    pub blocks_per_thread: u32,
    /// Rounds per block.
    pub rounds: u32,
}

impl KernelLaunch {
    /// Describe a fill of `len` values, `values_per_block` per engine block.
    pub fn new(
        config: &FillConfig,
        params: ParamsDescriptor,
        len: usize,
        values_per_block: usize,
    ) -> Result<Self> {
        params.validate()?;
        if params.counter_size != BLOCK_WORDS {
            return Err(PhiloxError::InvalidParameter(format!(
                "device kernels support a counter of {} words, got {}",
                BLOCK_WORDS, params.counter_size
            )));
        }
        if config.blocks_per_thread == 0 {
            return Err(PhiloxError::InvalidConfig(
                "each thread must produce at least one block".to_string(),
            ));
        }

        let per_thread = values_per_block * config.blocks_per_thread as usize;
        let threads = len.div_ceil(per_thread) as u64;
        let grid = LaunchGrid::for_threads(threads, config.block_size)?;

        Ok(Self {
            grid,
            len: len as u64,
            seed_lo: low32(config.seed),
            seed_hi: high32(config.seed),
            base_subsequence: config.base_subsequence,
            offset: config.offset,
            blocks_per_thread: config.blocks_per_thread,
            rounds: params.rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Philox4x32x10Params, PhiloxParams};

    #[test]
    fn test_kernel_source_uses_host_constants() {
        use crate::round::{PHILOX_M4X32_0, PHILOX_M4X32_1, PHILOX_W32_0, PHILOX_W32_1};

        for constant in [PHILOX_M4X32_0, PHILOX_M4X32_1, PHILOX_W32_0, PHILOX_W32_1] {
            let literal = format!("0x{:08X}u", constant);
            assert!(
                PHILOX_KERNEL_SOURCE.contains(&literal),
                "kernel source is missing {}",
                literal
            );
        }

        for kernel in [FILL_U32_KERNEL, FILL_UNIFORM_F32_KERNEL, FILL_UNIFORM_F64_KERNEL] {
            assert!(PHILOX_KERNEL_SOURCE.contains(kernel));
        }
    }

    #[test]
    fn test_kernel_launch_splits_seed_and_sizes_grid() {
        let config = FillConfig::new(0x1234_5678_9ABC_DEF0)
            .with_base_subsequence(7)
            .with_block_size(64)
            .with_blocks_per_thread(2);

        let launch =
            KernelLaunch::new(&config, Philox4x32x10Params::descriptor(), 1000, BLOCK_WORDS)
                .unwrap();

        assert_eq!(launch.seed_lo, 0x9ABC_DEF0);
        assert_eq!(launch.seed_hi, 0x1234_5678);
        assert_eq!(launch.rounds, 10);
        // 1000 words / 8 per thread = 125 threads = 2 blocks of 64
        assert_eq!(launch.grid, LaunchGrid::new(2, 64).unwrap());
    }

    #[test]
    fn test_kernel_launch_rejects_bad_params() {
        let config = FillConfig::new(1);
        assert!(matches!(
            KernelLaunch::new(&config, ParamsDescriptor::new(4, 32, 0), 16, 4),
            Err(PhiloxError::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelLaunch::new(&config, ParamsDescriptor::new(2, 32, 10), 16, 4),
            Err(PhiloxError::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelLaunch::new(
                &config.with_blocks_per_thread(0),
                Philox4x32x10Params::descriptor(),
                16,
                4
            ),
            Err(PhiloxError::InvalidConfig(_))
        ));
    }
}
