//! CUDA implementation of the Philox fills.

use std::marker::PhantomData;
use std::sync::Arc;

use cudarc::driver::{CudaContext, CudaFunction, CudaSlice, CudaStream, DeviceRepr, PushKernelArg};
use cudarc::nvrtc::compile_ptx;
use tracing::{debug, info};

use super::{
    KernelLaunch, FILL_U32_KERNEL, FILL_UNIFORM_F32_KERNEL, FILL_UNIFORM_F64_KERNEL,
    PHILOX_KERNEL_SOURCE,
};
use crate::config::FillConfig;
use crate::engine::BLOCK_WORDS;
use crate::params::{Philox4x32x10Params, PhiloxParams};
use crate::{PhiloxError, Result};

fn gpu_err(e: impl std::fmt::Display) -> PhiloxError {
    PhiloxError::Gpu(e.to_string())
}

/// Device-side Philox fills, one vector engine per CUDA thread.
///
/// Output is identical to [`PhiloxGrid`](crate::grid::PhiloxGrid) with the
/// same [`FillConfig`].
pub struct GpuPhiloxVector<P: PhiloxParams = Philox4x32x10Params> {
    context: Arc<CudaContext>,
    stream: Arc<CudaStream>,
    fill_u32: CudaFunction,
    fill_f32: CudaFunction,
    fill_f64: CudaFunction,
    config: FillConfig,
    _params: PhantomData<P>,
}

impl<P: PhiloxParams> GpuPhiloxVector<P> {
    /// Compile the kernels on device `device_ordinal` with seed 0.
    pub fn new(device_ordinal: usize) -> Result<Self> {
        Self::with_config(device_ordinal, FillConfig::default())
    }

    /// Compile the kernels on device `device_ordinal`.
    pub fn with_config(device_ordinal: usize, config: FillConfig) -> Result<Self> {
        P::descriptor().validate()?;

        let context = CudaContext::new(device_ordinal).map_err(gpu_err)?;
        let stream = context.default_stream();

        let ptx = compile_ptx(PHILOX_KERNEL_SOURCE).map_err(gpu_err)?;
        let module = context.load_module(ptx).map_err(gpu_err)?;

        let fill_u32 = module.load_function(FILL_U32_KERNEL).map_err(gpu_err)?;
        let fill_f32 = module
            .load_function(FILL_UNIFORM_F32_KERNEL)
            .map_err(gpu_err)?;
        let fill_f64 = module
            .load_function(FILL_UNIFORM_F64_KERNEL)
            .map_err(gpu_err)?;

        info!(
            device = device_ordinal,
            params = %P::descriptor(),
            "Compiled Philox kernels"
        );

        Ok(Self {
            context,
            stream,
            fill_u32,
            fill_f32,
            fill_f64,
            config,
            _params: PhantomData,
        })
    }

    /// Fill configuration used by every launch.
    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Replace the fill configuration.
    pub fn set_config(&mut self, config: FillConfig) {
        self.config = config;
    }

    /// Fill a device buffer with raw words.
    pub fn fill_u32(&self, output: &mut CudaSlice<u32>) -> Result<()> {
        let len = output.len();
        self.launch(&self.fill_u32, output, len, BLOCK_WORDS)
    }

    /// Fill a device buffer with uniform `f32` values in `[0, 1)`.
    pub fn fill_uniform_f32(&self, output: &mut CudaSlice<f32>) -> Result<()> {
        let len = output.len();
        self.launch(&self.fill_f32, output, len, BLOCK_WORDS)
    }

    /// Fill a device buffer with uniform `f64` values in `[0, 1)`.
    pub fn fill_uniform_f64(&self, output: &mut CudaSlice<f64>) -> Result<()> {
        let len = output.len();
        self.launch(&self.fill_f64, output, len, BLOCK_WORDS / 2)
    }

    /// Generate `n` raw words and copy them to the host.
    pub fn generate_u32(&self, n: usize) -> Result<Vec<u32>> {
        let mut output = self.alloc::<u32>(n)?;
        self.fill_u32(&mut output)?;
        self.dtoh(&output)
    }

    /// Generate `n` uniform `f32` values and copy them to the host.
    pub fn generate_uniform_f32(&self, n: usize) -> Result<Vec<f32>> {
        let mut output = self.alloc::<f32>(n)?;
        self.fill_uniform_f32(&mut output)?;
        self.dtoh(&output)
    }

    /// Generate `n` uniform `f64` values and copy them to the host.
    pub fn generate_uniform_f64(&self, n: usize) -> Result<Vec<f64>> {
        let mut output = self.alloc::<f64>(n)?;
        self.fill_uniform_f64(&mut output)?;
        self.dtoh(&output)
    }

    /// Allocate a device buffer.
    pub fn alloc<T: DeviceRepr>(&self, n: usize) -> Result<CudaSlice<T>> {
        // SAFETY: every fill kernel writes all `n` elements before the buffer
        // is read back.
        unsafe { self.stream.alloc::<T>(n).map_err(gpu_err) }
    }

    /// Copy a device buffer to the host.
    pub fn dtoh<T: DeviceRepr + Default + Clone>(&self, slice: &CudaSlice<T>) -> Result<Vec<T>> {
        let mut host = vec![T::default(); slice.len()];
        self.stream.memcpy_dtoh(slice, &mut host).map_err(gpu_err)?;
        Ok(host)
    }

    /// Synchronize the context.
    pub fn synchronize(&self) -> Result<()> {
        self.context.synchronize().map_err(gpu_err)
    }

    /// Get the underlying context.
    pub fn context(&self) -> &Arc<CudaContext> {
        &self.context
    }

    /// Get the stream.
    pub fn stream(&self) -> &Arc<CudaStream> {
        &self.stream
    }

    fn launch<T: DeviceRepr>(
        &self,
        function: &CudaFunction,
        output: &mut CudaSlice<T>,
        len: usize,
        values_per_block: usize,
    ) -> Result<()> {
        let launch = KernelLaunch::new(&self.config, P::descriptor(), len, values_per_block)?;
        if len == 0 {
            return Ok(());
        }

        debug!(
            len,
            grid_size = launch.grid.grid_size,
            block_size = launch.grid.block_size,
            rounds = launch.rounds,
            "Launching Philox kernel"
        );

        // SAFETY: argument order and types match the kernel signatures in
        // PHILOX_KERNEL_SOURCE, and every write is bounded by `len`.
        unsafe {
            self.stream
                .launch_builder(function)
                .arg(output)
                .arg(&launch.len)
                .arg(&launch.seed_lo)
                .arg(&launch.seed_hi)
                .arg(&launch.base_subsequence)
                .arg(&launch.offset)
                .arg(&launch.blocks_per_thread)
                .arg(&launch.rounds)
                .launch(cudarc::driver::LaunchConfig {
                    grid_dim: (launch.grid.grid_size, 1, 1),
                    block_dim: (launch.grid.block_size, 1, 1),
                    shared_mem_bytes: 0,
                })
                .map_err(gpu_err)?;
        }

        Ok(())
    }
}

/// Check if CUDA is available.
pub fn is_cuda_available() -> bool {
    std::panic::catch_unwind(|| {
        cudarc::driver::CudaContext::device_count()
            .map(|c| c > 0)
            .unwrap_or(false)
    })
    .unwrap_or(false)
}
