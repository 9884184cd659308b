//! Monte Carlo Pi Example
//!
//! Estimates pi with one Philox stream per logical thread, then shows that
//! skipping ahead reproduces a stream position without generating the
//! words in between.
//!
//! Run with `RUST_LOG=debug` to see the grid launch.

use ringkernel_philox::prelude::*;
use tracing_subscriber::EnvFilter;

const SAMPLES: usize = 4_000_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Philox Monte Carlo Pi\n");

    // Coordinates as interleaved (x, y) pairs
    let grid = PhiloxGrid::<Philox4x32x10Params, DefaultBackend>::new(
        FillConfig::new(2024).with_blocks_per_thread(16),
    )?;
    let mut coords = vec![0.0f64; SAMPLES * 2];
    let launch = grid.fill_uniform(&mut coords)?;

    let inside = coords
        .chunks_exact(2)
        .filter(|p| p[0] * p[0] + p[1] * p[1] < 1.0)
        .count();
    let pi = 4.0 * inside as f64 / SAMPLES as f64;

    println!(
        "Grid: {} blocks x {} threads",
        launch.grid_size, launch.block_size
    );
    println!("Estimate: {:.6} (error {:.2e})\n", pi, (pi - std::f64::consts::PI).abs());

    // Jump a million words into stream 7
    let mut stepped = Philox4x32x10::new(2024, 7, 0);
    for _ in 0..1_000_000 {
        stepped.next_u32();
    }
    let mut skipped = Philox4x32x10::new(2024, 7, 1_000_000);

    println!("Word 1,000,000 of stream 7:");
    println!("  stepped: {:#010x}", stepped.next_u32());
    println!("  skipped: {:#010x}", skipped.next_u32());

    Ok(())
}
