//! Integration tests for one-engine-per-thread grid fills.

use ringkernel_philox::prelude::*;

type Grid = PhiloxGrid<Philox4x32x10Params, DefaultBackend>;

/// Test that every logical thread's chunk is its own engine's stream.
#[test]
fn test_grid_chunks_are_thread_streams() {
    let config = FillConfig::new(42)
        .with_base_subsequence(12345)
        .with_offset(6789)
        .with_block_size(64)
        .with_blocks_per_thread(4);
    let grid = Grid::new(config.clone()).unwrap();

    let mut out = vec![0u32; 100_000];
    let launch = grid.fill_u32(&mut out).unwrap();
    assert!(launch.total_threads() * 16 >= out.len() as u64);

    // Thread 0 starts with the reference block for (42, 12345, 6789)
    assert_eq!(
        &out[..4],
        &[0xECD4_6C71, 0x2204_C975, 0xB3EF_C52E, 0x979A_7AC9]
    );

    for (t, chunk) in out.chunks(16).enumerate().step_by(97) {
        let mut engine = Philox4x32x10Vector::from_config(&config.engine_for(t as u64));
        let expected: Vec<u32> = (0..4).flat_map(|_| engine.next_vector()).collect();
        assert_eq!(chunk, &expected[..chunk.len()], "thread {}", t);
    }
}

/// Test that results do not depend on launch shape scheduling.
#[test]
fn test_grid_fill_is_deterministic() {
    let grid = Grid::new(FillConfig::new(7).with_parallel_threshold(1)).unwrap();

    let mut a = vec![0.0f32; 50_000];
    let mut b = vec![0.0f32; 50_000];
    grid.fill_uniform(&mut a).unwrap();
    grid.fill_uniform(&mut b).unwrap();

    assert_eq!(a, b);
    assert!(a.iter().all(|u| (0.0..1.0).contains(u)));
}

/// Test that a block size change keeps the per-thread streams.
#[test]
fn test_block_size_does_not_change_output() {
    let small = Grid::new(FillConfig::new(3).with_block_size(32)).unwrap();
    let large = Grid::new(FillConfig::new(3).with_block_size(512)).unwrap();

    let mut a = vec![0u32; 10_000];
    let mut b = vec![0u32; 10_000];
    small.fill_u32(&mut a).unwrap();
    large.fill_u32(&mut b).unwrap();

    assert_eq!(a, b);
}

/// Test an empty output buffer.
#[test]
fn test_empty_fill() {
    let grid = Grid::new(FillConfig::new(1)).unwrap();
    let mut out: Vec<u32> = Vec::new();
    let launch = grid.fill_u32(&mut out).unwrap();
    assert_eq!(launch.grid_size, 1);
}

/// Test that invalid fill configurations are rejected.
#[test]
fn test_invalid_fill_config() {
    let err = Grid::new(FillConfig::new(1).with_block_size(0)).unwrap_err();
    assert!(matches!(err, PhiloxError::InvalidConfig(_)));
    assert!(err.to_string().starts_with("Invalid configuration"));
}

/// Test that logical threads drawing independently see distinct streams.
#[test]
fn test_for_each_thread_streams_are_distinct() {
    use std::sync::Mutex;

    let grid = LaunchGrid::new(16, 64).unwrap();
    let seen = Mutex::new(Vec::new());

    grid.for_each_thread(|t| {
        let mut rng = Philox4x32x10Vector::new(5, t.subsequence(0), 0);
        let block = rng.next_vector();
        seen.lock().unwrap().push((t.global_id(), block));
    });

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen.len(), 1024);
    for (i, (id, block)) in seen.iter().enumerate() {
        assert_eq!(*id, i as u64);
        assert_eq!(*block, Philox4x32x10Stateless::new().generate_at(5, i as u64, 0));
    }
}
