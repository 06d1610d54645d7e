use std::hint::black_box;
use std::time::Instant;

use gateflow_kernel::{CountRange, GridSize, SimConfig, World};

fn config_for(cells: u32) -> SimConfig {
    SimConfig {
        grid: GridSize::new(cells, cells),
        gates: CountRange::new(cells * 4, cells * 8),
        ..SimConfig::default()
    }
}

fn bench_generate(cells: u32, iterations: usize) {
    let config = config_for(cells);

    let start = Instant::now();
    for i in 0..iterations {
        let _ = black_box(World::generate(config.clone(), black_box(i as i64 + 1)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  generate ({cells}x{cells}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_ticks(cells: u32, ticks: usize) {
    let Ok(mut world) = World::generate(config_for(cells), "bench") else {
        println!("  invalid config for {cells}x{cells}");
        return;
    };

    let start = Instant::now();
    for _ in 0..ticks {
        black_box(world.tick());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / ticks as u32;
    println!(
        "  tick ({cells}x{cells}, {} tokens, {ticks} ticks): {per_iter:?}/tick, total {elapsed:?}",
        world.tokens().len()
    );
}

fn bench_full_run(cells: u32, max_steps: u64) {
    let Ok(mut world) = World::generate(config_for(cells), "bench") else {
        return;
    };

    let start = Instant::now();
    let steps = world.run(black_box(max_steps));
    let elapsed = start.elapsed();
    println!("  run to finish ({cells}x{cells}): {steps} steps in {elapsed:?}, phase {:?}", world.phase());
}

fn main() {
    println!("=== Tick Engine Benchmarks ===\n");

    println!("World generation:");
    bench_generate(20, 1000);
    bench_generate(100, 100);

    println!("\nTicking:");
    bench_ticks(20, 10000);
    bench_ticks(100, 1000);

    println!("\nFull run (tick + drain):");
    bench_full_run(20, 100_000);
    bench_full_run(100, 100_000);

    println!("\n=== Done ===");
}
