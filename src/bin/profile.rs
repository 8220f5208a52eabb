use std::time::{Duration, Instant};

use pixmaze::{config::GridConfig, generators::GenerationError};
use rand::Rng;

/// Generates mazes on the reference grid with random seeds and prints timing
/// and stack depth statistics.
fn main() -> std::io::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(100);

    let grid = GridConfig::default();
    let mut rng = rand::rng();
    let mut total = Duration::ZERO;
    let mut deepest = 0;
    let mut overflows = 0;

    for _ in 0..num_iters {
        let mut generator = grid.build_generator(rng.random());
        let started = Instant::now();
        match generator.generate(&mut ()) {
            Ok(report) => deepest = deepest.max(report.peak_depth),
            Err(GenerationError::StackOverflow { .. }) => overflows += 1,
        }
        total += started.elapsed();
    }

    println!(
        "{} mazes of {}x{}: {:.2?} total, {:.2?} per maze, deepest stack {}/{}, {} overflows",
        num_iters,
        grid.width,
        grid.height,
        total,
        total / num_iters.max(1) as u32,
        deepest,
        grid.stack_capacity,
        overflows
    );
    Ok(())
}
