use anyhow::Result;
use num_bigint::BigInt;
use quadlife::{macro_step_generations, Universe};

/// R-pentomino offsets, placed relative to the middle of the field.
const R_PENTOMINO: [(u64, u64); 5] = [(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut universe = Universe::new();
    let mut root = universe.empty(7)?;
    let mid = 1 << 6;
    for (x, y) in R_PENTOMINO {
        root = universe.set_cell(root, mid + x, mid + y, true)?;
    }

    let mut generation = BigInt::ZERO;
    let timer = std::time::Instant::now();
    for i in 0..24 {
        // two expansions guarantee the macro-step cannot clip the pattern
        root = universe.expand(root)?;
        root = universe.expand(root)?;
        let level = universe.node(root).level;
        root = universe.step(root)?;
        generation += macro_step_generations(level);

        if i % 4 == 3 {
            universe.collect_garbage(&[root]);
        }
    }

    println!("generation: {generation}");
    println!("population: {}", universe.node(root).population);
    println!("time: {:?}", timer.elapsed());
    println!("{}", universe.statistics());
    Ok(())
}
