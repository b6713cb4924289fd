//! Estimates π by Monte Carlo sampling across a group of ranks.
//!
//! ```bash
//! pi --ranks 8 --batches 1000 --batch-size 10000
//! mpirun -n 8 pi --transport mpi --seed 42
//! ```

use anyhow::Context;
use clap::Parser;

use treereduce::launch::{init_logging, launch, GroupArgs};
use treereduce::monte_carlo::{estimate_pi, CircleSampler};

/// Monte Carlo π with seeded, rank-independent batches.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(flatten)]
    group: GroupArgs,

    /// Number of batches, the units of work split across ranks.
    #[arg(long, default_value_t = 1000)]
    batches: u64,

    /// Tosses per batch.
    #[arg(long, default_value_t = 10_000)]
    batch_size: u64,

    /// Seed shared by all ranks.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let sampler = CircleSampler::new(args.seed, args.batch_size)?;
    let tosses = sampler
        .tosses(args.batches)
        .context("invalid batch layout")?;

    let outcome = launch(&args.group, args.batches, |_| sampler.clone())?;

    if let Some(outcome) = outcome {
        println!("Tosses: {tosses}");
        println!("In circle: {}", outcome.value);
        println!("PI: {}", estimate_pi(outcome.value, tosses));
        println!(
            "Main process finished in time {:.6} secs.",
            outcome.elapsed.as_secs_f64()
        );
    }
    Ok(())
}
