//! Counts the inputs that satisfy a fixed 16-input circuit.
//!
//! ```bash
//! circuit_sat --ranks 4 --print-solutions
//! mpirun -n 4 circuit_sat --transport mpi
//! ```

use clap::Parser;

use treereduce::circuit::{CircuitSat, ASSIGNMENTS};
use treereduce::launch::{init_logging, launch, GroupArgs};

/// Brute-force circuit satisfiability across a group of ranks.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(flatten)]
    group: GroupArgs,

    /// Print every satisfying input, prefixed by the rank that found it.
    #[arg(long)]
    print_solutions: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let outcome = launch(&args.group, ASSIGNMENTS, |group| {
        CircuitSat::new(group.rank(), args.print_solutions)
    })?;

    if let Some(outcome) = outcome {
        println!("Satisfying inputs: {}", outcome.value);
        println!(
            "Main process finished in time {:.6} secs.",
            outcome.elapsed.as_secs_f64()
        );
    }
    Ok(())
}
