//! Command-line plumbing shared by the binaries: group options, logging and
//! running a job on the chosen transport.

use std::thread;

use clap::{Args, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};
use crate::evaluate::Evaluator;
use crate::group::Group;
use crate::transport::local_group;
use crate::{Balancer, Outcome};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportKind {
    /// One thread per rank inside this process.
    Threads,
    /// One process per rank, started by `mpirun`.
    Mpi,
}

/// Options describing the group of ranks.
#[derive(Args, Debug, Clone)]
pub struct GroupArgs {
    /// How ranks exchange partial results.
    #[arg(long, value_enum, default_value_t = TransportKind::Threads)]
    pub transport: TransportKind,

    /// Number of ranks for the threads transport (default: available
    /// parallelism). Ignored under MPI.
    #[arg(long)]
    pub ranks: Option<usize>,

    /// Do not print the banner.
    #[arg(long, short)]
    pub quiet: bool,
}

/// Installs a stderr fmt subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs `total` units of work on the group described by `args`.
///
/// `make_evaluator` is called once per rank. Returns `Some` on the process
/// holding rank 0.
pub fn launch<E, F>(args: &GroupArgs, total: u64, make_evaluator: F) -> Result<Option<Outcome>>
where
    E: Evaluator,
    F: Fn(&Group) -> E + Sync,
{
    match args.transport {
        TransportKind::Threads => {
            let ranks = args.ranks.unwrap_or_else(|| {
                thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            });
            run_threads(ranks, !args.quiet, total, &make_evaluator)
        }
        TransportKind::Mpi => run_mpi(!args.quiet, total, &make_evaluator),
    }
}

/// Runs a whole group in this process, one scoped thread per rank.
pub fn run_threads<E, F>(
    ranks: usize,
    verbose: bool,
    total: u64,
    make_evaluator: &F,
) -> Result<Option<Outcome>>
where
    E: Evaluator,
    F: Fn(&Group) -> E + Sync,
{
    let members = local_group::<u64>(ranks)?;

    let results: Vec<Result<Option<Outcome>>> = thread::scope(|s| {
        let handles: Vec<_> = members
            .into_iter()
            .map(|(group, transport)| {
                s.spawn(move || {
                    let balancer = Balancer::new(group, transport, verbose);
                    let evaluator = make_evaluator(&group);
                    balancer.run(total, &evaluator)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let mut outcome = None;
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(Some(o)) => outcome = Some(o),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    // A failed rank makes its peers see transport failures; report the cause.
    if let Some(err) = errors
        .into_iter()
        .min_by_key(|e| matches!(e, Error::Transport { .. }))
    {
        return Err(err);
    }
    Ok(outcome)
}

#[cfg(feature = "mpi")]
fn run_mpi<E, F>(verbose: bool, total: u64, make_evaluator: &F) -> Result<Option<Outcome>>
where
    E: Evaluator,
    F: Fn(&Group) -> E + Sync,
{
    let (group, transport) = crate::transport::MpiTransport::initialize()?;
    let evaluator = make_evaluator(&group);
    Balancer::new(group, transport, verbose).run(total, &evaluator)
}

#[cfg(not(feature = "mpi"))]
fn run_mpi<E, F>(_verbose: bool, _total: u64, _make_evaluator: &F) -> Result<Option<Outcome>>
where
    E: Evaluator,
    F: Fn(&Group) -> E + Sync,
{
    Err(Error::config(
        "the mpi transport needs a build with the `mpi` feature",
    ))
}
