//! Split a flat range of brute-force work across a fixed group of ranks and
//! sum the per-rank counts on rank 0 with a binary-tree reduction.
//!
//! Each rank evaluates its own [`WorkRange`] on local rayon threads, then all
//! ranks enter [`tree_reduce`] together. Ranks talk through a [`Transport`]:
//! in-process threads ([`local_group`]) or MPI (feature `mpi`).

use std::time::{Duration, Instant};

use tracing::info;

pub mod circuit;
pub mod error;
pub mod evaluate;
pub mod group;
pub mod launch;
pub mod monte_carlo;
pub mod partition;
pub mod transport;
pub mod tree;

pub use error::{Error, Result};
pub use evaluate::{evaluate_range, Evaluator};
pub use group::Group;
pub use partition::{partition, WorkRange};
pub use transport::{local_group, LocalTransport, Transport};
#[cfg(feature = "mpi")]
pub use transport::MpiTransport;
pub use tree::{role_for, rounds, tree_reduce, Role};

/// This struct helps manage compute on a given rank and across ranks
pub struct Balancer<C> {
    transport: C,
    group: Group,
    /// Size of the rayon pool evaluating this rank's range.
    pub workers: usize,
}

/// What rank 0 reports once the reduction completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub value: u64,
    /// Wall-clock time on rank 0 from the start of local work to holding
    /// the total.
    pub elapsed: Duration,
}

impl<C> Balancer<C>
where
    C: Transport<u64>,
{
    /// Constructs a new `Balancer` for one rank of `group`.
    pub fn new(group: Group, transport: C, verbose: bool) -> Self {
        let workers = rayon::current_num_threads();

        if verbose && group.is_coordinator() {
            println!("--------- Balancer Activated ---------");
            println!("            Ranks : {}", group.size());
            println!(" Workers (rank 0) : {workers} ");
            println!("--------------------------------------");
        }
        Balancer {
            transport,
            group,
            workers,
        }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Evaluates this rank's share of `[0, total)` and returns the local count.
    pub fn work_local<E>(&self, total: u64, evaluator: &E) -> u64
    where
        E: Evaluator + ?Sized,
    {
        let range = self.group.work_range(total);
        let local = evaluate_range(range, evaluator);
        info!(
            rank = self.group.rank(),
            start = range.start,
            end = range.end,
            local,
            "local work done"
        );
        local
    }

    /// Sums `local` over all ranks. Only rank 0 gets `Some(total)`.
    pub fn collect(&self, local: u64) -> Result<Option<u64>> {
        let total = tree_reduce(&self.group, local, &self.transport)?;
        if let Some(total) = total {
            info!(ranks = self.group.size(), total, "reduction complete");
        }
        Ok(total)
    }

    /// Works on this rank's range and reduces. Returns the outcome on rank 0.
    pub fn run<E>(&self, total: u64, evaluator: &E) -> Result<Option<Outcome>>
    where
        E: Evaluator + ?Sized,
    {
        let start = Instant::now();
        let local = self.work_local(total, evaluator);
        let value = self.collect(local)?;
        Ok(value.map(|value| Outcome {
            value,
            elapsed: start.elapsed(),
        }))
    }
}
