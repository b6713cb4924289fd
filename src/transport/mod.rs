//! Rank-addressed, blocking point-to-point messaging.
//!
//! The tree reduction only needs `send` and `receive` between two ranks of a
//! fixed group. [`local`] connects the ranks of one process with rendezvous
//! channels; [`mpi`] (feature `mpi`) uses the MPI world communicator.

use crate::error::Result;

pub mod local;
#[cfg(feature = "mpi")]
pub mod mpi;

pub use local::{local_group, LocalTransport};
#[cfg(feature = "mpi")]
pub use self::mpi::MpiTransport;

/// Message tag, same width as an MPI tag.
pub type Tag = i32;

/// The logical channel carrying partial results up the reduction tree.
pub const REDUCE_TAG: Tag = 0;

/// Blocking point-to-point messaging within one group.
///
/// `send` returns once the value has been handed over, and `receive` blocks
/// until the value from `source` arrives. Both are addressed by rank.
pub trait Transport<T> {
    fn send(&self, dest: usize, tag: Tag, value: T) -> Result<()>;

    fn receive(&self, source: usize, tag: Tag) -> Result<T>;
}

impl<T, C> Transport<T> for &C
where
    C: Transport<T> + ?Sized,
{
    fn send(&self, dest: usize, tag: Tag, value: T) -> Result<()> {
        (**self).send(dest, tag, value)
    }

    fn receive(&self, source: usize, tag: Tag) -> Result<T> {
        (**self).receive(source, tag)
    }
}
