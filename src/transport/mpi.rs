use mpi::environment::Universe;
use mpi::topology::{Communicator, Rank, SystemCommunicator};
use mpi::traits::*;

use super::{Tag, Transport};
use crate::error::{Error, Result};
use crate::group::Group;

/// Point-to-point messaging over the MPI world communicator.
pub struct MpiTransport {
    // This has a custom drop impl which calls MPI_FINALIZE so it needs to hang around
    #[allow(unused)]
    universe: Universe,
    world: SystemCommunicator,
}

impl MpiTransport {
    /// Initializes MPI and derives this process's [`Group`] from the world
    /// communicator.
    pub fn initialize() -> Result<(Group, Self)> {
        let universe = mpi::initialize()
            .ok_or_else(|| Error::config("MPI has already been initialized"))?;
        let world = universe.world();
        let group = Group::new(world.rank() as usize, world.size() as usize)?;
        Ok((group, MpiTransport { universe, world }))
    }

    fn peer(&self, rank: usize) -> Result<Rank> {
        Rank::try_from(rank)
            .ok()
            .filter(|&r| r < self.world.size())
            .ok_or_else(|| Error::Transport {
                rank: self.world.rank() as usize,
                peer: rank,
                reason: "no such rank".to_string(),
            })
    }
}

impl<T: Equivalence> Transport<T> for MpiTransport {
    fn send(&self, dest: usize, tag: Tag, value: T) -> Result<()> {
        let peer = self.peer(dest)?;
        // Synchronous mode: completes once the receive has been matched.
        self.world
            .process_at_rank(peer)
            .synchronous_send_with_tag(&value, tag);
        Ok(())
    }

    fn receive(&self, source: usize, tag: Tag) -> Result<T> {
        let peer = self.peer(source)?;
        let (value, _status) = self.world.process_at_rank(peer).receive_with_tag::<T>(tag);
        Ok(value)
    }
}
