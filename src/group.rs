use crate::error::{Error, Result};

/// A rank's view of the fixed set of cooperating workers.
///
/// Every rank knows the group size and its own rank. Rank 0 is the
/// coordinator and the only holder of reduced totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group {
    rank: usize,
    size: usize,
}

impl Group {
    /// Fails if `size` is zero or `rank` is not in `0..size`.
    pub fn new(rank: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::config("group size must be at least 1"));
        }
        if rank >= size {
            return Err(Error::config(format!(
                "rank {rank} is outside a group of size {size}"
            )));
        }
        Ok(Group { rank, size })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_coordinator(&self) -> bool {
        self.rank == 0
    }

    pub(crate) fn contains(&self, rank: usize) -> bool {
        rank < self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_group() {
        assert!(matches!(Group::new(0, 0), Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_rank_outside_group() {
        assert!(matches!(Group::new(4, 4), Err(Error::Configuration(_))));
    }

    #[test]
    fn single_rank_is_coordinator() {
        let group = Group::new(0, 1).unwrap();
        assert!(group.is_coordinator());
        assert_eq!(group.size(), 1);
        assert!(!Group::new(1, 2).unwrap().is_coordinator());
    }
}
