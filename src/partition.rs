use std::ops::Range;

use crate::error::Result;
use crate::group::Group;

/// Half-open interval `[start, end)` of work indices owned by one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkRange {
    pub start: u64,
    pub end: u64,
}

impl WorkRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn indices(&self) -> Range<u64> {
        self.start..self.end
    }
}

/// Calculates the sub-range of `[0, total)` owned by `rank` in a group of
/// `size` ranks.
///
/// Every rank gets `total / size` indices and the last rank also absorbs the
/// remainder. When `size > total` the leading ranks get empty ranges.
pub fn partition(total: u64, size: usize, rank: usize) -> Result<WorkRange> {
    Ok(Group::new(rank, size)?.work_range(total))
}

impl Group {
    /// This rank's share of `[0, total)`. See [`partition`].
    pub fn work_range(&self, total: u64) -> WorkRange {
        let (size, rank) = (self.size() as u64, self.rank() as u64);
        let amount = total / size;
        let start = amount * rank;
        let end = if rank == size - 1 {
            total
        } else {
            amount * (rank + 1)
        };
        WorkRange { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn ranges(total: u64, size: usize) -> Vec<WorkRange> {
        (0..size)
            .map(|rank| partition(total, size, rank).unwrap())
            .collect()
    }

    #[test]
    fn remainder_goes_to_last_rank() {
        assert_eq!(
            ranges(16, 3),
            vec![
                WorkRange { start: 0, end: 5 },
                WorkRange { start: 5, end: 10 },
                WorkRange { start: 10, end: 16 },
            ]
        );
    }

    #[test]
    fn more_ranks_than_work() {
        let r = ranges(3, 5);
        assert!(r[..4].iter().all(WorkRange::is_empty));
        assert_eq!(r[4], WorkRange { start: 0, end: 3 });
    }

    #[test]
    fn no_work() {
        assert!(ranges(0, 4).iter().all(WorkRange::is_empty));
    }

    #[test]
    fn zero_ranks_is_a_configuration_error() {
        assert!(matches!(partition(10, 0, 0), Err(Error::Configuration(_))));
    }

    #[test]
    fn full_u64_range() {
        let r = ranges(u64::MAX, 7);
        assert_eq!(r[6].end, u64::MAX);
        assert_eq!(r.iter().map(WorkRange::len).sum::<u64>(), u64::MAX);
    }
}
