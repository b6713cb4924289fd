use rayon::prelude::*;

use crate::partition::WorkRange;

/// A pure per-index unit of work.
///
/// The result is that index's contribution to the local count; 0 contributes
/// nothing. Implementations may emit diagnostics but must not depend on
/// evaluation order, since ranges are evaluated in parallel.
pub trait Evaluator: Sync {
    fn evaluate(&self, index: u64) -> u64;
}

impl<F> Evaluator for F
where
    F: Fn(u64) -> u64 + Sync,
{
    fn evaluate(&self, index: u64) -> u64 {
        self(index)
    }
}

/// Evaluates every index of `range` on the rayon pool and sums the results.
pub fn evaluate_range<E>(range: WorkRange, evaluator: &E) -> u64
where
    E: Evaluator + ?Sized,
{
    range
        .indices()
        .into_par_iter()
        .map(|index| evaluator.evaluate(index))
        .sum()
}

/// Maps a predicate outcome onto the 0/1 count it contributes.
pub fn count_if(hit: bool) -> u64 {
    u64::from(hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_contributes_nothing() {
        let range = WorkRange { start: 4, end: 4 };
        assert_eq!(evaluate_range(range, &|_: u64| 1u64), 0);
    }

    #[test]
    fn sums_over_the_range_only() {
        let range = WorkRange { start: 10, end: 20 };
        let evens = |i: u64| count_if(i % 2 == 0);
        assert_eq!(evaluate_range(range, &evens), 5);
        assert_eq!(evaluate_range(range, &|i: u64| i), (10..20).sum::<u64>());
    }
}
