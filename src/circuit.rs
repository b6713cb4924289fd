//! Brute-force satisfiability of a fixed 16-input boolean circuit.

use crate::evaluate::{count_if, Evaluator};

/// Number of circuit inputs.
pub const INPUTS: u32 = 16;

/// Number of distinct input assignments, the total work of a run.
pub const ASSIGNMENTS: u64 = 1 << INPUTS;

/// Tests one input assignment against the circuit.
///
/// Bit `i` of `bits` is input `v[i]`. Bits above the circuit width are
/// ignored.
pub fn satisfies(bits: u64) -> bool {
    let v = |i: u32| bits & (1 << i) != 0;
    (v(0) || v(1))
        && (!v(1) || !v(3))
        && (v(2) || v(3))
        && (!v(3) || !v(4))
        && (v(4) || !v(5))
        && (v(5) || !v(6))
        && (v(5) || v(6))
        && (v(6) || !v(15))
        && (v(7) || !v(8))
        && (!v(7) || !v(13))
        && (v(8) || v(9))
        && (v(8) || !v(9))
        && (!v(9) || !v(10))
        && (v(9) || v(11))
        && (v(10) || v(11))
        && (v(12) || v(13))
        && (v(13) || !v(14))
        && (v(14) || v(15))
}

/// Renders an assignment most significant input first, e.g. `1001100111110101`.
pub fn format_assignment(bits: u64) -> String {
    format!("{:0width$b}", bits & (ASSIGNMENTS - 1), width = INPUTS as usize)
}

/// Counts satisfying assignments. Optionally prints each one, tagged with the
/// rank that found it.
#[derive(Debug, Clone, Copy)]
pub struct CircuitSat {
    pub rank: usize,
    pub print_solutions: bool,
}

impl CircuitSat {
    pub fn new(rank: usize, print_solutions: bool) -> Self {
        CircuitSat {
            rank,
            print_solutions,
        }
    }
}

impl Evaluator for CircuitSat {
    fn evaluate(&self, index: u64) -> u64 {
        let hit = satisfies(index);
        if hit {
            tracing::trace!(rank = self.rank, index, "satisfying input");
            if self.print_solutions {
                println!("{}) {}", self.rank, format_assignment(index));
            }
        }
        count_if(hit)
    }
}
