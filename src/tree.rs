//! Binary-tree reduction towards rank 0.
//!
//! In round `i` the offset is `2^i`. A rank whose lowest `i + 1` bits are not
//! all zero sends its accumulator to `rank - 2^i` and drops out. A rank whose
//! lowest `i + 1` bits are zero receives from `rank + 2^i` if that rank
//! exists, and otherwise sits the round out. Each receiver has exactly one
//! sender per round, so no rank waits on a peer that will never send. After
//! `ceil(log2(size))` rounds only rank 0 is left and it holds the total.

use std::ops::Add;

use tracing::debug;

use crate::error::{Error, Result};
use crate::group::Group;
use crate::transport::{Transport, REDUCE_TAG};

/// What a rank does in one reduction round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Hand the accumulator to `peer` and stop participating.
    Sender { peer: usize },
    /// Add the value received from `peer` into the accumulator.
    Receiver { peer: usize },
    /// No peer at this round's offset.
    Idle,
}

/// Number of rounds needed to reduce `size` values, `ceil(log2(size))`.
///
/// Computed with integer arithmetic; `size` of 0 or 1 needs no rounds.
pub fn rounds(size: usize) -> u32 {
    if size <= 1 {
        0
    } else {
        size.next_power_of_two().trailing_zeros()
    }
}

/// Derives the role of `rank` in `round` from `(rank, size)` alone.
///
/// For a rank still taking part the sender's peer is `rank - 2^round`. A rank
/// that already sent in an earlier round is reported as a sender to the rank
/// now holding its contribution.
pub fn role_for(rank: usize, size: usize, round: u32) -> Role {
    let current_base = 1usize << round;
    let next_base = current_base << 1;
    if rank % next_base != 0 {
        Role::Sender {
            peer: rank - rank % next_base,
        }
    } else {
        match rank.checked_add(current_base) {
            Some(peer) if peer < size => Role::Receiver { peer },
            _ => Role::Idle,
        }
    }
}

/// Sums `local` across the group.
///
/// Every rank of the group must call this with its own value. Returns
/// `Some(total)` on rank 0 and `None` everywhere else. Transport failures are
/// returned as is; nothing is retried.
pub fn tree_reduce<T, C>(group: &Group, local: T, transport: &C) -> Result<Option<T>>
where
    T: Add<Output = T>,
    C: Transport<T> + ?Sized,
{
    let rank = group.rank();
    let mut acc = local;

    for round in 0..rounds(group.size()) {
        let role = role_for(rank, group.size(), round);
        debug!(rank, round, ?role, "reduce round");
        match role {
            Role::Sender { peer } => {
                check_peer(group, round, peer)?;
                // `acc` moves to the peer; this rank is done.
                transport.send(peer, REDUCE_TAG, acc)?;
                return Ok(None);
            }
            Role::Receiver { peer } => {
                check_peer(group, round, peer)?;
                let value = transport.receive(peer, REDUCE_TAG)?;
                acc = acc + value;
            }
            Role::Idle => {}
        }
    }

    if !group.is_coordinator() {
        return Err(Error::ProtocolViolation {
            rank,
            round: rounds(group.size()),
            peer: rank,
        });
    }
    Ok(Some(acc))
}

fn check_peer(group: &Group, round: u32, peer: usize) -> Result<()> {
    if group.contains(peer) && peer != group.rank() {
        Ok(())
    } else {
        Err(Error::ProtocolViolation {
            rank: group.rank(),
            round,
            peer,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    #[test]
    fn round_counts() {
        let expected = [(1, 0), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (1024, 10)];
        for (size, n) in expected {
            assert_eq!(rounds(size), n, "size {size}");
        }
    }

    #[test]
    fn roles_for_five_ranks() {
        use Role::*;
        // rows: rank, columns: round
        let table = [
            [Receiver { peer: 1 }, Receiver { peer: 2 }, Receiver { peer: 4 }],
            [Sender { peer: 0 }, Sender { peer: 0 }, Sender { peer: 0 }],
            [Receiver { peer: 3 }, Sender { peer: 0 }, Sender { peer: 0 }],
            [Sender { peer: 2 }, Sender { peer: 0 }, Sender { peer: 0 }],
            [Idle, Idle, Sender { peer: 0 }],
        ];
        for (rank, row) in table.iter().enumerate() {
            for (round, role) in row.iter().enumerate() {
                assert_eq!(role_for(rank, 5, round as u32), *role, "rank {rank} round {round}");
            }
        }
    }

    #[test]
    fn roles_for_six_ranks() {
        assert_eq!(role_for(4, 6, 0), Role::Receiver { peer: 5 });
        assert_eq!(role_for(4, 6, 1), Role::Idle);
        assert_eq!(role_for(0, 6, 2), Role::Receiver { peer: 4 });
        assert_eq!(role_for(4, 6, 2), Role::Sender { peer: 0 });
    }

    /// Records traffic instead of delivering it, for single-rank checks.
    struct Script {
        incoming: RefCell<VecDeque<(usize, u64)>>,
        sent: RefCell<Vec<(usize, u64)>>,
    }

    impl Script {
        fn new(incoming: &[(usize, u64)]) -> Self {
            Script {
                incoming: RefCell::new(incoming.iter().copied().collect()),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport<u64> for Script {
        fn send(&self, dest: usize, _tag: i32, value: u64) -> Result<()> {
            self.sent.borrow_mut().push((dest, value));
            Ok(())
        }

        fn receive(&self, source: usize, _tag: i32) -> Result<u64> {
            let (from, value) = self.incoming.borrow_mut().pop_front().unwrap();
            assert_eq!(from, source);
            Ok(value)
        }
    }

    #[test]
    fn single_rank_returns_local_value() {
        let group = Group::new(0, 1).unwrap();
        let script = Script::new(&[]);
        assert_eq!(tree_reduce(&group, 9u64, &script).unwrap(), Some(9));
        assert!(script.sent.borrow().is_empty());
    }

    #[test]
    fn coordinator_receives_in_round_order() {
        let group = Group::new(0, 5).unwrap();
        let script = Script::new(&[(1, 2), (2, 7), (4, 5)]);
        assert_eq!(tree_reduce(&group, 1u64, &script).unwrap(), Some(15));
        assert!(script.incoming.borrow().is_empty());
    }

    #[test]
    fn inner_rank_accumulates_then_sends() {
        let group = Group::new(2, 5).unwrap();
        let script = Script::new(&[(3, 4)]);
        assert_eq!(tree_reduce(&group, 3u64, &script).unwrap(), None);
        assert_eq!(*script.sent.borrow(), vec![(0, 7)]);
    }

    #[test]
    fn idle_rank_carries_value_forward() {
        let group = Group::new(4, 5).unwrap();
        let script = Script::new(&[]);
        assert_eq!(tree_reduce(&group, 5u64, &script).unwrap(), None);
        assert_eq!(*script.sent.borrow(), vec![(0, 5)]);
    }

    #[test]
    fn transport_failure_propagates() {
        struct Broken;
        impl Transport<u64> for Broken {
            fn send(&self, dest: usize, _tag: i32, _value: u64) -> Result<()> {
                Err(Error::Transport {
                    rank: 1,
                    peer: dest,
                    reason: "down".into(),
                })
            }
            fn receive(&self, _source: usize, _tag: i32) -> Result<u64> {
                unreachable!()
            }
        }
        let group = Group::new(1, 2).unwrap();
        assert!(matches!(
            tree_reduce(&group, 1u64, &Broken),
            Err(Error::Transport { peer: 0, .. })
        ));
    }
}
