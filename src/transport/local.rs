use crossbeam_channel::{bounded, Receiver, Sender};

use super::{Tag, Transport};
use crate::error::{Error, Result};
use crate::group::Group;

/// One rank's end of an in-process group.
///
/// Every ordered pair of ranks gets its own zero-capacity channel, so a send
/// completes only when the peer receives it.
pub struct LocalTransport<T> {
    rank: usize,
    // indexed by destination rank
    outboxes: Vec<Sender<(Tag, T)>>,
    // indexed by source rank
    inboxes: Vec<Receiver<(Tag, T)>>,
}

/// Creates a fully connected group of `size` ranks living in this process.
///
/// Hand each `(Group, LocalTransport)` pair to its own thread.
pub fn local_group<T>(size: usize) -> Result<Vec<(Group, LocalTransport<T>)>> {
    if size == 0 {
        return Err(Error::config("group size must be at least 1"));
    }
    let mut outboxes: Vec<Vec<Sender<(Tag, T)>>> =
        (0..size).map(|_| Vec::with_capacity(size)).collect();
    let mut inboxes: Vec<Vec<Receiver<(Tag, T)>>> =
        (0..size).map(|_| Vec::with_capacity(size)).collect();

    for src in 0..size {
        for dst in 0..size {
            let (tx, rx) = bounded(0);
            outboxes[src].push(tx);
            inboxes[dst].push(rx);
        }
    }

    outboxes
        .into_iter()
        .zip(inboxes)
        .enumerate()
        .map(|(rank, (outboxes, inboxes))| {
            let group = Group::new(rank, size)?;
            Ok((
                group,
                LocalTransport {
                    rank,
                    outboxes,
                    inboxes,
                },
            ))
        })
        .collect()
}

impl<T> LocalTransport<T> {
    fn failure(&self, peer: usize, reason: impl Into<String>) -> Error {
        Error::Transport {
            rank: self.rank,
            peer,
            reason: reason.into(),
        }
    }
}

impl<T> Transport<T> for LocalTransport<T> {
    fn send(&self, dest: usize, tag: Tag, value: T) -> Result<()> {
        let outbox = self
            .outboxes
            .get(dest)
            .ok_or_else(|| self.failure(dest, "no such rank"))?;
        outbox
            .send((tag, value))
            .map_err(|_| self.failure(dest, "peer has left the group"))
    }

    fn receive(&self, source: usize, tag: Tag) -> Result<T> {
        let inbox = self
            .inboxes
            .get(source)
            .ok_or_else(|| self.failure(source, "no such rank"))?;
        let (got, value) = inbox
            .recv()
            .map_err(|_| self.failure(source, "peer has left the group"))?;
        if got != tag {
            return Err(self.failure(source, format!("expected tag {tag}, got tag {got}")));
        }
        Ok(value)
    }
}
