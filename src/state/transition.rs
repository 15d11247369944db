// Deferred commits tied to CSS transitions.
//
// A commit is armed together with a fallback timer. Whichever of the timer or
// the matching `transitionend` reaches the coordinator first takes the commit;
// the other finds nothing pending.

use crate::model::SwipeDirection;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commit {
    Swipe(SwipeDirection),
    Close,
}

/// Which animated element a `transitionend` came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitKind {
    Track,
    Backdrop,
}

impl Commit {
    pub fn kind(&self) -> CommitKind {
        match self {
            Commit::Swipe(_) => CommitKind::Track,
            Commit::Close => CommitKind::Backdrop,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransitionCoordinator {
    next_ticket: u64,
    pending: Option<(Ticket, Commit)>,
}

impl TransitionCoordinator {
    /// Arm a new commit. Returns its ticket and the superseded ticket, if any,
    /// whose timer must be cancelled.
    pub fn arm(&mut self, commit: Commit) -> (Ticket, Option<Ticket>) {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        let previous = self.pending.replace((ticket, commit)).map(|(t, _)| t);
        (ticket, previous)
    }

    pub fn pending(&self) -> Option<(Ticket, Commit)> {
        self.pending
    }

    /// Timer path.
    pub fn fire(&mut self, ticket: Ticket) -> Option<Commit> {
        match self.pending {
            Some((t, commit)) if t == ticket => {
                self.pending = None;
                Some(commit)
            }
            _ => None,
        }
    }

    /// `transitionend` path.
    pub fn fire_signal(&mut self, kind: CommitKind) -> Option<(Ticket, Commit)> {
        match self.pending {
            Some((ticket, commit)) if commit.kind() == kind => {
                self.pending = None;
                Some((ticket, commit))
            }
            _ => None,
        }
    }

    /// Disarm without committing.
    pub fn cancel(&mut self) -> Option<Ticket> {
        self.pending.take().map(|(t, _)| t)
    }

    /// Disarm and hand back the commit so the caller can apply it right away.
    pub fn take(&mut self) -> Option<(Ticket, Commit)> {
        self.pending.take()
    }
}
