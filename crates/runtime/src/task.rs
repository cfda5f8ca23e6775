/// Identifies one start of a single-shot task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// A slot for at most one in-flight single-shot task.
///
/// Starting a task invalidates the ticket of the previous one. Completion
/// handlers call [`TaskSlot::finish`] and drop their result when it returns
/// `false`, which is how late responses are discarded.
#[derive(Debug, Default)]
pub struct TaskSlot {
    next_ticket: u64,
    active: Option<Ticket>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        if let Some(prev) = self.active.replace(ticket) {
            tracing::debug!(superseded = prev.0, by = ticket.0, "task superseded");
        }
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.active == Some(ticket)
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Marks `ticket` complete. Returns `false` if it was superseded or canceled.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if self.is_current(ticket) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}
