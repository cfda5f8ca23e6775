/// Deterministic trailing-edge debouncer.
///
/// Time is supplied by the caller in milliseconds, so behaviour is the same
/// under a browser timer, a test, or a replay. Each [`Debouncer::push`]
/// supersedes whatever was pending and restarts the delay; [`Debouncer::poll`]
/// yields the latest value once the delay has elapsed since the last push.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    due_ms: u64,
    value: T,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Schedules `value`, replacing any pending one. Returns the due time.
    pub fn push(&mut self, value: T, now_ms: u64) -> u64 {
        let due_ms = now_ms.saturating_add(self.delay_ms);
        self.pending = Some(Pending { due_ms, value });
        due_ms
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some(p) if now_ms >= p.due_ms => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
