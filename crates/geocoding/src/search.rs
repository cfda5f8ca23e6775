use runtime::debounce::Debouncer;
use runtime::task::{TaskSlot, Ticket};

use crate::error::TransportError;
use crate::place::Place;

pub const SEARCH_DEBOUNCE_MS: u64 = 500;
pub const MIN_QUERY_CHARS: usize = 3;

/// A geocoding call the host should perform, then hand back via
/// [`SearchSession::complete`] with the same ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: Ticket,
    pub query: String,
}

/// State of the search box: typed text, debounced lookups and results.
#[derive(Debug)]
pub struct SearchSession {
    debouncer: Debouncer<String>,
    in_flight: TaskSlot,
    min_query_chars: usize,
    query: String,
    results: Vec<Place>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE_MS, MIN_QUERY_CHARS)
    }
}

impl SearchSession {
    pub fn new(debounce_ms: u64, min_query_chars: usize) -> Self {
        Self {
            debouncer: Debouncer::new(debounce_ms),
            in_flight: TaskSlot::new(),
            min_query_chars,
            query: String::new(),
            results: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Place] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// When [`SearchSession::poll`] should next be called, if a lookup is pending.
    pub fn deadline(&self) -> Option<u64> {
        self.debouncer.deadline()
    }

    /// Records new search-box text. Returns the time at which the lookup is due.
    ///
    /// Any lookup already in flight is for older text and will be discarded.
    pub fn set_query(&mut self, text: impl Into<String>, now_ms: u64) -> u64 {
        self.query = text.into();
        self.in_flight.cancel();
        self.debouncer.push(self.query.clone(), now_ms)
    }

    /// Releases the pending lookup once the quiet period has elapsed.
    ///
    /// Text shorter than the minimum clears the results without a request.
    pub fn poll(&mut self, now_ms: u64) -> Option<SearchRequest> {
        let query = self.debouncer.poll(now_ms)?;
        if query.trim().chars().count() < self.min_query_chars {
            self.results.clear();
            return None;
        }
        let ticket = self.in_flight.begin();
        tracing::debug!(ticket = ticket.0, %query, "search due");
        Some(SearchRequest { ticket, query })
    }

    /// Applies a lookup outcome. Returns `false` if the response was stale.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<Place>, TransportError>,
    ) -> bool {
        if !self.in_flight.finish(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale search response");
            return false;
        }
        self.results = match outcome {
            Ok(places) => places,
            Err(err) => {
                tracing::warn!(%err, query = %self.query, "search failed");
                Vec::new()
            }
        };
        true
    }

    /// Picks result `index`. The box shows the place name; no new lookup starts.
    pub fn select(&mut self, index: usize) -> Option<Place> {
        let place = self.results.get(index)?.clone();
        self.debouncer.cancel();
        self.in_flight.cancel();
        self.query = place.name.clone();
        Some(place)
    }

    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.in_flight.cancel();
        self.query.clear();
        self.results.clear();
    }
}
