use runtime::event_bus::{ObserverId, Observers};

use crate::error::InvalidStateError;
use crate::state::{ViewState, ViewUpdate};

/// Owner of the live [`ViewState`].
///
/// Every successful [`ViewStore::update`] notifies observers synchronously, in
/// registration order, before it returns. Rejected updates leave the state
/// untouched and notify nobody.
#[derive(Debug)]
pub struct ViewStore {
    state: ViewState,
    observers: Observers<ViewState>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self {
            state: ViewState::default(),
            observers: Observers::new(),
        }
    }
}

impl ViewStore {
    pub fn new(initial: ViewState) -> Result<Self, InvalidStateError> {
        initial.validate()?;
        Ok(Self {
            state: initial,
            observers: Observers::new(),
        })
    }

    pub fn get(&self) -> ViewState {
        self.state
    }

    pub fn update(&mut self, update: ViewUpdate) -> Result<ViewState, InvalidStateError> {
        let next = self.state.merged(&update);
        if let Err(err) = next.validate() {
            tracing::debug!(%err, "view update rejected");
            return Err(err);
        }
        self.state = next;
        self.observers.emit(&next);
        Ok(next)
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ViewState) + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }
}
