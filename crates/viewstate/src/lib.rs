//! Canonical map view state: which provider and layer the map shows, where
//! it is centred, and at what zoom.
//!
//! - [`ViewStore`] owns the one live [`ViewState`] and notifies observers.
//! - [`url`] maps a view state to and from the shareable query string.

pub mod error;
pub mod provider;
pub mod state;
pub mod store;
pub mod url;

pub use error::*;
pub use provider::*;
pub use state::*;
pub use store::*;
