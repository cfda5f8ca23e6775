//! Free-text place search.
//!
//! - [`Geocoder`] is the collaborator seam; [`NominatimClient`] is the HTTP one.
//! - [`SearchSession`] debounces keystrokes and discards responses that
//!   arrive after the query text has moved on.

pub mod error;
pub mod nominatim;
pub mod place;
pub mod search;

pub use error::*;
pub use nominatim::*;
pub use place::*;
pub use search::*;
