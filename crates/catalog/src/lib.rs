//! Favorites and visit history, persisted through a key-value store.
//!
//! The two collections are the only state that outlives the page. Each lives
//! under its own key as a JSON array, newest first.

pub mod entry;
pub mod error;
pub mod places;
pub mod storage;
mod timestamp;

pub use entry::*;
pub use error::*;
pub use places::*;
pub use storage::*;
