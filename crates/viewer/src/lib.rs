//! The map viewer core, independent of any browser API.
//!
//! [`Viewer`] owns the view store, the places catalog and the search session
//! and turns user intents (key presses, map moves, clicks) into state
//! changes plus [`Notice`]s for the shell to show.

pub mod config;
pub mod locate;
pub mod notice;
pub mod overlay;
pub mod shortcuts;
pub mod viewer;

pub use config::*;
pub use locate::*;
pub use notice::*;
pub use overlay::*;
pub use shortcuts::*;
pub use viewer::*;
