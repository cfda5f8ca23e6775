pub mod debounce;
pub mod event_bus;
pub mod task;

pub use debounce::*;
pub use event_bus::*;
pub use task::*;
