pub mod coord;
pub mod providers;
pub mod resolver;

pub use coord::*;
pub use providers::*;
pub use resolver::*;
