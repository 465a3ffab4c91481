pub mod application;
pub mod entities;
pub mod infrastructure;

pub use application::*;
pub use entities::*;
pub use infrastructure::*;
