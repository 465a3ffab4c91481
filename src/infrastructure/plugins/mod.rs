pub mod save_logger;

pub use save_logger::*;
