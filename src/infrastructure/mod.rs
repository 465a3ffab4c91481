pub mod filesystem;
pub mod holidays;
pub mod hooks;
pub mod logging;
pub mod plugins;
pub mod repository;

#[cfg(test)]
pub mod test_utils;

pub use filesystem::*;
pub use holidays::*;
pub use hooks::*;
pub use logging::*;
pub use plugins::*;
pub use repository::*;
