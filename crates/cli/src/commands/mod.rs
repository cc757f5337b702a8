//! Command implementations. Each returns the text printed on success.

pub mod call;
pub mod compile;
pub mod selectors;

/// Output of a command
pub type CommandResult = anyhow::Result<String>;

pub use call::call;
pub use compile::{compile, load_config};
pub use selectors::selectors;
