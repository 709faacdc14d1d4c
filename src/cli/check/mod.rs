//! Configuration and feed validation commands.

mod config;
mod fetch;

pub use config::execute_config;
pub use fetch::execute_fetch;
