pub mod api;
pub mod cli;
pub mod load_config;
pub mod validate;

pub use cli::{execute, run, Cli, Commands};
