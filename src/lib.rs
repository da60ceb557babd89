pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(test)]
pub mod testing;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use config::{session_file::FileSessionStore, Overrides, Settings};
pub use core::{api::HttpApi, session::UserSession};
pub use utils::error::{DicciotipsError, Result};
