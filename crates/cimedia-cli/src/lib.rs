//! # cimedia
//!
//! Command-line front end for the Ci media cloud client: log in, browse a
//! workspace, inspect or delete assets, and upload files with a local
//! tab-separated record of every committed upload.
//!
//! Settings come from a YAML credentials file (`username`, `password`,
//! `client_id`, `client_secret`, `workspace_id`) with `CIMEDIA_*`
//! environment variables layered on top.

pub mod commands;
pub mod settings;

pub use commands::{execute, run, Command};
pub use settings::CliSettings;
