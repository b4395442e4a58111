//! Command implementations for the drivedeck CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod config;
pub mod download;
pub mod fs;
pub mod list;
pub mod login;
pub mod pages;
pub mod remove;
pub mod upload;

pub use completions::generate_completions;
pub use config::run_config;
pub use download::run_get;
pub use fs::{run_copy, run_mkdir, run_move};
pub use list::run_list;
pub use login::{run_login, run_logout, run_status};
pub use pages::run_pages;
pub use remove::run_remove;
pub use upload::run_upload;
