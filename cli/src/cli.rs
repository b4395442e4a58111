use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use drivedeck_business::PageKind;

#[derive(Parser)]
#[command(name = "drivedeck")]
#[command(about = "Manage robot drive files from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Deployment root, e.g. http://robot.local
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Drive to operate on
    #[arg(long, global = true)]
    pub drive: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "DRIVEDECK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store the bearer token used for drive requests
    Login {
        /// Token value; prompted for when omitted
        #[arg(long, short = 't')]
        token: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Show the effective configuration
    Status,
    /// List the panel pages
    Pages,
    /// List the files of a page
    Ls {
        /// Page name, see `drivedeck pages`
        page: PageKind,
    },
    /// Upload local files to a page
    Upload {
        page: PageKind,

        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Replace files that already exist
        #[arg(long, conflicts_with = "skip_existing")]
        overwrite: bool,

        /// Keep files that already exist
        #[arg(long)]
        skip_existing: bool,
    },
    /// Delete files of a page
    Rm {
        page: PageKind,

        /// File names to delete
        #[arg(required_unless_present = "all")]
        names: Vec<String>,

        /// Delete every file of the page
        #[arg(long, conflicts_with = "names")]
        all: bool,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Download a file of a page
    Get {
        page: PageKind,

        name: String,

        /// Destination path (defaults to the file name)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Work with the object config YAML document
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Create a directory on the drive
    Mkdir { path: String },
    /// Copy a drive path
    Cp {
        from: String,
        to: String,

        /// Replace the destination if it exists
        #[arg(long)]
        overwrite: bool,
    },
    /// Move a drive path
    Mv {
        from: String,
        to: String,

        /// Replace the destination if it exists
        #[arg(long)]
        overwrite: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the remote document
    Show,
    /// Save the remote document to a file
    Download {
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Validate a local file and upload it over the remote document
    Apply { file: PathBuf },
    /// Validate a local file without uploading it
    Check { file: PathBuf },
}
