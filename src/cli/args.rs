//! CLI argument definitions using clap
//!
//! Commands:
//! - blobdeck serve [--host <host>] [--port <port>] [--max-upload-mb <mb>]
//! - blobdeck list
//!
//! Storage settings come from flags or, more usually, the environment.

use clap::{Args, Parser, Subcommand};

/// blobdeck - browse, upload and stream blobs in a storage container
#[derive(Parser, Debug)]
#[command(name = "blobdeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the objects live
#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Storage account connection string
    #[arg(long, env = "AZURE_STORAGE_CONNECTION_STRING", hide_env_values = true)]
    pub connection_string: Option<String>,

    /// Container holding the objects
    #[arg(long, env = "AZURE_STORAGE_CONTAINER")]
    pub container: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web front-end
    Serve {
        #[command(flatten)]
        storage: StorageArgs,

        /// Host to bind to
        #[arg(long, env = "BLOBDECK_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, env = "BLOBDECK_PORT", default_value_t = 5000)]
        port: u16,

        /// Largest accepted upload, in MiB
        #[arg(long, env = "BLOBDECK_MAX_UPLOAD_MB", default_value_t = 1024)]
        max_upload_mb: usize,
    },

    /// Print every object name in the container and exit
    List {
        #[command(flatten)]
        storage: StorageArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
