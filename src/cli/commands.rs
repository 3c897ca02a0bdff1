//! CLI command implementations
//!
//! Both commands resolve the storage settings first; a missing connection
//! string or container stops the process before any socket is bound.

use std::io::Write;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::file_storage::{ConnectionString, ObjectStoreBackend, StorageBackend};
use crate::http_server::{HttpServer, HttpServerConfig};

use super::args::{Cli, Command, StorageArgs};
use super::errors::{CliError, CliResult};

const CONNECTION_STRING_VAR: &str = "AZURE_STORAGE_CONNECTION_STRING";
const CONTAINER_VAR: &str = "AZURE_STORAGE_CONTAINER";

/// Validated storage settings
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub connection: ConnectionString,
    pub container: String,
}

impl StorageSettings {
    /// Resolve settings from flags / environment.
    ///
    /// Absent and empty values are both fatal.
    pub fn from_args(args: &StorageArgs) -> CliResult<Self> {
        let raw = required(args.connection_string.as_deref(), CONNECTION_STRING_VAR)?;
        let container = required(args.container.as_deref(), CONTAINER_VAR)?;

        let connection = ConnectionString::parse(raw)?;

        Ok(Self {
            connection,
            container: container.to_string(),
        })
    }

    /// Build the storage backend these settings point at
    pub fn connect(&self) -> CliResult<Arc<dyn StorageBackend>> {
        let backend = ObjectStoreBackend::azure(&self.connection, &self.container)?;
        info!(
            account = self.connection.account_name.as_deref().unwrap_or("devstoreaccount1"),
            container = %self.container,
            "storage backend configured"
        );
        Ok(Arc::new(backend))
    }
}

fn required<'a>(value: Option<&'a str>, var: &str) -> CliResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CliError::config_error(format!(
            "Please set {} (or pass --{})",
            var,
            flag_for(var)
        ))),
    }
}

fn flag_for(var: &str) -> &'static str {
    if var == CONNECTION_STRING_VAR {
        "connection-string"
    } else {
        "container"
    }
}

/// Entry point used by `main`
pub fn run() -> CliResult<()> {
    // .env is optional; a broken one is not
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(CliError::config_error(format!("Failed to load .env: {}", e)));
        }
    }

    init_tracing();

    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            storage,
            host,
            port,
            max_upload_mb,
        } => {
            let http_config = HttpServerConfig {
                host,
                port,
                max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            };
            serve(&storage, http_config)
        }
        Command::List { storage } => list(&storage),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests)
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Start the HTTP front-end
pub fn serve(storage: &StorageArgs, http_config: HttpServerConfig) -> CliResult<()> {
    let settings = StorageSettings::from_args(storage)?;
    let backend = settings.connect()?;

    let server = HttpServer::with_config(http_config, backend);

    runtime()?.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print every object name, one per line
pub fn list(storage: &StorageArgs) -> CliResult<()> {
    let settings = StorageSettings::from_args(storage)?;
    let backend = settings.connect()?;

    let names = runtime()?.block_on(backend.list())?;
    write_names(&mut std::io::stdout().lock(), &names)
}

fn write_names<W: Write>(out: &mut W, names: &[String]) -> CliResult<()> {
    for name in names {
        writeln!(out, "{}", name)?;
    }
    out.flush()?;
    Ok(())
}
