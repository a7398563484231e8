//! docserve - Swagger UI server entry point.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use docserve_config::{ConfigLoader, DEFAULT_ENV_PREFIX};
use docserve_server::{build_router, shutdown_signal, DocServer, VERSION};

/// Read from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "docserve.toml";

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("docserve {VERSION}");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { config }
    }
}

fn print_help() {
    println!(
        r"docserve - Swagger UI server

USAGE:
    docserve [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
                           [default: ./docserve.toml if present]
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    DOCSERVE__SERVER__HTTP_ADDR         Listen address (default: 127.0.0.1:8080)
    DOCSERVE__SERVER__MOUNT_PREFIX      Mount prefix (default: /swagger/)
    DOCSERVE__ASSETS__ROOT              Swagger UI dist directory
    DOCSERVE__DOCS__DOCUMENT_PATH       API description JSON file
    DOCSERVE__DOCS__DISABLE_ENV         Variable that disables the UI when non-empty
    DOCSERVE__SWAGGER__TITLE            Page title
    DOCSERVE__LOGGING__LEVEL            Log filter (default: info)
    DOCSERVE__LOGGING__FORMAT           json, pretty or compact

EXAMPLES:
    docserve --config /etc/docserve/docserve.toml
    DOCSERVE__DOCS__DOCUMENT_PATH=./openapi.json docserve
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loader = match &args.config {
        Some(path) => ConfigLoader::new()
            .with_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE)?,
    };
    let config = loader
        .with_env_prefix(DEFAULT_ENV_PREFIX)
        .load()
        .context("Invalid configuration")?;

    docserve_telemetry::init_logging(&config.log_config())?;
    tracing::info!(version = VERSION, "Starting docserve");

    let router = build_router(&config)?;
    let server = DocServer::bind(
        config.socket_addr()?,
        router,
        Duration::from_secs(config.server.shutdown_timeout_secs),
    )
    .await?;

    server.serve(shutdown_signal()).await?;
    Ok(())
}
