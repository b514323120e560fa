use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use presence_lint::config::{
    DEFAULT_CATALOG_DIR, DEFAULT_REGISTRY_URL, DEFAULT_SCHEMA_URL, DEFAULT_TIMEOUT_SECS,
    LintConfig,
};
use presence_lint::report::OutputFormat;

mod commands;

use commands::{ValidateArgs, locate_command, validate_command};

#[derive(Parser)]
#[command(
    name = "presence-lint",
    about = "Validates presence metadata before merge",
    version,
    author,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory containing <group>/<presence>/metadata.json entries
    #[arg(long, default_value = DEFAULT_CATALOG_DIR, env = "PRESENCE_LINT_CATALOG", global = true)]
    catalog: PathBuf,

    /// GraphQL endpoint of the presence registry
    #[arg(
        long,
        default_value = DEFAULT_REGISTRY_URL,
        env = "PRESENCE_LINT_REGISTRY_URL",
        global = true
    )]
    registry_url: String,

    /// URL of the current metadata JSON Schema
    #[arg(
        long,
        default_value = DEFAULT_SCHEMA_URL,
        env = "PRESENCE_LINT_SCHEMA_URL",
        global = true
    )]
    schema_url: String,

    /// HTTP timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        env = "PRESENCE_LINT_TIMEOUT_SECS",
        global = true
    )]
    timeout: u64,

    /// Diagnostics output format
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Human,
        env = "PRESENCE_LINT_FORMAT",
        global = true
    )]
    format: OutputFormat,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate changed presences
    Validate(ValidateArgs),

    /// Print the line a metadata field is declared on
    Locate {
        /// JSON file to search
        file: PathBuf,

        /// Top-level key
        key: String,

        /// Nested key, array index or array element value
        selector: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);

    let ok = match cli.command {
        Commands::Validate(args) => {
            let config =
                LintConfig::new(&cli.registry_url, &cli.schema_url, cli.catalog, cli.timeout)?;
            validate_command(&config, args, cli.format)?
        }
        Commands::Locate {
            file,
            key,
            selector,
        } => locate_command(&file, &key, selector.as_deref())?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("presence_lint=warn"), // Default: warnings and errors only
        1 => EnvFilter::new("presence_lint=info"), // -v: info messages
        _ => EnvFilter::new("presence_lint=debug"), // -vv or more: full debug
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
