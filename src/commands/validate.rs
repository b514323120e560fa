use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use presence_lint::changes::{self, Entry};
use presence_lint::config::LintConfig;
use presence_lint::registry::RegistryClient;
use presence_lint::report::{self, OutputFormat};
use presence_lint::validation::{RunReport, SchemaChecker, Validator};

#[derive(Debug, clap::Args)]
pub struct ValidateArgs {
    /// Changed files or presence directories
    pub paths: Vec<PathBuf>,

    /// File listing changed paths, one per line ("-" reads stdin)
    #[arg(long, value_name = "FILE")]
    pub changed_files: Option<PathBuf>,

    /// Validate every presence in the catalog
    #[arg(long, conflicts_with_all = ["paths", "changed_files"])]
    pub all: bool,
}

/// Returns whether every entry passed.
pub fn validate_command(
    config: &LintConfig,
    args: ValidateArgs,
    format: OutputFormat,
) -> Result<bool> {
    let entries = collect_entries(config, &args)?;
    if entries.is_empty() {
        println!("No presences to validate");
        return Ok(true);
    }
    info!("Validating {} presence(s)", entries.len());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let report = runtime.block_on(run(config, &entries))?;

    match format {
        OutputFormat::Human => report::render(&report, format, &mut std::io::stderr())?,
        OutputFormat::Github => report::render(&report, format, &mut std::io::stdout())?,
    }
    Ok(report.is_success())
}

async fn run(config: &LintConfig, entries: &[Entry]) -> Result<RunReport> {
    let client = RegistryClient::new(config)?;

    let schema = client
        .latest_schema()
        .await
        .context("Failed to fetch the metadata schema")?;
    let checker = SchemaChecker::new(&schema)?;
    debug!("Latest schema: {}", checker.id());

    let languages = client
        .languages()
        .await
        .context("Failed to fetch the language list")?;

    let validator = Validator::new(&client, checker, languages);
    validator
        .validate_entries(entries)
        .await
        .context("Registry lookup failed, aborting")
}

fn collect_entries(config: &LintConfig, args: &ValidateArgs) -> Result<Vec<Entry>> {
    if args.all {
        return changes::scan_catalog(&config.catalog_dir);
    }

    let mut changed = args.paths.clone();
    if let Some(list) = &args.changed_files {
        changed.extend(changes::parse_changed_list(&read_list(list)?));
    }
    Ok(changes::entries_from_changes(&config.catalog_dir, &changed))
}

fn read_list(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("Failed to read changed files from stdin")?;
        return Ok(contents);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read changed files list {path:?}"))
}
