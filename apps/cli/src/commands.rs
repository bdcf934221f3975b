//! CLI definition, tracing setup, and the import command.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use inkport_core::pipeline::{ProgressReporter, run_import};
use inkport_shared::{AppConfig, ImportConfig, ImportSummary, SkipReason, load_config, load_config_from};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// inkport: turn a Webflow blog export into Markdown posts.
#[derive(Parser, Debug)]
#[command(
    name = "inkport",
    version,
    about = "Import a Webflow blog CSV export as Markdown documents with YAML frontmatter.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the exported CSV file.
    pub input: PathBuf,

    /// Also import rows flagged as drafts.
    #[arg(long)]
    pub include_drafts: bool,

    /// Replace documents that already exist in the output directory.
    #[arg(long)]
    pub overwrite: bool,

    /// Output directory (defaults to `defaults.output_dir` from config).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Config file (defaults to ~/.inkport/inkport.toml).
    #[arg(long, env = "INKPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// progress and the summary.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "inkport=warn",
        1 => "inkport=debug",
        _ => "inkport=trace",
    }
}

// ---------------------------------------------------------------------------
// Import command
// ---------------------------------------------------------------------------

/// Run the import described by the CLI flags.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let app_config = match &cli.config {
        Some(path) => load_config_from(path)
            .wrap_err_with(|| format!("loading config {}", path.display()))?,
        None => load_config()?,
    };
    let config = import_config(&cli, &app_config);

    info!(
        input = %config.input_path.display(),
        output = %config.output_dir.display(),
        include_drafts = config.include_drafts,
        overwrite = config.overwrite,
        "starting import"
    );

    println!("Reading CSV: {}", config.input_path.display());

    let reporter = CliProgress::new();
    let summary = run_import(&config, &reporter)?;

    print_summary(&summary, cli.verbose > 0);
    Ok(())
}

/// Merge CLI flags over file config: CLI beats file, file beats default.
fn import_config(cli: &Cli, app_config: &AppConfig) -> ImportConfig {
    let mut config = ImportConfig::new(cli.input.clone(), app_config);
    config.include_drafts = cli.include_drafts;
    config.overwrite = cli.overwrite;
    if let Some(out) = &cli.out {
        config.output_dir = out.clone();
    }
    config
}

fn print_summary(summary: &ImportSummary, breakdown: bool) {
    println!();
    println!(
        "Done! {} posts created, {} skipped.",
        summary.created, summary.skipped
    );
    if breakdown {
        for (reason, count) in &summary.skipped_by {
            println!("  {reason}: {count}");
        }
    }
    println!("Output: {}/", summary.output_dir.display());
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar, hidden when stdout is not
/// a terminal.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let target = if std::io::stdout().is_terminal() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(0), target);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} rows {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    /// Print a line without tearing the bar.
    fn line(&self, msg: String) {
        if self.bar.is_hidden() {
            println!("{msg}");
        } else {
            self.bar.println(msg);
        }
    }
}

impl ProgressReporter for CliProgress {
    fn started(&self, total_rows: usize) {
        self.bar.set_length(total_rows as u64);
    }

    fn row_processed(&self, current: usize, _total: usize) {
        self.bar.set_position(current as u64);
    }

    fn row_skipped(&self, _row: usize, reason: SkipReason) {
        self.bar.set_message(format!("(last skip: {reason})"));
    }

    fn milestone(&self, created: usize) {
        self.line(format!("  ...{created} posts created"));
    }

    fn done(&self, _summary: &ImportSummary) {
        self.bar.finish_and_clear();
    }
}
