//! CLI argument definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use weekmerge_core::{MergeResult, ProgressReporter};
use weekmerge_shared::{
    AppConfig, MergeConfig, MergeOverrides, WeekDirectory, WeekRange, load_config,
    load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// weekmerge: merge weekly lecture notes into a single document.
#[derive(Parser)]
#[command(
    name = "weekmerge",
    version,
    about = "Merges all markdown files from a range of week directories into a single PDF.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Source directory containing Week<NN> directories.
    pub src: PathBuf,

    /// Destination directory (removed and recreated on every run).
    pub dest: PathBuf,

    /// Start week number.
    pub start: u32,

    /// End week number (inclusive).
    pub end: u32,

    /// Clean the destination directory, keeping only the output file.
    #[arg(short, long)]
    pub clean: bool,

    /// Add a "Lecture <n>" heading before each file.
    #[arg(short, long)]
    pub lecture: bool,

    /// Wrap long lines inside code blocks.
    #[arg(short, long)]
    pub wrap: bool,

    /// Add a page margin to the PDF.
    #[arg(short, long)]
    pub margin: bool,

    /// Output file name [default: notes.pdf].
    #[arg(short, long)]
    pub output: Option<String>,

    /// Renderer executable [default: pandoc].
    #[arg(long)]
    pub renderer: Option<String>,

    /// Config file (defaults to ~/.weekmerge/weekmerge.toml).
    #[arg(long, env = "WEEKMERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide the progress spinner.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "weekmerge=info",
        1 => "weekmerge=debug",
        _ => "weekmerge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
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

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the merge described by the CLI arguments.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let app_config = resolve_app_config(cli.config.as_deref())?;

    let config = MergeConfig::resolve(
        &app_config,
        cli.src,
        cli.dest,
        WeekRange::new(cli.start, cli.end),
        MergeOverrides {
            output: cli.output,
            renderer: cli.renderer,
            clean: cli.clean,
            lecture_headings: cli.lecture,
            wrap_code: cli.wrap,
            page_margin: cli.margin,
        },
    );

    info!(
        src = %config.source.display(),
        dest = %config.dest.display(),
        range = %config.range,
        output = %config.output,
        "merging notes"
    );

    let result = if cli.quiet {
        weekmerge_core::merge_notes(&config, &weekmerge_core::SilentProgress)?
    } else {
        weekmerge_core::merge_notes(&config, &CliProgress::new())?
    };

    print_summary(&result);
    Ok(())
}

fn resolve_app_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    match path {
        Some(p) => load_config_from(p)
            .wrap_err_with(|| format!("could not load config from {}", p.display())),
        None => Ok(load_config()?),
    }
}

fn print_summary(result: &MergeResult) {
    let weeks = if result.weeks.is_empty() {
        "none".to_string()
    } else {
        result
            .weeks
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!();
    println!("  Notes merged!");
    println!("  Weeks:     {weeks}");
    println!("  Files:     {}", result.files_copied);
    println!("  Documents: {}", result.documents);
    println!("  Output:    {}", result.output_path.display());
    if result.cleaned {
        println!("  Cleaned:   yes");
    }
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn week_copied(&self, week: &WeekDirectory, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Copying [{current}/{total}] {week}"));
    }

    fn done(&self, _result: &MergeResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
