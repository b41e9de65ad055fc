//! CLI entry point for the nsm legacy project migrator.
//!
//! This binary converts every legacy `.csproj` under a solution directory
//! into an SDK-style descriptor and removes `packages.config` and
//! `Properties/` along the way.
//!
//! # Usage
//!
//! ```bash
//! nsm-migrate [OPTIONS] <COMMAND>
//!
//! # Migrate a solution in place
//! nsm-migrate migrate --path /path/to/solution
//!
//! # Show what would be written, without touching anything
//! nsm-migrate plan --path /path/to/solution --show-content
//!
//! # Migrate with four workers and keep a JSON report
//! nsm-migrate --jobs 4 migrate --report migration.json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::{self, BufRead, Write};

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, bail};
use nsm_core::Config;
use nsm_migrator::{MigrateError, MigrationUpdate, ProjectPlan, SolutionMigrator, StatsSnapshot};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Migrates legacy .NET project descriptors to the SDK-style format.
#[derive(Parser)]
#[command(name = "nsm-migrate", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Solution directory.
    ///
    /// Prompted for on the terminal if not specified.
    #[arg(short, long, global = true, env = "NSM_MIGRATE_PATH")]
    path: Option<Utf8PathBuf>,

    /// JSON configuration file.
    #[arg(short, long, global = true, env = "NSM_MIGRATE_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Number of projects migrated in parallel (overrides the config file).
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Migrate every project under the solution directory.
    Migrate {
        /// Write a JSON report of the run to this file.
        #[arg(short, long)]
        report: Option<Utf8PathBuf>,
    },

    /// Show what a migration would do without changing any file.
    Plan {
        /// Print the new descriptor of each project.
        #[arg(short, long)]
        show_content: bool,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
    },
}

/// Plan output format.
#[derive(Clone, Copy, ValueEnum)]
enum PlanFormat {
    /// Human-readable text.
    Text,
    /// JSON format.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional config file and CLI overrides.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => Config::default(),
    };

    if let Some(jobs) = cli.jobs {
        config.discovery.max_parallel_jobs = jobs;
    }

    config.validate()?;
    Ok(config)
}

/// Returns the solution directory from `--path`, or asks for it.
fn resolve_root(cli: &Cli) -> color_eyre::Result<Utf8PathBuf> {
    if let Some(path) = &cli.path {
        return Ok(path.clone());
    }

    {
        let mut stdout = io::stdout().lock();
        write!(stdout, "Please enter solution directory path: ")?;
        stdout.flush()?;
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let path = line.trim();
    if path.is_empty() {
        bail!("No solution directory given");
    }
    Ok(Utf8PathBuf::from(path))
}

/// Converts a migration error into a report that names the project and kind.
fn describe_failure(err: MigrateError) -> color_eyre::Report {
    let kind = err.kind();
    let context = match err.project_directory() {
        Some(dir) => format!("Migration failed in project {dir} ({kind})"),
        None => format!("Migration failed ({kind})"),
    };
    color_eyre::Report::new(err).wrap_err(context)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs the migration, printing progress as projects complete.
async fn run_migrate(
    migrator: SolutionMigrator,
    report_path: Option<Utf8PathBuf>,
) -> color_eyre::Result<()> {
    info!(root = %migrator.root(), "Starting migration");

    let (tx, mut rx) = mpsc::channel(256);
    let worker = migrator.clone();
    let handle = tokio::task::spawn_blocking(move || worker.migrate_streaming(tx));

    let mut report = None;
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    while let Some(update) = rx.recv().await {
        match update {
            MigrationUpdate::ProjectsDiscovered(count) => {
                let _ = writeln!(stdout, "Found {count} projects");
            }
            MigrationUpdate::ProjectMigrated(outcome) => {
                let _ = writeln!(
                    stdout,
                    "  migrated  {} [{}]",
                    outcome.directory,
                    outcome.platforms.joined()
                );
            }
            MigrationUpdate::ProjectFailed { directory, kind } => {
                let _ = writeln!(stderr, "  failed    {directory} ({kind})");
            }
            MigrationUpdate::Complete(done) => report = Some(done),
        }
    }

    if let Err(err) = handle.await? {
        print_stats_summary(&migrator.stats());
        return Err(describe_failure(err));
    }

    let Some(report) = report else {
        bail!("Migration finished without a report");
    };

    print_stats_summary(&report.stats);

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)
            .wrap_err("Failed to serialize migration report")?;
        std::fs::write(path.as_std_path(), json)
            .wrap_err_with(|| format!("Failed to write report to {path}"))?;
        info!(path = %path, "Report written");
    }

    Ok(())
}

/// Runs a dry run and prints the plans.
fn run_plan(
    migrator: &SolutionMigrator,
    show_content: bool,
    format: PlanFormat,
) -> color_eyre::Result<()> {
    info!(root = %migrator.root(), "Planning migration");

    let plans = migrator.plan().map_err(describe_failure)?;

    let mut handle = io::stdout().lock();
    match format {
        PlanFormat::Json => {
            let json = serde_json::to_string_pretty(&plans)
                .wrap_err("Failed to serialize migration plan")?;
            writeln!(handle, "{json}")?;
        }
        PlanFormat::Text => {
            for plan in &plans {
                print_plan(&mut handle, plan, show_content)?;
            }
            writeln!(handle)?;
            writeln!(handle, "{} projects would be migrated", plans.len())?;
        }
    }

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints one project plan.
fn print_plan(out: &mut impl Write, plan: &ProjectPlan, show_content: bool) -> io::Result<()> {
    let project = &plan.project;

    writeln!(out, "{}", project.directory)?;
    writeln!(out, "  descriptor:   {}", project.descriptor_path)?;
    writeln!(out, "  output:       {}", plan.output_path)?;
    writeln!(out, "  platforms:    {}", plan.platforms.joined())?;
    writeln!(
        out,
        "  references:   {} projects, {} packages",
        project.project_references.len(),
        project.package_references.len()
    )?;
    if plan.removes_lock_file {
        writeln!(out, "  removes:      lock file")?;
    }
    if plan.removes_build_metadata {
        writeln!(out, "  removes:      build metadata directory")?;
    }
    if show_content {
        writeln!(out)?;
        for line in plan.content.lines() {
            writeln!(out, "    {line}")?;
        }
    }
    writeln!(out)
}

/// Prints a summary of migration statistics, after success or failure.
fn print_stats_summary(stats: &StatsSnapshot) {
    let _ = write_stats_summary(&mut io::stdout().lock(), stats);
}

fn write_stats_summary(out: &mut impl Write, stats: &StatsSnapshot) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Migration Summary")?;
    writeln!(out, "=================")?;
    writeln!(out)?;
    writeln!(out, "Projects discovered:     {}", stats.discovered)?;
    writeln!(out, "  Migrated:              {}", stats.migrated)?;
    writeln!(out, "  Failed:                {}", stats.failed)?;
    if stats.remaining() > stats.failed {
        writeln!(
            out,
            "  Not started:           {}",
            stats.remaining() - stats.failed
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Project references:      {}", stats.project_references)?;
    writeln!(out, "Package references:      {}", stats.package_references)?;
    writeln!(out, "Lock files removed:      {}", stats.lock_files_removed)?;
    writeln!(out, "Metadata dirs removed:   {}", stats.build_metadata_removed)
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Resolve configuration and solution root
    let config = build_config(&cli)?;
    let root = resolve_root(&cli)?;
    let migrator = SolutionMigrator::new(root, config).map_err(describe_failure)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Migrate { report } => run_migrate(migrator, report.clone()).await,
        Commands::Plan {
            show_content,
            format,
        } => run_plan(&migrator, *show_content, *format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(stats: &StatsSnapshot) -> String {
        let mut out = Vec::new();
        write_stats_summary(&mut out, stats).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_summary_after_failed_run() {
        let stats = StatsSnapshot {
            discovered: 3,
            migrated: 1,
            failed: 1,
            ..StatsSnapshot::default()
        };

        let text = summary(&stats);
        assert!(text.contains("  Migrated:              1\n"));
        assert!(text.contains("  Failed:                1\n"));
        assert!(text.contains("  Not started:           1\n"));
    }

    #[test]
    fn test_summary_after_complete_run() {
        let stats = StatsSnapshot {
            discovered: 2,
            migrated: 2,
            package_references: 4,
            ..StatsSnapshot::default()
        };

        let text = summary(&stats);
        assert!(text.contains("  Failed:                0\n"));
        assert!(!text.contains("Not started"));
        assert!(text.ends_with("Metadata dirs removed:   0\n"));
    }
}
