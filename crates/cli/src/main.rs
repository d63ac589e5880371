//! RecordRecon command-line reconciliation tool.
//!
//! Provides subcommands for reporting the differences between two JSON
//! record files, writing the merged canonical record, and generating /
//! validating reconciliation configuration files.

mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tracing_subscriber::EnvFilter;

use recordrecon_core::report::{render_value, ReconciliationReport};
use recordrecon_core::{DifferenceKind, ReconEngine, ReconcileConfig, Record};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// RecordRecon command-line reconciliation tool.
#[derive(Parser, Debug)]
#[command(
    name = "recordrecon",
    version,
    about = "Diff, convert, and merge differently-shaped JSON records"
)]
struct Cli {
    /// Path to the TOML reconciliation config. Omitted means no field
    /// mapping and no converters.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show debug-level log output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile two records and print the difference report.
    Report {
        /// Path to the source record (JSON object).
        source: PathBuf,

        /// Path to the target record (JSON object).
        target: PathBuf,

        /// Print the report as a Markdown table.
        #[arg(long)]
        markdown: bool,

        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Reconcile two records and write the canonical record.
    Merge {
        /// Path to the source record (JSON object).
        source: PathBuf,

        /// Path to the target record (JSON object).
        target: PathBuf,

        /// Output path for the canonical record; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a sample reconciliation config file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./recordrecon.toml")]
        output: PathBuf,
    },

    /// Validate a reconciliation config file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .without_time()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Report {
            source,
            target,
            markdown,
            json,
        } => cmd_report(&cli.config, &source, &target, markdown, json),
        Commands::Merge {
            source,
            target,
            output,
        } => cmd_merge(&cli.config, &source, &target, output.as_deref()),
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&cli.config),
    }
}

// ---------------------------------------------------------------------------
// Loading helpers
// ---------------------------------------------------------------------------

fn load_config(path: &Option<PathBuf>) -> Result<ReconcileConfig> {
    match path {
        Some(p) => ReconcileConfig::load_from_file(p)
            .context("failed to load reconciliation config"),
        None => Ok(ReconcileConfig::new()),
    }
}

fn load_record(path: &Path) -> Result<Record> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record file '{}'", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse '{}' as JSON", path.display()))?;
    match value {
        serde_json::Value::Object(record) => Ok(record),
        other => bail!(
            "record file '{}' must contain a JSON object, found a {} value",
            path.display(),
            recordrecon_core::TypeTag::of(&other)
        ),
    }
}

fn reconcile(config: &Option<PathBuf>, source: &Path, target: &Path) -> Result<ReconciliationReport> {
    let engine = ReconEngine::new(load_config(config)?);
    let source = load_record(source)?;
    let target = load_record(target)?;
    Ok(engine.reconcile(&source, &target))
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_report(
    config: &Option<PathBuf>,
    source: &Path,
    target: &Path,
    markdown: bool,
    json: bool,
) -> Result<()> {
    let report = reconcile(config, source, target)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.differences.is_empty() {
        println!("{}", style::success("records reconcile cleanly"));
        return Ok(());
    }

    if markdown {
        if let Some(table) = &report.markdown_table {
            print!("{}", table);
        }
    } else {
        print_difference_table(&report);
        println!(
            "  {}",
            style::dim("run with --markdown or --json for machine-readable output")
        );
    }

    print_summary(&report);
    Ok(())
}

fn cmd_merge(
    config: &Option<PathBuf>,
    source: &Path,
    target: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let report = reconcile(config, source, target)?;
    let canonical = serde_json::to_string_pretty(&report.canonical_record)?;

    match output {
        Some(path) => {
            std::fs::write(path, canonical)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            println!(
                "{}",
                style::success(&format!("canonical record written to {}", path.display()))
            );
            print_summary(&report);
        }
        // Keep stdout as pure JSON so the output can be piped.
        None => println!("{}", canonical),
    }

    Ok(())
}

fn cmd_init(output: &Path) -> Result<()> {
    let sample_config = r#"# RecordRecon configuration.
#
# [[mapping]] entries rename source fields to the names the target record
# uses; they apply in file order at merge time.
#
# [[converters]] entries bind a built-in coercion (number, string, boolean)
# to a source field; they run against type-mismatched fields only.

debug = false

[[mapping]]
source = "userName"
target = "username"

[[converters]]
field = "age"
coercion = "number"
"#;

    if output.exists() {
        bail!("refusing to overwrite existing file '{}'", output.display());
    }
    std::fs::write(output, sample_config)
        .with_context(|| format!("failed to write '{}'", output.display()))?;
    println!(
        "{}",
        style::success(&format!("sample config written to {}", output.display()))
    );
    Ok(())
}

fn cmd_validate(config: &Option<PathBuf>) -> Result<()> {
    let path = match config {
        Some(p) => p,
        None => bail!("validate requires --config <path>"),
    };
    let config = ReconcileConfig::load_from_file(path)
        .context("failed to load reconciliation config")?;

    println!("{}", style::header("Reconciliation config"));
    println!("  Mappings    {}", config.field_map.len());
    println!("  Converters  {}", config.converters.len());

    let collisions = config.field_map.collisions();
    if collisions.is_empty() {
        println!("{}", style::success("config is valid"));
    } else {
        for target in &collisions {
            println!(
                "{}",
                style::warn(&format!(
                    "multiple source fields map to target '{}'; the last declaration wins",
                    target
                ))
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_difference_table(report: &ReconciliationReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["Field", "Source Value", "Target Value", "Kind", "Solution"]);

    for diff in &report.differences {
        let kind_cell = match diff.kind {
            DifferenceKind::MissingInTarget | DifferenceKind::ExtraInTarget => {
                Cell::new(diff.kind.to_string()).fg(comfy_table::Color::Yellow)
            }
            DifferenceKind::TypeMismatch if diff.resolved == Some(true) => {
                Cell::new(diff.kind.to_string()).fg(comfy_table::Color::Green)
            }
            DifferenceKind::TypeMismatch | DifferenceKind::ValueMismatch => {
                Cell::new(diff.kind.to_string()).fg(comfy_table::Color::Red)
            }
        };

        table.add_row(vec![
            Cell::new(&diff.field),
            Cell::new(render_value(diff.source_value.as_ref())),
            Cell::new(render_value(diff.target_value.as_ref())),
            kind_cell,
            Cell::new(&diff.solution),
        ]);
    }

    println!("{}", table);
}

fn print_summary(report: &ReconciliationReport) {
    let total = report.differences.len();
    let resolved = report
        .differences
        .iter()
        .filter(|d| !d.is_unresolved())
        .count();

    if total == 0 {
        return;
    }
    if report.has_unresolved {
        println!(
            "{}",
            style::warn(&format!(
                "{} of {} differences unresolved",
                total - resolved,
                total
            ))
        );
    } else {
        println!(
            "{}",
            style::success(&format!("all {} differences auto-resolved", total))
        );
    }
    println!(
        "  {}",
        style::dim("run with --markdown or --json for machine-readable output")
    );
}
