use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docsmith_core::{Columns, Config, NodeKind, RunReport, UniqueId, UnmaterializedPolicy};
use docsmith_dbt::{ArtifactPair, EntityRegistry, Manifest, ReferenceResolver, Resolution};
use docsmith_render::{DocumentWriter, SiteBuilder};

const DEFAULT_CONFIG: &str = "docsmith.toml";

/// Docsmith - Markdown documentation pages from dbt artifacts
#[derive(Parser)]
#[command(name = "docsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: docsmith.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct ArtifactArgs {
    /// Path to dbt manifest.json
    #[arg(short = 'f', long)]
    manifest: Option<PathBuf>,

    /// Path to dbt catalog.json
    #[arg(short = 'g', long)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one markdown page per documented object
    Generate {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Output directory for the pages
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a JSON run report
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Fail when a declared object has no catalog entry
        #[arg(long)]
        strict: bool,
    },

    /// Show references and column tests for one object
    Inspect {
        /// Object to inspect (short name or unique_id)
        object: String,

        #[command(flatten)]
        artifacts: ArtifactArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { artifacts, output, report, strict } => {
            artifacts.apply(&mut config);
            if let Some(output) = output {
                config.output_dir = output;
            }
            if report.is_some() {
                config.report = report;
            }
            if strict {
                config.unmaterialized = UnmaterializedPolicy::Fail;
            }
            generate_command(&config)
        }
        Commands::Inspect { object, artifacts } => {
            artifacts.apply(&mut config);
            inspect_command(&config, &object)
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG);
    if default_path.exists() {
        return Config::from_file(default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    debug!("No config file found, using defaults");
    Ok(Config::default())
}

impl ArtifactArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(manifest) = &self.manifest {
            config.manifest = manifest.clone();
        }
        if let Some(catalog) = &self.catalog {
            config.catalog = catalog.clone();
        }
    }
}

fn load_artifacts(config: &Config) -> Result<ArtifactPair> {
    let manifest_path = config.manifest_path();
    let catalog_path = config.catalog_path();

    ArtifactPair::load(&manifest_path, &catalog_path).with_context(|| {
        format!(
            "Failed to load {} and {}. Run 'dbt docs generate' first.",
            manifest_path.display(),
            catalog_path.display()
        )
    })
}

/// Build the registry and apply column test attributions
fn resolve(artifacts: &ArtifactPair, policy: UnmaterializedPolicy) -> Result<(EntityRegistry, Resolution)> {
    let mut registry = EntityRegistry::build(&artifacts.manifest, &artifacts.catalog, policy)
        .context("Failed to build the object registry")?;

    let resolution = ReferenceResolver::new(&registry)
        .resolve()
        .context("Failed to resolve references")?;

    let added = resolution
        .apply(&mut registry)
        .context("Failed to attribute tests to columns")?;
    debug!(added, "Column tests attributed");

    Ok((registry, resolution))
}

/// Generate command - render and write every page
fn generate_command(config: &Config) -> Result<()> {
    let artifacts = load_artifacts(config)?;
    let (registry, resolution) = resolve(&artifacts, config.unmaterialized)?;

    let site = SiteBuilder::new(&registry, &resolution)
        .context("Failed to load page templates")?
        .build()
        .context("Failed to render pages")?;

    let output_dir = config.output_path();
    let written = DocumentWriter::new(&output_dir)
        .write(&site)
        .with_context(|| format!("Failed to write pages to {}", output_dir.display()))?;

    let mut report = RunReport::new(artifacts.digests);
    report.summary = site.summary().clone();
    for unique_id in registry.skipped() {
        report.add_skipped(unique_id.clone());
    }

    if let Some(report_path) = config.report_path() {
        report
            .save_to_file(&report_path)
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        info!(path = %report_path.display(), "Report written");
    }

    print_generate_summary(&report, written, &output_dir);

    Ok(())
}

fn print_generate_summary(report: &RunReport, written: usize, output_dir: &Path) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Documentation Generated".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    let summary = &report.summary;
    println!("{}", "Summary:".bold());
    println!("  Models:  {}", summary.models);
    println!("  Seeds:   {}", summary.seeds);
    println!("  Sources: {}", summary.sources);
    println!("  Tests:   {}", summary.tests);
    println!("  Macros:  {}", summary.macros);
    println!();
    println!("{} {} pages in {}", "Wrote".green().bold(), written, output_dir.display());

    if !report.skipped.is_empty() {
        println!();
        println!(
            "{}",
            format!("⚠ {} declared objects have no catalog entry and were skipped:", report.skipped.len())
                .yellow()
                .bold()
        );
        for unique_id in &report.skipped {
            println!("  - {}", unique_id.yellow());
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Inspect command - print what the page of one object would link to
fn inspect_command(config: &Config, object: &str) -> Result<()> {
    let artifacts = load_artifacts(config)?;
    let (registry, resolution) = resolve(&artifacts, UnmaterializedPolicy::Skip)?;

    let unique_id = find_object_id(&artifacts.manifest, object)?;
    let id = UniqueId::parse(unique_id.as_str());

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Object References".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("{} {}", "Object:".bold(), unique_id.green());
    println!("{} {}", "Kind:".bold(), id.kind);
    println!();

    match &id.kind {
        NodeKind::Model | NodeKind::Seed | NodeKind::Source => {
            if !registry.has_relation(&unique_id) {
                println!("{}", "⚠ Not materialized in the catalog; no page is generated".yellow().bold());
            } else {
                let references = resolution.references(&unique_id);
                print_list("Referenced by models:", &references.models);
                print_list("Referenced by tests:", &references.tests);

                if let Some(columns) = registry.columns(&unique_id) {
                    print_columns(columns);
                }
            }
        }
        NodeKind::Macro => {
            let callers = resolution.macro_references(&unique_id);
            print_list("Called by models:", &callers.models);
            print_list("Called by macros:", &callers.macros);
        }
        NodeKind::Test => {
            if let Some(test) = registry.test(&unique_id) {
                println!("{} {}", "Test kind:".bold(), test.test_kind);
                println!(
                    "{} {}",
                    "Column:".bold(),
                    test.column_name.as_deref().unwrap_or("(table-level)")
                );
                print_list("Depends on:", &test.depends_on);
            }
        }
        NodeKind::Other(_) => {}
    }

    let downstream = registry.graph().downstream(&unique_id);
    println!("{} {}", "Downstream objects:".bold(), downstream.len());

    println!();
    println!("{}", "=".repeat(60).bright_blue());

    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    println!("{} {}", title.bold(), items.len());
    for item in items {
        println!("  - {}", item.yellow());
    }
    println!();
}

fn print_columns(columns: &Columns) {
    println!("{}", "Columns:".bold());
    for column in columns.values() {
        let tests = if column.tests.is_empty() {
            "no tests".dimmed().to_string()
        } else {
            column.tests.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        println!("  {} ({}): {}", column.name.cyan(), column.data_type, tests);
    }
    println!();
}

/// Find an object's unique_id from a short name or unique_id
fn find_object_id(manifest: &Manifest, name: &str) -> Result<String> {
    if name.contains('.') && manifest.get(name).is_some() {
        return Ok(name.to_string());
    }

    manifest
        .find_by_name(name)
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Object '{}' not found in manifest. Try using the full unique_id (e.g., 'model.project.{}')",
                name,
                name
            )
        })
}
