//! Workspace migration CLI.
//!
//! Provides the `dynmig` binary. `migrate` upgrades a workspace file with
//! the built-in rule set; `inspect` reports a file's declared version and
//! connector integrity without changing it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use dynmig_core::{parse_document, write_document, Document, Version};
use dynmig_migrate::{
    builtin_registry, ConnectorGraph, ConnectorIssue, MigrationConfig, MigrationManager,
};

/// Workspace file migration tools.
#[derive(Parser)]
#[command(name = "dynmig", about = "Upgrade workspace files to the current format")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Migrate a workspace file to the current version.
    Migrate {
        /// Workspace file to migrate.
        input: PathBuf,

        /// Write the migrated XML here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Version to migrate towards (default: 0.7.0).
        #[arg(long, env = "DYNMIG_TARGET_VERSION")]
        target_version: Option<Version>,

        /// Rewrite the root Version attribute after migrating.
        #[arg(long)]
        stamp_version: bool,
    },
    /// Print the declared version and connector integrity of a file.
    Inspect {
        /// Workspace file to inspect.
        input: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Migrate {
            input,
            output,
            target_version,
            stamp_version,
        } => run_migrate(&input, output.as_deref(), target_version, stamp_version),
        Commands::Inspect { input } => run_inspect(&input),
    };
    process::exit(exit_code);
}

/// Execute the migrate subcommand.
///
/// Returns exit code: 0 = success, 1 = migration error, 3 = I/O or parse
/// error.
fn run_migrate(
    input: &Path,
    output: Option<&Path>,
    target_version: Option<Version>,
    stamp_version: bool,
) -> i32 {
    let mut document = match load(input) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let mut config = MigrationConfig::default().with_stamp_version(stamp_version);
    if let Some(version) = target_version {
        config = config.with_current_version(version);
    }

    let registry = match builtin_registry() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: invalid built-in rule set: {}", e);
            return 1;
        }
    };
    let manager = MigrationManager::new(Arc::new(registry), config);

    let report = match manager.migrate_document(&mut document) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Migration error: {}", e);
            return 1;
        }
    };

    warn_on_issues(&ConnectorGraph::from_document(&document));

    let xml = match write_document(&document) {
        Ok(x) => x,
        Err(e) => {
            eprintln!("Error: failed to serialize workspace: {}", e);
            return 3;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, xml) {
                eprintln!("Error: failed to write '{}': {}", path.display(), e);
                return 3;
            }
            // Report as JSON on stdout for machine-readable output
            let json = report.to_json_pretty().unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize report: {}\"}}", e)
            });
            println!("{}", json);
        }
        None => {
            tracing::info!(
                "{}: {} workspace rule(s), {} node(s) migrated",
                input.display(),
                report.workspace.fired.len(),
                report.nodes.len()
            );
            print!("{}", xml);
        }
    }
    0
}

/// Execute the inspect subcommand.
fn run_inspect(input: &Path) -> i32 {
    let document = match load(input) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let declared = match document.declared_version() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 3;
        }
    };

    let graph = ConnectorGraph::from_document(&document);
    warn_on_issues(&graph);

    let summary = serde_json::json!({
        "declared": declared,
        "nodes": document.nodes().len(),
        "connectors": document.connectors().len(),
        "resolved_connectors": graph.connector_count(),
        "issues": graph.issues(),
    });
    let json = serde_json::to_string_pretty(&summary).unwrap_or_else(|e| {
        format!("{{\"error\": \"failed to serialize summary: {}\"}}", e)
    });
    println!("{}", json);
    0
}

/// Reads and parses a workspace file, mapping failures to exit code 3.
fn load(path: &Path) -> Result<Document, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: failed to read '{}': {}", path.display(), e);
        3
    })?;
    parse_document(&text).map_err(|e| {
        eprintln!("Error: failed to parse '{}': {}", path.display(), e);
        3
    })
}

fn warn_on_issues(graph: &ConnectorGraph) {
    for issue in graph.issues() {
        match issue {
            ConnectorIssue::Dangling {
                position, missing, ..
            } => {
                let missing: Vec<&str> = missing.iter().map(|g| g.as_str()).collect();
                tracing::warn!(
                    "connector {} references missing node(s): {}",
                    position,
                    missing.join(", ")
                );
            }
            ConnectorIssue::Malformed { position, reason } => {
                tracing::warn!("connector {} is malformed: {}", position, reason);
            }
        }
    }
}
