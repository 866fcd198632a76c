use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use clap::Parser;
use surface_scanner::changed::ChangedFileSet;
use surface_scanner::workspace::Workspace;
use surface_scanner::{extract, git};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "surface-scanner")]
#[command(about = "Emit the public declarations found in your changed files", long_about = None)]
/// Arguments received by the main command.
///
/// ## Arguments:
/// - `project` (`String`): Path to the project or workspace root to analyze,
/// - `changed_list` (`Option<String>`): Path to the changed-files list,
/// - `staged` (`bool`): true to take the list from the staged git diff,
/// - `debug` (`bool`): true to display more info, defaults to false.
struct Args {
    /// Path to the project or workspace root to analyze.
    project: String,
    /// Path to the changed-files list, one path per line (as from `git diff
    /// --name-only`).
    #[arg(required_unless_present = "staged")]
    changed_list: Option<String>,
    #[arg(short, long, conflicts_with = "changed_list")]
    /// Take the changed-files list from the staged git diff of the project
    /// root.
    staged: bool,
    #[arg(short, long)]
    /// Display more information.
    debug: bool,
}

/// Get the raw changed-files lines from the list file or from git.
///
/// ## Parameters:
/// * `args` (`&Args`): Arguments of the current run.
///
/// ## Returns:
/// * (`Result<Vec<String>>`): One raw line per changed path. Will fail if
/// the list file is missing or the repository cannot be diffed.
fn changed_lines(args: &Args) -> Result<Vec<String>> {
    if args.staged {
        return git::staged_files(Path::new(&args.project));
    }
    let Some(path) = args.changed_list.as_deref() else {
        bail!("No changed-files list given");
    };
    if !Path::new(path).exists() {
        bail!("Changed files list not found: {path}");
    }
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(|line| line.to_string()).collect())
}

/// Runs the main surface-scanner command with the arguments from `Args`.
/// - Build the changed-file set,
/// - Discover the workspace's compilation units,
/// - Emit one JSON line per public declaration found in a changed file.
///
/// ## Returns:
/// - (`Result<()>`): Ok if no critical error, else description of the error.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if !Path::new(&args.project).exists() {
        bail!("Project root not found: {}", args.project);
    }
    let changed = ChangedFileSet::build(changed_lines(&args)?);
    if changed.is_empty() {
        debug!("no supported source files in the changed list");
        return Ok(());
    }
    debug!("matching against {} changed paths", changed.len());

    let workspace = Workspace::load(Path::new(&args.project))?;
    for unit in workspace.units() {
        match extract::public_symbols(unit, &changed) {
            Ok(records) => {
                for record in records {
                    println!("{}", serde_json::to_string(&record)?);
                }
            }
            Err(error) => warn!("skipping {}: {error:?}", unit.path),
        }
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let default_filter = if debug {
        "surface_scanner=debug"
    } else {
        "surface_scanner=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
