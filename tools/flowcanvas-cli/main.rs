use clap::{Parser, Subcommand};
use flowcanvas::id::new_id;
use flowcanvas::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Inspect and tidy workflow documents exported by the canvas editor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a workflow and report every lint issue
    Check {
        /// Path to the workflow JSON file
        path: PathBuf,
    },
    /// Import a workflow, recompute every loop's subflow mirror and write it back out
    Normalize {
        /// Path to the workflow JSON file
        path: PathBuf,
        /// Where to write the result; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print fresh node/edge identifiers
    NewId {
        /// How many identifiers to print
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { path } => run_check(&path),
        Command::Normalize { path, output } => run_normalize(&path, output.as_deref()),
        Command::NewId { count } => (0..count).for_each(|_| println!("{}", new_id())),
    }
}

fn load_editor(path: &Path) -> GraphEditor {
    let workflow = Workflow::from_file(path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load workflow '{}': {}",
            path.display(),
            e
        ))
    });
    let mut editor = GraphEditor::new();
    editor
        .load(workflow)
        .unwrap_or_else(|e| exit_with_error(&format!("Workflow rejected: {}", e)));
    editor
}

fn run_check(path: &Path) {
    let start = Instant::now();
    let editor = load_editor(path);
    let issues = editor.validate();
    let stale = editor.stale_edges().len();

    println!("Workflow '{}' (version {})", editor.name(), editor.version());
    println!("  Nodes: {}", editor.store().nodes().len());
    println!("  Edges: {} ({} stale)", editor.store().edges().len(), stale);

    if issues.is_empty() {
        println!("\nNo issues found ({:?}).", start.elapsed());
        return;
    }

    println!("\n{} issue(s):", issues.len());
    for issue in &issues {
        println!("  - {}", issue);
    }
    std::process::exit(1);
}

fn run_normalize(path: &Path, output: Option<&Path>) {
    let mut editor = load_editor(path);
    editor
        .normalize_mirrors()
        .unwrap_or_else(|e| exit_with_error(&format!("Mirror recomputation failed: {}", e)));
    let json = editor
        .export_json()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize workflow: {}", e)));

    match output {
        Some(out) => {
            fs::write(out, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", out.display(), e))
            });
            eprintln!("Wrote {}", out.display());
        }
        None => println!("{}", json),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
