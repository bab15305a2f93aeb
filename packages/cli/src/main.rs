mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, load, outline, save, ApplyArgs, LoadArgs, OutlineArgs, SaveArgs};
use tracing_subscriber::EnvFilter;

/// Retouch CLI - edit generated pages section by section
#[derive(Parser, Debug)]
#[command(name = "retouch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log gesture, mutation and history details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List addressable elements with their paths and classification
    Outline(OutlineArgs),

    /// Apply a JSON mutation script with undo/redo steps
    Apply(ApplyArgs),

    /// Save a document to the store
    Save(SaveArgs),

    /// Print or export the last saved version of a document
    Load(LoadArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("retouch=debug,retouch_editor=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retouch=info,retouch_editor=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(|e| anyhow::anyhow!("Cannot get current directory: {}", e))
        .and_then(|cwd| match cli.command {
            Command::Outline(args) => outline(args, &cwd),
            Command::Apply(args) => apply(args, &cwd),
            Command::Save(args) => save(args, &cwd),
            Command::Load(args) => load(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
