use super::read_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use retouch_editor::{BlockLayoutSurface, DocumentStore, EditorSession, FileStore};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Markup file to save
    pub input: PathBuf,

    /// Document identifier (letters, digits, '-' and '_')
    #[arg(long)]
    pub id: String,

    /// Public URL slug
    #[arg(long, default_value = "/")]
    pub slug: String,

    /// Mark the document as published
    #[arg(long)]
    pub publish: bool,
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Document identifier
    pub id: String,

    /// Write the markup to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn save(args: SaveArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let (source, _) = read_document(&cwd.join(&args.input))?;
    let store = FileStore::new(config.get_store_dir(cwd));

    let mut session = EditorSession::new(
        source,
        BlockLayoutSurface::new(config.viewport_width),
        config.editor_config(),
    )?;
    let record = session.save(&store, args.id, args.slug, args.publish)?;

    println!(
        "{} Saved {} (revision {}{})",
        "✓".green(),
        record.identifier.bold(),
        record.revision,
        if record.publish { ", published" } else { "" }
    );
    Ok(())
}

pub fn load(args: LoadArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = FileStore::new(config.get_store_dir(cwd));

    let record = store
        .load(&args.id)?
        .ok_or_else(|| anyhow!("No saved document named {:?}", args.id))?;

    match args.output {
        Some(output) => {
            let output = cwd.join(output);
            fs::write(&output, &record.document_markup)?;
            println!(
                "{} Loaded {} revision {} into {}",
                "✓".green(),
                record.identifier.bold(),
                record.revision,
                output.display()
            );
        }
        None => println!("{}", record.document_markup),
    }
    Ok(())
}
