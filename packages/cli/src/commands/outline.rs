use super::read_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use retouch_editor::path::descendants;
use retouch_editor::{Classifier, NodeKind};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Markup file, or a directory to scan for .html files
    pub input: PathBuf,

    /// Only list draggable sections
    #[arg(short, long)]
    pub sections: bool,
}

pub fn outline(args: OutlineArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let classifier = Classifier::new(config.editor_config().classifier);
    let input = cwd.join(&args.input);

    let files = if input.is_file() {
        vec![input]
    } else if input.is_dir() {
        find_markup_files(&input)
    } else {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    };

    for file in files {
        outline_file(&file, &classifier, args.sections)?;
    }
    Ok(())
}

fn outline_file(path: &Path, classifier: &Classifier, sections_only: bool) -> Result<()> {
    let (_, doc) = read_document(path)?;

    println!("{}", path.display().to_string().bright_blue().bold());

    let mut sections = 0;
    let mut total = 0;
    for node in descendants(&doc) {
        let kind = classifier.classify_node(&node);
        total += 1;
        if kind == NodeKind::Draggable {
            sections += 1;
        } else if sections_only {
            continue;
        }

        let node_path = node.path();
        let indent = "  ".repeat(node_path.depth());
        let marker = match kind {
            NodeKind::Draggable => "▤".green(),
            NodeKind::EditableOnly => "·".dimmed(),
        };
        println!("{}{} {}", indent, marker, node_path);
    }

    println!("   {} elements, {} sections", total, sections);
    println!();
    Ok(())
}

fn find_markup_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "html" || ext == "htm")
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_markup_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("a.html"), "<p>a</p>").unwrap();
        std::fs::write(dir.path().join("nested/b.htm"), "<p>b</p>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let mut found: Vec<String> = find_markup_files(dir.path())
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        found.sort();
        assert_eq!(found, vec!["a.html", "b.htm"]);
    }
}
