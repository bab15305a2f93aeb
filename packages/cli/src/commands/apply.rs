use super::read_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use retouch_editor::{BlockLayoutSurface, EditorSession, Mutation, PreviewSurface};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Markup file to edit
    pub input: PathBuf,

    /// JSON array of steps, e.g. [{"op": "remove", "path": "section:nth-child(2)"}, {"op": "undo"}]
    #[arg(short, long)]
    pub script: PathBuf,

    /// Write the result here instead of back to the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the result instead of writing it
    #[arg(long)]
    pub stdout: bool,
}

/// One entry of a mutation script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    History(HistoryStep),
    Mutate(Mutation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HistoryStep {
    Undo,
    Redo,
}

pub fn apply(args: ApplyArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = cwd.join(&args.input);
    let (source, _) = read_document(&input)?;

    let script = fs::read_to_string(cwd.join(&args.script))
        .map_err(|e| anyhow!("Cannot read script {}: {}", args.script.display(), e))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&script)?;

    let mut session = EditorSession::new(
        source,
        BlockLayoutSurface::new(config.viewport_width),
        config.editor_config(),
    )?;

    let changed = run_script(&mut session, &steps)?;

    if args.stdout {
        println!("{}", session.document());
        return Ok(());
    }

    let output = args.output.map(|o| cwd.join(o)).unwrap_or(input);
    fs::write(&output, session.document())?;

    println!(
        "{} {} of {} steps changed the document",
        "✓".green(),
        changed,
        steps.len()
    );
    println!(
        "   History: {} snapshots, cursor at {}",
        session.history().len(),
        session.history().cursor()
    );
    println!("   Written: {}", output.display());
    Ok(())
}

/// Run every step in order; returns how many changed the document
pub fn run_script<S: PreviewSurface>(session: &mut EditorSession<S>, steps: &[ScriptStep]) -> Result<usize> {
    let mut changed = 0;

    for (i, step) in steps.iter().enumerate() {
        let did_change = match step {
            ScriptStep::History(HistoryStep::Undo) => session.undo()?,
            ScriptStep::History(HistoryStep::Redo) => session.redo()?,
            ScriptStep::Mutate(mutation) => session
                .apply(mutation.clone())
                .map_err(|e| anyhow!("Step {} ({}) failed: {}", i + 1, mutation.name(), e))?,
        };

        if did_change {
            changed += 1;
        } else {
            println!("   {} step {} had no effect", "⚠️".yellow(), i + 1);
        }
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_editor::EditorConfig;

    #[test]
    fn test_parse_script() {
        let json = r#"[
            {"op": "move", "source": "section:nth-child(1)", "target": "section:nth-child(2)", "position": "after"},
            {"op": "undo"},
            {"op": "redo"},
            {"op": "duplicate", "path": "section:nth-child(2)"}
        ]"#;

        let steps: Vec<ScriptStep> = serde_json::from_str(json).unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(steps[0], ScriptStep::Mutate(Mutation::Move { .. })));
        assert_eq!(steps[1], ScriptStep::History(HistoryStep::Undo));
        assert_eq!(steps[2], ScriptStep::History(HistoryStep::Redo));
        assert!(matches!(steps[3], ScriptStep::Mutate(Mutation::Duplicate { .. })));
    }

    #[test]
    fn test_run_script() {
        let doc = r#"<body><section id="a">X</section><section id="b">Y</section></body>"#;
        let steps: Vec<ScriptStep> = serde_json::from_str(
            r#"[
                {"op": "move_down", "path": "section:nth-child(1)"},
                {"op": "remove", "path": "section:nth-child(9)"},
                {"op": "undo"},
                {"op": "undo"},
                {"op": "redo"}
            ]"#,
        )
        .unwrap();

        let mut session = EditorSession::new(doc, BlockLayoutSurface::new(800.0), EditorConfig::default()).unwrap();
        let changed = run_script(&mut session, &steps).unwrap();

        assert_eq!(changed, 3);
        assert_eq!(
            session.document(),
            r#"<body><section id="b">Y</section><section id="a">X</section></body>"#
        );
    }

    #[test]
    fn test_bad_replacement_names_the_step() {
        let steps = vec![ScriptStep::Mutate(Mutation::ReplaceSubtree {
            path: "p:nth-child(1)".parse().unwrap(),
            markup: "<p".to_string(),
        })];
        let mut session =
            EditorSession::new("<body><p>x</p></body>", BlockLayoutSurface::new(800.0), EditorConfig::default())
                .unwrap();

        let err = run_script(&mut session, &steps).unwrap_err();
        assert!(err.to_string().starts_with("Step 1 (replace_subtree) failed"));
    }
}
