pub mod apply;
pub mod outline;
pub mod store;

pub use apply::{apply, ApplyArgs};
pub use outline::{outline, OutlineArgs};
pub use store::{load, save, LoadArgs, SaveArgs};

use anyhow::{anyhow, Result};
use retouch_parser::{parse, Document};
use std::fs;
use std::path::Path;

/// Read a markup file and check that it parses, printing a source report
/// on failure
pub(crate) fn read_document(path: &Path) -> Result<(String, Document)> {
    let source = fs::read_to_string(path).map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;

    match parse(&source) {
        Ok(doc) => Ok((source, doc)),
        Err(err) => {
            eprintln!("{}", err.report(&source, &path.display().to_string()));
            Err(anyhow!("Failed to parse {}: {}", path.display(), err))
        }
    }
}
