pub mod extract;
pub mod sanitize;
pub mod tree;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::ParseFailure;
use extract::ParsedCv;

/// Uploaded bytes and the name they arrived under.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(RawDocument { filename, bytes })
    }
}

/// Three-step pipeline: bytes → clean text → element tree → summary.
pub fn process_document(doc: &RawDocument) -> Result<ParsedCv, ParseFailure> {
    let xml = sanitize::sanitize_xml(&doc.bytes);
    let root = tree::parse(&xml).map_err(|source| ParseFailure {
        filename: doc.filename.clone(),
        source,
    })?;
    debug!(file = %doc.filename, root = %root.tag, "parsed");

    let cv = extract::extract_all(&doc.filename, root);
    for w in &cv.warnings {
        warn!(file = %doc.filename, "{}", w);
    }
    Ok(cv)
}
