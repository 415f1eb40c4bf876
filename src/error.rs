use thiserror::Error;

/// Why a document could not be turned into an element tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("invalid content: {0}")]
    Content(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("closing tag without matching opening tag at byte {position}")]
    UnexpectedEnd { position: u64 },

    #[error("content after the document element at byte {position}")]
    TrailingContent { position: u64 },

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("no root element")]
    NoRoot,
}

/// A document that was dropped from the batch. Other documents are unaffected.
#[derive(Debug, Error)]
#[error("failed to parse XML {filename}: {source}")]
pub struct ParseFailure {
    pub filename: String,
    #[source]
    pub source: TreeError,
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no curriculum matches {0:?}")]
    Unknown(String),

    #[error("no curricula loaded")]
    Empty,
}

/// Non-fatal structural problems. Extraction carries on with empty values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralWarning {
    #[error("{filename} does not look like a CURRICULO-VITAE document (root tag: {found})")]
    RootTag { filename: String, found: String },

    #[error("DADOS-GERAIS not found in {filename}")]
    MissingGeneralData { filename: String },

    #[error("FORMACAO-ACADEMICA-TITULACAO not found for {key}")]
    MissingEducation { key: String },

    #[error("key {key} from {replaced} replaced by {by} (same identifier)")]
    DuplicateKey { key: String, replaced: String, by: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages() {
        let w = StructuralWarning::RootTag {
            filename: "a.xml".into(),
            found: "OUTRO".into(),
        };
        assert_eq!(
            w.to_string(),
            "a.xml does not look like a CURRICULO-VITAE document (root tag: OUTRO)"
        );
        let w = StructuralWarning::DuplicateKey {
            key: "42".into(),
            replaced: "a.xml".into(),
            by: "b.xml".into(),
        };
        assert_eq!(w.to_string(), "key 42 from a.xml replaced by b.xml (same identifier)");
    }

    #[test]
    fn failure_names_the_file() {
        let f = ParseFailure {
            filename: "m.xml".into(),
            source: TreeError::NoRoot,
        };
        assert_eq!(f.to_string(), "failed to parse XML m.xml: no root element");
    }
}
