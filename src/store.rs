use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::error::{SelectError, StructuralWarning};
use crate::parser::extract::{education, ParsedCv};

// ── Rows ──

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "ID Lattes")]
    pub id_lattes: String,
    #[serde(rename = "Nome completo")]
    pub full_name: String,
    #[serde(rename = "Nome em citações")]
    pub citation_name: String,
    #[serde(rename = "Nacionalidade")]
    pub nationality: String,
    #[serde(rename = "País de nascimento")]
    pub birth_country: String,
    #[serde(rename = "Cidade de nascimento")]
    pub birth_city: String,
    #[serde(rename = "Sexo")]
    pub sex: String,
    #[serde(rename = "Arquivo")]
    pub filename: String,
}

impl SummaryRow {
    /// Identifier, or the filename for curricula exported without one.
    pub fn key(&self) -> &str {
        if self.id_lattes.is_empty() {
            &self.filename
        } else {
            &self.id_lattes
        }
    }

    pub fn label(&self, missing_name: &str) -> String {
        let name = if self.full_name.is_empty() {
            missing_name
        } else {
            &self.full_name
        };
        format!("{} ({})", name, self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EducationRow {
    #[serde(rename = "Nível")]
    pub level: String,
    #[serde(rename = "Nome do curso")]
    pub course: String,
    #[serde(rename = "Instituição")]
    pub institution: String,
    #[serde(rename = "Status do curso")]
    pub status: String,
    #[serde(rename = "Ano início")]
    pub start_year: String,
    #[serde(rename = "Ano conclusão")]
    pub end_year: String,
    #[serde(rename = "Possui bolsa")]
    pub scholarship: String,
    #[serde(rename = "Agência de fomento")]
    pub funding_agency: String,
}

// ── Session ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub label: String,
    pub key: String,
}

/// Parsed curricula for one run. Every parsed document contributes a
/// summary row; trees are keyed by identifier (or filename), last one wins.
#[derive(Debug, Default)]
pub struct Session {
    rows: Vec<SummaryRow>,
    docs: HashMap<String, ParsedCv>,
    missing_name: String,
}

impl Session {
    pub fn new(missing_name: impl Into<String>) -> Self {
        Session {
            rows: Vec::new(),
            docs: HashMap::new(),
            missing_name: missing_name.into(),
        }
    }

    /// Insert a curriculum. Its summary row is always kept; a tree already
    /// stored under the same key is replaced and returned with a warning.
    pub fn insert(&mut self, cv: ParsedCv) -> Option<(ParsedCv, StructuralWarning)> {
        let key = cv.key().to_string();
        let by = cv.filename.clone();
        self.rows.push(cv.summary.clone());

        let old = self.docs.insert(key.clone(), cv)?;
        let warning = StructuralWarning::DuplicateKey {
            key,
            replaced: old.filename.clone(),
            by,
        };
        warn!("{}", warning);
        Some((old, warning))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn get(&self, key: &str) -> Option<&ParsedCv> {
        self.docs.get(key)
    }

    /// One row per parsed document, in insertion order.
    pub fn summaries(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Labels in row order. Rows sharing a key and a name collapse into one label.
    pub fn selections(&self) -> Vec<Selection> {
        let mut out: Vec<Selection> = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let label = row.label(&self.missing_name);
            if out.iter().any(|s| s.label == label) {
                continue;
            }
            out.push(Selection {
                label,
                key: row.key().to_string(),
            });
        }
        out
    }

    /// Find a curriculum by its selection label or its bare key.
    /// `None` picks the first row, like an untouched select box.
    pub fn resolve(&self, selector: Option<&str>) -> Result<&ParsedCv, SelectError> {
        let Some(selector) = selector else {
            return self
                .rows
                .first()
                .and_then(|row| self.get(row.key()))
                .ok_or(SelectError::Empty);
        };
        if let Some(cv) = self.get(selector) {
            return Ok(cv);
        }
        self.selections()
            .into_iter()
            .find(|s| s.label == selector)
            .and_then(|s| self.get(&s.key))
            .ok_or_else(|| SelectError::Unknown(selector.to_string()))
    }

    pub fn education(
        &self,
        selector: Option<&str>,
    ) -> Result<(&ParsedCv, Vec<EducationRow>, Option<StructuralWarning>), SelectError> {
        let cv = self.resolve(selector)?;
        let (rows, warning) = education::extract(cv.key(), &cv.root);
        Ok((cv, rows, warning))
    }
}
