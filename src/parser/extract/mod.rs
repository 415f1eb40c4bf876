pub mod education;
pub mod summary;

use super::tree::Element;
use crate::error::StructuralWarning;
use crate::store::SummaryRow;

/// One successfully parsed curriculum: its tree plus the summary projected from it.
#[derive(Debug, Clone)]
pub struct ParsedCv {
    pub filename: String,
    pub root: Element,
    pub summary: SummaryRow,
    pub warnings: Vec<StructuralWarning>,
}

impl ParsedCv {
    pub fn key(&self) -> &str {
        self.summary.key()
    }
}

pub fn extract_all(filename: &str, root: Element) -> ParsedCv {
    let (summary, warnings) = summary::extract(filename, &root);
    ParsedCv {
        filename: filename.to_string(),
        root,
        summary,
        warnings,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sanitize::sanitize_xml;
    use crate::parser::tree::parse;

    fn load(fixture: &str) -> ParsedCv {
        let bytes = std::fs::read(format!("tests/fixtures/{}.xml", fixture)).unwrap();
        let root = parse(&sanitize_xml(&bytes)).unwrap();
        extract_all(&format!("{}.xml", fixture), root)
    }

    #[test]
    fn complete_summary() {
        let cv = load("complete");
        assert!(cv.warnings.is_empty());
        assert_eq!(cv.key(), "1234567890123456");
        assert_eq!(cv.summary.full_name, "Maria da Silva Souza");
        assert_eq!(cv.summary.citation_name, "SOUZA, M. S.;SOUZA, MARIA");
        assert_eq!(cv.summary.birth_city, "São Paulo");
    }

    #[test]
    fn complete_education() {
        let cv = load("complete");
        let (rows, warning) = education::extract(cv.key(), &cv.root);
        assert!(warning.is_none());
        let levels: Vec<&str> = rows.iter().map(|r| r.level.as_str()).collect();
        assert_eq!(levels, vec!["GRADUACAO", "MESTRADO", "DOUTORADO", "POS-DOUTORADO"]);
        let phd = &rows[2];
        assert_eq!(phd.institution, "Universidade de São Paulo");
        assert_eq!(phd.funding_agency, "Conselho Nacional de Desenvolvimento Científico e Tecnológico");
        assert_eq!(phd.scholarship, "SIM");
    }

    #[test]
    fn latin1_with_bare_ampersand() {
        let cv = load("latin1");
        assert_eq!(cv.summary.full_name, "João Gonçalves");
        let (rows, _) = education::extract(cv.key(), &cv.root);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].course, "Pesquisa & Desenvolvimento");
    }

    #[test]
    fn prefixed_education_after_sanitizing() {
        let cv = load("namespaced");
        assert!(cv.warnings.is_empty());
        assert_eq!(cv.key(), "2222333344445555");
        assert_eq!(cv.summary.full_name, "Ana Lima");

        let (rows, warning) = education::extract(cv.key(), &cv.root);
        assert!(warning.is_none());
        let levels: Vec<&str> = rows.iter().map(|r| r.level.as_str()).collect();
        assert_eq!(levels, vec!["DOUTORADO", "POS-DOUTORADO"]);
        assert_eq!(rows[0].course, "Ciência & Tecnologia");
        assert_eq!(rows[0].funding_agency, "CAPES");
        assert_eq!(rows[1].institution, "Instituto de Matemática Pura e Aplicada");
    }

    #[test]
    fn no_identifier_keys_by_filename() {
        let cv = load("no_general_data");
        assert_eq!(cv.key(), "no_general_data.xml");
        assert_eq!(cv.summary.full_name, "");
        assert_eq!(cv.warnings.len(), 1);
    }
}
