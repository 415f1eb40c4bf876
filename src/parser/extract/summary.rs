use crate::error::StructuralWarning;
use crate::parser::tree::Element;
use crate::store::SummaryRow;

pub const ROOT_TAG: &str = "CURRICULO-VITAE";
const GENERAL_DATA: &str = "DADOS-GERAIS";

pub fn extract(filename: &str, root: &Element) -> (SummaryRow, Vec<StructuralWarning>) {
    let mut warnings = Vec::new();

    if root.local_name() != ROOT_TAG {
        warnings.push(StructuralWarning::RootTag {
            filename: filename.to_string(),
            found: root.local_name().to_string(),
        });
    }

    let mut row = SummaryRow {
        id_lattes: root.attr("NUMERO-IDENTIFICADOR").to_string(),
        filename: filename.to_string(),
        ..SummaryRow::default()
    };

    match root.find_child(GENERAL_DATA) {
        Some(general) => {
            row.full_name = general.attr("NOME-COMPLETO").to_string();
            row.citation_name = general.attr("NOME-EM-CITACOES-BIBLIOGRAFICAS").to_string();
            row.nationality = general.attr("NACIONALIDADE").to_string();
            row.birth_country = general.attr("PAIS-DE-NASCIMENTO").to_string();
            row.birth_city = general.attr("CIDADE-NASCIMENTO").to_string();
            row.sex = general.attr("SEXO").to_string();
        }
        None => warnings.push(StructuralWarning::MissingGeneralData {
            filename: filename.to_string(),
        }),
    }

    (row, warnings)
}
