use crate::error::StructuralWarning;
use crate::parser::tree::Element;
use crate::store::EducationRow;

const EDUCATION_BLOCK: &str = "FORMACAO-ACADEMICA-TITULACAO";

/// Recognized levels, declared in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationLevel {
    Undergraduate,
    Specialization,
    Masters,
    ProfessionalMasters,
    Doctorate,
    Postdoctorate,
    TenureQualification,
    MedicalResidency,
    AdvancedTraining,
    TechnicalCourse,
    PrimarySchool,
    SecondarySchool,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 12] = [
        EducationLevel::Undergraduate,
        EducationLevel::Specialization,
        EducationLevel::Masters,
        EducationLevel::ProfessionalMasters,
        EducationLevel::Doctorate,
        EducationLevel::Postdoctorate,
        EducationLevel::TenureQualification,
        EducationLevel::MedicalResidency,
        EducationLevel::AdvancedTraining,
        EducationLevel::TechnicalCourse,
        EducationLevel::PrimarySchool,
        EducationLevel::SecondarySchool,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            EducationLevel::Undergraduate => "GRADUACAO",
            EducationLevel::Specialization => "ESPECIALIZACAO",
            EducationLevel::Masters => "MESTRADO",
            EducationLevel::ProfessionalMasters => "MESTRADO-PROFISSIONALIZANTE",
            EducationLevel::Doctorate => "DOUTORADO",
            EducationLevel::Postdoctorate => "POS-DOUTORADO",
            EducationLevel::TenureQualification => "LIVRE-DOCENCIA",
            EducationLevel::MedicalResidency => "RESIDENCIA-MEDICA",
            EducationLevel::AdvancedTraining => "APERFEICOAMENTO",
            EducationLevel::TechnicalCourse => "CURSO-TECNICO-PROFISSIONALIZANTE",
            EducationLevel::PrimarySchool => "ENSINO-FUNDAMENTAL-PRIMEIRO-GRAU",
            EducationLevel::SecondarySchool => "ENSINO-MEDIO-SEGUNDO-GRAU",
        }
    }
}

/// Education rows ordered by level, then by document order within a level.
/// A missing education block yields no rows and a warning.
pub fn extract(key: &str, root: &Element) -> (Vec<EducationRow>, Option<StructuralWarning>) {
    let Some(block) = root.find_child(EDUCATION_BLOCK) else {
        return (
            Vec::new(),
            Some(StructuralWarning::MissingEducation { key: key.to_string() }),
        );
    };

    let rows = EducationLevel::ALL
        .into_iter()
        .flat_map(|level| block.children_named(level.tag()).map(move |e| to_row(level, e)))
        .collect();
    (rows, None)
}

fn to_row(level: EducationLevel, e: &Element) -> EducationRow {
    EducationRow {
        level: level.tag().to_string(),
        course: e.attr("NOME-CURSO").to_string(),
        institution: e.attr("NOME-INSTITUICAO").to_string(),
        status: e.attr("STATUS-DO-CURSO").to_string(),
        start_year: e.attr("ANO-DE-INICIO").to_string(),
        end_year: e.attr("ANO-DE-CONCLUSAO").to_string(),
        scholarship: e.attr("FLAG-BOLSA").to_string(),
        funding_agency: e.attr("NOME-AGENCIA").to_string(),
    }
}
