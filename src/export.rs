use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write rows as UTF-8 CSV with a byte-order mark so spreadsheet tools pick
/// the right encoding. The header comes from the row's serde names.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(UTF8_BOM)?;
    write_csv_to(file, rows)?;
    info!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

pub fn write_csv_to<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn to_json<T: Serialize>(rows: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EducationRow, SummaryRow};

    fn row() -> SummaryRow {
        SummaryRow {
            id_lattes: "123".into(),
            full_name: "Souza, Maria \"Mari\"".into(),
            filename: "m.xml".into(),
            ..SummaryRow::default()
        }
    }

    #[test]
    fn summary_csv_has_bom_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("resumo_lattes.csv");
        write_csv(&path, &[row()]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("ID Lattes,Nome completo,Nome em citações,Nacionalidade,País de nascimento,Cidade de nascimento,Sexo,Arquivo")
        );
        assert_eq!(lines.next(), Some(r#"123,"Souza, Maria ""Mari""",,,,,,m.xml"#));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn education_header() {
        let mut buf = Vec::new();
        let rows = vec![EducationRow {
            level: "MESTRADO".into(),
            ..EducationRow::default()
        }];
        write_csv_to(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("Nível,Nome do curso,Instituição,Status do curso,Ano início,Ano conclusão,Possui bolsa,Agência de fomento")
        );
        assert!(text.contains("MESTRADO,,,,,,,"));
    }

    #[test]
    fn json_uses_column_names() {
        let json = to_json(&[row()]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v[0]["ID Lattes"], "123");
        assert_eq!(v[0]["Arquivo"], "m.xml");
    }
}
