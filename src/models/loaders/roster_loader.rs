use crate::error::{AppError, RosterError};
use crate::models::student::StudentRecord;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// 从 CSV 文件加载学生名单
///
/// 文件不存在时返回 `AppError::MissingInput`。
pub async fn load_roster(path: &Path, name_column: &str) -> Result<Vec<StudentRecord>, AppError> {
    if !path.exists() {
        return Err(AppError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).await.map_err(|e| AppError::io(path, e))?;
    let text = decode_text(&bytes);
    debug!("名单文件 {} 共 {} 字节", path.display(), bytes.len());

    Ok(parse_roster(&text, name_column)?)
}

/// 解析名单文本
///
/// 姓名为空的行会被跳过。
pub fn parse_roster(text: &str, name_column: &str) -> Result<Vec<StudentRecord>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let column = headers
        .iter()
        .position(|h| h == name_column)
        .ok_or_else(|| RosterError::MissingColumn {
            column: name_column.to_string(),
            headers: headers.clone(),
        })?;

    let mut students = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;
        match record.get(column) {
            Some(name) if !name.is_empty() => students.push(StudentRecord::new(name, row)),
            _ => warn!("⚠️ 名单第 {} 行没有姓名，已跳过", row),
        }
    }

    Ok(students)
}

/// UTF-8 优先（去掉 BOM），否则按 Latin-1 解码
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // Latin-1 的每个字节就是同值的 Unicode 码点
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_in_roster_order() {
        let students = parse_roster("Nome,Turma\nAna,A\nBruno,B\n", "Nome").unwrap();
        assert_eq!(
            students,
            vec![StudentRecord::new("Ana", 1), StudentRecord::new("Bruno", 2)]
        );
    }

    #[test]
    fn skips_blank_names() {
        let students = parse_roster("Nome\nAna\n\"  \"\nCarla\n", "Nome").unwrap();
        let names: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Carla"]);
        assert_eq!(students[1].row, 3);
    }

    #[test]
    fn missing_column_is_reported_with_headers() {
        let err = parse_roster("Aluno,Turma\nAna,A\n", "Nome").unwrap_err();
        match err {
            RosterError::MissingColumn { column, headers } => {
                assert_eq!(column, "Nome");
                assert_eq!(headers, vec!["Aluno", "Turma"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decodes_latin1_when_not_utf8() {
        // "João" in Latin-1
        let bytes = b"Nome\nJo\xE3o\n";
        let text = decode_text(bytes);
        let students = parse_roster(&text, "Nome").unwrap();
        assert_eq!(students[0].name, "João");
    }

    #[test]
    fn strips_utf8_bom() {
        let text = decode_text("\u{FEFF}Nome\nAna\n".as_bytes());
        assert!(text.starts_with("Nome"));
        assert_eq!(parse_roster(&text, "Nome").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_fatal_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alunos.csv");
        let err = load_roster(&path, "Nome").await.unwrap_err();
        assert!(matches!(err, AppError::MissingInput { .. }));
    }
}
