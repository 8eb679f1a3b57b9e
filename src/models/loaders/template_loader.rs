use super::roster_loader::decode_text;
use crate::error::AppError;
use std::path::Path;
use tokio::fs;

/// 读取模板文本
///
/// 与名单相同：UTF-8 优先，否则按 Latin-1 解码，不会引入替换字符。
pub async fn load_template_text(path: &Path) -> Result<String, AppError> {
    if !path.exists() {
        return Err(AppError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).await.map_err(|e| AppError::io(path, e))?;
    Ok(decode_text(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn legacy_encoded_template_has_no_replacement_chars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.tex");
        // "Questão" in Latin-1
        std::fs::write(&path, b"\\begin{questions}\\question Quest\xE3o aleat1\n\\end{questions}").unwrap();

        let text = load_template_text(&path).await.unwrap();
        assert!(!text.contains('\u{FFFD}'));
        assert!(text.contains("\\question Questão aleat1"));
    }

    #[tokio::test]
    async fn utf8_template_is_read_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.tex");
        std::fs::write(&path, "\\section{Avaliação}\n").unwrap();

        let text = load_template_text(&path).await.unwrap();
        assert_eq!(text, "\\section{Avaliação}\n");
    }

    #[tokio::test]
    async fn missing_template_is_fatal_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template_text(&dir.path().join("nope.tex")).await.unwrap_err();
        assert!(matches!(err, AppError::MissingInput { .. }));
    }
}
