//! 编译服务
//!
//! 写入源文件 → 调用外部编译器 → 清理中间文件。
//! 单个学生的编译失败只返回错误，不会中断批处理。

use crate::error::CompileError;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

/// 文件名中非字母数字字符的替换字符
pub const FILLER_CHAR: char = '_';

/// 姓名中没有任何字母数字时使用的文件名
pub const FALLBACK_STEM: &str = "aluno";

/// 源文件扩展名
pub const SOURCE_EXTENSION: &str = "tex";

/// 输出文件扩展名
pub const OUTPUT_EXTENSION: &str = "pdf";

/// 编译成功后删除的文件（含源文件）
pub const AUXILIARY_EXTENSIONS: [&str; 4] = ["aux", "log", "out", "tex"];

/// 由姓名生成文件名（不含扩展名）
///
/// 只保留 ASCII 字母和数字，其余字符（包括 `ã`、`é` 等非 ASCII 字母）一律替换为
/// [`FILLER_CHAR`]，这样 pdflatex 和各平台文件系统都能直接处理：`João` → `Jo_o`。
/// 没有任何 ASCII 字母数字时返回 [`FALLBACK_STEM`]。
pub fn safe_file_stem(name: &str) -> String {
    if !name.chars().any(|c| c.is_ascii_alphanumeric()) {
        return FALLBACK_STEM.to_string();
    }
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { FILLER_CHAR })
        .collect()
}

/// 编译器运行结果
#[derive(Debug, Clone, Default)]
pub struct CompilerOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// 外部文档编译器
pub trait DocumentCompiler {
    /// 程序名（用于日志和错误信息）
    fn program(&self) -> &str;

    /// 编译 `source`，所有输出写入 `output_dir`
    fn compile(
        &self,
        source: &Path,
        output_dir: &Path,
    ) -> impl Future<Output = std::io::Result<CompilerOutput>> + Send;
}

/// pdflatex（非交互模式）
#[derive(Debug, Clone)]
pub struct PdfLatex {
    program: String,
}

impl PdfLatex {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PdfLatex {
    fn default() -> Self {
        Self::new("pdflatex")
    }
}

impl DocumentCompiler for PdfLatex {
    fn program(&self) -> &str {
        &self.program
    }

    async fn compile(&self, source: &Path, output_dir: &Path) -> std::io::Result<CompilerOutput> {
        let output = Command::new(&self.program)
            .arg("-interaction=nonstopmode")
            .arg("-output-directory")
            .arg(output_dir)
            .arg(source)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(CompilerOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// 编译调用器
pub struct CompilerInvoker<C: DocumentCompiler> {
    compiler: C,
}

impl<C: DocumentCompiler> CompilerInvoker<C> {
    pub fn new(compiler: C) -> Self {
        Self { compiler }
    }

    /// 编译一名学生的文档
    ///
    /// # 参数
    /// - `text`: 组装好的文档
    /// - `stem`: 文件名（通常来自 [`safe_file_stem`]）
    /// - `output_dir`: 输出目录
    ///
    /// # 返回
    /// 成功时返回生成的 PDF 路径
    pub async fn compile(&self, text: &str, stem: &str, output_dir: &Path) -> Result<PathBuf, CompileError> {
        let source_path = output_dir.join(format!("{}.{}", stem, SOURCE_EXTENSION));
        let artifact_path = output_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION));

        fs::write(&source_path, text)
            .await
            .map_err(|source| CompileError::WriteSource {
                path: source_path.clone(),
                source,
            })?;
        debug!("源文件已写入: {}", source_path.display());

        let output = match self.compiler.compile(&source_path, output_dir).await {
            Ok(output) => output,
            Err(source) => {
                return Err(CompileError::Spawn {
                    program: self.compiler.program().to_string(),
                    source_path,
                    source,
                })
            }
        };

        if !output.success {
            // 非交互模式下可能留下不完整的 PDF
            remove_if_exists(&artifact_path).await;
            return Err(CompileError::Failed {
                source_path,
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        cleanup_auxiliary(output_dir, stem).await;

        if !artifact_path.exists() {
            return Err(CompileError::MissingArtifact { path: artifact_path });
        }

        Ok(artifact_path)
    }
}

/// 删除编译产生的中间文件；单个文件删除失败只记录警告
pub async fn cleanup_auxiliary(output_dir: &Path, stem: &str) -> usize {
    let mut removed = 0;
    for ext in AUXILIARY_EXTENSIONS {
        let path = output_dir.join(format!("{}.{}", stem, ext));
        if !path.exists() {
            continue;
        }
        match fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) => warn!("⚠️ 无法删除中间文件 {}: {}", path.display(), e),
        }
    }
    removed
}

async fn remove_if_exists(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path).await {
            warn!("⚠️ 无法删除不完整的输出 {}: {}", path.display(), e);
        }
    }
}
