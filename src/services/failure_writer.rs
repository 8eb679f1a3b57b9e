//! 编译失败记录服务
//!
//! 只负责把失败学生的完整诊断信息写入记录文件

use crate::error::CompileError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 编译失败记录
pub struct FailureWriter {
    log_file_path: PathBuf,
}

impl FailureWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_file_path
    }

    /// 写入文件头（覆盖旧内容）
    pub async fn init(&self) -> Result<()> {
        let header = format!(
            "{}\n编译失败记录 - {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        fs::write(&self.log_file_path, header)
            .await
            .with_context(|| format!("无法初始化失败记录: {}", self.log_file_path.display()))?;
        Ok(())
    }

    /// 追加一条失败记录
    pub async fn write(&self, student_name: &str, error: &CompileError) -> Result<()> {
        debug!("写入失败记录: {}", student_name);

        let mut entry = format!(
            "[{}] 学生: {}\n错误: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            student_name,
            error
        );
        if let Some(path) = error.source_path() {
            entry.push_str(&format!("源文件: {}\n", path.display()));
        }
        if let Some((stdout, stderr)) = error.diagnostics() {
            entry.push_str("--- stdout ---\n");
            entry.push_str(stdout);
            entry.push_str("\n--- stderr ---\n");
            entry.push_str(stderr);
            entry.push('\n');
        }
        entry.push_str(&"─".repeat(60));
        entry.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .await?;
        file.write_all(entry.as_bytes()).await?;

        Ok(())
    }
}
