use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "exam_batch.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 学生名单 CSV
    pub roster_path: PathBuf,
    /// LaTeX 模板
    pub template_path: PathBuf,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 合并后的文件名（位于输出目录内）
    pub merged_file_name: String,
    /// 编译器可执行文件
    pub compiler_program: String,
    /// 名单中的姓名列
    pub name_column: String,
    /// 编译失败记录文件
    pub failure_log_file: PathBuf,
    /// 是否对姓名做 LaTeX 转义
    pub escape_names: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster_path: PathBuf::from("alunos.csv"),
            template_path: PathBuf::from("main.tex"),
            output_dir: PathBuf::from("pdfs"),
            merged_file_name: "provas_prontas.pdf".to_string(),
            compiler_program: "pdflatex".to_string(),
            name_column: "Nome".to_string(),
            failure_log_file: PathBuf::from("compile_failures.txt"),
            escape_names: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 读取配置文件（可选），再用环境变量覆盖
    pub fn load() -> Result<Self> {
        let path = std::env::var("EXAM_BATCH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let path = Path::new(&path);
        if path.exists() {
            Ok(Self::from_toml_file(path)?.with_env_overrides())
        } else {
            Ok(Self::from_env())
        }
    }

    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        Self {
            roster_path: std::env::var("ROSTER_PATH").map(PathBuf::from).unwrap_or(self.roster_path),
            template_path: std::env::var("TEMPLATE_PATH").map(PathBuf::from).unwrap_or(self.template_path),
            output_dir: std::env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            merged_file_name: std::env::var("MERGED_FILE_NAME").unwrap_or(self.merged_file_name),
            compiler_program: std::env::var("COMPILER_PROGRAM").unwrap_or(self.compiler_program),
            name_column: std::env::var("ROSTER_NAME_COLUMN").unwrap_or(self.name_column),
            failure_log_file: std::env::var("FAILURE_LOG_FILE").map(PathBuf::from).unwrap_or(self.failure_log_file),
            escape_names: std::env::var("ESCAPE_NAMES").ok().and_then(|v| v.parse().ok()).unwrap_or(self.escape_names),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 合并文件的完整路径
    pub fn merged_path(&self) -> PathBuf {
        self.output_dir.join(&self.merged_file_name)
    }
}
