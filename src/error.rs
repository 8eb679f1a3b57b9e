use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
///
/// 这里的错误都是致命的：在处理任何学生之前就会终止整个运行。
#[derive(Debug, Error)]
pub enum AppError {
    /// 名单或模板文件不存在
    #[error("输入文件不存在: {}", .path.display())]
    MissingInput { path: PathBuf },

    /// 名单解析错误
    #[error("名单错误: {0}")]
    Roster(#[from] RosterError),

    /// 模板结构错误
    #[error("模板结构错误: {0}")]
    Template(#[from] TemplateStructureError),

    /// 文件系统错误（读取输入、创建输出目录）
    #[error("文件错误 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// 创建文件系统错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

/// 名单（CSV）错误
#[derive(Debug, Error)]
pub enum RosterError {
    /// CSV 解析失败
    #[error("CSV解析失败: {0}")]
    Csv(#[from] csv::Error),

    /// 表头中没有姓名列
    #[error("名单中找不到姓名列 '{column}' (表头: {headers:?})")]
    MissingColumn {
        column: String,
        headers: Vec<String>,
    },
}

/// 模板结构错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateStructureError {
    #[error("找不到题目区域起始标记 '{marker}'")]
    MissingRegionStart { marker: String },

    #[error("题目区域起始标记之后找不到结束标记 '{marker}'")]
    MissingRegionEnd { marker: String },

    #[error("模板中存在多个题目区域 (标记 '{marker}')")]
    MultipleRegions { marker: String },

    #[error("题目区域中找不到题目标记 '{marker}'")]
    NoQuestions { marker: String },

    #[error("模板方言无效: {message}")]
    InvalidDialect { message: String },
}

/// 单个学生的编译错误
///
/// 只影响当前学生，批处理继续进行。
#[derive(Debug, Error)]
pub enum CompileError {
    /// 写入源文件失败
    #[error("写入源文件失败 ({}): {source}", .path.display())]
    WriteSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 无法启动编译器
    #[error("无法启动编译器 '{program}' (源文件保留: {}): {source}", .source_path.display())]
    Spawn {
        program: String,
        source_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 编译器返回非零退出码
    #[error("编译失败 (退出码: {exit_code:?}, 源文件保留: {})", .source_path.display())]
    Failed {
        source_path: PathBuf,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// 编译器报告成功但没有生成 PDF
    #[error("编译器报告成功，但找不到输出文件: {}", .path.display())]
    MissingArtifact { path: PathBuf },
}

impl CompileError {
    /// 保留下来用于排查的源文件路径
    pub fn source_path(&self) -> Option<&PathBuf> {
        match self {
            CompileError::Spawn { source_path, .. } | CompileError::Failed { source_path, .. } => {
                Some(source_path)
            }
            _ => None,
        }
    }

    /// 编译器的标准输出和标准错误
    pub fn diagnostics(&self) -> Option<(&str, &str)> {
        match self {
            CompileError::Failed { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }
}

/// 合并错误
#[derive(Debug, Error)]
pub enum MergeError {
    /// 没有可合并的 PDF
    #[error("目录 {} 中没有可合并的 PDF 文件", .dir.display())]
    NoInputs { dir: PathBuf },

    /// 无法列出输出目录
    #[error("无法读取目录 ({}): {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 单个 PDF 加载失败（该文件被跳过）
    #[error("无法加载 PDF ({}): {message}", .path.display())]
    Load { path: PathBuf, message: String },

    /// 写入合并文件失败
    #[error("写入合并文件失败 ({}): {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AppError>;
