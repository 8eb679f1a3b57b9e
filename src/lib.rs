//! # Exam Paper Batch
//!
//! 从一个 LaTeX 模板为名单中的每名学生生成个性化试卷，
//! 并把所有学生的 PDF 合并成一个文件。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 学生、模板结构、参数，以及名单/模板加载
//!
//! ### ② 业务能力层（Services）
//! - `TemplateSplitter` - 拆分题目区域
//! - `Randomizer` - 参数生成与题目打乱
//! - `Assembler` - 拼接与占位符替换
//! - `CompilerInvoker` - 调用外部编译器并清理
//! - `FailureWriter` - 写失败记录
//! - `merger` - 合并 PDF
//!
//! ### ③ 流程层（Workflow）
//! - `StudentFlow` - 单名学生的流程（随机化 → 组装 → 编译 → 兜底）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 整批学生的处理和最终合并

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, CompileError, MergeError, Result, RosterError, TemplateStructureError};
pub use models::{ParameterSet, QuestionUnit, StudentRecord, TemplateDocument};
pub use orchestrator::{App, RunReport};
pub use services::{DocumentCompiler, PdfLatex, Randomizer};
pub use workflow::{ProcessResult, StudentCtx, StudentFlow};
