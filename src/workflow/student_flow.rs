//! 学生处理流程 - 流程层
//!
//! 核心职责：定义"一名学生"的完整处理流程
//!
//! 流程顺序：
//! 1. 生成参数 → 打乱题目
//! 2. 组装文档（先重排，再替换占位符）
//! 3. 编译 → 清理
//! 4. 失败时写入失败记录（兜底）

use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::CompileError;
use crate::models::parameters::{ParameterSet, ParameterSpec, DEFAULT_PARAMETER_SPECS};
use crate::models::student::StudentRecord;
use crate::models::template::TemplateDocument;
use crate::services::{
    latex_escape, Assembler, CompilerInvoker, DocumentCompiler, FailureWriter, Randomizer,
};
use crate::utils::logging::tail_lines;
use crate::workflow::student_ctx::StudentCtx;

/// 控制台上显示的编译输出行数，完整内容见失败记录
const CONSOLE_DIAGNOSTIC_LINES: usize = 15;

/// 学生处理结果
#[derive(Debug)]
pub enum ProcessResult {
    /// 编译成功
    Compiled {
        artifact: PathBuf,
        params: ParameterSet,
    },
    /// 编译失败（已记录，批处理继续）
    Failed {
        error: CompileError,
        params: ParameterSet,
    },
}

/// 学生处理流程
///
/// - 编排单名学生的完整处理流程
/// - 不持有模板，模板以只读引用传入
/// - 失败只影响当前学生
pub struct StudentFlow<C: DocumentCompiler> {
    assembler: Assembler,
    invoker: CompilerInvoker<C>,
    failure_writer: FailureWriter,
    parameter_specs: Vec<ParameterSpec>,
    verbose_logging: bool,
}

impl<C: DocumentCompiler> StudentFlow<C> {
    /// 创建新的学生处理流程
    pub fn new(config: &Config, compiler: C) -> Self {
        let assembler = if config.escape_names {
            Assembler::default().with_escaper(latex_escape)
        } else {
            Assembler::default()
        };

        Self {
            assembler,
            invoker: CompilerInvoker::new(compiler),
            failure_writer: FailureWriter::new(&config.failure_log_file),
            parameter_specs: DEFAULT_PARAMETER_SPECS.to_vec(),
            verbose_logging: config.verbose_logging,
        }
    }

    pub fn failure_writer(&self) -> &FailureWriter {
        &self.failure_writer
    }

    pub async fn run<R: Rng>(
        &self,
        template: &TemplateDocument,
        randomizer: &mut Randomizer<R>,
        student: &StudentRecord,
        ctx: &StudentCtx,
        output_dir: &Path,
    ) -> ProcessResult {
        let idx = ctx.student_index;
        debug!("{} 开始处理 {}", ctx, student.name);

        // ========== 1. 随机化 ==========
        let params = randomizer.generate_parameters(&self.parameter_specs);
        let units = randomizer.shuffle_units(&template.units);

        if self.verbose_logging {
            let order: Vec<String> = units
                .iter()
                .map(|u| crate::utils::logging::truncate_text(u.body.trim(), 30))
                .collect();
            debug!("[学生 {}] 题目顺序: {:?}", idx, order);
        }

        // ========== 2. 组装 ==========
        let text = self.assembler.assemble(template, &units, &params, &student.name);
        debug!("[学生 {}] 文档长度: {} 字节", idx, text.len());

        // ========== 3. 编译 ==========
        info!("[学生 {}] 🔨 正在编译 {}.tex ...", idx, ctx.file_stem);
        match self.invoker.compile(&text, &ctx.file_stem, output_dir).await {
            Ok(artifact) => {
                info!(
                    "[学生 {}] ✓ PDF 已生成: {} (参数: {})",
                    idx, student.name, params
                );
                ProcessResult::Compiled { artifact, params }
            }
            Err(error) => {
                error!(
                    "[学生 {}] ❌ {} 编译失败: {} (参数: {})",
                    idx, student.name, error, params
                );
                if let Some((stdout, stderr)) = error.diagnostics() {
                    error!(
                        "[学生 {}] 编译输出 (最后 {} 行):\n{}{}",
                        idx,
                        CONSOLE_DIAGNOSTIC_LINES,
                        tail_lines(stdout, CONSOLE_DIAGNOSTIC_LINES),
                        tail_lines(stderr, CONSOLE_DIAGNOSTIC_LINES)
                    );
                }

                // ========== 4. 兜底：写入失败记录 ==========
                match self.failure_writer.write(&student.name, &error).await {
                    Ok(()) => warn!(
                        "[学生 {}] ⚠️ 完整诊断已写入 {}",
                        idx,
                        self.failure_writer.path().display()
                    ),
                    Err(e) => warn!("[学生 {}] ⚠️ 无法写入失败记录: {}", idx, e),
                }

                ProcessResult::Failed { error, params }
            }
        }
    }
}
