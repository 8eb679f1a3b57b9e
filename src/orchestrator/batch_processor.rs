//! 批量试卷生成器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责整批学生的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载名单和模板、拆分模板、创建输出目录
//! 2. **逐个处理**：按名单顺序委托 `StudentFlow` 处理每名学生
//! 3. **文件名分配**：保证每名学生的输出文件名唯一
//! 4. **全局统计**：汇总成功/失败数量
//! 5. **合并输出**：全部学生处理完后合并 PDF
//!
//! ## 设计特点
//!
//! - **致命错误前置**：输入缺失或模板结构错误在处理任何学生之前终止
//! - **失败隔离**：单个学生的编译失败不会中断批处理
//! - **只读模板**：模板解析一次，以只读引用传给每名学生

use crate::config::Config;
use crate::error::{AppError, MergeError};
use crate::models::student::StudentRecord;
use crate::models::template::TemplateDocument;
use crate::models::{load_roster, load_template_text};
use crate::services::{
    merge_directory, safe_file_stem, split_template, DocumentCompiler, MergeSummary, PdfLatex,
    Randomizer,
};
use crate::utils::logging::{log_inputs_loaded, log_startup, log_student_start, print_final_stats};
use crate::workflow::{ProcessResult, StudentCtx, StudentFlow};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App<C: DocumentCompiler, R: Rng = StdRng> {
    config: Config,
    template: TemplateDocument,
    students: Vec<StudentRecord>,
    flow: StudentFlow<C>,
    randomizer: Randomizer<R>,
}

impl App<PdfLatex, StdRng> {
    /// 使用外部编译器和系统熵初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let compiler = PdfLatex::new(config.compiler_program.clone());
        Self::initialize_with(config, compiler, Randomizer::from_entropy()).await
    }
}

impl<C: DocumentCompiler, R: Rng> App<C, R> {
    /// 使用指定的编译器和随机源初始化应用
    ///
    /// 名单/模板缺失或模板结构错误时直接返回错误，不处理任何学生。
    pub async fn initialize_with(config: Config, compiler: C, randomizer: Randomizer<R>) -> Result<Self> {
        log_startup(&config.roster_path, &config.template_path, &config.output_dir);

        let students = load_roster(&config.roster_path, &config.name_column).await?;
        let template_text = load_template_text(&config.template_path).await?;
        let template = split_template(&template_text).map_err(AppError::from)?;

        fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|e| AppError::io(&config.output_dir, e))?;

        let flow = StudentFlow::new(&config, compiler);
        flow.failure_writer().init().await?;

        log_inputs_loaded(students.len(), template.question_count());

        Ok(Self {
            config,
            template,
            students,
            flow,
            randomizer,
        })
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn template(&self) -> &TemplateDocument {
        &self.template
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<RunReport> {
        if self.students.is_empty() {
            warn!("⚠️ 名单中没有学生");
        }

        let stats = self.process_all_students().await;

        print_final_stats(
            stats.compiled.len(),
            stats.failed.len(),
            self.students.len(),
            self.flow.failure_writer().path(),
        );

        let merged = self.merge_outputs().await;

        Ok(RunReport {
            compiled: stats.compiled,
            failed: stats.failed,
            merged,
        })
    }

    /// 按名单顺序逐个处理
    async fn process_all_students(&mut self) -> ProcessingStats {
        let total = self.students.len();
        let mut stems = StemAllocator::reserving(&self.config.merged_file_name);
        let mut stats = ProcessingStats::default();

        for (i, student) in self.students.iter().enumerate() {
            let index = i + 1;
            log_student_start(index, total, &student.name);

            let stem = stems.allocate(&student.name);
            let ctx = StudentCtx::new(index, total, stem);

            let result = self
                .flow
                .run(
                    &self.template,
                    &mut self.randomizer,
                    student,
                    &ctx,
                    &self.config.output_dir,
                )
                .await;

            match result {
                ProcessResult::Compiled { artifact, .. } => stats.compiled.push(artifact),
                ProcessResult::Failed { .. } => stats.failed.push(student.name.clone()),
            }
        }

        stats
    }

    /// 合并所有 PDF
    ///
    /// lopdf 的读写是同步的，放到阻塞线程池中执行。
    async fn merge_outputs(&self) -> Option<MergeSummary> {
        info!("\n📚 正在合并 PDF...");
        let output_dir = self.config.output_dir.clone();
        let merged_file_name = self.config.merged_file_name.clone();
        let result =
            tokio::task::spawn_blocking(move || merge_directory(&output_dir, &merged_file_name)).await;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                error!("❌ 合并任务异常终止: {}", e);
                return None;
            }
        };

        match result {
            Ok(summary) => {
                if !summary.skipped.is_empty() {
                    warn!("⚠️ 有 {} 个文件无法读取，已跳过", summary.skipped.len());
                }
                info!("💾 已保存为 {}", summary.path.display());
                Some(summary)
            }
            Err(e @ MergeError::NoInputs { .. }) => {
                warn!("⚠️ {}，未生成合并文件", e);
                None
            }
            Err(e) => {
                error!("❌ 合并失败: {}", e);
                None
            }
        }
    }
}

/// 一次运行的结果
#[derive(Debug)]
pub struct RunReport {
    /// 成功生成的 PDF（按名单顺序）
    pub compiled: Vec<PathBuf>,
    /// 编译失败的学生
    pub failed: Vec<String>,
    /// 合并结果；没有合并时为 None
    pub merged: Option<MergeSummary>,
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    compiled: Vec<PathBuf>,
    failed: Vec<String>,
}

/// 为每名学生分配唯一的文件名
struct StemAllocator {
    used: HashSet<String>,
}

impl StemAllocator {
    /// 预留合并文件的文件名，避免学生输出覆盖合并结果
    fn reserving(merged_file_name: &str) -> Self {
        let mut used = HashSet::new();
        if let Some(stem) = Path::new(merged_file_name).file_stem() {
            used.insert(stem.to_string_lossy().into_owned());
        }
        Self { used }
    }

    fn allocate(&mut self, name: &str) -> String {
        let base = safe_file_stem(name);
        let mut stem = base.clone();
        let mut n = 1;
        while !self.used.insert(stem.clone()) {
            n += 1;
            stem = format!("{}_{}", base, n);
        }
        if n > 1 {
            warn!("⚠️ 文件名 {} 已被占用，{} 改用 {}", base, name, stem);
        }
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_suffixes_colliding_names() {
        let mut stems = StemAllocator::reserving("provas_prontas.pdf");
        assert_eq!(stems.allocate("Ana Souza"), "Ana_Souza");
        assert_eq!(stems.allocate("Ana-Souza"), "Ana_Souza_2");
        assert_eq!(stems.allocate("Ana_Souza_2"), "Ana_Souza_2_2");
        assert_eq!(stems.allocate("***"), "aluno");
        assert_eq!(stems.allocate("???"), "aluno_2");
    }

    #[test]
    fn allocator_never_hands_out_the_merged_name() {
        let mut stems = StemAllocator::reserving("provas_prontas.pdf");
        assert_eq!(stems.allocate("provas prontas"), "provas_prontas_2");
    }
}
