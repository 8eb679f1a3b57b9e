//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use std::path::Path;
use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `roster`: 名单路径
/// - `template`: 模板路径
/// - `output_dir`: 输出目录
pub fn log_startup(roster: &Path, template: &Path, output_dir: &Path) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 个性化试卷生成");
    info!("📋 名单: {}", roster.display());
    info!("📄 模板: {}", template.display());
    info!("📁 输出目录: {}", output_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录名单和模板加载信息
///
/// # 参数
/// - `students`: 学生总数
/// - `questions`: 模板中的题目数
pub fn log_inputs_loaded(students: usize, questions: usize) {
    info!("✓ 找到 {} 名学生", students);
    info!("✓ 模板包含 {} 道题目，每名学生顺序随机", questions);
    info!("💡 逐个处理，单个学生失败不影响其他学生\n");
}

/// 记录学生开始处理
pub fn log_student_start(index: usize, total: usize, name: &str) {
    info!("\n{}", "─".repeat(60));
    info!("[学生 {}] 处理第 {}/{} 名学生: {}", index, index, total, name);
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `failure_log`: 失败记录路径
pub fn print_final_stats(success: usize, failed: usize, total: usize, failure_log: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    if failed > 0 {
        info!("失败详情见: {}", failure_log.display());
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 取文本最后 `n` 行（每行以换行结尾）
pub fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].iter().map(|line| format!("{}\n", line)).collect()
}
