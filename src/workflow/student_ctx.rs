//! 学生处理上下文
//!
//! 封装"我正在处理名单中的第几个学生、输出用什么文件名"这一信息

use std::fmt::Display;

/// 学生处理上下文
#[derive(Debug, Clone)]
pub struct StudentCtx {
    /// 学生序号（从1开始，仅用于日志显示）
    pub student_index: usize,

    /// 学生总数
    pub total: usize,

    /// 输出文件名（不含扩展名）
    pub file_stem: String,
}

impl StudentCtx {
    pub fn new(student_index: usize, total: usize, file_stem: String) -> Self {
        Self {
            student_index,
            total,
            file_stem,
        }
    }
}

impl Display for StudentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[学生 {}/{} 文件#{}]",
            self.student_index, self.total, self.file_stem
        )
    }
}
