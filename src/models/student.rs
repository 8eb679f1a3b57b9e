use std::fmt;

/// 名单中的一名学生
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    /// 姓名（原样保留，用于替换和生成文件名）
    pub name: String,
    /// 名单中的行号（从1开始，不含表头）
    pub row: usize,
}

impl StudentRecord {
    pub fn new(name: impl Into<String>, row: usize) -> Self {
        Self {
            name: name.into(),
            row,
        }
    }
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (第 {} 行)", self.name, self.row)
    }
}
