//! 模板结构
//!
//! 模板被拆分为：头部 + 区域前缀 + 若干独立题目 + 尾部。
//! 解析一次后不再修改，所有学生共享同一个只读引用。

/// 一道独立的题目
///
/// `marker` 是题目标记本身（如 `\question`），`body` 是标记之后直到
/// 下一个标记或区域结束的内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionUnit {
    pub marker: String,
    pub body: String,
}

impl QuestionUnit {
    pub fn new(marker: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            body: body.into(),
        }
    }

    /// 题目的完整文本
    pub fn text(&self) -> String {
        format!("{}{}", self.marker, self.body)
    }

    /// 写入到已有字符串末尾
    pub fn push_to(&self, out: &mut String) {
        out.push_str(&self.marker);
        out.push_str(&self.body);
    }
}

/// 解析后的模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDocument {
    /// 区域之前的全部内容，包含起始标记
    pub header: String,
    /// 区域内第一个题目标记之前的内容，永不参与重排
    pub prefix: String,
    /// 按原顺序排列的题目
    pub units: Vec<QuestionUnit>,
    /// 结束标记及之后的全部内容
    pub footer: String,
}

impl TemplateDocument {
    pub fn question_count(&self) -> usize {
        self.units.len()
    }

    /// 按原顺序重新拼接
    pub fn render_original(&self) -> String {
        let units: Vec<&QuestionUnit> = self.units.iter().collect();
        self.render_with(&units)
    }

    /// 使用给定顺序的题目拼接完整文本
    pub fn render_with(&self, units: &[&QuestionUnit]) -> String {
        let body_len: usize = units.iter().map(|u| u.marker.len() + u.body.len()).sum();
        let mut out =
            String::with_capacity(self.header.len() + self.prefix.len() + body_len + self.footer.len());
        out.push_str(&self.header);
        out.push_str(&self.prefix);
        for unit in units {
            unit.push_to(&mut out);
        }
        out.push_str(&self.footer);
        out
    }
}
