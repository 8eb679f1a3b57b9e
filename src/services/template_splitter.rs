//! 模板拆分服务
//!
//! 基于文本标记而不是 LaTeX 语法：找到唯一的题目区域，
//! 按题目标记切成若干独立题目，并去掉题目末尾的强制分页命令。

use crate::error::TemplateStructureError;
use crate::models::template::{QuestionUnit, TemplateDocument};
use regex::Regex;

/// 模板方言：区域标记、题目标记、分页命令
#[derive(Debug, Clone)]
pub struct TemplateDialect {
    pub region_start: String,
    pub region_end: String,
    pub question_marker: String,
    pub page_breaks: Vec<String>,
}

impl Default for TemplateDialect {
    fn default() -> Self {
        Self {
            region_start: r"\begin{questions}".to_string(),
            region_end: r"\end{questions}".to_string(),
            question_marker: r"\question".to_string(),
            page_breaks: vec![
                r"\newpage".to_string(),
                r"\clearpage".to_string(),
                r"\pagebreak".to_string(),
            ],
        }
    }
}

/// 模板拆分器
pub struct TemplateSplitter {
    dialect: TemplateDialect,
    trailing_breaks: Regex,
}

impl TemplateSplitter {
    pub fn new(dialect: TemplateDialect) -> Result<Self, TemplateStructureError> {
        let alternatives = dialect
            .page_breaks
            .iter()
            .map(|b| regex::escape(b))
            .collect::<Vec<_>>()
            .join("|");
        // 末尾连续的分页命令（可带空白）
        let pattern = format!(r"(?:\s*(?:{})\s*)+\z", alternatives);
        let trailing_breaks =
            Regex::new(&pattern).map_err(|e| TemplateStructureError::InvalidDialect {
                message: e.to_string(),
            })?;

        Ok(Self {
            dialect,
            trailing_breaks,
        })
    }

    /// 拆分模板
    pub fn split(&self, text: &str) -> Result<TemplateDocument, TemplateStructureError> {
        let d = &self.dialect;

        let start = text
            .find(&d.region_start)
            .ok_or_else(|| TemplateStructureError::MissingRegionStart {
                marker: d.region_start.clone(),
            })?;
        let region_begin = start + d.region_start.len();

        let region_len = text[region_begin..]
            .find(&d.region_end)
            .ok_or_else(|| TemplateStructureError::MissingRegionEnd {
                marker: d.region_end.clone(),
            })?;
        let region_finish = region_begin + region_len;

        if text[region_finish..].contains(&d.region_start) {
            return Err(TemplateStructureError::MultipleRegions {
                marker: d.region_start.clone(),
            });
        }

        let header = &text[..region_begin];
        let region = &text[region_begin..region_finish];
        let footer = &text[region_finish..];

        let positions = self.marker_positions(region);
        let Some(&first) = positions.first() else {
            return Err(TemplateStructureError::NoQuestions {
                marker: d.question_marker.clone(),
            });
        };

        let units = positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                let end = positions.get(i + 1).copied().unwrap_or(region.len());
                let body = &region[pos + d.question_marker.len()..end];
                QuestionUnit::new(d.question_marker.clone(), self.normalize_body(body))
            })
            .collect();

        Ok(TemplateDocument {
            header: header.to_string(),
            prefix: region[..first].to_string(),
            units,
            footer: footer.to_string(),
        })
    }

    /// 题目标记的位置；标记后紧跟 ASCII 字母时不算（`\questions` 等）
    fn marker_positions(&self, region: &str) -> Vec<usize> {
        let marker = &self.dialect.question_marker;
        region
            .match_indices(marker.as_str())
            .map(|(pos, _)| pos)
            .filter(|&pos| {
                !region[pos + marker.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic())
            })
            .collect()
    }

    /// 去掉末尾分页命令，并保证以单个换行结尾
    fn normalize_body(&self, body: &str) -> String {
        let stripped = self.trailing_breaks.replace(body, "");
        let mut out = stripped.trim_end_matches(['\n', '\r']).to_string();
        out.push('\n');
        out
    }
}

/// 使用默认方言拆分
pub fn split_template(text: &str) -> Result<TemplateDocument, TemplateStructureError> {
    TemplateSplitter::new(TemplateDialect::default())?.split(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\\documentclass{exam}\n\
\\begin{document}\n\
Nome: completo\n\
\\begin{questions}\n\
\\question Quanto é aleat1 + aleat2?\n\
\\newpage\n\
\\question Calcule aleat3.\n\
\\clearpage\n\
\n\
\\question Converta aleat5.\n\
\\end{questions}\n\
\\end{document}\n";

    #[test]
    fn splits_header_units_and_footer() {
        let doc = split_template(TEMPLATE).unwrap();

        assert!(doc.header.ends_with("\\begin{questions}"));
        assert!(doc.header.contains("Nome: completo"));
        assert_eq!(doc.prefix, "\n");
        assert!(doc.footer.starts_with("\\end{questions}"));
        assert!(doc.footer.ends_with("\\end{document}\n"));

        assert_eq!(doc.question_count(), 3);
        assert_eq!(doc.units[0].text(), "\\question Quanto é aleat1 + aleat2?\n");
        assert_eq!(doc.units[1].text(), "\\question Calcule aleat3.\n");
        assert_eq!(doc.units[2].text(), "\\question Converta aleat5.\n");
    }

    #[test]
    fn page_breaks_are_stripped_from_every_unit() {
        let doc = split_template(TEMPLATE).unwrap();
        for unit in &doc.units {
            assert!(!unit.body.contains("\\newpage"));
            assert!(!unit.body.contains("\\clearpage"));
        }
    }

    #[test]
    fn page_break_in_the_middle_of_a_unit_is_kept() {
        let text = "\\begin{questions}\\question A\n\\newpage\nB\n\\pagebreak\n\\end{questions}";
        let doc = split_template(text).unwrap();
        assert_eq!(doc.units[0].body, " A\n\\newpage\nB\n");
    }

    #[test]
    fn prefix_before_first_marker_is_preserved() {
        let text = "\\begin{questions}\n\\pointsinmargin\n\\question A\n\\question B\n\\end{questions}";
        let doc = split_template(text).unwrap();
        assert_eq!(doc.prefix, "\n\\pointsinmargin\n");
        assert_eq!(doc.question_count(), 2);
    }

    #[test]
    fn questions_environment_name_is_not_a_marker() {
        let text = "\\begin{questions}\\question A \\questionsomething\n\\question[5] B\n\\end{questions}";
        let doc = split_template(text).unwrap();
        assert_eq!(doc.question_count(), 2);
        assert_eq!(doc.units[1].body, "[5] B\n");
    }

    #[test]
    fn original_order_round_trips_through_render() {
        let doc = split_template(TEMPLATE).unwrap();
        let rendered = doc.render_original();
        assert!(rendered.starts_with(&doc.header));
        assert!(rendered.ends_with(&doc.footer));
        assert_eq!(split_template(&rendered).unwrap(), doc);
    }

    #[test]
    fn missing_region_is_fatal() {
        let err = split_template("\\begin{document}\\end{document}").unwrap_err();
        assert!(matches!(err, TemplateStructureError::MissingRegionStart { .. }));
    }

    #[test]
    fn unterminated_region_is_fatal() {
        let err = split_template("\\begin{questions}\\question A").unwrap_err();
        assert!(matches!(err, TemplateStructureError::MissingRegionEnd { .. }));
    }

    #[test]
    fn second_region_is_rejected() {
        let text = "\\begin{questions}\\question A\\end{questions}\\begin{questions}\\question B\\end{questions}";
        let err = split_template(text).unwrap_err();
        assert!(matches!(err, TemplateStructureError::MultipleRegions { .. }));
    }

    #[test]
    fn region_without_questions_is_fatal() {
        let err = split_template("\\begin{questions}\nnada\n\\end{questions}").unwrap_err();
        assert!(matches!(err, TemplateStructureError::NoQuestions { .. }));
    }
}
