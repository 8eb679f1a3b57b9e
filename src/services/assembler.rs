//! 文档组装服务
//!
//! 先按给定顺序拼接题目，再统一替换占位符，
//! 保证无论题目排在哪里，其中的占位符都会被替换。

use crate::models::parameters::ParameterSet;
use crate::models::template::{QuestionUnit, TemplateDocument};

/// 占位符
#[derive(Debug, Clone)]
pub struct Placeholders {
    /// 参数位占位符，按参数位顺序
    pub parameters: Vec<String>,
    /// 学生姓名占位符
    pub name: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            parameters: (1..=5).map(|i| format!("aleat{}", i)).collect(),
            name: "completo".to_string(),
        }
    }
}

/// 姓名转义函数
pub type Escaper = fn(&str) -> String;

/// 不做任何转义
pub fn identity_escape(text: &str) -> String {
    text.to_string()
}

/// 转义 LaTeX 特殊字符
pub fn latex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

/// 文档组装器
#[derive(Debug, Clone)]
pub struct Assembler {
    placeholders: Placeholders,
    escape: Escaper,
}

impl Assembler {
    pub fn new(placeholders: Placeholders) -> Self {
        Self {
            placeholders,
            escape: identity_escape,
        }
    }

    /// 替换姓名转义函数
    pub fn with_escaper(mut self, escape: Escaper) -> Self {
        self.escape = escape;
        self
    }

    /// 组装一名学生的完整文档
    pub fn assemble(
        &self,
        template: &TemplateDocument,
        units: &[&QuestionUnit],
        params: &ParameterSet,
        student_name: &str,
    ) -> String {
        let text = template.render_with(units);
        self.substitute(text, params, student_name)
    }

    /// 全局替换参数占位符和姓名占位符
    pub fn substitute(&self, mut text: String, params: &ParameterSet, student_name: &str) -> String {
        for (token, value) in self.placeholders.parameters.iter().zip(params.values()) {
            text = text.replace(token.as_str(), &value.to_string());
        }
        text.replace(self.placeholders.name.as_str(), &(self.escape)(student_name))
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(Placeholders::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parameters::{ParameterValue, DEFAULT_PARAMETER_SPECS};
    use crate::services::randomizer::Randomizer;
    use crate::services::template_splitter::split_template;

    const TEMPLATE: &str = "\\documentclass{exam}\n\
\\begin{document}\n\
Aluno: completo\n\
\\begin{questions}\n\
\\question Some aleat1 e aleat2.\n\
\\question Multiplique aleat3 por aleat4.\n\
\\newpage\n\
\\question Divida aleat5 por aleat1.\n\
\\end{questions}\n\
Assinatura de completo\n\
\\end{document}\n";

    fn params() -> ParameterSet {
        ParameterSet::new(vec![
            ParameterValue::Integer(7),
            ParameterValue::Integer(10),
            ParameterValue::Integer(95),
            ParameterValue::Integer(200),
            ParameterValue::Decimal {
                value: 150.5,
                precision: 2,
            },
        ])
    }

    #[test]
    fn substitutes_every_occurrence() {
        let template = split_template(TEMPLATE).unwrap();
        let units: Vec<&QuestionUnit> = template.units.iter().collect();
        let text = Assembler::default().assemble(&template, &units, &params(), "Ana Souza");

        assert!(!text.contains("aleat"));
        assert!(!text.contains("completo"));
        assert_eq!(text.matches("Ana Souza").count(), 2);
        assert!(text.contains("Some 7 e 10."));
        assert!(text.contains("Divida 150.50 por 7."));
    }

    #[test]
    fn units_appear_in_given_order_between_header_and_footer() {
        let template = split_template(TEMPLATE).unwrap();
        let units = vec![&template.units[2], &template.units[0], &template.units[1]];
        let text = Assembler::default().assemble(&template, &units, &params(), "Ana");

        let divide = text.find("Divida").unwrap();
        let add = text.find("Some").unwrap();
        let multiply = text.find("Multiplique").unwrap();
        assert!(text.find("\\begin{questions}").unwrap() < divide);
        assert!(divide < add && add < multiply);
        assert!(multiply < text.find("\\end{questions}").unwrap());
        assert!(!text.contains("\\newpage"));
    }

    #[test]
    fn shuffled_document_keeps_each_unit_exactly_once() {
        let template = split_template(TEMPLATE).unwrap();
        let assembler = Assembler::default();
        let mut randomizer = Randomizer::seeded(5);

        for _ in 0..20 {
            let params = randomizer.generate_parameters(&DEFAULT_PARAMETER_SPECS);
            let units = randomizer.shuffle_units(&template.units);
            let text = assembler.assemble(&template, &units, &params, "Bruno");

            assert_eq!(text.matches("\\question").count(), template.question_count());
            for marker in ["Some", "Multiplique", "Divida"] {
                assert_eq!(text.matches(marker).count(), 1);
            }
        }
    }

    #[test]
    fn name_is_raw_by_default_and_escaped_on_request() {
        let template = split_template(TEMPLATE).unwrap();
        let units: Vec<&QuestionUnit> = template.units.iter().collect();

        let raw = Assembler::default().assemble(&template, &units, &params(), "Ana & Cia_1");
        assert!(raw.contains("Ana & Cia_1"));

        let escaped = Assembler::default()
            .with_escaper(latex_escape)
            .assemble(&template, &units, &params(), "Ana & Cia_1");
        assert!(escaped.contains(r"Ana \& Cia\_1"));
    }

    #[test]
    fn latex_escape_handles_special_characters() {
        assert_eq!(latex_escape("100% $x$"), r"100\% \$x\$");
        assert_eq!(latex_escape(r"a\b"), r"a\textbackslash{}b");
        assert_eq!(latex_escape("José"), "José");
    }
}
