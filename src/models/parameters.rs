use std::fmt;

/// 单个参数位的生成规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterSpec {
    /// 闭区间整数
    Integer { min: i64, max: i64 },
    /// 闭区间小数，保留 `precision` 位
    Decimal { min: f64, max: f64, precision: usize },
}

/// 默认的五个参数位
pub const DEFAULT_PARAMETER_SPECS: [ParameterSpec; 5] = [
    ParameterSpec::Integer { min: 7, max: 25 },
    ParameterSpec::Integer { min: 10, max: 40 },
    ParameterSpec::Integer { min: 95, max: 255 },
    ParameterSpec::Integer { min: 100, max: 200 },
    ParameterSpec::Decimal {
        min: 100.0,
        max: 200.0,
        precision: 2,
    },
];

impl ParameterSpec {
    /// 值是否落在规则范围内
    pub fn contains(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (ParameterSpec::Integer { min, max }, ParameterValue::Integer(v)) => (min..=max).contains(&v),
            (ParameterSpec::Decimal { min, max, .. }, ParameterValue::Decimal { value, .. }) => {
                (min..=max).contains(&value)
            }
            _ => false,
        }
    }
}

/// 生成的参数值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Integer(i64),
    Decimal { value: f64, precision: usize },
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Integer(v) => write!(f, "{}", v),
            ParameterValue::Decimal { value, precision } => write!(f, "{:.*}", precision, value),
        }
    }
}

/// 一名学生的参数集合，按参数位顺序排列
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    values: Vec<ParameterValue>,
}

impl ParameterSet {
    pub fn new(values: Vec<ParameterValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[ParameterValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 各参数位的字符串形式
    pub fn rendered(&self) -> Vec<String> {
        self.values.iter().map(|v| v.to_string()).collect()
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.rendered().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_always_renders_fixed_fraction_digits() {
        let v = ParameterValue::Decimal {
            value: 150.0,
            precision: 2,
        };
        assert_eq!(v.to_string(), "150.00");

        let v = ParameterValue::Decimal {
            value: 123.4,
            precision: 2,
        };
        assert_eq!(v.to_string(), "123.40");
    }

    #[test]
    fn set_display_lists_values_in_order() {
        let set = ParameterSet::new(vec![
            ParameterValue::Integer(7),
            ParameterValue::Decimal {
                value: 100.5,
                precision: 2,
            },
        ]);
        assert_eq!(set.to_string(), "[7, 100.50]");
    }

    #[test]
    fn spec_contains_is_inclusive_and_type_checked() {
        let spec = ParameterSpec::Integer { min: 7, max: 25 };
        assert!(spec.contains(&ParameterValue::Integer(7)));
        assert!(spec.contains(&ParameterValue::Integer(25)));
        assert!(!spec.contains(&ParameterValue::Integer(26)));
        assert!(!spec.contains(&ParameterValue::Decimal {
            value: 10.0,
            precision: 2
        }));
    }
}
