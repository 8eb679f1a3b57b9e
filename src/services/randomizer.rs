//! 随机化服务
//!
//! 为每名学生生成参数并打乱题目顺序。随机源可注入：
//! 生产环境用系统熵，测试用固定种子。

use crate::models::parameters::{ParameterSet, ParameterSpec, ParameterValue};
use crate::models::template::QuestionUnit;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 随机化器
pub struct Randomizer<R: Rng = StdRng> {
    rng: R,
}

impl Randomizer<StdRng> {
    /// 使用系统熵初始化（不可复现）
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// 固定种子（可复现）
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Randomizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// 闭区间整数
    pub fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    /// 闭区间小数，四舍五入到 `precision` 位
    pub fn next_decimal(&mut self, min: f64, max: f64, precision: usize) -> f64 {
        let raw = self.rng.gen_range(min..=max);
        let factor = 10f64.powi(precision as i32);
        ((raw * factor).round() / factor).clamp(min, max)
    }

    /// 按规则生成一组参数
    pub fn generate_parameters(&mut self, specs: &[ParameterSpec]) -> ParameterSet {
        let values = specs
            .iter()
            .map(|spec| match *spec {
                ParameterSpec::Integer { min, max } => ParameterValue::Integer(self.next_in_range(min, max)),
                ParameterSpec::Decimal {
                    min,
                    max,
                    precision,
                } => ParameterValue::Decimal {
                    value: self.next_decimal(min, max, precision),
                    precision,
                },
            })
            .collect();
        ParameterSet::new(values)
    }

    /// `0..n` 的均匀随机排列
    pub fn shuffle_permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        order
    }

    /// 打乱题目顺序，原切片不变
    pub fn shuffle_units<'a>(&mut self, units: &'a [QuestionUnit]) -> Vec<&'a QuestionUnit> {
        self.shuffle_permutation(units.len())
            .into_iter()
            .map(|i| &units[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parameters::DEFAULT_PARAMETER_SPECS;
    use std::collections::HashSet;

    #[test]
    fn parameters_stay_within_declared_ranges() {
        let mut randomizer = Randomizer::seeded(7);
        for _ in 0..500 {
            let set = randomizer.generate_parameters(&DEFAULT_PARAMETER_SPECS);
            assert_eq!(set.len(), 5);
            for (spec, value) in DEFAULT_PARAMETER_SPECS.iter().zip(set.values()) {
                assert!(spec.contains(value), "{value:?} outside {spec:?}");
            }
        }
    }

    #[test]
    fn decimal_slot_renders_two_fraction_digits() {
        let mut randomizer = Randomizer::seeded(11);
        for _ in 0..200 {
            let set = randomizer.generate_parameters(&DEFAULT_PARAMETER_SPECS);
            let rendered = set.rendered();
            let (_, fraction) = rendered[4].split_once('.').unwrap();
            assert_eq!(fraction.len(), 2, "bad rendering {}", rendered[4]);
            for integer in &rendered[..4] {
                assert!(integer.chars().all(|c| c.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn permutation_contains_every_index_once() {
        let mut randomizer = Randomizer::seeded(3);
        let order = randomizer.shuffle_permutation(10);
        let unique: HashSet<usize> = order.iter().copied().collect();
        assert_eq!(order.len(), 10);
        assert_eq!(unique, (0..10).collect());
    }

    #[test]
    fn shuffle_keeps_original_order_and_moves_first_unit() {
        let units: Vec<QuestionUnit> = (0..4)
            .map(|i| QuestionUnit::new("\\question", format!(" Q{i}\n")))
            .collect();
        let original = units.clone();
        let mut randomizer = Randomizer::seeded(42);

        let mut first_moved = false;
        for _ in 0..50 {
            let shuffled = randomizer.shuffle_units(&units);
            assert_eq!(shuffled.len(), units.len());
            if shuffled[0] != &units[0] {
                first_moved = true;
            }
        }

        assert_eq!(units, original);
        assert!(first_moved);
    }

    #[test]
    fn same_seed_reproduces_same_draws() {
        let mut a = Randomizer::seeded(99);
        let mut b = Randomizer::seeded(99);
        assert_eq!(
            a.generate_parameters(&DEFAULT_PARAMETER_SPECS),
            b.generate_parameters(&DEFAULT_PARAMETER_SPECS)
        );
        assert_eq!(a.shuffle_permutation(6), b.shuffle_permutation(6));
    }
}
