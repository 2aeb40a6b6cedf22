//! 分数换算：百分比、字母等级、颜色档位

use crate::models::{GradeTier, LetterGrade};

/// 字母等级下限，从高到低排列，命中第一个即返回
const LETTER_THRESHOLDS: [(f64, LetterGrade); 12] = [
    (97.0, LetterGrade::APlus),
    (93.0, LetterGrade::A),
    (90.0, LetterGrade::AMinus),
    (87.0, LetterGrade::BPlus),
    (83.0, LetterGrade::B),
    (80.0, LetterGrade::BMinus),
    (77.0, LetterGrade::CPlus),
    (73.0, LetterGrade::C),
    (70.0, LetterGrade::CMinus),
    (67.0, LetterGrade::DPlus),
    (63.0, LetterGrade::D),
    (60.0, LetterGrade::DMinus),
];

const TIER_THRESHOLDS: [(f64, GradeTier); 4] = [
    (90.0, GradeTier::A),
    (80.0, GradeTier::B),
    (70.0, GradeTier::C),
    (60.0, GradeTier::D),
];

/// 保留一位小数（四舍五入）
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 得分百分比；未评分或满分不为正时返回 `None`
pub fn percentage(score: Option<f64>, max_score: f64) -> Option<f64> {
    let score = score?;
    if !(max_score > 0.0) || !score.is_finite() {
        return None;
    }
    Some(round1(score / max_score * 100.0))
}

pub fn letter_grade(percentage: f64) -> LetterGrade {
    LETTER_THRESHOLDS
        .iter()
        .find(|(lower, _)| percentage >= *lower)
        .map(|(_, letter)| *letter)
        .unwrap_or(LetterGrade::F)
}

pub fn grade_tier(percentage: f64) -> GradeTier {
    TIER_THRESHOLDS
        .iter()
        .find(|(lower, _)| percentage >= *lower)
        .map(|(_, tier)| *tier)
        .unwrap_or(GradeTier::F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(Some(45.0), 50.0), Some(90.0));
        assert_eq!(percentage(Some(1.0), 3.0), Some(33.3));
        assert_eq!(percentage(Some(2.0), 3.0), Some(66.7));
        assert_eq!(percentage(None, 100.0), None);
        assert_eq!(percentage(Some(10.0), 0.0), None);
        assert_eq!(percentage(Some(10.0), -5.0), None);
    }

    #[test]
    fn test_percentage_bounded_and_monotonic() {
        for max in [1.0, 7.0, 50.0, 100.0, 333.0] {
            let mut previous = -1.0;
            let steps = 200;
            for i in 0..=steps {
                let score = max * i as f64 / steps as f64;
                let p = percentage(Some(score), max).unwrap();
                assert!((0.0..=100.0).contains(&p), "{p} out of range");
                assert!(p >= previous, "not monotonic at {score}/{max}");
                previous = p;
            }
        }
    }

    #[test]
    fn test_letter_boundaries_inclusive() {
        assert_eq!(letter_grade(100.0), LetterGrade::APlus);
        assert_eq!(letter_grade(97.0), LetterGrade::APlus);
        assert_eq!(letter_grade(96.9), LetterGrade::A);
        assert_eq!(letter_grade(90.0), LetterGrade::AMinus);
        assert_eq!(letter_grade(89.9), LetterGrade::BPlus);
        assert_eq!(letter_grade(83.3), LetterGrade::B);
        assert_eq!(letter_grade(60.0), LetterGrade::DMinus);
        assert_eq!(letter_grade(59.9), LetterGrade::F);
        assert_eq!(letter_grade(0.0), LetterGrade::F);
        assert_eq!(letter_grade(f64::NAN), LetterGrade::F);
    }

    #[test]
    fn test_letter_constant_within_bucket() {
        for (lo, hi) in [(93.0, 97.0), (87.0, 90.0), (73.0, 77.0), (63.0, 67.0)] {
            let expected = letter_grade(lo);
            let mut x = lo;
            while x < hi {
                assert_eq!(letter_grade(x), expected);
                x += 0.1;
            }
        }
    }

    #[test]
    fn test_grade_tier() {
        assert_eq!(grade_tier(95.0), GradeTier::A);
        assert_eq!(grade_tier(90.0), GradeTier::A);
        assert_eq!(grade_tier(89.9), GradeTier::B);
        assert_eq!(grade_tier(70.0), GradeTier::C);
        assert_eq!(grade_tier(65.0), GradeTier::D);
        assert_eq!(grade_tier(12.0), GradeTier::F);
        assert_eq!(GradeTier::B.css_class(), "grade-b");
    }
}
