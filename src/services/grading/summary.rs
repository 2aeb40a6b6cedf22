//! 成绩汇总与成绩单

use std::collections::HashMap;

use super::scale::{grade_tier, letter_grade, percentage, round1};
use crate::errors::{PortalError, Result};
use crate::models::{Activity, GradeRow, GradeRowStatus, GradeSummary, GradeTab, Submission};

/// 把每个提交与其所属活动配对
///
/// 找不到活动或活动缺少满分都视为数据不完整，不会用默认满分代替。
pub fn pair_with_activities<'a>(
    activities: &'a [Activity],
    submissions: &'a [Submission],
) -> Result<Vec<(&'a Activity, &'a Submission)>> {
    let by_id: HashMap<i64, &Activity> = activities.iter().map(|a| (a.id, a)).collect();
    submissions
        .iter()
        .map(|submission| {
            let activity = by_id.get(&submission.activity_id).ok_or_else(|| {
                PortalError::data_integrity(format!(
                    "submission {} references activity {} which was not supplied",
                    submission
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "(new)".to_string()),
                    submission.activity_id
                ))
            })?;
            activity.require_max_score()?;
            Ok((*activity, submission))
        })
        .collect()
}

/// 汇总已评分提交的得分
pub fn summarize(pairs: &[(&Activity, &Submission)]) -> Result<GradeSummary> {
    let graded: Vec<(f64, f64)> = pairs
        .iter()
        .filter_map(|(activity, submission)| {
            submission
                .score
                .map(|score| activity.require_max_score().map(|max| (score, max)))
        })
        .collect::<Result<_>>()?;

    let earned_points: f64 = graded.iter().map(|(score, _)| score).sum();
    let total_points: f64 = graded.iter().map(|(_, max)| max).sum();
    let average_grade = if total_points > 0.0 {
        round1(earned_points / total_points * 100.0)
    } else {
        0.0
    };

    Ok(GradeSummary {
        total_points,
        earned_points,
        average_grade,
        completed_activities: graded.len(),
        total_activities: pairs.len(),
    })
}

/// 配对后汇总
pub fn summarize_submissions(
    activities: &[Activity],
    submissions: &[Submission],
) -> Result<GradeSummary> {
    let pairs = pair_with_activities(activities, submissions)?;
    summarize(&pairs)
}

/// 生成某学生的成绩单：每个活动一行，取该活动下的当前提交
pub fn grade_book(activities: &[Activity], submissions: &[Submission]) -> Vec<GradeRow> {
    let mut latest: HashMap<i64, &Submission> = HashMap::new();
    for submission in submissions {
        latest
            .entry(submission.activity_id)
            .and_modify(|current| {
                if submission.recency() > current.recency() {
                    *current = submission;
                }
            })
            .or_insert(submission);
    }

    activities
        .iter()
        .map(|activity| {
            let submission = latest.get(&activity.id).copied();
            let score = submission.and_then(|s| s.score);
            let pct = activity.max_score.and_then(|max| percentage(score, max));
            GradeRow {
                activity_id: activity.id,
                title: activity.title.clone(),
                max_score: activity.max_score,
                submission_id: submission.and_then(|s| s.id),
                score,
                percentage: pct,
                letter: pct.map(letter_grade),
                tier: pct.map(grade_tier),
                status: submission
                    .map(|s| s.status.into())
                    .unwrap_or(GradeRowStatus::NotSubmitted),
                feedback: submission.and_then(|s| s.feedback.clone()),
                submitted_at: submission.map(|s| s.submitted_at),
            }
        })
        .collect()
}

pub fn filter_grade_rows(rows: &[GradeRow], tab: GradeTab) -> Vec<&GradeRow> {
    rows.iter().filter(|row| tab.matches(row.status)).collect()
}
