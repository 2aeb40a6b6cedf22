//! 活动统计、学生进度、教师工作量

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use super::scale::{percentage, round1};
use crate::models::{
    Activity, ActivityStats, GradingWorkload, ScoreRange, ScoreStats, StudentProgress, Submission,
    SubmissionStatus, Tone,
};
use crate::services::eligibility::urgency;

/// 每个学生在每个活动下的当前提交（尝试序号最大，其次提交时间最晚）
fn current_attempts<'a>(submissions: impl IntoIterator<Item = &'a Submission>) -> Vec<&'a Submission> {
    let mut latest: HashMap<(i64, i64), &Submission> = HashMap::new();
    for submission in submissions {
        latest
            .entry((submission.activity_id, submission.student_id))
            .and_modify(|current| {
                if submission.recency() > current.recency() {
                    *current = submission;
                }
            })
            .or_insert(submission);
    }
    let mut current: Vec<&Submission> = latest.into_values().collect();
    current.sort_by_key(|s| (s.activity_id, s.student_id));
    current
}

fn current_per_student(activity_id: i64, submissions: &[Submission]) -> Vec<&Submission> {
    current_attempts(submissions.iter().filter(|s| s.activity_id == activity_id))
}

pub fn activity_stats(activity: &Activity, submissions: &[Submission]) -> ActivityStats {
    let total_attempts = submissions
        .iter()
        .filter(|s| s.activity_id == activity.id)
        .count();
    let current = current_per_student(activity.id, submissions);

    let count_status = |status: SubmissionStatus| current.iter().filter(|s| s.status == status).count();
    let graded_count = count_status(SubmissionStatus::Graded);
    let pending_count = count_status(SubmissionStatus::Submitted);
    let returned_count = count_status(SubmissionStatus::Returned);
    let late_count = current.iter().filter(|s| s.is_late).count();

    let scores: Vec<f64> = current.iter().filter_map(|s| s.score).collect();
    let score_stats = if scores.is_empty() {
        None
    } else {
        let sum: f64 = scores.iter().sum();
        Some(ScoreStats {
            average: round1(sum / scores.len() as f64),
            max: scores.iter().cloned().fold(f64::MIN, f64::max),
            min: scores.iter().cloned().fold(f64::MAX, f64::min),
        })
    };

    ActivityStats {
        activity_id: activity.id,
        total_attempts,
        submitted_students: current.len(),
        graded_count,
        pending_count,
        returned_count,
        late_count,
        score_stats,
        score_distribution: score_distribution(&scores, activity.max_score),
    }
}

/// 按百分比分组统计分数
fn score_distribution(scores: &[f64], max_score: Option<f64>) -> Vec<ScoreRange> {
    let Some(max_score) = max_score.filter(|m| *m > 0.0) else {
        return vec![];
    };

    let mut counts = [0usize; 5];
    for &score in scores {
        let pct = score / max_score * 100.0;
        let index = if pct >= 90.0 {
            0
        } else if pct >= 80.0 {
            1
        } else if pct >= 70.0 {
            2
        } else if pct >= 60.0 {
            3
        } else {
            4
        };
        counts[index] += 1;
    }

    ["90-100", "80-89", "70-79", "60-69", "0-59"]
        .iter()
        .zip(counts)
        .map(|(range, count)| ScoreRange {
            range: range.to_string(),
            count,
        })
        .collect()
}

/// 学生进度：只统计已发布的活动
pub fn student_progress(
    activities: &[Activity],
    submissions: &[Submission],
    student_id: i64,
) -> StudentProgress {
    let published: Vec<&Activity> = activities.iter().filter(|a| a.is_published).collect();
    let own: Vec<Submission> = submissions
        .iter()
        .filter(|s| s.student_id == student_id)
        .cloned()
        .collect();

    let mut submitted_activities = 0;
    let mut graded_activities = 0;
    let mut percentages = Vec::new();
    for activity in &published {
        let Some(current) = current_per_student(activity.id, &own).into_iter().next() else {
            continue;
        };
        submitted_activities += 1;
        if current.is_graded() {
            graded_activities += 1;
        }
        if let Some(pct) = activity.max_score.and_then(|max| percentage(current.score, max)) {
            percentages.push(pct);
        }
    }

    let average_percentage = if percentages.is_empty() {
        None
    } else {
        Some(round1(percentages.iter().sum::<f64>() / percentages.len() as f64))
    };

    StudentProgress {
        student_id,
        total_activities: published.len(),
        submitted_activities,
        graded_activities,
        average_percentage,
    }
}

/// 教师待评分工作量
///
/// 待评分指学生当前提交仍处于 SUBMITTED 状态。
pub fn grading_workload(
    activities: &[Activity],
    submissions: &[Submission],
    now: DateTime<Utc>,
) -> GradingWorkload {
    let mut pending_grading = 0;
    let mut pending_by_type = BTreeMap::new();
    let mut urgent_activity_ids = Vec::new();

    for activity in activities {
        let pending = current_per_student(activity.id, submissions)
            .into_iter()
            .filter(|s| s.status == SubmissionStatus::Submitted)
            .count();
        if pending == 0 {
            continue;
        }
        pending_grading += pending;
        *pending_by_type.entry(activity.activity_type).or_insert(0) += pending;
        if urgency(activity, now) == Tone::Warning {
            urgent_activity_ids.push(activity.id);
        }
    }

    GradingWorkload {
        pending_grading,
        pending_by_type,
        urgent_activity_ids,
    }
}

/// 得分最高的学生当前提交，同分时先提交者在前
///
/// 每个学生在每个活动下只取当前提交，不会重复上榜。
pub fn top_performers(submissions: &[Submission], limit: usize) -> Vec<&Submission> {
    let mut graded: Vec<&Submission> = current_attempts(submissions)
        .into_iter()
        .filter(|s| s.score.is_some())
        .collect();
    graded.sort_by(|a, b| {
        let (sa, sb) = (a.score.unwrap_or_default(), b.score.unwrap_or_default());
        sb.total_cmp(&sa).then(a.submitted_at.cmp(&b.submitted_at))
    });
    graded.truncate(limit);
    graded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityType;
    use crate::test_support::{activity, at, graded, submission};
    use chrono::Duration;

    #[test]
    fn test_activity_stats_uses_current_attempt() {
        let a = activity(1);
        let mut late = submission(4, 1, 22, 1);
        late.is_late = true;
        let mut returned = submission(5, 1, 23, 1);
        returned.status = SubmissionStatus::Returned;
        let submissions = vec![
            graded(submission(1, 1, 21, 1), 55.0),
            graded(submission(2, 1, 21, 2), 95.0),
            graded(submission(3, 1, 20, 1), 82.0),
            late,
            returned,
            submission(6, 2, 21, 1),
        ];

        let stats = activity_stats(&a, &submissions);
        assert_eq!(stats.total_attempts, 5);
        assert_eq!(stats.submitted_students, 4);
        assert_eq!(stats.graded_count, 2);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.returned_count, 1);
        assert_eq!(stats.late_count, 1);

        let scores = stats.score_stats.unwrap();
        assert_eq!(scores.average, 88.5);
        assert_eq!(scores.max, 95.0);
        assert_eq!(scores.min, 82.0);

        let counts: Vec<usize> = stats.score_distribution.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 0]);
        assert_eq!(stats.score_distribution[4].range, "0-59");
    }

    #[test]
    fn test_activity_stats_without_scores() {
        let stats = activity_stats(&activity(1), &[]);
        assert_eq!(stats.submitted_students, 0);
        assert!(stats.score_stats.is_none());
        assert!(stats.score_distribution.iter().all(|r| r.count == 0));
    }

    #[test]
    fn test_student_progress_skips_unpublished() {
        let mut hidden = activity(3);
        hidden.is_published = false;
        let mut half = activity(2);
        half.max_score = Some(50.0);
        let activities = vec![activity(1), half, hidden];
        let submissions = vec![
            graded(submission(1, 1, 9, 1), 80.0),
            submission(2, 2, 9, 1),
            graded(submission(3, 3, 9, 1), 10.0),
            graded(submission(4, 1, 10, 1), 100.0),
        ];

        let progress = student_progress(&activities, &submissions, 9);
        assert_eq!(progress.total_activities, 2);
        assert_eq!(progress.submitted_activities, 2);
        assert_eq!(progress.graded_activities, 1);
        assert_eq!(progress.average_percentage, Some(80.0));

        let nobody = student_progress(&activities, &submissions, 99);
        assert_eq!(nobody.submitted_activities, 0);
        assert_eq!(nobody.average_percentage, None);
    }

    #[test]
    fn test_grading_workload() {
        let now = at(2024, 3, 1, 12, 0, 0);
        let mut soon = activity(1);
        soon.due_date = Some(now + Duration::hours(6));
        let mut later = activity(2);
        later.activity_type = ActivityType::Quiz;
        later.due_date = Some(now + Duration::days(5));
        let mut done = activity(3);
        done.due_date = Some(now + Duration::hours(2));

        let submissions = vec![
            submission(1, 1, 20, 1),
            submission(2, 1, 21, 1),
            submission(3, 2, 20, 1),
            graded(submission(4, 3, 20, 1), 70.0),
        ];

        let workload = grading_workload(&[soon, later, done], &submissions, now);
        assert_eq!(workload.pending_grading, 3);
        assert_eq!(workload.pending_by_type[&ActivityType::Assignment], 2);
        assert_eq!(workload.pending_by_type[&ActivityType::Quiz], 1);
        assert_eq!(workload.urgent_activity_ids, vec![1]);
    }

    #[test]
    fn test_top_performers_order() {
        let mut early = graded(submission(2, 1, 21, 1), 90.0);
        early.submitted_at = at(2024, 1, 1, 8, 0, 0);
        let submissions = vec![
            graded(submission(1, 1, 20, 1), 90.0),
            early,
            graded(submission(3, 1, 22, 1), 97.0),
            submission(4, 1, 23, 1),
        ];

        let top = top_performers(&submissions, 2);
        let ids: Vec<Option<i64>> = top.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![Some(3), Some(2)]);
        assert_eq!(top_performers(&submissions, 10).len(), 3);
    }

    #[test]
    fn test_top_performers_one_entry_per_student() {
        let submissions = vec![
            graded(submission(1, 1, 20, 1), 99.0),
            graded(submission(2, 1, 20, 2), 70.0),
            graded(submission(3, 1, 21, 1), 85.0),
        ];

        let top = top_performers(&submissions, 5);
        let ids: Vec<Option<i64>> = top.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![Some(3), Some(2)]);
    }

    #[test]
    fn test_activity_without_max_score_has_no_distribution() {
        let mut a = activity(1);
        a.max_score = None;
        let stats = activity_stats(&a, &[graded(submission(1, 1, 20, 1), 40.0)]);
        assert_eq!(stats.graded_count, 1);
        assert!(stats.score_distribution.is_empty());
    }
}
