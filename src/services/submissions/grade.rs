use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{PortalError, Result};
use crate::models::{Activity, Submission, SubmissionStatus};
use crate::utils::validate::{validate_non_blank, validate_score};

/// 评分前的检查，不修改任何数据
fn check_grade(activity: &Activity, submission: &Submission, score: f64) -> Result<()> {
    if submission.activity_id != activity.id {
        return Err(PortalError::data_integrity(format!(
            "submission belongs to activity {}, not {}",
            submission.activity_id, activity.id
        )));
    }
    let max_score = activity.require_max_score()?;
    check_transition(submission, SubmissionStatus::Graded)?;
    validate_score(score, max_score).map_err(PortalError::validation)
}

fn check_transition(submission: &Submission, next: SubmissionStatus) -> Result<()> {
    if !submission.status.can_transition_to(next) {
        return Err(PortalError::validation(format!(
            "submission cannot move from {} to {}",
            submission.status, next
        )));
    }
    Ok(())
}

fn apply_grade(
    mut submission: Submission,
    score: f64,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Submission {
    let unchanged = submission.status == SubmissionStatus::Graded
        && submission.score == Some(score)
        && submission.feedback == feedback;
    if !unchanged {
        submission.graded_at = Some(now);
    }
    submission.score = Some(score);
    submission.feedback = feedback;
    submission.status = SubmissionStatus::Graded;
    submission
}

/// 评分，返回更新后的副本
///
/// 以相同分数和评语重复评分时保留原评分时间。
pub fn grade(
    activity: &Activity,
    submission: &Submission,
    score: f64,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Result<Submission> {
    check_grade(activity, submission, score)?;
    debug!(
        "Grading submission {:?} of activity {} with score {}",
        submission.id, activity.id, score
    );
    Ok(apply_grade(submission.clone(), score, feedback, now))
}

/// 批量评分：全部通过校验后才生效
pub fn batch_grade(
    activity: &Activity,
    grades: &[(&Submission, f64, Option<String>)],
    now: DateTime<Utc>,
) -> Result<Vec<Submission>> {
    for (submission, score, _) in grades {
        check_grade(activity, submission, *score)?;
    }
    info!("Batch grading {} submissions of activity {}", grades.len(), activity.id);
    Ok(grades
        .iter()
        .map(|(submission, score, feedback)| {
            apply_grade((*submission).clone(), *score, feedback.clone(), now)
        })
        .collect())
}

/// 退回提交，原因写入评语
pub fn return_submission(
    submission: &Submission,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<Submission> {
    validate_non_blank(reason).map_err(PortalError::validation)?;
    check_transition(submission, SubmissionStatus::Returned)?;
    let reason = reason.trim();
    let mut returned = submission.clone();
    returned.status = SubmissionStatus::Returned;
    returned.feedback = Some(reason.to_string());
    returned.graded_at = Some(now);
    Ok(returned)
}
