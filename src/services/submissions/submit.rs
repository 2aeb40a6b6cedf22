use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::{PortalError, Result};
use crate::models::{Activity, Submission, SubmissionPayload, SubmissionStatus, SubmissionType};
use crate::services::eligibility::{check_eligibility, is_overdue};
use crate::utils::validate::validate_http_url;

/// 按活动的提交方式检查填写内容
pub fn validate_payload(submission_type: SubmissionType, payload: &SubmissionPayload) -> Result<()> {
    let has_text = payload.trimmed_text().is_some();
    let has_files = payload.non_blank_files().next().is_some() || payload.trimmed_attachment().is_some();
    let has_answers = payload.answered_count() > 0;

    match submission_type {
        SubmissionType::Text if !has_text => {
            Err(PortalError::validation("submission text must not be blank"))
        }
        SubmissionType::File if !has_files => {
            Err(PortalError::validation("at least one file is required"))
        }
        SubmissionType::Url => {
            let url = payload
                .trimmed_attachment()
                .or_else(|| payload.trimmed_text())
                .ok_or_else(|| PortalError::validation("a URL is required"))?;
            validate_http_url(url).map_err(PortalError::validation)
        }
        SubmissionType::MultipleChoice if !has_answers => {
            Err(PortalError::validation("at least one question must be answered"))
        }
        SubmissionType::Mixed if !(has_text || has_files || has_answers) => {
            Err(PortalError::validation("submission is empty"))
        }
        _ => Ok(()),
    }
}

/// 在本地构造一条新提交
///
/// `submissions` 为该学生在该活动下已有的全部提交，新提交的尝试序号紧随其后。
pub fn submit(
    activity: &Activity,
    student_id: i64,
    submissions: &[Submission],
    now: DateTime<Utc>,
    payload: SubmissionPayload,
) -> Result<Submission> {
    check_eligibility(activity, submissions, now)?;
    validate_payload(activity.submission_type, &payload)?;

    let attempt_number = submissions.len() as u32 + 1;
    debug!(
        "Building submission for activity {} student {} attempt {}",
        activity.id, student_id, attempt_number
    );

    let submission_text = payload.trimmed_text().map(str::to_string);
    let attachment_url = payload.trimmed_attachment().map(str::to_string);
    let file_urls = payload.non_blank_files().map(str::to_string).collect();

    Ok(Submission {
        id: None,
        activity_id: activity.id,
        student_id,
        submission_text,
        file_urls,
        attachment_url,
        answers: payload.answers,
        status: SubmissionStatus::Submitted,
        score: None,
        feedback: None,
        submitted_at: now,
        graded_at: None,
        graded_by: None,
        attempt_number,
        is_late: is_overdue(activity, false, now),
    })
}
