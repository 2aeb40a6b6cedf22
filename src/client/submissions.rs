use serde::Deserialize;
use tracing::info;

use super::{ApiClient, Method};
use crate::errors::{PortalError, Result};
use crate::models::{
    CreateSubmissionRequest, GradeSubmissionRequest, ReturnSubmissionRequest, Submission,
};
use crate::utils::validate::validate_non_blank;

/// 部分接口返回单个对象，部分返回数组
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Submission>),
    One(Box<Submission>),
}

impl From<OneOrMany> for Vec<Submission> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![*item],
        }
    }
}

impl ApiClient {
    pub async fn get_submission(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_optional(format!("submissions/{submission_id}")).await
    }

    pub async fn activity_submissions(&self, activity_id: i64) -> Result<Vec<Submission>> {
        self.get_json(format!("submissions/activity/{activity_id}"))
            .await
    }

    /// 某学生在某活动下的提交，没有提交时为空
    pub async fn student_activity_submissions(
        &self,
        activity_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let found: Option<OneOrMany> = self
            .get_optional(format!(
                "submissions/activity/{activity_id}/student/{student_id}"
            ))
            .await?;
        Ok(found.map(Vec::from).unwrap_or_default())
    }

    pub async fn student_submissions(&self, student_id: i64) -> Result<Vec<Submission>> {
        self.get_json(format!("submissions/student/{student_id}"))
            .await
    }

    pub async fn create_submission(&self, request: &CreateSubmissionRequest) -> Result<Submission> {
        let created: Submission = self
            .send_json(Method::Post, "submissions".to_string(), request)
            .await?;
        info!(
            "Submission {:?} created for activity {} by student {}",
            created.id, created.activity_id, created.student_id
        );
        Ok(created)
    }

    pub async fn grade_submission(
        &self,
        submission_id: i64,
        request: &GradeSubmissionRequest,
    ) -> Result<Submission> {
        let graded = self
            .send_json(Method::Put, format!("submissions/{submission_id}/grade"), request)
            .await?;
        info!("Submission {} graded with {}", submission_id, request.score);
        Ok(graded)
    }

    pub async fn return_submission(
        &self,
        submission_id: i64,
        request: &ReturnSubmissionRequest,
    ) -> Result<Submission> {
        validate_non_blank(&request.reason).map_err(PortalError::validation)?;
        let returned = self
            .send_json(Method::Put, format!("submissions/{submission_id}/return"), request)
            .await?;
        info!("Submission {} returned", submission_id);
        Ok(returned)
    }
}
