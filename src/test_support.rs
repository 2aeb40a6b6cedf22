//! 单元测试共用的构造函数

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::client::{ApiClient, ApiReply, ApiRequest, AuthContext, Method, Transport};
use crate::config::UploadConfig;
use crate::errors::Result;
use crate::models::{Activity, ActivityType, Submission, SubmissionStatus, SubmissionType};

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub fn activity(id: i64) -> Activity {
    Activity {
        id,
        course_id: 1,
        teacher_id: Some(500),
        title: format!("Activity {id}"),
        description: None,
        instructions: None,
        activity_type: ActivityType::Assignment,
        submission_type: SubmissionType::Text,
        is_required: true,
        is_published: true,
        available_from: None,
        available_until: None,
        due_date: None,
        max_score: Some(100.0),
        attempts_allowed: -1,
        time_limit_minutes: None,
        weight: None,
        course_name: Some("Algorithms".to_string()),
        teacher_name: None,
    }
}

pub fn submission(id: i64, activity_id: i64, student_id: i64, attempt: u32) -> Submission {
    Submission {
        id: Some(id),
        activity_id,
        student_id,
        submission_text: Some("answer".to_string()),
        file_urls: Vec::new(),
        attachment_url: None,
        answers: BTreeMap::new(),
        status: SubmissionStatus::Submitted,
        score: None,
        feedback: None,
        submitted_at: at(2024, 1, 5, 12, 0, 0),
        graded_at: None,
        graded_by: None,
        attempt_number: attempt,
        is_late: false,
    }
}

pub fn graded(mut submission: Submission, score: f64) -> Submission {
    submission.score = Some(score);
    submission.status = SubmissionStatus::Graded;
    submission.graded_at = Some(at(2024, 1, 12, 9, 0, 0));
    submission
}

/// 按 (方法, 路径) 返回预设响应的传输层，并记录收到的请求
#[derive(Default)]
pub struct MemoryTransport {
    routes: Mutex<HashMap<(Method, String), ApiReply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MemoryTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_raw(
        &self,
        method: Method,
        path: &str,
        status: u16,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            ApiReply {
                status,
                content_type: content_type.map(str::to_string),
                body,
            },
        );
    }

    pub fn reply_json(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.reply_raw(
            method,
            path,
            status,
            Some("application/json"),
            serde_json::to_vec(&body).unwrap(),
        );
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(self: &Arc<Self>, auth: AuthContext) -> ApiClient {
        ApiClient::new(self.clone(), auth, UploadConfig::default())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or(ApiReply {
                status: 404,
                content_type: None,
                body: Vec::new(),
            }))
    }
}
