//! 数据模型定义
//!
//! 字段命名与后端 JSON 保持一致（camelCase），并通过 ts-rs 导出前端类型。

pub mod activities;
pub mod common;
pub mod files;
pub mod grades;
pub mod submissions;

pub use activities::entities::{Activity, ActivityType, StudentActivity, SubmissionType};
pub use activities::views::{ActivityTab, TabCounts, TabFilter, Tone};
pub use files::entities::{FileRef, Preview, UploadedFile};
pub use grades::entities::{GradeTier, LetterGrade};
pub use grades::responses::{GradeRow, GradeRowStatus, GradeSummary, GradeTab};
pub use grades::stats_responses::{
    ActivityStats, GradingWorkload, ScoreRange, ScoreStats, StudentProgress,
};
pub use submissions::entities::{Submission, SubmissionStatus};
pub use submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, ReturnSubmissionRequest, SubmissionPayload,
};
