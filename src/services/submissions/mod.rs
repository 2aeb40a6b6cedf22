//! 提交的创建、评分与退回
//!
//! 这里只做本地状态变换，返回新的副本；网络提交由 `client::workflow` 负责。

pub mod grade;
pub mod submit;

pub use grade::{batch_grade, grade, return_submission};
pub use submit::{submit, validate_payload};
