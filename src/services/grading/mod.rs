//! 成绩计算引擎

pub mod scale;
pub mod stats;
pub mod summary;

pub use scale::{grade_tier, letter_grade, percentage};
pub use stats::{activity_stats, grading_workload, student_progress, top_performers};
pub use summary::{filter_grade_rows, grade_book, pair_with_activities, summarize, summarize_submissions};
