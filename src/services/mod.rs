pub mod eligibility;
pub mod grading;
pub mod submissions;
