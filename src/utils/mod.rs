pub mod file_magic;
pub mod validate;

pub use file_magic::{check_upload, matches_extension};
