pub mod entities;
pub mod responses;
pub mod stats_responses;
