pub mod nullable;
pub mod response;
pub mod string_list;
pub mod timestamps;

pub use response::ApiEnvelope;
