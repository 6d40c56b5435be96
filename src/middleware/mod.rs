pub mod response;

pub use response::{ApiResponse, ApiResult, TOTAL_NUMBER_HEADER};
