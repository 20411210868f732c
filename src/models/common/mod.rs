pub mod error_code;
pub mod response;

pub use error_code::ErrorCode;
pub use response::{ApiResponse, RedirectHint};
