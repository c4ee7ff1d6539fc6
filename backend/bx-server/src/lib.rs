pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod rate_limit;
pub mod routes;


pub use api::error::{ApiError, Result as ApiResult};
pub use error::{Result as ServerErrorResult, ServerError};
pub use rate_limit::{ApiRateLimit, enforce_rate_limit};
pub use routes::build_router;
