pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{ErrorResponse, MessageResponse};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{
  AuthMiddleware, AuthenticatedUser, RequestId, RequestIdExt, RequestIdMiddleware,
};
pub use routes::{ApiDependencies, configure_api_routes, configure_app};
