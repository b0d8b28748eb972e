//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, trace span, body limit)
//!     → auth.rs (Basic credentials, 401 on mismatch)
//!     → handlers.rs (path/query/body extraction via request.rs)
//!     → validated broker
//!     → response.rs (201/200 bodies, 422/504 error mapping)
//! ```

pub mod auth;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use auth::{AuthError, BasicAuth};
pub use response::ApiError;
pub use server::{AppState, BrokerServer, ServerError, X_REQUEST_ID};
