//! HTTP middleware and extractors for the proxy server.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills in the span field, tags Sentry, echoes the header)

pub mod bearer;
pub mod request_id;

pub use bearer::BearerAuth;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
