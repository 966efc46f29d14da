//! Caller identity middleware.
//!
//! The identity provider in front of this service forwards the caller's id in
//! the `x-user-id` header. A missing or malformed header means the request is
//! anonymous; rules decide what anonymous callers may do.

use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

/// Header carrying the authenticated caller's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity attached to every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity {
    pub caller: Option<Uuid>,
}

/// Identity middleware.
///
/// Never rejects a request; it only records who is calling.
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let header = request.headers().get(USER_ID_HEADER);
    let caller = header
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok());

    if header.is_some() && caller.is_none() {
        tracing::debug!("Malformed {} header, treating caller as anonymous", USER_ID_HEADER);
    }

    request.extensions_mut().insert(Identity { caller });
    next.run(request).await
}
