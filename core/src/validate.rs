//! Response status validation.
//!
//! A 2xx response passes through untouched. Anything else is decoded as the
//! Pingdom error envelope `{"error": {"statuscode", "statusdesc",
//! "errormessage"}}`. The inner `statuscode` is taken as-is, even when it
//! disagrees with the HTTP status line. If the body is not that envelope the
//! error falls back to the HTTP status, its reason phrase and the raw body.

use serde::Deserialize;

use crate::error::{ApiError, ClientError};
use crate::http::HttpResponse;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

/// Map a non-2xx response to `ClientError::Api`.
pub fn validate_response(response: &HttpResponse) -> Result<(), ClientError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ClientError::Api(decode_error(response)))
}

fn decode_error(response: &HttpResponse) -> ApiError {
    match serde_json::from_str::<ErrorEnvelope>(&response.body) {
        Ok(envelope) => envelope.error,
        Err(err) => {
            tracing::trace!(status = response.status, error = %err, "error body is not a Pingdom error envelope");
            let reason = ::http::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or_default();
            ApiError::new(response.status, reason, response.body.trim())
        }
    }
}
