//! API response types.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response envelope: `{"success": true, ...payload}`, with an
/// optional human-readable message. Errors produce the same shape with
/// `success: false` via [`cinelog_common::AppError`].
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with a payload.
    pub const fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            payload: Some(payload),
        }
    }

    /// Create a success response with a payload and a message.
    pub fn ok_with_message(payload: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            payload: Some(payload),
        }
    }
}

impl ApiResponse<()> {
    /// Create a payload-less success response with a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            payload: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Payload {
        movies: Vec<String>,
    }

    #[test]
    fn test_payload_is_flattened() {
        let response = ApiResponse::ok(Payload {
            movies: vec!["Heat".to_string()],
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"success": true, "movies": ["Heat"]}));
    }

    #[test]
    fn test_message_only() {
        let response = ApiResponse::message("Movie removed from watchlist");

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "Movie removed from watchlist"})
        );
    }
}
