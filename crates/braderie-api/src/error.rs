//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Mongo(#[from] braderie_mongo::MongoError),

    #[error("{0}")]
    Cloudinary(#[from] braderie_cloudinary::CloudinaryError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Upstream and validation failures alike surface as client errors
            // with the underlying message.
            ApiError::BadRequest(_) | ApiError::Mongo(_) | ApiError::Cloudinary(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

/// 401 responses use an `error` key, everything else a `message` key.
#[derive(Serialize)]
#[serde(untagged)]
enum ErrorBody {
    Auth { error: String },
    Client { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Unauthorized(msg) => ErrorBody::Auth { error: msg.clone() },
            _ => ErrorBody::Client {
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401_with_error_key() {
        let (status, json) = body_json(ApiError::unauthorized("Token non envoyé !")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Token non envoyé !");
        assert!(json.get("message").is_none());
    }

    #[tokio::test]
    async fn bad_request_maps_to_400_with_message_key() {
        let (status, json) = body_json(ApiError::bad_request("picture file is required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "picture file is required");
    }

    #[tokio::test]
    async fn store_errors_surface_as_client_errors() {
        let err = ApiError::from(braderie_mongo::MongoError::not_found("offers/abc"));
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("offers/abc"));
    }
}
