//! Cloudinary client implementation.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use braderie_models::ImageDescriptor;

use crate::error::{CloudinaryError, CloudinaryResult};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Configuration for the Cloudinary client.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Cloud name, identifies the account.
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret used for request signing.
    pub api_secret: String,
    /// API base URL, overridable for tests.
    pub api_base: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl CloudinaryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> CloudinaryResult<Self> {
        Ok(Self {
            cloud_name: std::env::var("CLOUD_NAME")
                .map_err(|_| CloudinaryError::config("CLOUD_NAME not set"))?,
            api_key: std::env::var("API_KEY")
                .map_err(|_| CloudinaryError::config("API_KEY not set"))?,
            api_secret: std::env::var("API_SECRET")
                .map_err(|_| CloudinaryError::config("API_SECRET not set"))?,
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(30),
        })
    }
}

/// Cloudinary upload API client.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    /// Create a new client from configuration.
    pub fn new(config: CloudinaryConfig) -> CloudinaryResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("braderie-cloudinary/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> CloudinaryResult<Self> {
        let config = CloudinaryConfig::from_env()?;
        Self::new(config)
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.config.api_base, self.config.cloud_name, action
        )
    }

    /// Upload image bytes inline and return the descriptor Cloudinary sends
    /// back.
    ///
    /// The bytes are wrapped in a `data:<mime>;base64,<payload>` URI, tagged
    /// with the given folder and public id, and the request is signed.
    pub async fn upload_image(
        &self,
        bytes: &[u8],
        content_type: &str,
        folder: &str,
        public_id: &str,
    ) -> CloudinaryResult<ImageDescriptor> {
        let file = to_data_uri(content_type, bytes);
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[
                ("folder", folder),
                ("public_id", public_id),
                ("timestamp", &timestamp),
            ],
            &self.config.api_secret,
        );

        debug!(folder, public_id, size = bytes.len(), "Uploading image");

        let form = [
            ("file", file.as_str()),
            ("folder", folder),
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .http
            .post(self.endpoint("upload"))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::upload_failed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let descriptor: ImageDescriptor = response.json().await?;
        info!(public_id = %descriptor.public_id, "Uploaded image");
        Ok(descriptor)
    }

    /// Delete a previously uploaded image.
    ///
    /// Used as compensating cleanup when persistence fails after a successful
    /// upload; callers treat failures as non-fatal.
    pub async fn destroy_image(&self, public_id: &str) -> CloudinaryResult<()> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.config.api_secret,
        );

        let form = [
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .http
            .post(self.endpoint("destroy"))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::DestroyFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response.json().await?;
        match body.get("result").and_then(|v| v.as_str()) {
            Some("ok") => Ok(()),
            Some("not found") => {
                warn!(public_id, "Image already gone (idempotent destroy)");
                Ok(())
            }
            other => Err(CloudinaryError::DestroyFailed(format!(
                "unexpected result: {:?}",
                other
            ))),
        }
    }
}

/// Encode bytes as a self-describing inline data URI.
fn to_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, BASE64.encode(bytes))
}

/// Compute the Cloudinary request signature.
///
/// Parameters must be passed in alphabetical order; the signature is the
/// SHA-256 hex digest of the `key=value` pairs joined with `&`, with the API
/// secret appended.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_base: String) -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key123".to_string(),
            api_secret: "secret456".to_string(),
            api_base,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn data_uri_is_self_describing() {
        let uri = to_data_uri("image/png", b"hello");
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn signature_is_deterministic() {
        let params = [
            ("folder", "vinted/offers"),
            ("public_id", "Chaise - abc"),
            ("timestamp", "1700000000"),
        ];
        let a = sign(&params, "secret");
        let b = sign(&params, "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, sign(&params, "other-secret"));
    }

    #[tokio::test]
    async fn upload_parses_descriptor() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": "vinted/offers/Chaise - abc",
                "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/vinted/offers/abc.jpg",
                "format": "jpg",
                "bytes": 1234
            })))
            .mount(&server)
            .await;

        let client = CloudinaryClient::new(test_config(server.uri())).unwrap();
        let descriptor = client
            .upload_image(b"fake image bytes", "image/jpeg", "vinted/offers", "Chaise - abc")
            .await
            .unwrap();

        assert_eq!(descriptor.public_id, "vinted/offers/Chaise - abc");
        assert!(descriptor.secure_url.starts_with("https://res.cloudinary.com/"));
        assert_eq!(descriptor.extra["bytes"], 1234);
    }

    #[tokio::test]
    async fn upload_surfaces_provider_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Invalid signature" }
            })))
            .mount(&server)
            .await;

        let client = CloudinaryClient::new(test_config(server.uri())).unwrap();
        let err = client
            .upload_image(b"bytes", "image/jpeg", "vinted/offers", "x")
            .await
            .unwrap_err();

        assert!(matches!(err, CloudinaryError::UploadFailed(_)));
        assert!(err.to_string().contains("Invalid signature"));
    }

    #[tokio::test]
    async fn destroy_treats_missing_image_as_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/destroy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "result": "not found" })),
            )
            .mount(&server)
            .await;

        let client = CloudinaryClient::new(test_config(server.uri())).unwrap();
        assert!(client.destroy_image("vinted/offers/gone").await.is_ok());
    }
}
