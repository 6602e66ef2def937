//! Cloudinary upload client.
//!
//! Car photos are pushed to Cloudinary with a signed upload request; only the
//! returned `secure_url` is stored alongside the car.

use reqwest::multipart;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;

/// Errors from the image host.
#[derive(Debug, thiserror::Error)]
pub enum CloudinaryError {
    /// Transport-level failure talking to the upload endpoint.
    #[error("image upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upload endpoint answered with a non-success status.
    #[error("image upload rejected ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed-upload client for a single Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    /// Create a client for the configured Cloudinary account.
    #[must_use]
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }

    /// SHA-256 signature over the sorted parameter string plus the API
    /// secret, per Cloudinary's signed-upload scheme.
    fn sign(&self, params_to_sign: &str) -> String {
        use secrecy::ExposeSecret;

        let mut hasher = Sha256::new();
        hasher.update(params_to_sign.as_bytes());
        hasher.update(self.config.api_secret.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Upload one image and return its HTTPS delivery URL.
    ///
    /// # Errors
    ///
    /// Returns [`CloudinaryError::Request`] on transport failures and
    /// [`CloudinaryError::Rejected`] when Cloudinary refuses the upload.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, CloudinaryError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(&format!("timestamp={timestamp}"));

        let part = multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::Rejected { status, body });
        }

        let upload: UploadResponse = response.json().await?;
        Ok(upload.secure_url)
    }
}
