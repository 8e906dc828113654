//! Cloudinary upload API client (signed requests).

use crate::domain::model::PhotoRef;
use crate::infra::config::CloudinaryConfig;
use crate::infra::media::{MediaError, ObjectStorage, Upload};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::time::Duration;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryStorage {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/{}", API_BASE, self.config.cloud_name, action)
    }

    async fn error_for(resp: reqwest::Response) -> MediaError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        MediaError::Rejected { status, body }
    }
}

/// Signs request parameters: `sha1("k1=v1&k2=v2" + secret)` with keys sorted, the
/// account default for signed upload API calls.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ObjectStorage for CloudinaryStorage {
    async fn upload(&self, folder: &str, upload: Upload) -> Result<PhotoRef, MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder), ("timestamp", &timestamp)],
            &self.config.api_secret,
        );

        let mut part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.unwrap_or_else(|| "upload".to_string()));
        if let Some(ct) = upload.content_type.as_deref() {
            part = part.mime_str(ct)?;
        }
        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);

        let resp = self
            .client
            .post(self.endpoint("image/upload"))
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp).await);
        }
        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;
        tracing::debug!(public_id = %body.public_id, "image uploaded");
        Ok(PhotoRef {
            id: body.public_id,
            secure_url: body.secure_url,
        })
    }

    async fn delete(&self, id: &str) -> Result<(), MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", id), ("timestamp", &timestamp)],
            &self.config.api_secret,
        );
        let params = [
            ("public_id", id.to_string()),
            ("timestamp", timestamp),
            ("api_key", self.config.api_key.clone()),
            ("signature", signature),
        ];
        let resp = self
            .client
            .post(self.endpoint("image/destroy"))
            .form(&params)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp).await);
        }
        let body: DestroyResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::InvalidResponse(format!(
                "destroy returned {:?}",
                other
            ))),
        }
    }

    async fn check(&self) -> Result<(), MediaError> {
        let resp = self
            .client
            .get(self.endpoint("ping"))
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp).await);
        }
        Ok(())
    }
}
