// libs/appointment-cell/src/services/media.rs
//
// Glue between base64 image payloads and the external media host. The
// host stores the bytes and hands back a durable URL, which is what the
// appointment rows keep.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::AppointmentError;

pub struct MediaService {
    client: Client,
    upload_url: String,
    upload_preset: String,
    configured: bool,
}

impl MediaService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            upload_url: config.media_upload_url.clone(),
            upload_preset: config.media_upload_preset.clone(),
            configured: config.is_media_configured(),
        }
    }

    /// Upload one base64-encoded image and return the hosted URL. Accepts
    /// either a bare base64 string or a full "data:image/...;base64,..."
    /// URI.
    pub async fn upload_image(&self, base64_image: &str) -> Result<String, AppointmentError> {
        if !self.configured {
            return Err(AppointmentError::MediaUploadFailed(
                "Media host is not configured".to_string(),
            ));
        }

        let parts: Vec<&str> = base64_image.split(',').collect();
        let base64_data = if parts.len() > 1 { parts[1] } else { base64_image };

        // Decode up front so a garbage payload fails here, not at the host.
        let decoded = BASE64
            .decode(base64_data)
            .map_err(|_| AppointmentError::InvalidRequest("Invalid base64 image data".to_string()))?;
        if decoded.is_empty() {
            return Err(AppointmentError::InvalidRequest(
                "Empty image payload".to_string(),
            ));
        }
        debug!("Uploading {} byte image to media host", decoded.len());

        let content_type = if base64_image.contains("image/png") {
            "image/png"
        } else {
            "image/jpeg"
        };
        let data_uri = if base64_image.starts_with("data:") {
            base64_image.to_string()
        } else {
            format!("data:{};base64,{}", content_type, base64_data)
        };

        let response = self
            .client
            .post(&self.upload_url)
            .form(&[
                ("file", data_uri.as_str()),
                ("upload_preset", self.upload_preset.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppointmentError::MediaUploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Media host rejected upload ({}): {}", status, body);
            return Err(AppointmentError::MediaUploadFailed(format!(
                "Media host returned {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppointmentError::MediaUploadFailed(e.to_string()))?;

        body["secure_url"]
            .as_str()
            .map(|url| url.to_string())
            .ok_or_else(|| {
                AppointmentError::MediaUploadFailed("Media host response had no URL".to_string())
            })
    }
}
