//! Image uploads to the media host.

use gloo_net::http::Request;
use inkpress_core::MediaConfig;
use serde::Deserialize;
use wasm_bindgen::JsValue;
use web_sys::FormData;

use crate::error::{ClientError, Result};

/// Domain serving uploaded images.
pub const DELIVERY_HOST: &str = "res.cloudinary.com";

/// Moves one local file to public hosting.
#[allow(async_fn_in_trait)]
pub trait MediaUploader {
    /// The local file handle accepted by this uploader.
    type File;

    /// Upload `file` and return its public URL.
    async fn upload(&self, file: Self::File) -> Result<String>;
}

/// Unsigned uploads to Cloudinary from the browser.
#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    config: MediaConfig,
}

impl CloudinaryUploader {
    /// Create an uploader, rejecting incomplete credentials.
    pub fn new(config: MediaConfig) -> inkpress_core::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Credentials in use.
    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Delivery URL for an uploaded image with the given transformation.
    pub fn optimized_url(&self, public_id: &str, transform: &ImageTransform) -> String {
        optimized_image_url(&self.config.cloud_name, public_id, transform)
    }
}

impl MediaUploader for CloudinaryUploader {
    type File = web_sys::File;

    async fn upload(&self, file: web_sys::File) -> Result<String> {
        tracing::info!(name = %file.name(), size = file.size(), "Uploading image");

        let form = FormData::new().map_err(js_upload_error)?;
        form.append_with_blob("file", &file)
            .map_err(js_upload_error)?;
        form.append_with_str("upload_preset", &self.config.upload_preset)
            .map_err(js_upload_error)?;

        let response = Request::post(&self.config.upload_url())
            .body(form)
            .map_err(|e| ClientError::upload(e.to_string()))?
            .send()
            .await
            .map_err(|e| ClientError::upload(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::upload(e.to_string()))?;

        let url = parse_upload_response(status, &body)?;
        tracing::info!(%url, "Image uploaded");
        Ok(url)
    }
}

fn js_upload_error(value: JsValue) -> ClientError {
    ClientError::upload(format!("{value:?}"))
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Extract `secure_url` from the media host's answer.
pub fn parse_upload_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(ClientError::upload(format!("HTTP {status}")));
    }

    let parsed: UploadResponse = serde_json::from_str(body)
        .map_err(|_| ClientError::upload("unreadable response"))?;

    parsed
        .secure_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ClientError::upload("response has no secure_url"))
}

/// Delivery transformation for hosted images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTransform {
    /// Target width in pixels; `None` lets the host choose.
    pub width: Option<u32>,
    /// Target height in pixels.
    pub height: Option<u32>,
    /// Quality setting (e.g., "auto", "80").
    pub quality: String,
    /// Output format (e.g., "auto", "webp").
    pub format: String,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: "auto".to_string(),
            format: "auto".to_string(),
        }
    }
}

impl ImageTransform {
    /// Set the width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Transformation segment, e.g. `w_auto,q_auto,f_auto`.
    pub fn segment(&self) -> String {
        let width = self
            .width
            .map_or_else(|| "w_auto".to_string(), |w| format!("w_{w}"));
        let mut parts = vec![width];
        if let Some(h) = self.height {
            parts.push(format!("h_{h}"));
        }
        parts.push(format!("q_{}", self.quality));
        parts.push(format!("f_{}", self.format));
        parts.join(",")
    }
}

/// Build a delivery URL for `public_id` on the given cloud.
pub fn optimized_image_url(
    cloud_name: &str,
    public_id: &str,
    transform: &ImageTransform,
) -> String {
    format!(
        "https://{DELIVERY_HOST}/{cloud_name}/image/upload/{}/{}",
        transform.segment(),
        public_id.trim_start_matches('/')
    )
}

/// Whether `url` points at the media host, so a card can display it.
pub fn is_hosted_image(url: &str) -> bool {
    url.starts_with("https://") && url.contains(DELIVERY_HOST)
}
