//! Posts API client.
//!
//! Every endpoint answers with a `{ "result": ... }` envelope. The detail
//! endpoint returns a singleton collection whose first element is the post.

use http::Method;
use inkpress_core::{ApiConfig, Post, PostPayload, PostUpdate};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{ClientError, Result},
    transport::{ApiRequest, Transport},
};

/// Client for the `/api/v1/posts` resource.
#[derive(Debug, Clone)]
pub struct PostsClient<T> {
    transport: T,
    api: ApiConfig,
}

impl<T: Transport> PostsClient<T> {
    /// Create a client over the given transport.
    pub fn new(transport: T, api: ApiConfig) -> Self {
        Self { transport, api }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The API settings in use.
    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    /// `GET /api/v1/posts`
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let response = self
            .transport
            .send(ApiRequest::get(self.api.posts_url()))
            .await?
            .error_for_status()?;

        decode_post_list(&response.body)
    }

    /// `GET /api/v1/posts/{id}`
    pub async fn get_post(&self, id: &str) -> Result<Post> {
        let response = self
            .transport
            .send(ApiRequest::get(self.api.post_url(id)))
            .await?
            .error_for_status()?;

        decode_single_post(&response.body)
    }

    /// `POST /api/v1/posts`
    pub async fn create_post(&self, payload: &PostPayload) -> Result<()> {
        let request = ApiRequest::with_json(Method::POST, self.api.posts_url(), to_body(payload)?);
        self.transport.send(request).await?.error_for_status()?;
        tracing::info!(slug = %payload.slug, "Post created");
        Ok(())
    }

    /// `PUT /api/v1/posts/{id}`
    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> Result<()> {
        let request = ApiRequest::with_json(Method::PUT, self.api.post_url(id), to_body(update)?);
        self.transport.send(request).await?.error_for_status()?;
        tracing::info!(id, "Post updated");
        Ok(())
    }

    /// `DELETE /api/v1/posts/{id}`
    pub async fn delete_post(&self, id: &str) -> Result<()> {
        self.transport
            .send(ApiRequest::delete(self.api.post_url(id)))
            .await?
            .error_for_status()?;
        tracing::info!(id, "Post deleted");
        Ok(())
    }
}

fn to_body(value: &impl Serialize) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Encode(e.to_string()))
}

fn envelope_result(body: &str) -> Result<Value> {
    let mut envelope: Value =
        serde_json::from_str(body).map_err(|_| ClientError::InvalidResponse)?;

    match envelope.get_mut("result").map(Value::take) {
        Some(Value::Null) | None => Err(ClientError::InvalidResponse),
        Some(result) => Ok(result),
    }
}

/// Decode the list endpoint's body into posts.
pub fn decode_post_list(body: &str) -> Result<Vec<Post>> {
    let result = envelope_result(body)?;
    if !result.is_array() {
        return Err(ClientError::InvalidResponse);
    }

    serde_json::from_value(result).map_err(|e| {
        tracing::warn!(error = %e, "Malformed post in list response");
        ClientError::InvalidResponse
    })
}

/// Decode the detail endpoint's body, taking the first element of `result`.
pub fn decode_single_post(body: &str) -> Result<Post> {
    let result = envelope_result(body)?;

    let first = match result {
        Value::Array(items) => items.into_iter().next().ok_or(ClientError::NotFound)?,
        _ => return Err(ClientError::NotFound),
    };

    let record = first.as_object().ok_or(ClientError::IncompleteRecord)?;
    let has_text = |key: &str| {
        record
            .get(key)
            .is_some_and(|v| v.as_str().is_some_and(|s| !s.is_empty()))
    };
    if !(has_text("id") || has_text("_id")) || !has_text("title") {
        return Err(ClientError::IncompleteRecord);
    }

    serde_json::from_value(first).map_err(|_| ClientError::IncompleteRecord)
}
