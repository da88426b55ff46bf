//! Request/response transport abstraction.

use gloo_net::http::Request;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// A JSON request against the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,

    /// Absolute URL.
    pub url: String,

    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

/// A raw response: status plus body text.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,

    /// Body text, possibly empty.
    pub body: String,
}

impl ApiRequest {
    /// Create a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }

    /// Create a DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            url: url.into(),
            body: None,
        }
    }

    /// Create a request with a JSON body.
    pub fn with_json(method: Method, url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method,
            url: url.into(),
            body: Some(body),
        }
    }
}

impl ApiResponse {
    /// Create a response.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Fail with [`ClientError::Status`] unless the status is 2xx.
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ClientError::status(self.status.as_u16()))
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|_| ClientError::InvalidResponse)
    }
}

/// Sends [`ApiRequest`]s and returns the raw [`ApiResponse`].
///
/// Implementations only fail for transport-level problems; status handling
/// belongs to the caller.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send one request.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Browser transport on top of `fetch` via `gloo-net`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending API request");

        let builder = match request.method.as_str() {
            "GET" => Request::get(&request.url),
            "POST" => Request::post(&request.url),
            "PUT" => Request::put(&request.url),
            "DELETE" => Request::delete(&request.url),
            other => {
                return Err(ClientError::Network(format!(
                    "Unsupported HTTP method: {other}"
                )));
            }
        }
        .header("Content-Type", "application/json");

        let built = match &request.body {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| ClientError::Encode(e.to_string()))?;

        let response = built
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status =
            StatusCode::from_u16(response.status()).map_err(|_| ClientError::InvalidResponse)?;

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), "Received API response");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status() {
        let ok = ApiResponse::new(StatusCode::CREATED, "{}");
        assert!(ok.error_for_status().is_ok());

        let err = ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "")
            .error_for_status()
            .unwrap_err();
        assert_eq!(err, ClientError::status(500));
    }

    #[test]
    fn test_json_decode_failure_is_invalid_response() {
        let response = ApiResponse::new(StatusCode::OK, "<html>oops</html>");
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert_eq!(err, ClientError::InvalidResponse);
    }

    #[test]
    fn test_request_constructors() {
        let get = ApiRequest::get("http://localhost:8000/api/v1/posts");
        assert_eq!(get.method, Method::GET);
        assert!(get.body.is_none());

        let put = ApiRequest::with_json(
            Method::PUT,
            "http://localhost:8000/api/v1/posts/1",
            serde_json::json!({"title": "T"}),
        );
        assert_eq!(put.method, Method::PUT);
        assert_eq!(put.body.expect("body")["title"], "T");
    }
}
