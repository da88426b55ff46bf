//! In-memory doubles for [`Transport`] and [`MediaUploader`].
//!
//! Responses are queued up front and consumed in order; every request is
//! recorded for later assertions.

use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
};

use http::StatusCode;

use crate::{
    error::{ClientError, Result},
    media::MediaUploader,
    transport::{ApiRequest, ApiResponse, Transport},
};

/// Scripted transport. Clones share the same queue and request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Rc<RefCell<VecDeque<Result<ApiResponse>>>>,
    requests: Rc<RefCell<Vec<ApiRequest>>>,
}

impl MockTransport {
    /// Create a transport with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(&self, status: StatusCode, body: impl Into<String>) {
        self.replies
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    /// Queue a transport failure.
    pub fn fail(&self, error: ClientError) {
        self.replies.borrow_mut().push_back(Err(error));
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// Number of requests sent with the given method.
    pub fn count(&self, method: &http::Method) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| &r.method == method)
            .count()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted response".to_string())))
    }
}

/// Scripted uploader accepting file names.
#[derive(Debug, Clone, Default)]
pub struct MockUploader {
    replies: Rc<RefCell<VecDeque<Result<String>>>>,
    uploads: Rc<RefCell<Vec<String>>>,
}

impl MockUploader {
    /// Create an uploader with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful upload returning `url`.
    pub fn succeed(&self, url: impl Into<String>) {
        self.replies.borrow_mut().push_back(Ok(url.into()));
    }

    /// Queue a failed upload.
    pub fn fail(&self, message: impl Into<String>) {
        self.replies
            .borrow_mut()
            .push_back(Err(ClientError::upload(message)));
    }

    /// File names uploaded so far.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.borrow().clone()
    }
}

impl MediaUploader for MockUploader {
    type File = String;

    async fn upload(&self, file: String) -> Result<String> {
        self.uploads.borrow_mut().push(file);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::upload("no scripted upload")))
    }
}
