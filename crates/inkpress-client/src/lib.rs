//! Inkpress Client
//!
//! HTTP access to the posts API and the media host.
//!
//! Requests go through the [`Transport`] trait so that response decoding and
//! endpoint layout can be exercised without a browser. [`GlooTransport`] and
//! [`CloudinaryUploader`] are the browser implementations built on `gloo-net`.

pub mod error;
pub mod media;
pub mod posts;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{ClientError, Result};
pub use media::{CloudinaryUploader, ImageTransform, MediaUploader, is_hosted_image};
pub use posts::PostsClient;
pub use transport::{ApiRequest, ApiResponse, GlooTransport, Transport};
