//! Inkpress Core Library
//!
//! Post model, slug derivation, configuration, and error handling shared by
//! the Inkpress client, views, and binaries.

pub mod config;
pub mod error;
pub mod post;
pub mod slug;

pub use config::{ApiConfig, AuthConfig, ClientConfig, Config, MediaConfig, ServerConfig};
pub use error::{CoreError, Result};
pub use post::{Post, PostPayload, PostUpdate};
pub use slug::slugify;
