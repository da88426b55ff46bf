//! Inkpress UI Components
//!
//! Leptos pages for the Inkpress frontend. Page state lives in the
//! controllers of `inkpress-views`; components here hold them in signals and
//! run their requests with `spawn_local`.
//!
//! # Pages
//!
//! - [`PostListPage`] - all posts as cards
//! - [`PostDetailPage`] - one post, with edit and delete
//! - [`WritePostPage`] - the authoring form with toolbar and image upload
//! - [`SignInPage`] / [`SignUpPage`] - identity provider widgets
//!
//! # Components
//!
//! - [`PostCardTile`], [`EditorSurface`], [`Toolbar`]
//! - [`ConfirmModal`], [`BackButton`], [`Loading`], [`ConfigError`]
//!
//! Pages read their collaborators from [`Services`], which must be provided
//! with [`provide_services`] above the router.

pub mod auth;
pub mod common;
pub mod detail;
pub mod list;
pub mod services;
pub mod write;

pub use auth::{AuthKind, AuthWidget, SignInPage, SignUpPage};
pub use common::{BackButton, ConfigError, ConfirmModal, ErrorMessage, Loading};
pub use detail::PostDetailPage;
pub use list::{PostCardTile, PostListPage};
pub use services::{RouterNavigator, Services, provide_services, use_services};
pub use write::{EditorSurface, Toolbar, WritePostPage};
