//! Inkpress Views
//!
//! Page controllers independent of any UI framework.
//!
//! Each controller is a plain state machine. Operations are split into a
//! `begin_*` step that performs the state transition and describes the
//! request, and a `complete_*` step that applies the outcome. The async
//! drivers (`load`, `fetch`, `submit`, ...) chain both around a
//! [`PostsClient`](inkpress_client::PostsClient) for callers that own the
//! controller across the await.

pub mod detail;
pub mod form;
pub mod list;
pub mod navigation;

pub use detail::{DetailMode, DetailState, FetchTicket, PostDetail};
pub use form::{Draft, FormMode, FormPhase, PostForm, SubmitRequest};
pub use list::{ListState, ListView, PostCard, PostList};
pub use navigation::{Navigator, RecordingNavigator, Route};
