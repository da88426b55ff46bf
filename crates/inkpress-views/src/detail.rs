//! Post detail page: fetch, delete with confirmation, switch to editing.

use inkpress_client::{ClientError, PostsClient, Transport};
use inkpress_core::Post;

use crate::navigation::{Navigator, Route};

/// Fetch state of the shown post.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Post),
    Failed(String),
}

/// What the page is doing with a loaded post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    Viewing,
    /// The delete confirmation is open.
    ConfirmingDelete,
    /// A delete request is in flight.
    Deleting,
    /// The post is shown in the edit form.
    Editing,
}

/// Identifies one issued fetch.
///
/// Only the ticket of the most recent [`PostDetail::begin_fetch`] is
/// accepted by [`PostDetail::complete_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    id: String,
}

impl FetchTicket {
    /// Post id to request.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Detail page controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    generation: u64,
    state: DetailState,
    mode: DetailMode,
    action_error: Option<String>,
}

impl Default for PostDetail {
    fn default() -> Self {
        Self::new()
    }
}

impl PostDetail {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: DetailState::Loading,
            mode: DetailMode::Viewing,
            action_error: None,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn mode(&self) -> DetailMode {
        self.mode
    }

    /// The loaded post, if any.
    pub fn post(&self) -> Option<&Post> {
        match &self.state {
            DetailState::Loaded(post) => Some(post),
            _ => None,
        }
    }

    /// Error of the last failed delete.
    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    /// Start fetching `id`, superseding any fetch in flight.
    ///
    /// A missing or empty id fails immediately with "No article found" and
    /// returns no ticket.
    pub fn begin_fetch(&mut self, id: Option<&str>) -> Option<FetchTicket> {
        self.generation += 1;
        self.mode = DetailMode::Viewing;
        self.action_error = None;

        match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                self.state = DetailState::Loading;
                Some(FetchTicket {
                    generation: self.generation,
                    id: id.to_string(),
                })
            }
            None => {
                self.state = DetailState::Failed(ClientError::NotFound.to_string());
                None
            }
        }
    }

    /// Apply a fetch outcome. Returns `false` if the ticket was superseded.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: inkpress_client::Result<Post>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(id = %ticket.id, "Discarding stale post response");
            return false;
        }

        self.state = match result {
            Ok(post) => DetailState::Loaded(post),
            Err(err) => {
                tracing::warn!(id = %ticket.id, error = %err, "Failed to fetch post");
                DetailState::Failed(err.to_string())
            }
        };
        true
    }

    /// Open the delete confirmation.
    pub fn request_delete(&mut self) {
        if self.post().is_some() && self.mode == DetailMode::Viewing {
            self.mode = DetailMode::ConfirmingDelete;
        }
    }

    /// "No": close the confirmation without any request.
    pub fn cancel_delete(&mut self) {
        if self.mode == DetailMode::ConfirmingDelete {
            self.mode = DetailMode::Viewing;
        }
    }

    /// "Yes": returns the id to delete.
    pub fn begin_delete(&mut self) -> Option<String> {
        if self.mode != DetailMode::ConfirmingDelete {
            return None;
        }
        let id = self.post()?.id.clone();
        self.mode = DetailMode::Deleting;
        self.action_error = None;
        Some(id)
    }

    /// Apply a delete outcome. Returns the route to navigate to on success.
    pub fn complete_delete(&mut self, result: inkpress_client::Result<()>) -> Option<Route> {
        if self.mode != DetailMode::Deleting {
            return None;
        }
        self.mode = DetailMode::Viewing;

        match result {
            Ok(()) => Some(Route::Posts),
            Err(err) => {
                tracing::warn!(error = %err, "Delete failed");
                self.action_error = Some(format!("Delete failed: {err}"));
                None
            }
        }
    }

    /// Switch to the edit form. Returns the post to pre-fill it with.
    pub fn start_edit(&mut self) -> Option<&Post> {
        if self.mode != DetailMode::Viewing {
            return None;
        }
        let DetailState::Loaded(post) = &self.state else {
            return None;
        };
        self.mode = DetailMode::Editing;
        Some(post)
    }

    /// Leave the edit form without saving.
    pub fn cancel_edit(&mut self) {
        if self.mode == DetailMode::Editing {
            self.mode = DetailMode::Viewing;
        }
    }

    /// Fetch `id` through `client`.
    pub async fn fetch<T: Transport>(&mut self, client: &PostsClient<T>, id: Option<&str>) {
        let Some(ticket) = self.begin_fetch(id) else {
            return;
        };
        let result = client.get_post(ticket.id()).await;
        self.complete_fetch(ticket, result);
    }

    /// Confirm the pending delete and send it through `client`.
    pub async fn confirm_delete<T, N>(&mut self, client: &PostsClient<T>, navigator: &N)
    where
        T: Transport,
        N: Navigator + ?Sized,
    {
        let Some(id) = self.begin_delete() else {
            return;
        };
        let result = client.delete_post(&id).await;
        if let Some(route) = self.complete_delete(result) {
            navigator.navigate(route);
        }
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use inkpress_client::testing::MockTransport;
    use inkpress_core::ApiConfig;

    use super::*;
    use crate::navigation::RecordingNavigator;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {id}"),
            ..Post::default()
        }
    }

    fn loaded(id: &str) -> PostDetail {
        let mut detail = PostDetail::new();
        let ticket = detail.begin_fetch(Some(id)).expect("ticket");
        assert!(detail.complete_fetch(ticket, Ok(post(id))));
        detail
    }

    fn client() -> PostsClient<MockTransport> {
        PostsClient::new(MockTransport::new(), ApiConfig::default())
    }

    #[test]
    fn test_missing_id_fails_without_ticket() {
        let mut detail = PostDetail::new();
        assert!(detail.begin_fetch(None).is_none());
        assert_eq!(
            detail.state(),
            &DetailState::Failed("No article found".to_string())
        );
        assert!(detail.begin_fetch(Some("  ")).is_none());
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut detail = PostDetail::new();
        let first = detail.begin_fetch(Some("1")).expect("ticket");
        let second = detail.begin_fetch(Some("2")).expect("ticket");

        assert!(detail.complete_fetch(second, Ok(post("2"))));
        assert!(!detail.complete_fetch(first, Ok(post("1"))));
        assert_eq!(detail.post().map(|p| p.id.as_str()), Some("2"));
    }

    #[test]
    fn test_stale_error_is_ignored() {
        let mut detail = PostDetail::new();
        let first = detail.begin_fetch(Some("1")).expect("ticket");
        detail.begin_fetch(None);

        assert!(!detail.complete_fetch(first, Err(ClientError::status(500))));
        assert_eq!(
            detail.state(),
            &DetailState::Failed("No article found".to_string())
        );
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut detail = loaded("1");
        assert!(detail.begin_delete().is_none());

        detail.request_delete();
        assert_eq!(detail.mode(), DetailMode::ConfirmingDelete);
        detail.cancel_delete();
        assert_eq!(detail.mode(), DetailMode::Viewing);
        assert!(detail.begin_delete().is_none());
    }

    #[test]
    fn test_delete_failure_returns_to_viewing() {
        let mut detail = loaded("1");
        detail.request_delete();
        assert_eq!(detail.begin_delete().as_deref(), Some("1"));
        assert_eq!(detail.mode(), DetailMode::Deleting);

        assert!(detail.complete_delete(Err(ClientError::status(403))).is_none());
        assert_eq!(detail.mode(), DetailMode::Viewing);
        assert_eq!(detail.action_error(), Some("Delete failed: HTTP error: 403"));
    }

    #[test]
    fn test_edit_and_cancel() {
        let mut detail = loaded("1");
        assert_eq!(detail.start_edit().map(|p| p.id.clone()), Some("1".to_string()));
        assert_eq!(detail.mode(), DetailMode::Editing);

        detail.request_delete();
        assert_eq!(detail.mode(), DetailMode::Editing);

        detail.cancel_edit();
        assert_eq!(detail.mode(), DetailMode::Viewing);
        assert_eq!(detail.post(), Some(&post("1")));
    }

    #[test]
    fn test_cannot_edit_without_post() {
        let mut detail = PostDetail::new();
        detail.begin_fetch(Some("1"));
        assert!(detail.start_edit().is_none());
        assert_eq!(detail.mode(), DetailMode::Viewing);
    }

    #[tokio::test]
    async fn test_fetch_empty_result_is_not_found() {
        let client = client();
        client.transport().respond(StatusCode::OK, r#"{"result": []}"#);
        let mut detail = PostDetail::new();

        detail.fetch(&client, Some("1")).await;

        assert_eq!(
            detail.state(),
            &DetailState::Failed("No article found".to_string())
        );
        assert!(detail.post().is_none());
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let client = client();
        let navigator = RecordingNavigator::new();
        let mut detail = loaded("1");

        detail.request_delete();
        detail.cancel_delete();
        detail.confirm_delete(&client, &navigator).await;

        assert_eq!(client.transport().count(&Method::DELETE), 0);
        assert!(navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_delete_navigates_to_list() {
        let client = client();
        client.transport().respond(StatusCode::NO_CONTENT, "");
        let navigator = RecordingNavigator::new();
        let mut detail = loaded("1");

        detail.request_delete();
        detail.confirm_delete(&client, &navigator).await;

        assert_eq!(client.transport().count(&Method::DELETE), 1);
        assert_eq!(
            client.transport().requests()[0].url,
            "http://localhost:8000/api/v1/posts/1"
        );
        assert_eq!(navigator.visits(), vec![Route::Posts]);
    }
}
