//! Post authoring form.
//!
//! The form owns the draft and the rich-text editor. Phases:
//!
//! ```text
//! Empty -> Editing -> Submitting -> Submitted
//!             ^            |
//!             +-- Errored <+
//! ```
//!
//! Edit mode starts in `Editing`, pre-filled from an existing post.

use inkpress_client::{ClientError, MediaUploader, PostsClient, Transport};
use inkpress_core::{Post, PostPayload, PostUpdate, slugify};
use inkpress_editor::{Document, Mark, RichTextEditor};

use crate::navigation::{Navigator, Route};

/// Error shown when submitting without a title.
pub const TITLE_REQUIRED: &str = "Title is required";

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Nothing typed yet.
    Empty,
    /// The draft has unsaved changes.
    Editing,
    /// A create or update request is in flight.
    Submitting,
    /// The backend accepted the draft.
    Submitted,
    /// The last submit failed or was rejected.
    Errored,
}

/// Whether the form creates a new post or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Unsaved post fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub slug: String,
    /// Editor HTML as of the last synchronization.
    pub content: String,
    /// URL of the last uploaded image.
    pub media_url: String,
}

impl Draft {
    /// Pre-fill from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.desc.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            media_url: post.img.clone().unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Create body, with the slug recomputed from the title.
    pub fn payload(&self) -> PostPayload {
        PostPayload::new(
            self.title.trim(),
            self.description.as_str(),
            self.content.as_str(),
            self.media_url.as_str(),
        )
    }
}

/// The request a submit should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    /// `POST /api/v1/posts`
    Create(PostPayload),
    /// `PUT /api/v1/posts/{id}`
    Update { id: String, update: PostUpdate },
}

impl SubmitRequest {
    /// Send through `client`.
    pub async fn send<T: Transport>(
        &self,
        client: &PostsClient<T>,
    ) -> inkpress_client::Result<()> {
        match self {
            Self::Create(payload) => client.create_post(payload).await,
            Self::Update { id, update } => client.update_post(id, update).await,
        }
    }
}

/// Editor HTML when the form was built, and the content it stands for.
///
/// An editor may not represent every construct of loaded HTML. Until the
/// user changes the document the loaded content is kept as is.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Baseline {
    editor_html: String,
    content: String,
}

/// Form controller over a rich-text editor.
#[derive(Debug, Clone)]
pub struct PostForm<E> {
    mode: FormMode,
    phase: FormPhase,
    draft: Draft,
    editor: E,
    baseline: Baseline,
    uploading: bool,
    last_error: Option<String>,
}

impl PostForm<Document> {
    /// New post form on the placeholder document.
    pub fn create() -> Self {
        Self::new(Document::placeholder())
    }

    /// Edit form for `post`, with its content loaded into the editor.
    pub fn for_post(post: &Post) -> Self {
        Self::edit(post, Document::from_html(&post.content))
    }
}

impl<E: RichTextEditor> PostForm<E> {
    /// Create-mode form.
    pub fn new(editor: E) -> Self {
        let content = editor.current_content();
        let baseline = Baseline {
            editor_html: content.clone(),
            content: content.clone(),
        };
        Self {
            mode: FormMode::Create,
            phase: FormPhase::Empty,
            draft: Draft {
                content,
                ..Draft::default()
            },
            editor,
            baseline,
            uploading: false,
            last_error: None,
        }
    }

    /// Edit-mode form. `editor` should already hold the post's content.
    ///
    /// The post's content is submitted unchanged unless the editor document
    /// is edited.
    pub fn edit(post: &Post, editor: E) -> Self {
        let baseline = Baseline {
            editor_html: editor.current_content(),
            content: post.content.clone(),
        };
        Self {
            mode: FormMode::Edit {
                id: post.id.clone(),
            },
            phase: FormPhase::Editing,
            draft: Draft::from_post(post),
            editor,
            baseline,
            uploading: false,
            last_error: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Error of the last failed operation, cleared by the next edit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether an image upload is pending.
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.draft.slug = slugify(&self.draft.title);
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.touch();
    }

    /// Run `change` against the editor, then synchronize the draft content.
    pub fn edit_content<R>(&mut self, change: impl FnOnce(&mut E) -> R) -> R {
        let out = change(&mut self.editor);
        self.sync_content();
        out
    }

    /// Whether the toolbar button for `mark` is enabled.
    pub fn mark_enabled(&self, mark: Mark) -> bool {
        self.phase != FormPhase::Submitting && self.editor.can_apply(mark)
    }

    /// Whether `mark` is active on the selection.
    pub fn mark_active(&self, mark: Mark) -> bool {
        self.editor.is_active(mark)
    }

    /// Toggle `mark` on the editor selection.
    pub fn toggle_mark(&mut self, mark: Mark) {
        if !self.mark_enabled(mark) {
            return;
        }
        self.edit_content(|editor| editor.toggle(mark));
    }

    /// Content to submit: the editor HTML, or the loaded content while the
    /// editor still holds what it was built with.
    fn content(&self) -> String {
        let html = self.editor.current_content();
        if html == self.baseline.editor_html {
            self.baseline.content.clone()
        } else {
            html
        }
    }

    fn sync_content(&mut self) {
        let content = self.content();
        if content != self.draft.content {
            self.draft.content = content;
            self.touch();
        }
    }

    fn touch(&mut self) {
        if self.phase != FormPhase::Submitting {
            self.phase = FormPhase::Editing;
            self.last_error = None;
        }
    }

    /// Reserve the image control. Returns `false` while another upload is
    /// pending or a submit is in flight.
    pub fn begin_upload(&mut self) -> bool {
        if self.uploading || self.phase == FormPhase::Submitting {
            tracing::debug!("Image upload refused, form busy");
            return false;
        }
        self.uploading = true;
        true
    }

    /// Apply an upload outcome: embed the image, or record the failure.
    pub fn complete_upload(&mut self, result: inkpress_client::Result<String>) {
        self.uploading = false;

        match result {
            Ok(url) => {
                self.editor.insert_image(&url);
                self.draft.media_url = url;
                self.sync_content();
                self.touch();
            }
            Err(err) => {
                let err = match err {
                    ClientError::Upload(_) => err,
                    other => ClientError::upload(other.to_string()),
                };
                tracing::warn!(error = %err, "Image upload failed");
                if self.phase != FormPhase::Submitting {
                    self.phase = FormPhase::Editing;
                }
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Start a submit. Returns the request to send, or `None` when a submit
    /// is already in flight or the draft is rejected.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.phase == FormPhase::Submitting {
            tracing::debug!("Submit ignored, already submitting");
            return None;
        }

        if self.draft.title.trim().is_empty() {
            self.phase = FormPhase::Errored;
            self.last_error = Some(TITLE_REQUIRED.to_string());
            return None;
        }

        // The draft is left as typed so a failed submit can be retried.
        let payload = Draft {
            content: self.content(),
            ..self.draft.clone()
        }
        .payload();
        self.phase = FormPhase::Submitting;
        self.last_error = None;

        Some(match &self.mode {
            FormMode::Create => SubmitRequest::Create(payload),
            FormMode::Edit { id } => SubmitRequest::Update {
                id: id.clone(),
                update: payload.into(),
            },
        })
    }

    /// Apply a submit outcome. Returns the route to navigate to on success.
    pub fn complete_submit(&mut self, result: inkpress_client::Result<()>) -> Option<Route> {
        if self.phase != FormPhase::Submitting {
            return None;
        }

        match result {
            Ok(()) => {
                tracing::info!(mode = ?self.mode, "Post saved");
                self.draft = Draft::default();
                self.phase = FormPhase::Submitted;
                Some(Route::Posts)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Post submit failed");
                self.phase = FormPhase::Errored;
                self.last_error = Some(format!("Failed to publish post: {err}"));
                None
            }
        }
    }

    /// Submit through `client`, navigating on success.
    pub async fn submit<T, N>(&mut self, client: &PostsClient<T>, navigator: &N)
    where
        T: Transport,
        N: Navigator + ?Sized,
    {
        let Some(request) = self.begin_submit() else {
            return;
        };
        let result = request.send(client).await;
        if let Some(route) = self.complete_submit(result) {
            navigator.navigate(route);
        }
    }

    /// Upload `file` and embed it at the cursor.
    pub async fn attach_image<U: MediaUploader>(&mut self, uploader: &U, file: U::File) {
        if !self.begin_upload() {
            return;
        }
        let result = uploader.upload(file).await;
        self.complete_upload(result);
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use inkpress_client::testing::{MockTransport, MockUploader};
    use inkpress_core::ApiConfig;
    use inkpress_editor::PLACEHOLDER_HTML;

    use super::*;
    use crate::navigation::RecordingNavigator;

    const IMAGE_URL: &str = "https://res.cloudinary.com/demo/image/upload/v1/cover.png";

    fn client() -> PostsClient<MockTransport> {
        PostsClient::new(MockTransport::new(), ApiConfig::default())
    }

    fn filled_form() -> PostForm<Document> {
        let mut form = PostForm::create();
        form.set_title("Hello, World!");
        form.set_description("A first post");
        form
    }

    #[test]
    fn test_new_form_is_empty() {
        let form = PostForm::create();
        assert_eq!(form.phase(), FormPhase::Empty);
        assert_eq!(form.mode(), &FormMode::Create);
        assert_eq!(form.draft().content, PLACEHOLDER_HTML);
        assert!(form.can_submit());
    }

    #[test]
    fn test_title_derives_slug() {
        let mut form = PostForm::create();
        form.set_title("Rust & WebAssembly: Part 2");
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.draft().slug, "rust-webassembly-part-2");
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut form = PostForm::create();
        form.set_title("   ");
        assert!(form.begin_submit().is_none());
        assert_eq!(form.phase(), FormPhase::Errored);
        assert_eq!(form.last_error(), Some(TITLE_REQUIRED));

        form.set_title("Fixed");
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.last_error().is_none());
    }

    #[test]
    fn test_begin_submit_builds_create_request() {
        let mut form = filled_form();
        let request = form.begin_submit().expect("request");

        let SubmitRequest::Create(payload) = request else {
            panic!("expected create request");
        };
        assert_eq!(payload.title, "Hello, World!");
        assert_eq!(payload.slug, "hello-world");
        assert_eq!(payload.desc, "A first post");
        assert_eq!(payload.content, PLACEHOLDER_HTML);
        assert_eq!(payload.img, "");

        assert_eq!(form.phase(), FormPhase::Submitting);
        assert!(!form.can_submit());
        assert!(form.begin_submit().is_none(), "re-entry must be refused");
    }

    #[test]
    fn test_edit_mode_builds_update_request() {
        let post = Post {
            id: "p1".to_string(),
            title: "Old".to_string(),
            slug: "old".to_string(),
            desc: "d".to_string(),
            content: "<p>body</p>".to_string(),
            img: Some(IMAGE_URL.to_string()),
            ..Post::default()
        };
        let mut form = PostForm::for_post(&post);
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.draft().media_url, IMAGE_URL);

        form.set_title("New title");
        let request = form.begin_submit().expect("request");
        let SubmitRequest::Update { id, update } = request else {
            panic!("expected update request");
        };
        assert_eq!(id, "p1");
        assert_eq!(update.slug.as_deref(), Some("new-title"));
        assert_eq!(update.content.as_deref(), Some("<p>body</p>"));
        assert_eq!(update.img.as_deref(), Some(IMAGE_URL));
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let mut form = filled_form();
        let before = form.draft().clone();
        form.begin_submit().expect("request");

        let route = form.complete_submit(Err(ClientError::status(500)));
        assert!(route.is_none());
        assert_eq!(form.phase(), FormPhase::Errored);
        assert_eq!(form.draft(), &before);
        assert_eq!(
            form.last_error(),
            Some("Failed to publish post: HTTP error: 500")
        );
        assert!(form.can_submit());
    }

    #[test]
    fn test_failed_edit_submit_keeps_stored_slug() {
        let post = Post {
            id: "p7".to_string(),
            title: "Hello World".to_string(),
            slug: "hello-world-2024".to_string(),
            content: "<h2>Intro</h2>".to_string(),
            ..Post::default()
        };
        let mut form = PostForm::for_post(&post);
        let before = form.draft().clone();

        let Some(SubmitRequest::Update { update, .. }) = form.begin_submit() else {
            panic!("expected update request");
        };
        assert_eq!(update.slug.as_deref(), Some("hello-world"));

        form.complete_submit(Err(ClientError::Network("offline".to_string())));
        assert_eq!(form.phase(), FormPhase::Errored);
        assert_eq!(form.draft(), &before);
        assert_eq!(form.draft().slug, "hello-world-2024");
    }

    #[tokio::test]
    async fn test_title_only_edit_sends_original_content() {
        let content = "<h2>Setup</h2><p>See <a href=\"https://docs.rs\">the docs</a> and \
                       <u>this</u></p><pre><code>let x = 1;</code></pre><ul><li>kept</li></ul>";
        let post = Post {
            id: "p1".to_string(),
            title: "Intro".to_string(),
            slug: "intro".to_string(),
            content: content.to_string(),
            ..Post::default()
        };
        let client = client();
        client
            .transport()
            .respond(StatusCode::OK, r#"{"status": 200}"#);
        let navigator = RecordingNavigator::new();

        let mut form = PostForm::for_post(&post);
        assert_eq!(form.draft().content, content);
        form.set_title("Intro v2");
        form.edit_content(|doc| doc.select(0, 0));
        form.submit(&client, &navigator).await;

        let request = client.transport().requests().pop().expect("update request");
        assert_eq!(request.method, Method::PUT);
        let body = request.body.expect("update body");
        assert_eq!(body["title"], "Intro v2");
        assert_eq!(body["content"], content);
        assert_eq!(navigator.visits(), vec![Route::Posts]);
    }

    #[test]
    fn test_edited_content_replaces_original() {
        let post = Post {
            id: "p1".to_string(),
            title: "Intro".to_string(),
            content: "<p>one</p><ul><li>two</li></ul>".to_string(),
            ..Post::default()
        };
        let mut form = PostForm::for_post(&post);
        form.edit_content(|doc| doc.apply_text_change("one\ntwo!"));
        assert_eq!(form.draft().content, "<p>one</p><p>two!</p>");

        // Undoing the edit restores the loaded content.
        form.edit_content(|doc| doc.apply_text_change("one\ntwo"));
        assert_eq!(form.draft().content, post.content);
    }

    #[test]
    fn test_successful_submit_clears_draft() {
        let mut form = filled_form();
        form.begin_submit().expect("request");

        assert_eq!(form.complete_submit(Ok(())), Some(Route::Posts));
        assert_eq!(form.phase(), FormPhase::Submitted);
        assert!(form.draft().is_empty());

        // A late duplicate completion does nothing.
        assert_eq!(form.complete_submit(Ok(())), None);
    }

    #[test]
    fn test_toolbar_follows_editor() {
        let mut form = PostForm::new(Document::from_html("<p>word</p>"));
        form.edit_content(|doc| doc.select(0, 4));
        form.toggle_mark(Mark::Code);
        assert!(form.mark_active(Mark::Code));
        assert!(!form.mark_enabled(Mark::Bold));
        assert_eq!(form.draft().content, "<p><code>word</code></p>");
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_upload_is_not_reentrant() {
        let mut form = PostForm::create();
        assert!(form.begin_upload());
        assert!(form.is_uploading());
        assert!(!form.begin_upload());

        form.complete_upload(Ok(IMAGE_URL.to_string()));
        assert!(!form.is_uploading());
        assert!(form.begin_upload());
    }

    #[test]
    fn test_upload_failure_stays_editing() {
        let mut form = PostForm::create();
        assert!(form.begin_upload());
        form.complete_upload(Err(ClientError::Network("offline".to_string())));

        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(
            form.last_error(),
            Some("Image upload failed: Network error: offline")
        );
        assert_eq!(form.draft().media_url, "");
    }

    #[tokio::test]
    async fn test_attach_image_embeds_url() {
        let uploader = MockUploader::new();
        uploader.succeed(IMAGE_URL);
        let mut form = PostForm::create();

        form.attach_image(&uploader, "cover.png".to_string()).await;

        assert_eq!(uploader.uploads(), vec!["cover.png"]);
        assert_eq!(form.draft().media_url, IMAGE_URL);
        assert!(form.draft().content.contains(&format!("<img src=\"{IMAGE_URL}\">")));
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[tokio::test]
    async fn test_submit_navigates_once() {
        let client = client();
        client
            .transport()
            .respond(StatusCode::CREATED, r#"{"status": 201}"#);
        let navigator = RecordingNavigator::new();
        let mut form = filled_form();

        form.submit(&client, &navigator).await;
        form.submit(&client, &navigator).await;

        assert_eq!(navigator.visits(), vec![Route::Posts]);
        assert!(form.draft().is_empty());
        // The second submit has no title and never reaches the backend.
        assert_eq!(client.transport().count(&Method::POST), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_does_not_navigate() {
        let client = client();
        client
            .transport()
            .fail(ClientError::Network("connection refused".to_string()));
        let navigator = RecordingNavigator::new();
        let mut form = filled_form();

        form.submit(&client, &navigator).await;

        assert!(navigator.visits().is_empty());
        assert_eq!(form.phase(), FormPhase::Errored);
        assert!(
            form.last_error()
                .is_some_and(|e| e.starts_with("Failed to publish post"))
        );
    }
}
