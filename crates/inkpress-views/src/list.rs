//! Post list page.

use inkpress_client::{PostsClient, Transport, is_hosted_image};
use inkpress_core::Post;

use crate::navigation::Route;

/// Message shown when the backend has no posts.
pub const EMPTY_MESSAGE: &str = "No posts found";

/// Message shown when the list cannot be fetched.
pub const FETCH_FAILED: &str = "Failed to fetch posts";

/// Placeholder text for cards without a displayable image.
pub const NO_IMAGE: &str = "No Image";

/// Characters of the description shown on a card.
pub const EXCERPT_CHARS: usize = 100;

/// Fetch state of the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Post>),
    Failed(String),
}

/// What the page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Empty(&'static str),
    Cards(Vec<PostCard>),
    Failed(String),
}

/// Summary of one post as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub title: String,
    /// Leading part of the description.
    pub excerpt: String,
    /// Image URL, only when hosted on the media host.
    pub image: Option<String>,
    /// Detail page of the post.
    pub route: Route,
}

impl PostCard {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: excerpt(&post.desc, EXCERPT_CHARS),
            image: post.img.clone().filter(|url| is_hosted_image(url)),
            route: Route::Post(post.id.clone()),
        }
    }
}

/// First `max` characters of `text`.
pub fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// List page controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PostList {
    state: ListState,
}

impl Default for PostList {
    fn default() -> Self {
        Self::new()
    }
}

impl PostList {
    /// A list waiting for its first fetch.
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Enter `Loading`, e.g. for a manual reload.
    pub fn begin_load(&mut self) {
        self.state = ListState::Loading;
    }

    pub fn complete_load(&mut self, result: inkpress_client::Result<Vec<Post>>) {
        self.state = match result {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "Posts loaded");
                ListState::Loaded(posts)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch posts");
                ListState::Failed(FETCH_FAILED.to_string())
            }
        };
    }

    /// Fetch all posts through `client`.
    pub async fn load<T: Transport>(&mut self, client: &PostsClient<T>) {
        self.begin_load();
        let result = client.list_posts().await;
        self.complete_load(result);
    }

    pub fn view(&self) -> ListView {
        match &self.state {
            ListState::Loading => ListView::Loading,
            ListState::Loaded(posts) if posts.is_empty() => ListView::Empty(EMPTY_MESSAGE),
            ListState::Loaded(posts) => {
                ListView::Cards(posts.iter().map(PostCard::from_post).collect())
            }
            ListState::Failed(message) => ListView::Failed(message.clone()),
        }
    }
}
