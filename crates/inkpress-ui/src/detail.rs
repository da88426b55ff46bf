//! Post detail page.

use inkpress_core::Post;
use inkpress_views::{DetailMode, DetailState, Navigator, PostDetail};
use leptos::{prelude::*, task::spawn_local};
use leptos_router::hooks::use_params_map;

use crate::{
    common::{BackButton, ConfirmModal, ErrorMessage, Loading},
    services::{RouterNavigator, use_services},
    write::WritePostPage,
};

/// Question shown before deleting.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this post?";

/// Human readable publication date.
pub fn date_label(post: &Post) -> Option<String> {
    post.created_at
        .map(|created| created.format("%B %-d, %Y").to_string())
}

/// One post at `/blog/:id`, with edit and delete actions.
#[component]
pub fn PostDetailPage() -> impl IntoView {
    let posts = StoredValue::new(use_services().posts);
    let navigator = RouterNavigator::new();
    let params = use_params_map();
    let detail = RwSignal::new(PostDetail::new());

    // Refetch whenever the id segment changes.
    Effect::new(move |_| {
        let id = params.with(|p| p.get("id"));
        let Some(ticket) = detail.try_update(|d| d.begin_fetch(id.as_deref())).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = posts.get_value().get_post(ticket.id()).await;
            detail.update(|d| {
                d.complete_fetch(ticket, result);
            });
        });
    });

    let confirm_delete = Callback::new(move |()| {
        let Some(id) = detail.try_update(PostDetail::begin_delete).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = posts.get_value().delete_post(&id).await;
            if let Some(route) = detail.try_update(|d| d.complete_delete(result)).flatten() {
                navigator.navigate(route);
            }
        });
    });
    let cancel_delete = Callback::new(move |()| detail.update(PostDetail::cancel_delete));
    let cancel_edit = Callback::new(move |()| detail.update(PostDetail::cancel_edit));

    let deleting = Signal::derive(move || detail.with(|d| d.mode() == DetailMode::Deleting));

    let page = move || {
        let (state, mode) = detail.with(|d| (d.state().clone(), d.mode()));
        match state {
            DetailState::Loading => view! { <Loading /> }.into_any(),
            DetailState::Failed(message) => view! {
              <ErrorMessage message=message />
              <BackButton />
            }
            .into_any(),
            DetailState::Loaded(post) if mode == DetailMode::Editing => {
                view! { <WritePostPage post=post on_cancel=cancel_edit /> }.into_any()
            }
            DetailState::Loaded(post) => {
                let confirming =
                    matches!(mode, DetailMode::ConfirmingDelete | DetailMode::Deleting);
                view! {
                  <PostArticle post=post />
                  <div class="inkpress-detail-actions">
                    <BackButton />
                    <button
                      type="button"
                      class="inkpress-button"
                      on:click=move |_| {
                          detail.update(|d| {
                              d.start_edit();
                          })
                      }
                    >
                      "Edit"
                    </button>
                    <button
                      type="button"
                      class="inkpress-button inkpress-button-danger"
                      on:click=move |_| detail.update(PostDetail::request_delete)
                    >
                      "Delete"
                    </button>
                  </div>
                  {move || {
                      detail
                          .with(|d| d.action_error().map(str::to_string))
                          .map(|message| view! { <ErrorMessage message=message /> })
                  }}
                  <Show when=move || confirming>
                    <ConfirmModal
                      message=DELETE_PROMPT
                      on_yes=confirm_delete
                      on_no=cancel_delete
                      busy=deleting
                    />
                  </Show>
                }
                .into_any()
            }
        }
    };

    view! { <section class="inkpress-detail">{page}</section> }
}

/// Rendered post: image, title, description and HTML body.
#[component]
fn PostArticle(post: Post) -> impl IntoView {
    let date = date_label(&post);
    let image = post.img.clone().map(|src| {
        view! { <img class="inkpress-detail-image" src=src alt=post.title.clone() /> }
    });

    view! {
      <article class="inkpress-article">
        {image}
        <header class="inkpress-article-header">
          <h1 class="inkpress-article-title">{post.title}</h1>
          {date.map(|date| view! { <time class="inkpress-article-date">{date}</time> })}
          <p class="inkpress-article-desc">{post.desc}</p>
        </header>
        <div class="inkpress-article-content inkpress-prose" inner_html=post.content></div>
      </article>
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_date_label() {
        let mut post = Post::default();
        assert_eq!(date_label(&post), None);

        post.created_at = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).single();
        assert_eq!(date_label(&post).as_deref(), Some("March 5, 2024"));
    }
}
