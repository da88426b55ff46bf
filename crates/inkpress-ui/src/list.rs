//! Post list page.

use inkpress_views::{ListView, PostCard, PostList, Route, list::NO_IMAGE};
use leptos::{prelude::*, task::spawn_local};

use crate::{
    common::{ErrorMessage, Loading},
    services::use_services,
};

/// One post summary linking to its detail page.
#[component]
pub fn PostCardTile(
    /// The card to display.
    card: PostCard,
) -> impl IntoView {
    let image = match card.image {
        Some(src) => view! { <img class="inkpress-card-image" src=src alt=card.title.clone() /> }
            .into_any(),
        None => view! { <div class="inkpress-card-no-image">{NO_IMAGE}</div> }.into_any(),
    };

    view! {
      <a href=card.route.path() class="inkpress-card">
        <div class="inkpress-card-body">
          <h2 class="inkpress-card-title">{card.title}</h2>
          <p class="inkpress-card-excerpt">{card.excerpt}</p>
        </div>
        {image}
      </a>
    }
}

/// Home page: every post as a card.
#[component]
pub fn PostListPage() -> impl IntoView {
    let posts = StoredValue::new(use_services().posts);
    let list = RwSignal::new(PostList::new());

    let load = move || {
        list.update(PostList::begin_load);
        spawn_local(async move {
            let result = posts.get_value().list_posts().await;
            list.update(|l| l.complete_load(result));
        });
    };
    load();

    view! {
      <section class="inkpress-list">
        <header class="inkpress-list-header">
          <h1>"Posts"</h1>
          <a href=Route::Write.path() class="inkpress-button">
            "Write a post"
          </a>
        </header>
        {move || match list.with(PostList::view) {
          ListView::Loading => view! { <Loading /> }.into_any(),
          ListView::Empty(message) => {
            view! { <p class="inkpress-empty">{message}</p> }.into_any()
          }
          ListView::Cards(cards) => {
            view! {
              <div class="inkpress-card-grid">
                {cards
                  .into_iter()
                  .map(|card| view! { <PostCardTile card=card /> })
                  .collect_view()}
              </div>
            }
              .into_any()
          }
          ListView::Failed(message) => {
            view! {
              <ErrorMessage message=message />
              <button type="button" class="inkpress-button" on:click=move |_| load()>
                "Reload"
              </button>
            }
              .into_any()
          }
        }}
      </section>
    }
}
