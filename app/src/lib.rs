use inkpress_ui::{
    PostDetailPage, PostListPage, Services, SignInPage, SignUpPage, WritePostPage,
    provide_services,
};
use inkpress_views::Route as AppRoute;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

#[component]
pub fn App(services: Services) -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();
    provide_services(services);

    view! {
      <Title text="Inkpress" />

      <Router>
        <Header />
        <main class="inkpress-main">
          <Routes fallback=|| "Page not found.".into_view()>
            <Route path=StaticSegment("") view=PostListPage />
            <Route path=StaticSegment("write") view=WritePage />
            <Route path=(StaticSegment("blog"), ParamSegment("id")) view=PostDetailPage />
            <Route path=(StaticSegment("auth"), StaticSegment("sign-in")) view=SignInPage />
            <Route path=(StaticSegment("auth"), StaticSegment("sign-up")) view=SignUpPage />
          </Routes>
        </main>
      </Router>
    }
}

#[component]
fn Header() -> impl IntoView {
    view! {
      <header class="inkpress-header">
        <a href=AppRoute::Posts.path() class="inkpress-brand">
          "Inkpress"
        </a>
        <nav class="inkpress-nav">
          <a href=AppRoute::Posts.path()>"Posts"</a>
          <a href=AppRoute::Write.path()>"Write"</a>
          <a href=AppRoute::SignIn.path()>"Sign in"</a>
        </nav>
      </header>
    }
}

/// New-post form at `/write`.
#[component]
fn WritePage() -> impl IntoView {
    view! { <WritePostPage /> }
}
