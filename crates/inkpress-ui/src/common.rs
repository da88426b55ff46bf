//! Small shared components.

use inkpress_views::Route;
use leptos::prelude::*;

/// Loading indicator.
#[component]
pub fn Loading(
    /// Text announced while loading.
    #[prop(default = "Loading...")]
    label: &'static str,
) -> impl IntoView {
    view! {
      <div class="inkpress-loading" role="status" aria-live="polite">
        <span class="inkpress-spinner"></span>
        {label}
      </div>
    }
}

/// Inline error message.
#[component]
pub fn ErrorMessage(#[prop(into)] message: String) -> impl IntoView {
    view! {
      <p class="inkpress-error" role="alert">
        {message}
      </p>
    }
}

/// Link back to the post list.
#[component]
pub fn BackButton() -> impl IntoView {
    view! {
      <a href=Route::Posts.path() class="inkpress-back">
        "← Back"
      </a>
    }
}

/// Yes/No confirmation dialog.
///
/// Clicking the overlay counts as "No".
#[component]
pub fn ConfirmModal(
    /// Question shown to the user.
    #[prop(into)]
    message: String,
    /// Invoked on "Yes".
    on_yes: Callback<()>,
    /// Invoked on "No".
    on_no: Callback<()>,
    /// Disables "Yes" while the confirmed action runs.
    #[prop(default = false.into(), into)]
    busy: Signal<bool>,
) -> impl IntoView {
    let on_content_click = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
    };

    view! {
      <div class="inkpress-modal-overlay" on:click=move |_| on_no.run(())>
        <div
          class="inkpress-modal"
          role="dialog"
          aria-modal="true"
          on:click=on_content_click
        >
          <p class="inkpress-modal-message">{message}</p>
          <div class="inkpress-modal-actions">
            <button
              type="button"
              class="inkpress-button inkpress-button-danger"
              disabled=move || busy.get()
              on:click=move |_| on_yes.run(())
            >
              "Yes"
            </button>
            <button type="button" class="inkpress-button" on:click=move |_| on_no.run(())>
              "No"
            </button>
          </div>
        </div>
      </div>
    }
}

/// Full-page screen shown instead of the app when the client configuration
/// is unusable.
#[component]
pub fn ConfigError(
    /// Why the configuration was rejected.
    #[prop(into)]
    message: String,
) -> impl IntoView {
    view! {
      <main class="inkpress-config-error">
        <h1>"Configuration error"</h1>
        <ErrorMessage message=message />
        <p>"Fix the server configuration and reload the page."</p>
      </main>
    }
}
