//! Sign-in and sign-up pages.
//!
//! Both embed the identity provider's hosted widget. The provider script is
//! injected once per page load; the widget is mounted into a container div
//! after `Clerk.load()` resolves.

use inkpress_views::Route;
use js_sys::{Function, Promise, Reflect};
use leptos::{html, prelude::*, task::spawn_local};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use wasm_bindgen_futures::JsFuture;

use crate::{common::ErrorMessage, services::use_services};

/// `id` of the injected provider script.
pub const SCRIPT_ID: &str = "inkpress-auth-provider";

/// Shown when the provider key or script is missing.
pub const NOT_CONFIGURED: &str = "Sign-in is not configured";

/// Global object the provider script installs.
const PROVIDER_GLOBAL: &str = "Clerk";

/// Which provider widget to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    SignIn,
    SignUp,
}

impl AuthKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignUp => "Sign up",
        }
    }

    /// Provider method mounting this widget.
    pub fn mount_fn(self) -> &'static str {
        match self {
            Self::SignIn => "mountSignIn",
            Self::SignUp => "mountSignUp",
        }
    }

    pub fn route(self) -> Route {
        match self {
            Self::SignIn => Route::SignIn,
            Self::SignUp => Route::SignUp,
        }
    }

    /// The page to suggest instead.
    pub fn other(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            Self::SignIn => "No account yet?",
            Self::SignUp => "Already have an account?",
        }
    }
}

/// The provider widget for `kind`.
#[component]
pub fn AuthWidget(kind: AuthKind) -> impl IntoView {
    let auth = use_services().config.auth;
    let key = auth.publishable_key.filter(|k| !k.trim().is_empty());
    let script = auth.provider_script.filter(|s| !s.trim().is_empty());
    let (Some(key), Some(script)) = (key, script) else {
        tracing::warn!("Identity provider is not configured");
        return view! { <ErrorMessage message=NOT_CONFIGURED /> }.into_any();
    };

    let container = NodeRef::<html::Div>::new();
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let Some(el) = container.get() else {
            return;
        };
        if let Err(err) = load_provider(kind, &key, &script, el.into(), error) {
            error.set(Some(describe(&err)));
        }
    });

    view! {
      <div class="inkpress-auth-widget" node_ref=container></div>
      {move || error.get().map(|message| view! { <ErrorMessage message=message /> })}
    }
    .into_any()
}

#[component]
pub fn SignInPage() -> impl IntoView {
    view! { <AuthPage kind=AuthKind::SignIn /> }
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    view! { <AuthPage kind=AuthKind::SignUp /> }
}

#[component]
fn AuthPage(kind: AuthKind) -> impl IntoView {
    let other = kind.other();
    view! {
      <section class="inkpress-auth">
        <h1>{kind.title()}</h1>
        <AuthWidget kind=kind />
        <p class="inkpress-auth-switch">
          {kind.prompt()} " " <a href=other.route().path()>{other.title()}</a>
        </p>
      </section>
    }
}

/// Inject the provider script if needed, then mount once it has loaded.
fn load_provider(
    kind: AuthKind,
    key: &str,
    src: &str,
    container: web_sys::Element,
    error: RwSignal<Option<String>>,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mount = move || {
        spawn_local(async move {
            if let Err(err) = mount_widget(kind, &container).await {
                tracing::error!(error = %describe(&err), "Failed to mount identity widget");
                error.set(Some(describe(&err)));
            }
        });
    };

    let script = match document.get_element_by_id(SCRIPT_ID) {
        Some(existing) => {
            if provider(&window).is_some() {
                mount();
                return Ok(());
            }
            // Injected by an earlier visit and still loading.
            existing
        }
        None => {
            tracing::debug!(%src, "Injecting identity provider script");
            let script: web_sys::HtmlScriptElement =
                document.create_element("script")?.dyn_into()?;
            script.set_id(SCRIPT_ID);
            script.set_src(src);
            script.set_async(true);
            script.set_cross_origin(Some("anonymous"));
            script.set_attribute("data-clerk-publishable-key", key)?;
            let body = document
                .body()
                .ok_or_else(|| JsValue::from_str("no body"))?;
            body.append_child(&script)?;
            script.into()
        }
    };

    let on_load = Closure::once_into_js(mount);
    script.add_event_listener_with_callback("load", on_load.unchecked_ref())?;
    Ok(())
}

fn provider(window: &web_sys::Window) -> Option<JsValue> {
    Reflect::get(window, &JsValue::from_str(PROVIDER_GLOBAL))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

async fn mount_widget(kind: AuthKind, container: &web_sys::Element) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clerk = provider(&window)
        .ok_or_else(|| JsValue::from_str("Identity provider did not load"))?;

    let load: Function = Reflect::get(&clerk, &JsValue::from_str("load"))?.dyn_into()?;
    let loading: Promise = load.call0(&clerk)?.dyn_into()?;
    JsFuture::from(loading).await?;

    let mount: Function = Reflect::get(&clerk, &JsValue::from_str(kind.mount_fn()))?.dyn_into()?;
    mount.call1(&clerk, container)?;
    tracing::info!(widget = kind.mount_fn(), "Identity widget mounted");
    Ok(())
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| "Identity provider error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_kinds() {
        assert_eq!(AuthKind::SignIn.mount_fn(), "mountSignIn");
        assert_eq!(AuthKind::SignUp.mount_fn(), "mountSignUp");
        assert_eq!(AuthKind::SignIn.other(), AuthKind::SignUp);
        assert_eq!(AuthKind::SignUp.route().path(), "/auth/sign-up");
        assert_eq!(AuthKind::SignIn.title(), "Sign in");
    }
}
