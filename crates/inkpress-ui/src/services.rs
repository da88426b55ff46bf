//! Collaborators shared by all pages.

use inkpress_client::{CloudinaryUploader, GlooTransport, PostsClient};
use inkpress_core::ClientConfig;
use inkpress_views::{Navigator, Route};
use leptos::prelude::*;
use leptos_router::{NavigateOptions, hooks::use_navigate};

/// API client, uploader and the configuration they were built from.
#[derive(Debug, Clone)]
pub struct Services {
    pub posts: PostsClient<GlooTransport>,
    pub uploader: CloudinaryUploader,
    pub config: ClientConfig,
}

impl Services {
    /// Build the browser services. Fails on incomplete configuration.
    pub fn new(config: ClientConfig) -> inkpress_core::Result<Self> {
        config.validate()?;
        let uploader = CloudinaryUploader::new(config.media.clone())?;
        Ok(Self {
            posts: PostsClient::new(GlooTransport, config.api.clone()),
            uploader,
            config,
        })
    }
}

/// Make `services` available to every page below the current owner.
pub fn provide_services(services: Services) {
    provide_context(services);
}

/// The services provided by [`provide_services`].
pub fn use_services() -> Services {
    expect_context::<Services>()
}

/// [`Navigator`] backed by the router.
///
/// Must be created inside the `<Router>`; the handle is `Copy` so it can be
/// moved into event handlers and spawned tasks.
#[derive(Clone, Copy)]
pub struct RouterNavigator {
    navigate: StoredValue<Box<dyn Fn(&str, NavigateOptions)>, LocalStorage>,
}

impl RouterNavigator {
    pub fn new() -> Self {
        let navigate: Box<dyn Fn(&str, NavigateOptions)> = Box::new(use_navigate());
        Self {
            navigate: StoredValue::new_local(navigate),
        }
    }
}

impl Default for RouterNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, route: Route) {
        let path = route.path();
        tracing::debug!(%path, "Navigate");
        self.navigate
            .with_value(|navigate| navigate(&path, NavigateOptions::default()));
    }
}
