//! Client-side routes and the navigation seam.

use std::{cell::RefCell, fmt, rc::Rc};

/// A page of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Post list, the home page.
    Posts,
    /// A single post by id.
    Post(String),
    /// New post form.
    Write,
    /// Identity provider sign-in.
    SignIn,
    /// Identity provider sign-up.
    SignUp,
}

impl Route {
    /// URL path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Posts => "/".to_string(),
            Self::Post(id) => format!("/blog/{id}"),
            Self::Write => "/write".to_string(),
            Self::SignIn => "/auth/sign-in".to_string(),
            Self::SignUp => "/auth/sign-up".to_string(),
        }
    }

    /// Match a URL path. Query strings and trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');

        match path {
            "" => Some(Self::Posts),
            "/write" => Some(Self::Write),
            "/auth/sign-in" => Some(Self::SignIn),
            "/auth/sign-up" => Some(Self::SignUp),
            _ => path
                .strip_prefix("/blog/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Self::Post(id.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Moves the application to another route.
pub trait Navigator {
    fn navigate(&self, route: Route);
}

impl<F: Fn(Route)> Navigator for F {
    fn navigate(&self, route: Route) {
        self(route)
    }
}

/// Navigator that only records the routes it was sent to.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<Route>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes navigated to, oldest first.
    pub fn visits(&self) -> Vec<Route> {
        self.visits.borrow().clone()
    }

    /// The most recent route.
    pub fn current(&self) -> Option<Route> {
        self.visits.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "Navigate");
        self.visits.borrow_mut().push(route);
    }
}
