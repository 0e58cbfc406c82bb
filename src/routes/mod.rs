//! Route table and the two navigation guards.

use tokio::sync::mpsc;

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Login,
    Register,
    Dashboard,
    Transactions,
    Categories,
    Reports,
}

impl Route {
    /// Screens reachable from the tab bar once logged in.
    pub(crate) fn protected() -> &'static [Route] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Categories,
            Self::Reports,
        ]
    }

    pub(crate) fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/registrar",
            Self::Dashboard => "/",
            Self::Transactions => "/transacoes",
            Self::Categories => "/categorias",
            Self::Reports => "/relatorios",
        }
    }

    /// Resolves a path; anything unknown lands on the dashboard.
    pub(crate) fn from_path(path: &str) -> Route {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "/login" => Self::Login,
            "/registrar" => Self::Register,
            "/transacoes" => Self::Transactions,
            "/categorias" => Self::Categories,
            "/relatorios" => Self::Reports,
            _ => Self::Dashboard,
        }
    }

    pub(crate) fn is_public_only(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "Login"),
            Self::Register => write!(f, "Register"),
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Categories => write!(f, "Categories"),
            Self::Reports => write!(f, "Reports"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Guard {
    /// Session still hydrating: show a neutral placeholder.
    Loading,
    Render(Route),
    Redirect(Route),
}

/// Children render only when a session exists.
pub(crate) fn protected(route: Route, state: &SessionState) -> Guard {
    match state {
        SessionState::Uninitialized => Guard::Loading,
        SessionState::Anonymous => Guard::Redirect(Route::Login),
        SessionState::Authenticated(_) => Guard::Render(route),
    }
}

/// Children render only when no session exists.
pub(crate) fn public_only(route: Route, state: &SessionState) -> Guard {
    match state {
        SessionState::Uninitialized => Guard::Loading,
        SessionState::Anonymous => Guard::Render(route),
        SessionState::Authenticated(_) => Guard::Redirect(Route::Dashboard),
    }
}

/// Applies whichever guard owns `route`.
pub(crate) fn resolve(route: Route, state: &SessionState) -> Guard {
    if route.is_public_only() {
        public_only(route, state)
    } else {
        protected(route, state)
    }
}

/// Sends forced navigations (e.g. to the login view after a 401) to
/// whoever owns the screen.
#[derive(Clone)]
pub(crate) struct Navigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn redirect(&self, route: Route) {
        tracing::info!(path = route.path(), "Forced navigation");
        // Receiver gone means the UI already shut down.
        let _ = self.tx.send(route);
    }
}
