//! Navigation guard for protected views, plus the same-origin check for
//! every state-changing request.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::Url;

use crate::AppState;
use crate::session::SessionState;

/// Views the client can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Prompt input, panes and preview.
    Generator,
    /// Login form.
    Login,
    /// Registration form.
    Register,
}

impl View {
    /// Path the view is served at.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Generator => "/",
            Self::Login => "/login",
            Self::Register => "/register",
        }
    }

    /// Whether rendering requires a session.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Generator)
    }
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested view.
    Allow,
    /// Navigate elsewhere instead.
    Redirect(View),
}

/// Decide whether `view` may render for `session`.
#[must_use]
pub fn check(view: View, session: &SessionState) -> GuardDecision {
    if view.is_protected() && !session.is_authenticated() {
        GuardDecision::Redirect(View::Login)
    } else {
        GuardDecision::Allow
    }
}

/// Middleware for every route that belongs to the generator view.
///
/// Reads the session store on each request and injects the [`Session`]
/// for handlers to extract.
///
/// [`Session`]: crate::session::Session
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let current = state.sessions.current_session();

    match (check(View::Generator, &current), current) {
        (GuardDecision::Allow, SessionState::Authenticated(session)) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        (GuardDecision::Redirect(view), _) => {
            tracing::debug!(path = %request.uri().path(), to = view.path(), "Navigation redirected");
            Redirect::to(view.path()).into_response()
        }
        (GuardDecision::Allow, SessionState::Anonymous) => {
            Redirect::to(View::Login.path()).into_response()
        }
    }
}

/// Whether a request may change state on behalf of a page from another origin.
///
/// Safe methods always pass. Otherwise the `Origin` header must name this
/// host; `null` (the sandboxed preview) and unparsable origins are refused.
/// Without `Origin`, a browser-reported `Sec-Fetch-Site: cross-site` is refused.
#[must_use]
pub fn is_cross_origin(method: &Method, headers: &HeaderMap) -> bool {
    if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return false;
    }

    let Some(origin) = headers.get(header::ORIGIN) else {
        return headers
            .get("sec-fetch-site")
            .is_some_and(|site| site.as_bytes() == b"cross-site");
    };
    let Some(origin) = origin.to_str().ok().and_then(|o| Url::parse(o).ok()) else {
        return true;
    };
    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return true;
    };
    let Ok(own) = Url::parse(&format!("{}://{host}", origin.scheme())) else {
        return true;
    };

    origin.host_str() != own.host_str()
        || origin.port_or_known_default() != own.port_or_known_default()
}

/// Middleware refusing cross-origin writes with `403 Forbidden`.
pub async fn same_origin(request: Request, next: Next) -> Result<Response, StatusCode> {
    if is_cross_origin(request.method(), request.headers()) {
        tracing::warn!(
            name: "request.cross_origin.rejected",
            method = %request.method(),
            path = %request.uri().path(),
            origin = ?request.headers().get(header::ORIGIN),
            "Cross-origin request refused"
        );
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(request).await)
}
