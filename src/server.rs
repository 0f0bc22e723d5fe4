use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{
    Extension, Form, Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::auth::{AuthClient, LoginCredentials, Registration};
use crate::clipboard::SystemClipboard;
use crate::config::AppConfig;
use crate::controller::{self, Notice, SubmitRejected, lock};
use crate::error::AuthError;
use crate::generation::{GenerationClient, HttpTransport};
use crate::guard::{self, View};
use crate::render::{PREVIEW_CSP, Tab, preview_document};
use crate::service::{ServiceEndpoints, check_health};
use crate::session::{FileStorage, MemoryStorage, Session, SessionStorage, SessionStore};
use crate::ui::pages;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let storage: Arc<dyn SessionStorage> = if config.storage.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(FileStorage::new(&config.storage.path))
    };
    let sessions = SessionStore::new(storage);

    let endpoints = ServiceEndpoints::from_config(&config.service)
        .with_context(|| format!("invalid service.base_url `{}`", config.service.base_url))?;
    info!(
        name: "service.config.loaded",
        generate_url = %endpoints.generate,
        ephemeral_session = config.storage.ephemeral,
        "Generation service configured"
    );

    let http = reqwest::Client::new();

    // Liveness is informational only; the app starts either way
    let probe_http = http.clone();
    let health_url = endpoints.health.clone();
    tokio::spawn(async move {
        match check_health(&probe_http, &health_url).await {
            Ok(health) => info!(
                name: "service.health.ok",
                status = %health.status,
                "Generation service reachable"
            ),
            Err(e) => tracing::warn!(
                name: "service.health.failed",
                url = %health_url,
                error = %e,
                "Generation service not reachable yet"
            ),
        }
    });

    let transport = Arc::new(HttpTransport::new(http.clone(), endpoints.generate.clone()));
    let generator = GenerationClient::new(transport, sessions.clone());
    let auth = AuthClient::new(http, endpoints.login, endpoints.register);

    let state = AppState::new(sessions, generator, auth, Arc::new(SystemClipboard));
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!(
        name: "server.started",
        address = %format!("http://{address}"),
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
///
/// Everything belonging to the generator view sits behind
/// [`guard::require_session`]. Every route sits behind [`guard::same_origin`],
/// so pages from other origins, the sandboxed preview included, cannot post
/// to the app.
pub fn build_router(state: AppState) -> Router {
    let generator = Router::new()
        .route("/", get(generator_page))
        .route("/generate", post(generate))
        .route("/tab/{tab}", post(select_tab))
        .route("/copy", post(copy))
        .route("/preview", get(preview))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_session,
        ));

    Router::new()
        .merge(generator)
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", post(logout))
        .route("/health", get(health))
        .layer(middleware::from_fn(guard::same_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Generator view
// ─────────────────────────────────────────────────────────────────────────────

/// Generator form body.
#[derive(Debug, Deserialize)]
struct GenerateForm {
    #[serde(default)]
    prompt: String,
}

/// GET / - Generator view.
async fn generator_page(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Html<String> {
    let snapshot = lock(&state.controller).snapshot(Instant::now());
    Html(pages::generator_page(&session.identity, &snapshot))
}

/// POST /generate - Start one generation attempt.
///
/// The request runs in its own task, so the browser is redirected straight
/// to the loading view and a dropped connection cannot strand it.
async fn generate(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<GenerateForm>,
) -> Redirect {
    tracing::info!(
        user = %session.identity.name,
        prompt_length = form.prompt.len(),
        "Received generation request"
    );

    let started = lock(&state.controller).begin_submission(form.prompt);
    let ticket = match started {
        Ok(ticket) => ticket,
        Err(SubmitRejected::Busy) => {
            tracing::debug!("Generation already in flight, ignoring submission");
            return Redirect::to(View::Generator.path());
        }
        Err(SubmitRejected::EmptyPrompt) => return Redirect::to(View::Generator.path()),
    };

    let controller = Arc::clone(&state.controller);
    let generator = state.generator.clone();
    tokio::spawn(async move {
        let effect =
            controller::finish(&controller, &generator, &session.credential, ticket).await;
        tracing::debug!(effect = ?effect, "Generation cycle finished");
    });

    Redirect::to(View::Generator.path())
}

/// POST /tab/{tab} - Select the visible pane.
async fn select_tab(State(state): State<AppState>, Path(tab): Path<String>) -> Response {
    let Some(tab) = Tab::from_segment(&tab) else {
        return (StatusCode::NOT_FOUND, "Unknown tab").into_response();
    };
    lock(&state.controller).select_tab(tab);
    Redirect::to(View::Generator.path()).into_response()
}

/// POST /copy - Copy the active pane to the clipboard.
async fn copy(State(state): State<AppState>) -> Redirect {
    let outcome = controller::copy_active_pane(&state.controller, state.clipboard.as_ref()).await;
    tracing::debug!(outcome = ?outcome, "Copy requested");
    Redirect::to(View::Generator.path())
}

/// GET /preview - Standalone preview document in a sandboxed origin.
async fn preview(State(state): State<AppState>) -> Response {
    let document = preview_document(lock(&state.controller).result());
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_SECURITY_POLICY, PREVIEW_CSP),
            (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
            (header::REFERRER_POLICY, "no-referrer"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        document,
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Login / registration
// ─────────────────────────────────────────────────────────────────────────────

/// Flags carried over from redirects.
#[derive(Debug, Default, Deserialize)]
struct LoginQuery {
    #[serde(default)]
    registered: bool,
}

/// Registration form body. Email may be left blank.
#[derive(Debug, Deserialize)]
struct RegisterForm {
    username: String,
    password: String,
    #[serde(default)]
    email: String,
}

fn auth_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::Rejected(_) => StatusCode::UNAUTHORIZED,
        AuthError::Network(_) | AuthError::Malformed(_) => StatusCode::BAD_GATEWAY,
    }
}

/// GET /login - Login view.
async fn login_page(State(state): State<AppState>, Query(query): Query<LoginQuery>) -> Html<String> {
    // A credential rejected mid-generation lands here through the guard
    let expired = {
        let controller = lock(&state.controller);
        if controller.session_expired() {
            controller.notice().cloned()
        } else {
            None
        }
    };
    let notice = expired.or_else(|| {
        query
            .registered
            .then(|| Notice::info("Registration successful. Please log in."))
    });
    Html(pages::login_page(notice.as_ref(), ""))
}

/// POST /login - Exchange credentials for a session.
async fn login(State(state): State<AppState>, Form(credentials): Form<LoginCredentials>) -> Response {
    let outcome = match state.auth.login(&credentials).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let notice = Notice::error(e.to_string());
            return (
                auth_status(&e),
                Html(pages::login_page(Some(&notice), &credentials.username)),
            )
                .into_response();
        }
    };

    if let Err(e) = state
        .sessions
        .set_session(&outcome.identity, &outcome.credential)
    {
        tracing::error!(error = %e, "Failed to persist session");
        let notice = Notice::error(format!("Could not save the session: {e}"));
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(pages::login_page(Some(&notice), &credentials.username)),
        )
            .into_response();
    }

    lock(&state.controller).reset();
    Redirect::to(View::Generator.path()).into_response()
}

/// GET /register - Registration view.
async fn register_page() -> Html<String> {
    Html(pages::register_page(None, "", ""))
}

/// POST /register - Create an account, then go to login.
async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let email = form.email.trim().to_string();
    let registration = Registration {
        username: form.username,
        password: form.password,
        email: (!email.is_empty()).then(|| email.clone()),
    };

    match state.auth.register(&registration).await {
        Ok(()) => Redirect::to("/login?registered=true").into_response(),
        Err(e) => {
            let notice = Notice::error(e.to_string());
            (
                auth_status(&e),
                Html(pages::register_page(
                    Some(&notice),
                    &registration.username,
                    &email,
                )),
            )
                .into_response()
        }
    }
}

/// POST /logout - Clear the session.
async fn logout(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.sessions.clear_session() {
        tracing::error!(error = %e, "Failed to clear session on logout");
    }
    lock(&state.controller).reset();
    Redirect::to(View::Login.path())
}

/// GET /health - Liveness.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
