//! Generator view state machine.
//!
//! ```text
//! Idle ──submit──▶ Loading ──ok──▶ Succeeded
//!                     │
//!                     └──err──▶ Failed
//! ```
//!
//! A submission from any settled state clears the previous result before
//! entering `Loading`, so the loading indicator never sits next to an old
//! answer. While `Loading`, further submissions are refused.
//!
//! Submission is split in two synchronous halves, [`ViewController::begin_submission`]
//! and [`ViewController::complete`], so the async [`submit`] can release the
//! lock for the duration of the network call.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::clipboard::Clipboard;
use crate::error::{ClipboardError, GenerationError};
use crate::generation::{GenerationClient, GenerationResult};
use crate::render::{Rendered, Tab, render};
use crate::session::Credential;

/// Label of the copy button.
pub const COPY_LABEL: &str = "Copy Code";
/// Label shown briefly after a successful copy.
pub const COPIED_LABEL: &str = "✓ Copied!";
/// How long [`COPIED_LABEL`] stays up.
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

const EMPTY_PROMPT_NOTICE: &str = "Please enter a description first.";
const NETWORK_NOTICE: &str =
    "Error connecting to the server. Please make sure the backend is running.";
const MALFORMED_NOTICE: &str = "Error parsing the generated code. Please try again.";
const UNAUTHORIZED_NOTICE: &str = "Your session has expired. Please log in again.";
const COPY_FAILED_NOTICE: &str = "Failed to copy to clipboard";

/// Generation lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request produced a result.
    Succeeded,
    /// The last request failed.
    Failed,
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Something went wrong.
    Error,
    /// Informational.
    Info,
}

/// User-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Message text.
    pub text: String,
}

impl Notice {
    /// Error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Informational notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }
}

/// Why a submission was refused before any request was made.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Prompt was blank.
    #[error("prompt is empty")]
    EmptyPrompt,
    /// A request is already in flight.
    #[error("a generation request is already in flight")]
    Busy,
}

/// Proof that the controller entered `Loading` for a given prompt.
#[derive(Debug)]
pub struct Ticket {
    id: u64,
    prompt: String,
}

impl Ticket {
    /// Prompt to send.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// What the caller should do after [`ViewController::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Show the new result.
    Rendered,
    /// Show the failure notice; the user may retry.
    Failed,
    /// The session is gone; navigate to login.
    RedirectToLogin,
    /// The ticket was stale (controller reset meanwhile); nothing changed.
    Discarded,
}

/// Outcome of a copy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Both panes are empty; nothing was attempted.
    Disabled,
    /// Text reached the clipboard.
    Copied,
    /// The clipboard could not be written; a notice was raised.
    Failed,
}

/// Render-ready state of the generator view.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Current prompt text.
    pub prompt: String,
    /// Lifecycle phase.
    pub state: RequestState,
    /// Selected pane.
    pub tab: Tab,
    /// Verbatim panes and preview document.
    pub rendered: Rendered,
    /// HTML pane text, placeholder applied.
    pub html_text: String,
    /// CSS pane text, placeholder applied.
    pub css_text: String,
    /// Latest notice.
    pub notice: Option<Notice>,
    /// Copy button label.
    pub copy_label: &'static str,
    /// Whether copy is enabled.
    pub can_copy: bool,
    /// Whether Generate is enabled.
    pub can_generate: bool,
}

impl ViewSnapshot {
    /// Whether the loading indicator is shown.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == RequestState::Loading
    }
}

/// State of the generator view.
#[derive(Debug, Default)]
pub struct ViewController {
    prompt: String,
    result: GenerationResult,
    state: RequestState,
    tab: Tab,
    notice: Option<Notice>,
    copied_at: Option<Instant>,
    pending: Option<u64>,
    next_ticket: u64,
    expired: bool,
}

impl ViewController {
    /// Fresh controller in `Idle`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Current result (empty until a success).
    #[must_use]
    pub fn result(&self) -> &GenerationResult {
        &self.result
    }

    /// Latest notice.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Selected pane.
    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Prompt as last entered.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Whether Generate is enabled.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.state != RequestState::Loading
    }

    /// Whether copy is enabled.
    #[must_use]
    pub fn can_copy(&self) -> bool {
        !self.result.is_empty()
    }

    /// Start a submission.
    ///
    /// On success the previous result and notice are gone and the state is
    /// `Loading`. On rejection nothing but the notice changes.
    pub fn begin_submission(&mut self, prompt: impl Into<String>) -> Result<Ticket, SubmitRejected> {
        if self.state == RequestState::Loading {
            return Err(SubmitRejected::Busy);
        }

        let prompt = prompt.into();
        self.prompt.clone_from(&prompt);
        if prompt.trim().is_empty() {
            self.notice = Some(Notice::error(EMPTY_PROMPT_NOTICE));
            return Err(SubmitRejected::EmptyPrompt);
        }

        self.result = GenerationResult::default();
        self.notice = None;
        self.copied_at = None;
        self.expired = false;
        self.state = RequestState::Loading;

        self.next_ticket += 1;
        self.pending = Some(self.next_ticket);
        Ok(Ticket {
            id: self.next_ticket,
            prompt,
        })
    }

    /// Apply the outcome of the request started with `ticket`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<GenerationResult, GenerationError>,
    ) -> Effect {
        if self.pending != Some(ticket.id) {
            tracing::debug!(ticket = ticket.id, "Discarding stale generation outcome");
            return Effect::Discarded;
        }
        self.pending = None;

        match outcome {
            Ok(result) => {
                self.result = result;
                self.state = RequestState::Succeeded;
                Effect::Rendered
            }
            Err(GenerationError::Unauthorized) => {
                self.state = RequestState::Failed;
                self.expired = true;
                self.notice = Some(Notice::error(UNAUTHORIZED_NOTICE));
                Effect::RedirectToLogin
            }
            Err(e) => {
                self.state = RequestState::Failed;
                self.notice = Some(Notice::error(notice_text(&e)));
                Effect::Failed
            }
        }
    }

    /// Select a pane. The preview is unaffected.
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Text of the active pane, or `None` while copy is disabled.
    #[must_use]
    pub fn copy_text(&self) -> Option<String> {
        if !self.can_copy() {
            return None;
        }
        Some(match self.tab {
            Tab::Html => self.result.markup.clone(),
            Tab::Css => self.result.stylesheet.clone(),
        })
    }

    /// Record a clipboard attempt. The request state never changes here.
    pub fn record_copy(&mut self, outcome: Result<(), ClipboardError>, now: Instant) -> CopyOutcome {
        match outcome {
            Ok(()) => {
                self.copied_at = Some(now);
                CopyOutcome::Copied
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not copy text");
                self.copied_at = None;
                self.notice = Some(Notice::error(COPY_FAILED_NOTICE));
                CopyOutcome::Failed
            }
        }
    }

    /// Copy button label at `now`.
    #[must_use]
    pub fn copy_label(&self, now: Instant) -> &'static str {
        match self.copied_at {
            Some(at) if now.saturating_duration_since(at) < COPY_FEEDBACK => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }

    /// Whether the last attempt ended because the credential was rejected.
    #[must_use]
    pub fn session_expired(&self) -> bool {
        self.expired
    }

    /// Replace the notice.
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Back to a fresh `Idle` controller. Outcomes of requests still in
    /// flight are discarded when they arrive.
    pub fn reset(&mut self) {
        let next_ticket = self.next_ticket;
        *self = Self {
            next_ticket,
            ..Self::default()
        };
    }

    /// Render-ready view of the current state.
    #[must_use]
    pub fn snapshot(&self, now: Instant) -> ViewSnapshot {
        let rendered = render(&self.result);
        let succeeded = self.state == RequestState::Succeeded;
        ViewSnapshot {
            prompt: self.prompt.clone(),
            state: self.state,
            tab: self.tab,
            html_text: rendered.panes.display(Tab::Html, succeeded).to_string(),
            css_text: rendered.panes.display(Tab::Css, succeeded).to_string(),
            rendered,
            notice: self.notice.clone(),
            copy_label: self.copy_label(now),
            can_copy: self.can_copy(),
            can_generate: self.can_generate(),
        }
    }
}

fn notice_text(error: &GenerationError) -> String {
    match error {
        GenerationError::EmptyPrompt => EMPTY_PROMPT_NOTICE.to_string(),
        GenerationError::NetworkError(_) => NETWORK_NOTICE.to_string(),
        GenerationError::Unauthorized => UNAUTHORIZED_NOTICE.to_string(),
        GenerationError::ServiceError(message) => format!("Error: {message}"),
        GenerationError::MalformedResult(_) => MALFORMED_NOTICE.to_string(),
    }
}

/// Lock the controller, recovering from a poisoned mutex.
pub fn lock(controller: &Mutex<ViewController>) -> MutexGuard<'_, ViewController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run one submission cycle: begin, one request, complete.
///
/// The lock is not held while the request is in flight.
pub async fn submit(
    controller: &Mutex<ViewController>,
    client: &GenerationClient,
    credential: &Credential,
    prompt: impl Into<String>,
) -> Result<Effect, SubmitRejected> {
    let ticket = lock(controller).begin_submission(prompt)?;
    Ok(finish(controller, client, credential, ticket).await)
}

/// Perform the request for a submission started with
/// [`ViewController::begin_submission`] and apply its outcome.
///
/// If this future is dropped before the request settles, the submission is
/// completed as a network failure so the controller never stays `Loading`.
pub async fn finish(
    controller: &Mutex<ViewController>,
    client: &GenerationClient,
    credential: &Credential,
    ticket: Ticket,
) -> Effect {
    let pending = PendingSubmission {
        controller,
        ticket: Some(ticket),
    };
    let outcome = client.generate(pending.prompt(), credential).await;
    pending.complete(outcome)
}

/// Completes its ticket on drop unless completed explicitly.
struct PendingSubmission<'a> {
    controller: &'a Mutex<ViewController>,
    ticket: Option<Ticket>,
}

impl PendingSubmission<'_> {
    fn prompt(&self) -> &str {
        self.ticket.as_ref().map_or("", Ticket::prompt)
    }

    fn complete(mut self, outcome: Result<GenerationResult, GenerationError>) -> Effect {
        match self.ticket.take() {
            Some(ticket) => lock(self.controller).complete(ticket, outcome),
            None => Effect::Discarded,
        }
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            tracing::warn!(ticket = ticket.id, "Generation abandoned before completion");
            lock(self.controller).complete(
                ticket,
                Err(GenerationError::NetworkError("request abandoned".to_string())),
            );
        }
    }
}

/// Copy the active pane to `clipboard`.
pub async fn copy_active_pane(
    controller: &Mutex<ViewController>,
    clipboard: &dyn Clipboard,
) -> CopyOutcome {
    let Some(text) = lock(controller).copy_text() else {
        return CopyOutcome::Disabled;
    };
    let outcome = clipboard.write_text(&text).await;
    lock(controller).record_copy(outcome, Instant::now())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::TransportError;
    use crate::generation::{GenerationTransport, RawResponse};
    use crate::session::{Identity, MemoryStorage, SessionState, SessionStore};

    const BLUE_BUTTON: &str =
        r#"{"result": "{\"html\":\"<button>Go</button>\",\"css\":\"button{color:blue}\"}"}"#;

    fn blue_button() -> GenerationResult {
        GenerationResult {
            markup: "<button>Go</button>".into(),
            stylesheet: "button{color:blue}".into(),
        }
    }

    fn succeeded_controller() -> ViewController {
        let mut controller = ViewController::new();
        let ticket = controller.begin_submission("a blue button").unwrap();
        controller.complete(ticket, Ok(blue_button()));
        controller
    }

    #[derive(Debug)]
    struct ScriptedTransport {
        status: u16,
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerationTransport for ScriptedTransport {
        async fn send(&self, _: &str, _: &Credential) -> Result<RawResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawResponse::new(self.status, self.body))
        }
    }

    #[derive(Debug)]
    struct BrokenClipboard;

    #[async_trait]
    impl Clipboard for BrokenClipboard {
        async fn write_text(&self, _: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable)
        }
    }

    #[derive(Debug, Default)]
    struct RecordingClipboard(Mutex<Vec<String>>);

    #[async_trait]
    impl Clipboard for RecordingClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn wired(status: u16, body: &'static str) -> (GenerationClient, SessionStore, Arc<ScriptedTransport>) {
        let sessions = SessionStore::new(Arc::new(MemoryStorage::new()));
        sessions
            .set_session(&Identity::named("ada"), &Credential::new("tok"))
            .unwrap();
        let transport = Arc::new(ScriptedTransport {
            status,
            body,
            calls: AtomicUsize::new(0),
        });
        let client = GenerationClient::new(
            Arc::clone(&transport) as Arc<dyn GenerationTransport>,
            sessions.clone(),
        );
        (client, sessions, transport)
    }

    #[test]
    fn test_initial_state() {
        let controller = ViewController::new();
        let snapshot = controller.snapshot(Instant::now());
        assert_eq!(snapshot.state, RequestState::Idle);
        assert_eq!(snapshot.tab, Tab::Html);
        assert!(snapshot.rendered.panes.html.is_empty());
        assert!(snapshot.rendered.panes.css.is_empty());
        assert_eq!(snapshot.html_text, crate::render::HTML_PLACEHOLDER);
        assert!(!snapshot.can_copy);
        assert!(snapshot.can_generate);
    }

    #[test]
    fn test_success_cycle() {
        let mut controller = ViewController::new();
        let ticket = controller.begin_submission("a blue button").unwrap();
        assert_eq!(controller.state(), RequestState::Loading);
        assert!(!controller.can_generate());

        assert_eq!(controller.complete(ticket, Ok(blue_button())), Effect::Rendered);
        let snapshot = controller.snapshot(Instant::now());
        assert_eq!(snapshot.state, RequestState::Succeeded);
        assert_eq!(snapshot.rendered.panes.html, "<button>Go</button>");
        assert_eq!(snapshot.rendered.panes.css, "button{color:blue}");
        assert!(snapshot.rendered.preview_document.contains("<button>Go</button>"));
        assert!(snapshot.rendered.preview_document.contains("button{color:blue}"));
    }

    #[test]
    fn test_resubmission_clears_previous_result_before_loading() {
        let mut controller = succeeded_controller();

        let _ticket = controller.begin_submission("a red button").unwrap();
        let snapshot = controller.snapshot(Instant::now());

        assert!(snapshot.is_loading());
        assert!(snapshot.rendered.panes.html.is_empty());
        assert!(snapshot.rendered.panes.css.is_empty());
        assert!(!snapshot.rendered.has_preview());
        assert!(!snapshot.can_copy);
    }

    #[test]
    fn test_resubmission_from_failed_clears_notice() {
        let mut controller = ViewController::new();
        let ticket = controller.begin_submission("x").unwrap();
        controller.complete(ticket, Err(GenerationError::ServiceError("boom".into())));
        assert!(controller.notice().is_some());

        let _ticket = controller.begin_submission("y").unwrap();
        assert!(controller.notice().is_none());
        assert_eq!(controller.state(), RequestState::Loading);
    }

    #[test]
    fn test_busy_while_loading() {
        let mut controller = ViewController::new();
        let _ticket = controller.begin_submission("first").unwrap();
        assert_eq!(
            controller.begin_submission("second").unwrap_err(),
            SubmitRejected::Busy
        );
        assert_eq!(controller.state(), RequestState::Loading);
    }

    #[test]
    fn test_blank_prompt_keeps_state_and_result() {
        let mut controller = succeeded_controller();
        assert_eq!(
            controller.begin_submission("   ").unwrap_err(),
            SubmitRejected::EmptyPrompt
        );
        assert_eq!(controller.state(), RequestState::Succeeded);
        assert_eq!(controller.result(), &blue_button());
        assert_eq!(controller.notice().unwrap().text, EMPTY_PROMPT_NOTICE);
    }

    #[test]
    fn test_failure_notices() {
        let cases = [
            (GenerationError::ServiceError("rate limited".into()), "Error: rate limited"),
            (GenerationError::NetworkError("refused".into()), NETWORK_NOTICE),
            (GenerationError::MalformedResult("bad".into()), MALFORMED_NOTICE),
        ];
        for (error, expected) in cases {
            let mut controller = ViewController::new();
            let ticket = controller.begin_submission("x").unwrap();
            assert_eq!(controller.complete(ticket, Err(error)), Effect::Failed);
            assert_eq!(controller.state(), RequestState::Failed);
            assert_eq!(controller.notice().unwrap().text, expected);
            assert!(controller.can_generate());
        }
    }

    #[test]
    fn test_stale_ticket_is_discarded_after_reset() {
        let mut controller = ViewController::new();
        let ticket = controller.begin_submission("x").unwrap();
        controller.reset();

        assert_eq!(controller.complete(ticket, Ok(blue_button())), Effect::Discarded);
        assert_eq!(controller.state(), RequestState::Idle);
        assert!(controller.result().is_empty());
    }

    #[test]
    fn test_tab_toggle_keeps_preview() {
        let mut controller = succeeded_controller();
        let before = controller.snapshot(Instant::now()).rendered.preview_document;

        controller.select_tab(Tab::Css);
        let after = controller.snapshot(Instant::now());
        assert_eq!(after.tab, Tab::Css);
        assert_eq!(after.rendered.preview_document, before);
        assert_eq!(controller.copy_text().unwrap(), "button{color:blue}");
    }

    #[test]
    fn test_copy_disabled_when_both_empty() {
        let controller = ViewController::new();
        assert!(controller.copy_text().is_none());
    }

    #[test]
    fn test_copy_label_reverts() {
        let mut controller = succeeded_controller();
        let now = Instant::now();
        assert_eq!(controller.record_copy(Ok(()), now), CopyOutcome::Copied);

        assert_eq!(controller.copy_label(now), COPIED_LABEL);
        assert_eq!(controller.copy_label(now + Duration::from_millis(1999)), COPIED_LABEL);
        assert_eq!(controller.copy_label(now + COPY_FEEDBACK), COPY_LABEL);
    }

    #[test]
    fn test_copy_failure_keeps_request_state() {
        let mut controller = succeeded_controller();
        let outcome = controller.record_copy(Err(ClipboardError::Unavailable), Instant::now());

        assert_eq!(outcome, CopyOutcome::Failed);
        assert_eq!(controller.state(), RequestState::Succeeded);
        assert_eq!(controller.notice().unwrap().text, COPY_FAILED_NOTICE);
        assert_eq!(controller.result(), &blue_button());
    }

    #[tokio::test]
    async fn test_submit_blue_button_scenario() {
        let (client, _, transport) = wired(200, BLUE_BUTTON);
        let controller = Mutex::new(ViewController::new());

        let effect = submit(&controller, &client, &Credential::new("tok"), "a blue button")
            .await
            .unwrap();

        assert_eq!(effect, Effect::Rendered);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        let snapshot = lock(&controller).snapshot(Instant::now());
        assert_eq!(snapshot.rendered.panes.html, "<button>Go</button>");
        assert_eq!(snapshot.rendered.panes.css, "button{color:blue}");
    }

    #[tokio::test]
    async fn test_submit_service_error_scenario() {
        let (client, sessions, _) = wired(200, r#"{"error": "rate limited"}"#);
        let controller = Mutex::new(ViewController::new());
        let panes_before = lock(&controller).snapshot(Instant::now()).rendered.panes;

        let effect = submit(&controller, &client, &Credential::new("tok"), "a card")
            .await
            .unwrap();

        assert_eq!(effect, Effect::Failed);
        let snapshot = lock(&controller).snapshot(Instant::now());
        assert_eq!(snapshot.state, RequestState::Failed);
        assert!(snapshot.notice.unwrap().text.contains("rate limited"));
        assert_eq!(snapshot.rendered.panes, panes_before);
        assert!(sessions.current_session().is_authenticated());
    }

    #[tokio::test]
    async fn test_submit_unauthorized_scenario() {
        let (client, sessions, _) = wired(401, r#"{"error": "token expired"}"#);
        let controller = Mutex::new(ViewController::new());
        let panes_before = lock(&controller).snapshot(Instant::now()).rendered.panes;

        let effect = submit(&controller, &client, &Credential::new("tok"), "a card")
            .await
            .unwrap();

        assert_eq!(effect, Effect::RedirectToLogin);
        assert_eq!(sessions.current_session(), SessionState::Anonymous);
        assert_eq!(lock(&controller).snapshot(Instant::now()).rendered.panes, panes_before);
    }

    #[tokio::test]
    async fn test_submit_blank_prompt_sends_nothing() {
        let (client, _, transport) = wired(200, BLUE_BUTTON);
        let controller = Mutex::new(ViewController::new());

        let rejected = submit(&controller, &client, &Credential::new("tok"), " \n")
            .await
            .unwrap_err();

        assert_eq!(rejected, SubmitRejected::EmptyPrompt);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(lock(&controller).state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn test_copy_active_pane() {
        let controller = Mutex::new(succeeded_controller());
        let clipboard = RecordingClipboard::default();

        assert_eq!(copy_active_pane(&controller, &clipboard).await, CopyOutcome::Copied);
        lock(&controller).select_tab(Tab::Css);
        assert_eq!(copy_active_pane(&controller, &clipboard).await, CopyOutcome::Copied);

        assert_eq!(
            *clipboard.0.lock().unwrap(),
            vec!["<button>Go</button>".to_string(), "button{color:blue}".to_string()]
        );
    }

    #[tokio::test]
    async fn test_copy_active_pane_failure_and_disabled() {
        let idle = Mutex::new(ViewController::new());
        assert_eq!(copy_active_pane(&idle, &BrokenClipboard).await, CopyOutcome::Disabled);
        assert!(lock(&idle).notice().is_none());

        let done = Mutex::new(succeeded_controller());
        assert_eq!(copy_active_pane(&done, &BrokenClipboard).await, CopyOutcome::Failed);
        assert_eq!(lock(&done).state(), RequestState::Succeeded);
    }

    /// Never answers.
    #[derive(Debug)]
    struct StalledTransport;

    #[async_trait]
    impl GenerationTransport for StalledTransport {
        async fn send(&self, _: &str, _: &Credential) -> Result<RawResponse, TransportError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_dropped_submission_leaves_loading() {
        let sessions = SessionStore::new(Arc::new(MemoryStorage::new()));
        let client = GenerationClient::new(Arc::new(StalledTransport), sessions);
        let controller = Mutex::new(ViewController::new());

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            submit(&controller, &client, &Credential::new("tok"), "a card"),
        )
        .await;
        assert!(abandoned.is_err());

        let mut controller = lock(&controller);
        assert_eq!(controller.state(), RequestState::Failed);
        assert_eq!(controller.notice().unwrap().text, NETWORK_NOTICE);
        assert!(controller.begin_submission("retry").is_ok());
    }

    #[test]
    fn test_unauthorized_marks_session_expired_until_next_submission() {
        let mut controller = ViewController::new();
        let ticket = controller.begin_submission("x").unwrap();
        controller.complete(ticket, Err(GenerationError::Unauthorized));
        assert!(controller.session_expired());

        let _ticket = controller.begin_submission("y").unwrap();
        assert!(!controller.session_expired());

        controller.reset();
        assert!(!controller.session_expired());
    }
}
