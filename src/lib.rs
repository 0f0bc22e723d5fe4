//! UI Forge
//!
//! A local, HTML-first front end for a remote HTML/CSS generation service.
//! A signed-in user describes a UI element in plain language, the remote
//! service answers with markup and a stylesheet, and the app shows both as
//! source panes plus a sandboxed live preview.
//!
//! # Architecture
//!
//! - **Server**: Axum router serving server-rendered pages and form posts
//! - **Session**: persisted identity and bearer credential, two slots
//! - **Generation**: one authenticated request per attempt, outcome classified
//! - **Controller**: request lifecycle state machine behind the pages
//!
//! # Modules
//!
//! - [`session`]: session store and its durable storage
//! - [`guard`]: route guard for protected views
//! - [`generation`]: generation client and its transport
//! - [`render`]: code panes and preview document
//! - [`controller`]: generator view state
//! - [`auth`]: login and registration against the remote service

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod auth;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod generation;
pub mod guard;
pub mod render;
pub mod server;
pub mod service;
pub mod session;
pub mod ui;

use std::sync::{Arc, Mutex};

use auth::AuthClient;
use clipboard::Clipboard;
use controller::ViewController;
use generation::GenerationClient;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session store backing the route guard.
    pub sessions: SessionStore,
    /// Client for the remote generation endpoint.
    pub generator: GenerationClient,
    /// Login and registration collaborators.
    pub auth: AuthClient,
    /// Generator view state.
    pub controller: Arc<Mutex<ViewController>>,
    /// Clipboard used by the copy action.
    pub clipboard: Arc<dyn Clipboard>,
}

impl AppState {
    /// Assemble state with a fresh, idle generator view.
    pub fn new(
        sessions: SessionStore,
        generator: GenerationClient,
        auth: AuthClient,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            sessions,
            generator,
            auth,
            controller: Arc::new(Mutex::new(ViewController::new())),
            clipboard,
        }
    }
}
