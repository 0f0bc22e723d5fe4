//! Identity, credential and the store that owns them.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::storage::{SessionStorage, Slots};
use crate::error::StorageError;

/// Profile data established at login.
///
/// Fields beyond `name` are whatever the service returned and are kept as-is.
/// When decoding, `name` is taken from the `name` key, or from `username` if
/// there is no usable `name`; the key not used stays in `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Remaining profile fields.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Identity {
    /// Identity with a name and no extra profile fields.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: Map::new(),
        }
    }
}

impl TryFrom<Map<String, Value>> for Identity {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        // A non-string `name` is dropped so it cannot collide on re-encode
        let name = match fields.remove("name") {
            Some(Value::String(name)) => name,
            _ => match fields.remove("username") {
                Some(Value::String(name)) => name,
                _ => return Err("missing field `name`".to_string()),
            },
        };
        Ok(Self {
            name,
            profile: fields,
        })
    }
}

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// An authenticated identity paired with its credential.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Who is logged in.
    pub identity: Identity,
    /// Token for generation requests.
    pub credential: Credential,
}

/// Result of [`SessionStore::current_session`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No usable session.
    Anonymous,
    /// Both identity and credential are present.
    Authenticated(Session),
}

impl SessionState {
    /// The session, if authenticated.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(session) => Some(session),
        }
    }

    /// Returns `true` when a session exists.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Store for the single user session.
///
/// Cloning is cheap; all clones share the same backend.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    /// Set when a clear could not be written. The process then reads as
    /// anonymous until the next successful `set_session`.
    revoked: Arc<AtomicBool>,
}

impl SessionStore {
    /// Create a store on top of `storage`.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            revoked: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Persist a session, replacing any previous one wholesale.
    pub fn set_session(
        &self,
        identity: &Identity,
        credential: &Credential,
    ) -> Result<(), StorageError> {
        let slots = Slots {
            identity: Some(serde_json::to_string(identity)?),
            credential: Some(credential.expose().to_string()),
        };
        self.storage.store(&slots)?;
        self.revoked.store(false, Ordering::SeqCst);
        tracing::info!(name: "session.set", user = %identity.name, "Session established");
        Ok(())
    }

    /// Remove identity and credential together.
    ///
    /// If the empty pair cannot be written, the backend is purged instead.
    /// When that fails too the error is returned, but this process still
    /// treats the session as gone.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        if let Err(e) = self.storage.store(&Slots::default()) {
            tracing::warn!(error = %e, "Could not write empty session, purging storage");
            if let Err(purge) = self.storage.purge() {
                self.revoked.store(true, Ordering::SeqCst);
                tracing::error!(
                    name: "session.clear.failed",
                    error = %purge,
                    "Session storage could not be cleared"
                );
                return Err(purge);
            }
        }
        self.revoked.store(false, Ordering::SeqCst);
        tracing::info!(name: "session.cleared", "Session cleared");
        Ok(())
    }

    /// Read the current session.
    ///
    /// Storage failures and half-populated slots are reported as
    /// [`SessionState::Anonymous`].
    #[must_use]
    pub fn current_session(&self) -> SessionState {
        if self.revoked.load(Ordering::SeqCst) {
            return SessionState::Anonymous;
        }

        let slots = match self.storage.load() {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!(error = %e, "Session storage unreadable, treating as anonymous");
                return SessionState::Anonymous;
            }
        };

        let (Some(identity), Some(token)) = (slots.identity, slots.credential) else {
            return SessionState::Anonymous;
        };

        match serde_json::from_str::<Identity>(&identity) {
            Ok(identity) => SessionState::Authenticated(Session {
                identity,
                credential: Credential::new(token),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Stored identity undecodable, treating as anonymous");
                SessionState::Anonymous
            }
        }
    }
}
