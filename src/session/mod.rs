//! Durable session storage.
//!
//! The session is one identity plus one bearer credential, kept in two named
//! slots that are always written together. It is set on login and cleared on
//! logout or when the generation service rejects the credential.
//!
//! # Architecture
//!
//! - [`SessionStorage`]: backend trait over the two slots
//! - [`FileStorage`] / [`MemoryStorage`]: on-disk and in-process backends
//! - [`SessionStore`]: typed view used by the rest of the client
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ui_forge::session::{Credential, Identity, MemoryStorage, SessionStore};
//!
//! let store = SessionStore::new(Arc::new(MemoryStorage::new()));
//! store.set_session(&Identity::named("ada"), &Credential::new("token")).unwrap();
//! assert!(store.current_session().is_authenticated());
//!
//! store.clear_session().unwrap();
//! assert!(!store.current_session().is_authenticated());
//! ```

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, Slots};
pub use store::{Credential, Identity, Session, SessionState, SessionStore};
