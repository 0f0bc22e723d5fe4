//! System clipboard access.

use std::fmt;
use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::ClipboardError;

/// Destination for copy-to-clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync + fmt::Debug {
    /// Replace the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Helper programs tried in order; the first one found is used.
const HELPERS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// Clipboard of the machine the app runs on, fed through a helper program.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        for &(program, args) in HELPERS {
            let spawned = Command::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            let mut child = match spawned {
                Ok(child) => child,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(text.as_bytes()).await?;
                stdin.shutdown().await?;
            }

            let status = child.wait().await?;
            if status.success() {
                tracing::debug!(helper = program, bytes = text.len(), "Copied to clipboard");
                return Ok(());
            }
            return Err(ClipboardError::Failed {
                program,
                status: status.to_string(),
            });
        }

        Err(ClipboardError::Unavailable)
    }
}
