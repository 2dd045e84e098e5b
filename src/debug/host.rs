//! Host capabilities the overlay needs: a clipboard and a way to open the
//! authoring tool in a new context. The browser provides both on a real
//! page; the in-memory versions here back tests and headless replays.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::VitrineError;

/// System clipboard.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), VitrineError>;
}

/// Opens a URL in a new tab/window.
pub trait EditorOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), VitrineError>;
}

/// Clipboard that keeps the last written text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    denied: AtomicBool,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Refuse writes, like a browser without clipboard permission.
    pub fn set_denied(&self, denied: bool) {
        self.denied.store(denied, Ordering::SeqCst);
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), VitrineError> {
        if self.denied.load(Ordering::SeqCst) {
            return Err(VitrineError::Host("clipboard permission denied".into()));
        }
        *self.contents.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        Ok(())
    }
}

/// Opener that records every URL it was asked to open.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl EditorOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), VitrineError> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());
        Ok(())
    }
}
