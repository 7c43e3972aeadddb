//! Mock link opener for integration testing.
//!
//! Records every URL opened and every clipboard write, in memory, with a
//! controllable answer for whether the native app took focus.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use vyre::payments::{LinkOpener, PaymentError};

/// A deterministic [`LinkOpener`]. Clones share the same recorded state.
#[derive(Clone, Default)]
pub struct MockOpener {
    opened: Arc<Mutex<Vec<String>>>,
    clipboard: Arc<Mutex<Option<String>>>,
    /// Whether a native app "takes focus" after a deep link.
    app_installed: Arc<Mutex<bool>>,
    /// If set, every `open` fails with this message.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockOpener {
    /// An environment where every payment app is installed.
    pub fn with_apps() -> Self {
        let opener = Self::default();
        *opener.app_installed.lock().unwrap() = true;
        opener
    }

    /// An environment with no payment apps (always falls back to web).
    pub fn without_apps() -> Self {
        Self::default()
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.clipboard.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkOpener for MockOpener {
    async fn open(&self, url: &str) -> Result<(), PaymentError> {
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(PaymentError::Opener {
                target: url.to_string(),
                message: msg,
            });
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn still_focused(&self) -> bool {
        !*self.app_installed.lock().unwrap()
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), PaymentError> {
        *self.clipboard.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}
