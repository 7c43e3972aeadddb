//! Payment launcher.
//!
//! Opens a payment app via its deep link and, if the app did not take
//! focus within the fallback delay, opens the web page instead. The host
//! environment (browser, terminal, test double) is abstracted behind
//! [`LinkOpener`].

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use super::{PaymentAction, PaymentError, PaymentRequest};
use crate::config::PaymentsConfig;

/// The environment's ability to open URLs and use the clipboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkOpener: Send + Sync {
    /// Navigate to `url` (deep link or web page).
    async fn open(&self, url: &str) -> Result<(), PaymentError>;

    /// Whether our surface still has focus. After a deep link, `true`
    /// means no native app took over.
    fn still_focused(&self) -> bool;

    /// Put `text` on the clipboard.
    async fn copy_to_clipboard(&self, text: &str) -> Result<(), PaymentError>;
}

/// How a launch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The native app took focus.
    OpenedApp { deep_link: String },
    /// The app never took focus; the web page was opened.
    FellBackToWeb { deep_link: String, web_url: String },
    /// Clipboard rail; `message` tells the payer what to do next.
    CopiedToClipboard { text: String, message: String },
}

pub struct PaymentLauncher<O: LinkOpener> {
    opener: O,
    fallback_delay: Duration,
}

impl<O: LinkOpener> PaymentLauncher<O> {
    pub fn new(opener: O, fallback_delay: Duration) -> Self {
        Self {
            opener,
            fallback_delay,
        }
    }

    pub fn from_config(opener: O, config: &PaymentsConfig) -> Self {
        Self::new(opener, Duration::from_millis(config.fallback_delay_ms))
    }

    /// Hand `request` off to its payment app.
    pub async fn launch(&self, request: &PaymentRequest) -> Result<LaunchOutcome, PaymentError> {
        request.validate()?;

        match request.action() {
            PaymentAction::OpenLink {
                deep_link,
                web_fallback,
            } => {
                info!(rail = %request.rail, recipient = %request.recipient, "Opening payment app");
                self.opener.open(&deep_link).await?;

                tokio::time::sleep(self.fallback_delay).await;

                if self.opener.still_focused() {
                    debug!(rail = %request.rail, url = %web_fallback, "App did not take focus, opening web fallback");
                    self.opener.open(&web_fallback).await?;
                    Ok(LaunchOutcome::FellBackToWeb {
                        deep_link,
                        web_url: web_fallback,
                    })
                } else {
                    Ok(LaunchOutcome::OpenedApp { deep_link })
                }
            }
            PaymentAction::CopyToClipboard { text, message } => {
                info!(rail = %request.rail, "Copying payment recipient to clipboard");
                self.opener.copy_to_clipboard(&text).await?;
                Ok(LaunchOutcome::CopiedToClipboard { text, message })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
