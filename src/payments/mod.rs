//! Payment rails.
//!
//! Builds the links that hand a payment off to Venmo, Cash App, or Zelle.
//! No money moves through VYRE; these are just prefilled requests the
//! payer confirms in their own app.

pub mod launcher;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::settlement::{Settlement, Transfer};
use crate::types::PayoutHandles;

pub use launcher::{LaunchOutcome, LinkOpener, PaymentLauncher};

/// Supported payment apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRail {
    Venmo,
    CashApp,
    Zelle,
}

impl fmt::Display for PaymentRail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentRail::Venmo => write!(f, "Venmo"),
            PaymentRail::CashApp => write!(f, "Cash App"),
            PaymentRail::Zelle => write!(f, "Zelle"),
        }
    }
}

impl std::str::FromStr for PaymentRail {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "venmo" => Ok(PaymentRail::Venmo),
            "cashapp" | "cash" => Ok(PaymentRail::CashApp),
            "zelle" => Ok(PaymentRail::Zelle),
            _ => Err(PaymentError::UnknownRail(s.to_string())),
        }
    }
}

impl PayoutHandles {
    /// The participant's handle on `rail`, if they registered one.
    pub fn handle_for(&self, rail: PaymentRail) -> Option<&str> {
        match rail {
            PaymentRail::Venmo => self.venmo.as_deref(),
            PaymentRail::CashApp => self.cash_app.as_deref(),
            PaymentRail::Zelle => self.zelle.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Unknown payment rail: {0:?}")]
    UnknownRail(String),

    #[error("{participant} has no {rail} handle")]
    MissingHandle { participant: String, rail: PaymentRail },

    #[error("Payment amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Payment recipient is empty")]
    EmptyRecipient,

    #[error("Could not open {target}: {message}")]
    Opener { target: String, message: String },
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A prefilled payment the payer is asked to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub rail: PaymentRail,
    pub recipient: String,
    pub amount: Decimal,
    pub note: String,
}

/// What the launcher should do for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentAction {
    /// Try the native app, fall back to the website.
    OpenLink { deep_link: String, web_fallback: String },
    /// No deep link exists; put the recipient on the clipboard.
    CopyToClipboard { text: String, message: String },
}

impl fmt::Display for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ${} to {} ({})",
            self.rail,
            self.link_amount(),
            self.recipient,
            self.note
        )
    }
}

impl PaymentRequest {
    pub fn new(
        rail: PaymentRail,
        recipient: impl Into<String>,
        amount: Decimal,
        note: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let request = Self {
            rail,
            recipient: recipient.into(),
            amount,
            note: note.into(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(self.amount));
        }
        if self.recipient.trim().is_empty() {
            return Err(PaymentError::EmptyRecipient);
        }
        Ok(())
    }

    /// Amount as it appears in links: cents precision, no trailing zeros.
    pub fn link_amount(&self) -> String {
        self.amount.round_dp(2).normalize().to_string()
    }

    /// The links or clipboard text for this request.
    pub fn action(&self) -> PaymentAction {
        let amount = self.link_amount();
        match self.rail {
            PaymentRail::Venmo => {
                let user = self.recipient.trim();
                PaymentAction::OpenLink {
                    deep_link: format!(
                        "venmo://paycharge?txn=pay&recipients={user}&amount={amount}&note={}",
                        urlencoding::encode(&self.note)
                    ),
                    web_fallback: format!("https://venmo.com/{user}"),
                }
            }
            PaymentRail::CashApp => {
                let tag = self.recipient.trim().replace('$', "");
                PaymentAction::OpenLink {
                    deep_link: format!("cashapp://cash.app/${tag}/{amount}"),
                    web_fallback: format!("https://cash.app/${tag}/{amount}"),
                }
            }
            PaymentRail::Zelle => {
                let email = self.recipient.trim().to_string();
                PaymentAction::CopyToClipboard {
                    message: format!(
                        "Zelle email copied!\n{email}\n\nOpen your banking app to send ${amount}"
                    ),
                    text: email,
                }
            }
        }
    }
}

/// One payment request per transfer in `settlement`, addressed to the
/// winner's handle on `rail`. Amounts are rounded to cents; transfers that
/// round to zero are skipped.
pub fn requests_for(
    settlement: &Settlement,
    rail: PaymentRail,
    note: &str,
) -> Result<Vec<(Transfer, PaymentRequest)>, PaymentError> {
    let mut requests = Vec::new();
    for transfer in settlement.transfers() {
        let amount = transfer.amount.round_dp(2);
        if amount.is_zero() {
            continue;
        }
        let handle = settlement
            .winner(&transfer.to_id)
            .and_then(|w| w.stake.payout_handles.handle_for(rail))
            .ok_or_else(|| PaymentError::MissingHandle {
                participant: transfer.to_name.clone(),
                rail,
            })?;
        let request = PaymentRequest::new(rail, handle, amount, note)?;
        requests.push((transfer, request));
    }
    Ok(requests)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
