//! Shared types for VYRE.
//!
//! These types form the data model used across all modules: the two
//! sides of a prediction, the stakes participants commit, and the error
//! taxonomy of the settlement core.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One of the two mutually exclusive outcomes of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Parse a side tag (case-insensitive). Anything other than the two
/// known tags is rejected, never coerced.
impl std::str::FromStr for Side {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "side_a" | "sidea" => Ok(Side::A),
            "b" | "side_b" | "sideb" => Ok(Side::B),
            _ => Err(SettlementError::UnknownSide(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction status
// ---------------------------------------------------------------------------

/// Lifecycle of a prediction. The only transition is `Open -> Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Open,
    Resolved,
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionStatus::Open => write!(f, "OPEN"),
            PredictionStatus::Resolved => write!(f, "RESOLVED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Stake
// ---------------------------------------------------------------------------

/// Payment-app identifiers a participant can be paid through.
/// Opaque to the settlement engine; carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutHandles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venmo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zelle: Option<String>,
}

/// One participant's position on a prediction (a.k.a. commitment).
///
/// Deserialization goes through [`StakeInput`], so a stake read from JSON
/// has already passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StakeInput")]
pub struct Stake {
    pub participant_id: String,
    pub participant_name: String,
    pub side: Side,
    /// Staked amount. Always strictly positive.
    pub amount: Decimal,
    pub payout_handles: PayoutHandles,
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) ${:.2} on {}",
            self.participant_name,
            self.participant_id,
            self.amount,
            self.side,
        )
    }
}

impl Stake {
    /// Build a validated stake.
    pub fn new(
        participant_id: impl Into<String>,
        participant_name: impl Into<String>,
        side: Side,
        amount: Decimal,
    ) -> Result<Self, SettlementError> {
        let stake = Self {
            participant_id: participant_id.into(),
            participant_name: participant_name.into(),
            side,
            amount,
            payout_handles: PayoutHandles::default(),
        };
        stake.validate()?;
        Ok(stake)
    }

    /// Attach payment handles.
    pub fn with_handles(mut self, handles: PayoutHandles) -> Self {
        self.payout_handles = handles;
        self
    }

    /// Check the per-stake invariants.
    pub fn validate(&self) -> Result<(), SettlementError> {
        if self.amount <= Decimal::ZERO {
            return Err(SettlementError::InvalidAmount {
                participant_id: self.participant_id.clone(),
                amount: self.amount,
            });
        }
        Ok(())
    }

    /// Whether this stake backs the given side.
    pub fn is_on(&self, side: Side) -> bool {
        self.side == side
    }
}

/// Unvalidated stake as it arrives from a form or a JSON file.
/// The side is kept as a raw tag so an unknown value surfaces as
/// [`SettlementError::UnknownSide`] rather than a generic parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct StakeInput {
    pub participant_id: String,
    pub participant_name: String,
    pub side: String,
    pub amount: Decimal,
    #[serde(default)]
    pub payout_handles: PayoutHandles,
}

impl TryFrom<StakeInput> for Stake {
    type Error = SettlementError;

    fn try_from(input: StakeInput) -> Result<Self, Self::Error> {
        let side = input.side.parse::<Side>()?;
        Ok(Stake::new(input.participant_id, input.participant_name, side, input.amount)?
            .with_handles(input.payout_handles))
    }
}

/// Validate a full stake list: every amount positive, every participant
/// staked at most once.
pub fn validate_stakes(stakes: &[Stake]) -> Result<(), SettlementError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(stakes.len());
    for stake in stakes {
        stake.validate()?;
        if !seen.insert(stake.participant_id.as_str()) {
            return Err(SettlementError::DuplicateParticipant(
                stake.participant_id.clone(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the settlement core and the prediction lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    #[error("Invalid stake amount for {participant_id}: {amount} (must be > 0)")]
    InvalidAmount { participant_id: String, amount: Decimal },

    #[error("Unknown side: {0:?}")]
    UnknownSide(String),

    #[error("Participant already staked: {0}")]
    DuplicateParticipant(String),

    #[error("No winners to pay: nobody staked on side {side}")]
    NoWinners { side: Side },

    #[error("Prediction already resolved: {0}")]
    AlreadyResolved(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
