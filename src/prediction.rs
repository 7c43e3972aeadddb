//! Prediction lifecycle.
//!
//! A prediction collects stakes while `Open` and is settled exactly once.
//! Every change produces a new `Prediction` value; a resolved snapshot is
//! never mutated or re-settled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::settlement::{self, PoolStats, Settlement};
use crate::types::{validate_stakes, PredictionStatus, SettlementError, Side, Stake};

/// A question a group stakes money on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    id: String,
    group_id: String,
    question: String,
    side_a_label: String,
    side_b_label: String,
    /// Commit order.
    stakes: Vec<Stake>,
    status: PredictionStatus,
    winning_side: Option<Side>,
    settlement: Option<Settlement>,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({} vs {}) | {} stakes | {}",
            self.status,
            self.question,
            self.side_a_label,
            self.side_b_label,
            self.stakes.len(),
            self.pool_stats(),
        )
    }
}

impl Prediction {
    /// Open a new prediction. The creator always stakes first.
    pub fn open(
        group_id: impl Into<String>,
        question: impl Into<String>,
        side_a_label: impl Into<String>,
        side_b_label: impl Into<String>,
        creator_stake: Stake,
    ) -> Result<Self, SettlementError> {
        creator_stake.validate()?;
        let prediction = Self {
            id: uuid::Uuid::new_v4().to_string(),
            group_id: group_id.into(),
            question: question.into(),
            side_a_label: side_a_label.into(),
            side_b_label: side_b_label.into(),
            stakes: vec![creator_stake],
            status: PredictionStatus::Open,
            winning_side: None,
            settlement: None,
            created_at: Utc::now(),
            resolved_at: None,
        };
        info!(
            prediction_id = %prediction.id,
            group_id = %prediction.group_id,
            question = %prediction.question,
            "Prediction opened"
        );
        Ok(prediction)
    }

    /// A copy of this prediction with `stake` appended.
    pub fn join(&self, stake: Stake) -> Result<Self, SettlementError> {
        if self.is_resolved() {
            return Err(SettlementError::AlreadyResolved(self.id.clone()));
        }

        let mut stakes = self.stakes.clone();
        stakes.push(stake);
        validate_stakes(&stakes)?;

        let next = Self {
            stakes,
            ..self.clone()
        };
        debug!(
            prediction_id = %next.id,
            stakes = next.stakes.len(),
            pool = %next.pool_stats().total_pool,
            "Stake added"
        );
        Ok(next)
    }

    /// Live pool totals, recomputed from the stakes on every call.
    pub fn pool_stats(&self) -> PoolStats {
        settlement::aggregate(&self.stakes)
    }

    /// A resolved copy of this prediction with its settlement frozen in.
    ///
    /// `self` is left untouched. When nobody backed `winner` the
    /// `NoWinners` condition is returned and no transition happens.
    pub fn resolve(&self, winner: Side) -> Result<Self, SettlementError> {
        if self.is_resolved() {
            return Err(SettlementError::AlreadyResolved(self.id.clone()));
        }

        let settlement = match settlement::distribute(&self.stakes, winner) {
            Ok(s) => s,
            Err(e) => {
                warn!(prediction_id = %self.id, side = %winner, error = %e, "Settlement failed");
                return Err(e);
            }
        };

        info!(
            prediction_id = %self.id,
            winning_side = %winner,
            label = %self.side_label(winner),
            pool = %settlement.pool.total_pool,
            winners = settlement.winners.len(),
            losers = settlement.losers.len(),
            "Prediction resolved"
        );

        Ok(Self {
            status: PredictionStatus::Resolved,
            winning_side: Some(winner),
            settlement: Some(settlement),
            resolved_at: Some(Utc::now()),
            ..self.clone()
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn stakes(&self) -> &[Stake] {
        &self.stakes
    }

    pub fn status(&self) -> PredictionStatus {
        self.status
    }

    pub fn winning_side(&self) -> Option<Side> {
        self.winning_side
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    pub fn is_resolved(&self) -> bool {
        self.status == PredictionStatus::Resolved
    }

    /// Display label for a side ("Yes", "Over", ...).
    pub fn side_label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.side_a_label,
            Side::B => &self.side_b_label,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
