//! Settlement engine — pool aggregation and pari-mutuel payout.
//!
//! A pure pipeline: `pool::aggregate` reduces stakes to per-side totals,
//! then `payout::distribute` splits the pool across the winning side.
//! Nothing here logs, retries, or holds state; every call returns a fresh
//! value computed only from its inputs.

pub mod payout;
pub mod pool;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Side, Stake};

pub use payout::distribute;
pub use pool::{aggregate, PoolStats};

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

/// A winning stake and what it collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerPayout {
    pub stake: Stake,
    /// Stake back plus the winner's share of the losing side's money.
    pub payout: Decimal,
    /// `payout - stake.amount`.
    pub profit: Decimal,
}

/// A losing stake and what it owes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoserDebt {
    pub stake: Stake,
    /// Always the full staked amount.
    pub loss: Decimal,
}

/// Frozen result of settling a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub winning_side: Side,
    /// Pool snapshot the payouts were computed from.
    pub pool: PoolStats,
    /// Stakes on the winning side, in commit order.
    pub winners: Vec<WinnerPayout>,
    /// All other stakes, in commit order.
    pub losers: Vec<LoserDebt>,
}

/// Money moving from one loser to one winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from_id: String,
    pub from_name: String,
    pub to_id: String,
    pub to_name: String,
    pub amount: Decimal,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} ${:.2}", self.from_name, self.to_name, self.amount)
    }
}

impl Settlement {
    /// Sum of all winner payouts. Equals the pool up to decimal precision.
    pub fn total_paid_out(&self) -> Decimal {
        self.winners.iter().map(|w| w.payout).sum()
    }

    /// Sum of all losses.
    pub fn total_lost(&self) -> Decimal {
        self.losers.iter().map(|l| l.loss).sum()
    }

    /// Sum of all winner profits. Equals `total_lost`.
    pub fn total_profit(&self) -> Decimal {
        self.winners.iter().map(|w| w.profit).sum()
    }

    /// Payout row for a participant, if they won.
    pub fn winner(&self, participant_id: &str) -> Option<&WinnerPayout> {
        self.winners
            .iter()
            .find(|w| w.stake.participant_id == participant_id)
    }

    /// Debt row for a participant, if they lost.
    pub fn loser(&self, participant_id: &str) -> Option<&LoserDebt> {
        self.losers
            .iter()
            .find(|l| l.stake.participant_id == participant_id)
    }

    /// Who pays whom.
    ///
    /// Each loser's debt is split across winners in proportion to each
    /// winner's profit, so every winner collects exactly their profit and
    /// every loser pays exactly their loss. Winners with zero profit get
    /// no transfers. Amounts are unrounded. The profit ratio is taken
    /// before scaling so large pools stay within `Decimal` range.
    pub fn transfers(&self) -> Vec<Transfer> {
        let total_profit = self.total_profit();
        if total_profit.is_zero() {
            return Vec::new();
        }

        let mut transfers = Vec::with_capacity(self.losers.len() * self.winners.len());
        for loser in &self.losers {
            for winner in self.winners.iter().filter(|w| !w.profit.is_zero()) {
                transfers.push(Transfer {
                    from_id: loser.stake.participant_id.clone(),
                    from_name: loser.stake.participant_name.clone(),
                    to_id: winner.stake.participant_id.clone(),
                    to_name: winner.stake.participant_name.clone(),
                    amount: loser.loss * (winner.profit / total_profit),
                });
            }
        }
        transfers
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Side {} wins | {}", self.winning_side, self.pool)?;
        for w in &self.winners {
            writeln!(
                f,
                "  + {} staked ${:.2} -> collects ${:.2} (profit ${:.2})",
                w.stake.participant_name, w.stake.amount, w.payout, w.profit,
            )?;
        }
        for l in &self.losers {
            writeln!(
                f,
                "  - {} owes ${:.2}",
                l.stake.participant_name, l.loss,
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
