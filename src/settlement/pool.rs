//! Pool aggregator.
//!
//! Reduces a stake list into per-side totals, the combined pool, and each
//! side's share of the pool. Called for live odds on every stake change and
//! as the first stage of settlement.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Side, Stake};

/// Decimal places kept on the per-side share percentages.
const SHARE_DECIMALS: u32 = 1;

/// Per-side totals for one prediction. Always a projection of the stake
/// list, never authoritative state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolStats {
    pub side_a_total: Decimal,
    pub side_b_total: Decimal,
    pub total_pool: Decimal,
    /// Percentage of the pool on side A, one decimal place.
    pub side_a_share: Decimal,
    /// Percentage of the pool on side B, one decimal place.
    pub side_b_share: Decimal,
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A: ${:.2} ({:.1}%) | B: ${:.2} ({:.1}%) | pool: ${:.2}",
            self.side_a_total,
            self.side_a_share,
            self.side_b_total,
            self.side_b_share,
            self.total_pool,
        )
    }
}

impl PoolStats {
    /// Total staked on `side`.
    pub fn total_for(&self, side: Side) -> Decimal {
        match side {
            Side::A => self.side_a_total,
            Side::B => self.side_b_total,
        }
    }

    /// Share of the pool on `side`, as a percentage.
    pub fn share_for(&self, side: Side) -> Decimal {
        match side {
            Side::A => self.side_a_share,
            Side::B => self.side_b_share,
        }
    }

    /// Whether anything has been staked yet.
    pub fn is_empty(&self) -> bool {
        self.total_pool.is_zero()
    }
}

/// Aggregate a stake list. Infallible: an empty list yields all zeros.
pub fn aggregate(stakes: &[Stake]) -> PoolStats {
    let side_a_total: Decimal = stakes
        .iter()
        .filter(|s| s.is_on(Side::A))
        .map(|s| s.amount)
        .sum();
    let side_b_total: Decimal = stakes
        .iter()
        .filter(|s| s.is_on(Side::B))
        .map(|s| s.amount)
        .sum();
    let total_pool = side_a_total + side_b_total;

    PoolStats {
        side_a_total,
        side_b_total,
        total_pool,
        side_a_share: share(side_a_total, total_pool),
        side_b_share: share(side_b_total, total_pool),
    }
}

/// `part` as a percentage of `total`, or zero when nothing is staked.
fn share(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part * dec!(100) / total)
        .round_dp_with_strategy(SHARE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
