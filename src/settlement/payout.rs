//! Payout distributor.
//!
//! Pari-mutuel split: the whole pool goes to the winning side, shared in
//! proportion to each winner's stake; every other stake is forfeited.

use rust_decimal::Decimal;

use super::pool::aggregate;
use super::{LoserDebt, Settlement, WinnerPayout};
use crate::types::{validate_stakes, SettlementError, Side, Stake};

/// Settle `stakes` with `winning_side` declared the outcome.
///
/// Stakes are validated first; invalid input never reaches the arithmetic.
/// Fails with [`SettlementError::NoWinners`] when nothing was staked on the
/// winning side (including an empty pool). Choosing a remedy for that case,
/// such as refunding everyone, is left to the caller.
pub fn distribute(stakes: &[Stake], winning_side: Side) -> Result<Settlement, SettlementError> {
    validate_stakes(stakes)?;

    let pool = aggregate(stakes);
    let winning_pool_total = pool.total_for(winning_side);
    if winning_pool_total.is_zero() {
        return Err(SettlementError::NoWinners { side: winning_side });
    }

    let mut winners = Vec::new();
    let mut losers = Vec::new();
    for stake in stakes {
        if stake.is_on(winning_side) {
            let payout = payout_for(stake.amount, winning_pool_total, pool.total_pool);
            winners.push(WinnerPayout {
                profit: payout - stake.amount,
                payout,
                stake: stake.clone(),
            });
        } else {
            losers.push(LoserDebt {
                loss: stake.amount,
                stake: stake.clone(),
            });
        }
    }

    Ok(Settlement {
        winning_side,
        pool,
        winners,
        losers,
    })
}

/// `amount / winning_pool_total * total_pool`.
///
/// Divides first: the ratio is at most 1, so no intermediate exceeds the
/// pool itself. A single-sided pool pays back the stake exactly.
fn payout_for(amount: Decimal, winning_pool_total: Decimal, total_pool: Decimal) -> Decimal {
    if winning_pool_total == total_pool {
        return amount;
    }
    amount / winning_pool_total * total_pool
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
