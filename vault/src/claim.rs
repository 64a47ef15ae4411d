//! # Claim Engine
//!
//! Holds the reward pool funded by the allocation engine's reward leg and
//! pays eligible holders their proportional share:
//!
//! ```text
//! reward = floor(pool_balance * balance(holder) / total_supply)
//! ```
//!
//! There is no cooldown beyond eligibility. A still-eligible holder may
//! claim repeatedly; each claim recomputes against the live (shrinking)
//! pool, so repeat claims pay monotonically non-increasing amounts instead
//! of being blocked. That is the contract's policy, not an oversight here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eligibility::EligibilityTracker;
use crate::events::VaultEvent;
use crate::ledger::{TokenLedger, ValueTransfer};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during claim operations.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The caller does not pass the eligibility predicate.
    #[error("not eligible: {holder}")]
    NotEligible {
        /// The holder that attempted the claim.
        holder: String,
    },

    /// The proportional share rounds down to zero.
    #[error("no rewards available for {holder}")]
    NoRewards {
        /// The holder whose share was empty.
        holder: String,
    },

    /// The payout push payment was rejected.
    #[error("reward payout failed: {amount} to {holder}")]
    TransferFailed {
        /// The intended recipient.
        holder: String,
        /// The amount that was being paid.
        amount: u64,
    },

    /// A counter update would overflow u64.
    #[error("amount overflow: counter update would exceed u64::MAX")]
    AmountOverflow,
}

// ---------------------------------------------------------------------------
// ClaimEngine
// ---------------------------------------------------------------------------

/// The reward pool and its claimed-amount ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimEngine {
    /// Value currently held by the pool.
    pool_balance: u64,
    /// Cumulative payouts per holder. Audit-only.
    total_claimed: HashMap<String, u64>,
    /// Audit journal.
    events: Vec<VaultEvent>,
}

impl ClaimEngine {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits the pool. Called when the allocation engine's reward leg
    /// lands here.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::AmountOverflow`] only at the u64 boundary.
    pub fn fund(&mut self, amount: u64) -> Result<u64, ClaimError> {
        self.pool_balance = self
            .pool_balance
            .checked_add(amount)
            .ok_or(ClaimError::AmountOverflow)?;
        Ok(self.pool_balance)
    }

    /// Pays `caller` their proportional share of the pool.
    ///
    /// # Errors
    ///
    /// * [`ClaimError::NotEligible`] — the eligibility predicate is false.
    /// * [`ClaimError::NoRewards`] — the proportional share floors to zero
    ///   (empty pool, zero balance, or a share smaller than one unit).
    /// * [`ClaimError::TransferFailed`] — the payout was rejected; nothing
    ///   is recorded and the pool is unchanged.
    pub fn claim(
        &mut self,
        caller: &str,
        tracker: &EligibilityTracker,
        ledger: &dyn TokenLedger,
        transfer: &mut dyn ValueTransfer,
        now: DateTime<Utc>,
    ) -> Result<u64, ClaimError> {
        if !tracker.is_eligible(caller, ledger, now) {
            return Err(ClaimError::NotEligible {
                holder: caller.to_string(),
            });
        }

        // Eligibility guarantees total_supply > 0.
        let supply = ledger.total_supply();
        let reward = ((self.pool_balance as u128 * ledger.balance_of(caller) as u128)
            / supply as u128) as u64;

        if reward == 0 {
            return Err(ClaimError::NoRewards {
                holder: caller.to_string(),
            });
        }

        if !transfer.transfer(caller, reward) {
            return Err(ClaimError::TransferFailed {
                holder: caller.to_string(),
                amount: reward,
            });
        }

        // reward <= pool_balance because balance(caller) <= supply.
        let new_claimed = self
            .total_claimed
            .get(caller)
            .copied()
            .unwrap_or(0)
            .checked_add(reward)
            .ok_or(ClaimError::AmountOverflow)?;
        self.pool_balance -= reward;
        self.total_claimed.insert(caller.to_string(), new_claimed);

        self.events.push(VaultEvent::RewardClaimed {
            holder: caller.to_string(),
            amount: reward,
            at: now,
        });
        tracing::info!(holder = caller, reward, pool = self.pool_balance, "reward claimed");

        Ok(reward)
    }

    /// Value currently held by the pool.
    pub fn pool_balance(&self) -> u64 {
        self.pool_balance
    }

    /// Cumulative amount ever paid to `holder`.
    pub fn total_claimed(&self, holder: &str) -> u64 {
        self.total_claimed.get(holder).copied().unwrap_or(0)
    }

    /// The audit journal, oldest first.
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }
}
