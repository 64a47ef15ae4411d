//! # Eligibility Tracker
//!
//! Per-holder state machine for reward eligibility. The only stored fact is
//! the timestamp of the holder's most recent tracked balance change;
//! eligibility itself is always derived, never stored.
//!
//! The reset policy is symmetric: inbound and outbound balance changes both
//! restart the 24-hour holding window. Buying more tokens resets the clock
//! exactly like selling does. Only the outbound path records a visible
//! [`VaultEvent::EligibilityReset`]; the inbound path's identical state
//! effect is silent.
//!
//! Timestamps come from the caller (the ledger's change notifications carry
//! them), so the window logic is testable with simulated time.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::events::VaultEvent;
use crate::ledger::TokenLedger;

/// Tracks when each holder's balance last changed and derives eligibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EligibilityTracker {
    /// Last observed balance change per holder. A holder absent from this
    /// map has never been observed and is never eligible.
    last_change: HashMap<String, DateTime<Utc>>,
    /// Audit journal of visible resets.
    events: Vec<VaultEvent>,
}

impl EligibilityTracker {
    /// Creates a tracker with no observed holders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger notification: `holder`'s balance increased at `at`.
    ///
    /// Restarts the holding window. No event is recorded for this path.
    pub fn on_balance_increased(&mut self, holder: &str, at: DateTime<Utc>) {
        self.last_change.insert(holder.to_string(), at);
        tracing::debug!(holder, %at, "holding window restarted (balance increase)");
    }

    /// Ledger notification: `holder`'s balance decreased at `at`.
    ///
    /// Restarts the holding window and records an eligibility-reset event.
    pub fn on_balance_decreased(&mut self, holder: &str, at: DateTime<Utc>) {
        self.last_change.insert(holder.to_string(), at);
        self.events.push(VaultEvent::EligibilityReset {
            holder: holder.to_string(),
            at,
        });
        tracing::debug!(holder, %at, "holding window restarted (balance decrease)");
    }

    /// Derives whether `holder` can claim at `now`. Pure; no state change.
    ///
    /// False when the holder was never observed, the holding window has not
    /// elapsed, the supply is zero, or the holder's balance is below one
    /// basis point of total supply.
    pub fn is_eligible(&self, holder: &str, ledger: &dyn TokenLedger, now: DateTime<Utc>) -> bool {
        let last_change = match self.last_change.get(holder) {
            Some(ts) => *ts,
            None => return false,
        };

        if now < last_change + config::hold_period() {
            return false;
        }

        let supply = ledger.total_supply();
        if supply == 0 {
            return false;
        }

        let threshold =
            ((supply as u128 * config::MIN_HOLD_SHARE_BPS as u128) / config::BPS_DENOMINATOR as u128) as u64;
        ledger.balance_of(holder) >= threshold
    }

    /// Timestamp of the holder's last observed balance change, if any.
    pub fn last_change(&self, holder: &str) -> Option<DateTime<Utc>> {
        self.last_change.get(holder).copied()
    }

    /// Number of holders ever observed.
    pub fn holder_count(&self) -> usize {
        self.last_change.len()
    }

    /// The audit journal of visible resets, oldest first.
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }
}
