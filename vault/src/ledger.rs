//! # External Collaborators
//!
//! The vault never moves tokens itself. Three seams connect it to the rest
//! of the ecosystem:
//!
//! - [`TokenLedger`] — read-only oracle for holder balances and total supply.
//! - [`SwapFacility`] — converts native value into token units; the burn leg
//!   routes through it with the dead address as recipient.
//! - [`ValueTransfer`] — best-effort push payment of native value.
//!
//! All three are synchronous: a call either returns or fails immediately,
//! and the enclosing vault operation observes the outcome before touching
//! its own state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection reported by the swap facility. Aborts the enclosing buyback.
#[derive(Debug, Error)]
#[error("swap rejected: {0}")]
pub struct SwapError(pub String);

/// Read-only view of the token ledger: who holds what, and how much exists.
///
/// Assumed accurate at call time; the vault does no staleness handling.
pub trait TokenLedger {
    /// Current balance of `holder`, 0 if unknown.
    fn balance_of(&self, holder: &str) -> u64;

    /// Current total token supply.
    fn total_supply(&self) -> u64;
}

/// Swap execution facility used by the burn leg.
pub trait SwapFacility {
    /// Swaps `amount_in` of native value along `path` (native unit, then
    /// target token), delivering the output to `recipient`.
    ///
    /// The vault always passes `amount_out_min` = 0 and `deadline` = now;
    /// it accepts whatever the market gives. Slippage policy is out of
    /// scope.
    fn swap(
        &mut self,
        amount_in: u64,
        amount_out_min: u64,
        path: [&str; 2],
        recipient: &str,
        deadline: i64,
    ) -> Result<(), SwapError>;
}

/// Best-effort push payment of native value.
pub trait ValueTransfer {
    /// Sends `amount` to `to`. Returns `false` if the destination rejected
    /// the funds; the caller decides whether that aborts its operation.
    fn transfer(&mut self, to: &str, amount: u64) -> bool;
}

// ---------------------------------------------------------------------------
// In-memory ledger
// ---------------------------------------------------------------------------

/// A HashMap-backed [`TokenLedger`].
///
/// Used by the CLI for what-if eligibility checks and by tests. Production
/// deployments implement [`TokenLedger`] over the real token contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    balances: HashMap<String, u64>,
    total_supply: u64,
}

impl InMemoryLedger {
    /// Creates an empty ledger with zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger with a fixed total supply and no holders.
    pub fn with_supply(total_supply: u64) -> Self {
        Self {
            balances: HashMap::new(),
            total_supply,
        }
    }

    /// Sets a holder's balance outright. Does not touch total supply; the
    /// two are independent knobs so tests can model any ratio.
    pub fn set_balance(&mut self, holder: &str, balance: u64) {
        self.balances.insert(holder.to_string(), balance);
    }

    /// Sets the total supply.
    pub fn set_total_supply(&mut self, total_supply: u64) {
        self.total_supply = total_supply;
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, holder: &str) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u64 {
        self.total_supply
    }
}
