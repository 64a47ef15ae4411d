//! # Shared Vault Handle
//!
//! The allocation engine's balance check and spend must be one critical
//! section: two concurrent buybacks that both read the balance before
//! either decrements it would jointly overdraw the vault. The original
//! execution environment was single-threaded and got that serialization
//! for free; here it has to be explicit.
//!
//! [`SharedVault`] wraps the engine in `Arc<parking_lot::Mutex<_>>` and
//! forwards every operation while holding the lock, so each call is a
//! single atomic unit of work with respect to the ledger state.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::allocation::{AllocationEngine, AllocationError, BuybackReceipt};
use crate::ledger::{SwapFacility, ValueTransfer};

/// A cloneable, thread-safe handle to one vault instance.
#[derive(Clone)]
pub struct SharedVault {
    inner: Arc<Mutex<AllocationEngine>>,
}

impl SharedVault {
    /// Wraps an engine for shared access.
    pub fn new(engine: AllocationEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// See [`AllocationEngine::deposit`].
    pub fn deposit(&self, from: &str, amount: u64) -> Result<u64, AllocationError> {
        self.inner.lock().deposit(from, amount)
    }

    /// See [`AllocationEngine::execute_buyback`]. The lock spans the whole
    /// check-then-spend sequence, external legs included.
    pub fn execute_buyback(
        &self,
        caller: &str,
        amount: u64,
        swap: &mut dyn SwapFacility,
        transfer: &mut dyn ValueTransfer,
    ) -> Result<BuybackReceipt, AllocationError> {
        self.inner.lock().execute_buyback(caller, amount, swap, transfer)
    }

    /// See [`AllocationEngine::set_operator`].
    pub fn set_operator(&self, caller: &str, new_operator: &str) -> Result<(), AllocationError> {
        self.inner.lock().set_operator(caller, new_operator)
    }

    /// See [`AllocationEngine::description`].
    pub fn description(&self) -> String {
        self.inner.lock().description()
    }

    /// Current spendable balance.
    pub fn held_value(&self) -> u64 {
        self.inner.lock().held_value()
    }

    /// Current operator identity.
    pub fn operator(&self) -> String {
        self.inner.lock().operator().to_string()
    }

    /// Runs `f` with the locked engine, for reads the forwarders don't cover.
    pub fn with<R>(&self, f: impl FnOnce(&AllocationEngine) -> R) -> R {
        f(&self.inner.lock())
    }
}
