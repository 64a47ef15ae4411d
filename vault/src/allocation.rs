//! # Allocation Engine
//!
//! Owns the vault's native-value balance and the audit counters, and turns
//! an inbound amount into the four destination flows:
//!
//! 1. **Buyback portion** — 80% of the requested amount.
//! 2. Of that portion: **burn** 20%, **holder reward** 40%, **platform** 20%,
//!    each floored independently.
//! 3. **Reserve** — the remaining 20% of the amount; never leaves the vault.
//!
//! The three disbursed legs together take 80% of the buyback portion; when
//! the portion is not a multiple of 5 the floors shave off up to 3 extra
//! minimal units. Everything not disbursed stays in `held_value` — the
//! counters only ever record what was requested and what was actually sent.
//!
//! ## Atomicity
//!
//! `execute_buyback` runs its external legs (swap, then reward transfer,
//! then platform transfer) before touching any internal state. A failure in
//! any leg aborts the call with every counter and the balance unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::chain::AuthorizationResolver;
use crate::config;
use crate::events::VaultEvent;
use crate::ledger::{SwapFacility, ValueTransfer};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during allocation-engine operations.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The caller is neither the operator nor the guardian.
    #[error("not authorized: {caller}")]
    NotAuthorized {
        /// Identity that attempted the operation.
        caller: String,
    },

    /// The requested buyback exceeds the vault's balance.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount the caller asked to allocate.
        requested: u64,
        /// Current spendable balance.
        available: u64,
    },

    /// The swap facility rejected the burn leg.
    #[error("burn swap failed: {0}")]
    SwapFailed(#[from] crate::ledger::SwapError),

    /// The reward pool rejected the holder-reward leg.
    #[error("reward transfer failed: {amount} to {destination}")]
    RewardTransferFailed {
        /// Amount that was being pushed.
        amount: u64,
        /// The reward pool identity.
        destination: String,
    },

    /// The portal rejected the platform leg.
    #[error("platform transfer failed: {amount} to {destination}")]
    PlatformTransferFailed {
        /// Amount that was being pushed.
        amount: u64,
        /// The portal identity.
        destination: String,
    },

    /// A counter update would overflow u64.
    #[error("amount overflow: counter update would exceed u64::MAX")]
    AmountOverflow,
}

// ---------------------------------------------------------------------------
// SplitPlan
// ---------------------------------------------------------------------------

/// The deterministic four-way split of a buyback amount.
///
/// Pure arithmetic, computable without a vault instance — the CLI uses it
/// to preview splits, the engine uses it to execute them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// The top-level amount being allocated.
    pub amount: u64,
    /// 80% of `amount`, floored.
    pub buyback_portion: u64,
    /// Exact complement of the buyback portion. Stays in the vault.
    pub reserve_portion: u64,
    /// 20% of the buyback portion, floored. Swapped into the dead address.
    pub burn_portion: u64,
    /// 40% of the buyback portion, floored. Pushed to the reward pool.
    pub reward_portion: u64,
    /// 20% of the buyback portion, floored. Pushed to the portal.
    pub platform_portion: u64,
}

/// Floor of `amount * bps / 10_000`, widened through u128 so the
/// intermediate product cannot overflow. The result never exceeds `amount`.
fn bps_of(amount: u64, bps: u64) -> u64 {
    ((amount as u128 * bps as u128) / config::BPS_DENOMINATOR as u128) as u64
}

impl SplitPlan {
    /// Computes the split for `amount`. Total, partial sums, and portions
    /// all fit in u64 because every portion is bounded by `amount`.
    pub fn compute(amount: u64) -> Self {
        let buyback_portion = bps_of(amount, config::BUYBACK_BPS);
        let reserve_portion = amount - buyback_portion;

        // Independent floors. Their sum equals 80% of the buyback portion
        // only when the portion divides evenly by 5.
        let burn_portion = bps_of(buyback_portion, config::BURN_BPS);
        let reward_portion = bps_of(buyback_portion, config::REWARD_BPS);
        let platform_portion = bps_of(buyback_portion, config::PLATFORM_BPS);

        Self {
            amount,
            buyback_portion,
            reserve_portion,
            burn_portion,
            reward_portion,
            platform_portion,
        }
    }

    /// Total value that leaves the vault: burn + reward + platform.
    pub fn disbursed(&self) -> u64 {
        self.burn_portion + self.reward_portion + self.platform_portion
    }

    /// The part of the buyback portion that is counted in `total_buyback`
    /// but never transferred anywhere. It stays in the vault's balance,
    /// invisible to every other counter.
    pub fn dust(&self) -> u64 {
        self.buyback_portion - self.disbursed()
    }
}

/// Outcome of a committed buyback: the executed plan plus the resulting
/// vault balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuybackReceipt {
    /// The split that was executed.
    pub plan: SplitPlan,
    /// Vault balance after the disbursed legs left.
    pub held_after: u64,
    /// When the buyback committed.
    pub committed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// AllocationEngine
// ---------------------------------------------------------------------------

/// The vault's ledger state and the operations that mutate it.
///
/// Invariant: `held_value == total_received − (total_burn + total_reward +
/// total_platform)`. Reserve and dust are part of `held_value`; only the
/// three disbursed legs ever leave.
///
/// # Thread Safety
///
/// `AllocationEngine` is `Send` but not `Sync`. Concurrent callers must go
/// through [`SharedVault`](crate::shared::SharedVault), which serializes the
/// check-then-spend sequence behind a mutex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEngine {
    /// Unique id for this vault instance.
    vault_id: String,
    /// Guardian/portal resolution for the chain this vault runs on.
    resolver: AuthorizationResolver,
    /// The mutable operator identity. Replaceable via [`set_operator`](Self::set_operator).
    operator: String,
    /// Destination of the holder-reward leg (the claim engine's identity).
    reward_pool: String,
    /// Current spendable balance in raw units.
    held_value: u64,
    /// Cumulative value ever deposited.
    total_received: u64,
    /// Cumulative buyback portions (including undisbursed remainders).
    total_buyback: u64,
    /// Cumulative value swapped into the dead address.
    total_burn: u64,
    /// Cumulative value pushed to the reward pool.
    total_reward: u64,
    /// Cumulative value pushed to the portal.
    total_platform: u64,
    /// When this vault instance was created.
    created_at: DateTime<Utc>,
    /// Audit journal. Never read back for control flow.
    events: Vec<VaultEvent>,
}

impl AllocationEngine {
    /// Creates a vault with zeroed counters.
    ///
    /// # Arguments
    ///
    /// * `resolver` - Resolved chain profile (guardian + portal).
    /// * `operator` - Initial operator identity.
    /// * `reward_pool` - Identity of the reward pool that receives the
    ///   holder-reward leg.
    pub fn new(resolver: AuthorizationResolver, operator: &str, reward_pool: &str) -> Self {
        Self {
            vault_id: Uuid::new_v4().to_string(),
            resolver,
            operator: operator.to_string(),
            reward_pool: reward_pool.to_string(),
            held_value: 0,
            total_received: 0,
            total_buyback: 0,
            total_burn: 0,
            total_reward: 0,
            total_platform: 0,
            created_at: Utc::now(),
            events: Vec::new(),
        }
    }

    /// Records an inbound deposit. Unconditional: any caller, any time.
    ///
    /// This is the vault's sole revenue intake and must never be gated.
    /// Returns the new held balance.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::AmountOverflow`] only if the balance or
    /// the received counter would exceed `u64::MAX`.
    pub fn deposit(&mut self, from: &str, amount: u64) -> Result<u64, AllocationError> {
        let new_held = self
            .held_value
            .checked_add(amount)
            .ok_or(AllocationError::AmountOverflow)?;
        let new_received = self
            .total_received
            .checked_add(amount)
            .ok_or(AllocationError::AmountOverflow)?;

        self.held_value = new_held;
        self.total_received = new_received;

        let at = Utc::now();
        self.events.push(VaultEvent::Deposit {
            from: from.to_string(),
            amount,
            at,
        });
        tracing::info!(vault_id = %self.vault_id, from, amount, "deposit received");

        Ok(self.held_value)
    }

    /// Executes a buyback: splits `amount`, runs the three external legs in
    /// order (burn swap, reward transfer, platform transfer), and commits
    /// the counter updates only after all legs succeed.
    ///
    /// # Errors
    ///
    /// * [`AllocationError::NotAuthorized`] — caller is neither operator nor guardian.
    /// * [`AllocationError::InsufficientBalance`] — `amount` exceeds the balance.
    /// * [`AllocationError::SwapFailed`] — the burn leg was rejected.
    /// * [`AllocationError::RewardTransferFailed`] / [`AllocationError::PlatformTransferFailed`]
    ///   — a push payment was rejected.
    ///
    /// On any error, no counter and no balance changes.
    pub fn execute_buyback(
        &mut self,
        caller: &str,
        amount: u64,
        swap: &mut dyn SwapFacility,
        transfer: &mut dyn ValueTransfer,
    ) -> Result<BuybackReceipt, AllocationError> {
        if !self.resolver.is_authorized(caller, &self.operator) {
            return Err(AllocationError::NotAuthorized {
                caller: caller.to_string(),
            });
        }

        if amount > self.held_value {
            return Err(AllocationError::InsufficientBalance {
                requested: amount,
                available: self.held_value,
            });
        }

        let plan = SplitPlan::compute(amount);
        let now = Utc::now();

        // External legs first, in a fixed order. Internal state is only
        // staged until every leg has succeeded. Minimum swap output is
        // explicitly zero: the burn accepts whatever the market gives.
        swap.swap(
            plan.burn_portion,
            0,
            [config::SWAP_PATH_NATIVE, config::SWAP_PATH_TOKEN],
            config::BURN_SINK,
            now.timestamp(),
        )?;

        if !transfer.transfer(&self.reward_pool, plan.reward_portion) {
            return Err(AllocationError::RewardTransferFailed {
                amount: plan.reward_portion,
                destination: self.reward_pool.clone(),
            });
        }

        let portal = self.resolver.portal().to_string();
        if !transfer.transfer(&portal, plan.platform_portion) {
            return Err(AllocationError::PlatformTransferFailed {
                amount: plan.platform_portion,
                destination: portal,
            });
        }

        // Commit. All legs are out the door; update every counter or none.
        let disbursed = plan.disbursed();
        let new_held = self
            .held_value
            .checked_sub(disbursed)
            .ok_or(AllocationError::AmountOverflow)?;
        let new_burn = self
            .total_burn
            .checked_add(plan.burn_portion)
            .ok_or(AllocationError::AmountOverflow)?;
        let new_reward = self
            .total_reward
            .checked_add(plan.reward_portion)
            .ok_or(AllocationError::AmountOverflow)?;
        let new_platform = self
            .total_platform
            .checked_add(plan.platform_portion)
            .ok_or(AllocationError::AmountOverflow)?;
        let new_buyback = self
            .total_buyback
            .checked_add(plan.buyback_portion)
            .ok_or(AllocationError::AmountOverflow)?;

        self.held_value = new_held;
        self.total_burn = new_burn;
        self.total_reward = new_reward;
        self.total_platform = new_platform;
        self.total_buyback = new_buyback;

        self.events.push(VaultEvent::BuybackExecuted {
            amount,
            burn: plan.burn_portion,
            reward: plan.reward_portion,
            platform: plan.platform_portion,
            at: now,
        });
        tracing::info!(
            vault_id = %self.vault_id,
            amount,
            burn = plan.burn_portion,
            reward = plan.reward_portion,
            platform = plan.platform_portion,
            held_after = self.held_value,
            "buyback executed"
        );

        Ok(BuybackReceipt {
            plan,
            held_after: self.held_value,
            committed_at: now,
        })
    }

    /// Replaces the operator identity.
    ///
    /// No validation on the new identity: any value is accepted, including
    /// the empty string. That permissiveness is part of the contract.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::NotAuthorized`] unless the caller is the
    /// current operator or the guardian.
    pub fn set_operator(&mut self, caller: &str, new_operator: &str) -> Result<(), AllocationError> {
        if !self.resolver.is_authorized(caller, &self.operator) {
            return Err(AllocationError::NotAuthorized {
                caller: caller.to_string(),
            });
        }

        let previous = std::mem::replace(&mut self.operator, new_operator.to_string());
        self.events.push(VaultEvent::OperatorChanged {
            previous: previous.clone(),
            current: self.operator.clone(),
            at: Utc::now(),
        });
        tracing::info!(vault_id = %self.vault_id, %previous, current = %self.operator, "operator changed");

        Ok(())
    }

    /// Deterministic human-readable status string for external display.
    ///
    /// Embeds the current balance as a fixed-point decimal with four
    /// fractional digits, e.g. `4.3600` for a raw balance of 436,000,000
    /// at 8 decimals. Pure formatting; no side effects.
    pub fn description(&self) -> String {
        format!(
            "EMBER revenue vault holding {} EMBER",
            format_held_value(self.held_value)
        )
    }

    /// Current spendable balance in raw units.
    pub fn held_value(&self) -> u64 {
        self.held_value
    }

    /// Cumulative value ever deposited.
    pub fn total_received(&self) -> u64 {
        self.total_received
    }

    /// Cumulative buyback portions.
    pub fn total_buyback(&self) -> u64 {
        self.total_buyback
    }

    /// Cumulative value burned.
    pub fn total_burn(&self) -> u64 {
        self.total_burn
    }

    /// Cumulative value sent to the reward pool.
    pub fn total_reward(&self) -> u64 {
        self.total_reward
    }

    /// Cumulative value sent to the portal.
    pub fn total_platform(&self) -> u64 {
        self.total_platform
    }

    /// Current operator identity.
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// The fixed guardian for this vault's chain.
    pub fn guardian(&self) -> &str {
        self.resolver.guardian()
    }

    /// Unique id of this vault instance.
    pub fn vault_id(&self) -> &str {
        &self.vault_id
    }

    /// When this vault instance was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The audit journal, oldest first.
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }
}

/// Renders a raw balance as `integer.fraction` with the fractional part
/// zero-padded to four digits.
pub fn format_held_value(raw: u64) -> String {
    let scaled = raw / config::DISPLAY_SCALE;
    let integer = scaled / config::DISPLAY_FRACTION_DIV;
    let fraction = scaled % config::DISPLAY_FRACTION_DIV;
    format!("{integer}.{fraction:04}")
}
