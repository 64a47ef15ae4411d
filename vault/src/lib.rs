// Copyright (c) 2026 Ember Labs. MIT License.
// See LICENSE for details.

//! # EMBER Revenue Vault
//!
//! Revenue allocation for the EMBER token ecosystem. Inbound value lands in
//! the vault unconditionally; permissioned buybacks split it across four
//! destinations (burn, holder rewards, platform, strategic reserve); and a
//! time- and balance-gated reward pool pays holders proportional claims.
//!
//! The crate is organized by concern:
//!
//! - **config** — every protocol constant, and nothing else.
//! - **chain** — supported execution contexts and the guardian/operator
//!   authorization predicate.
//! - **allocation** — the vault ledger: deposits, the 80/20 split with its
//!   20/40/20 sub-split, operator rotation, status rendering.
//! - **eligibility** — per-holder holding-window tracking.
//! - **claim** — the reward pool and proportional payouts.
//! - **ledger** — traits for the external collaborators (balance oracle,
//!   swap facility, raw transfers).
//! - **events** — the audit journal entries engines record.
//! - **shared** — mutex-wrapped handle for concurrent callers.
//!
//! ## Design Principles
//!
//! 1. All monetary arithmetic is checked or widened through u128 — wrapping
//!    arithmetic and money do not mix.
//! 2. Operations are all-or-nothing: external legs run first, counters
//!    commit only after every leg succeeded.
//! 3. Counters are audit-only. Nothing reads them back for control flow.
//! 4. Every public type is serializable (serde) for wire transport and
//!    persistent storage.

pub mod allocation;
pub mod chain;
pub mod claim;
pub mod config;
pub mod eligibility;
pub mod events;
pub mod ledger;
pub mod shared;

pub use allocation::{AllocationEngine, AllocationError, BuybackReceipt, SplitPlan};
pub use chain::{AuthorizationResolver, ChainError, ChainProfile, ChainTable};
pub use claim::{ClaimEngine, ClaimError};
pub use eligibility::EligibilityTracker;
pub use events::VaultEvent;
pub use ledger::{InMemoryLedger, SwapError, SwapFacility, TokenLedger, ValueTransfer};
pub use shared::SharedVault;
