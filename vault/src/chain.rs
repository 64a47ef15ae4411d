//! # Chain Profiles & Authorization
//!
//! The vault is defined for exactly two execution contexts (mainnet and
//! testnet). Each context carries a fixed guardian identity and a fixed
//! portal identity, resolved once at startup from an immutable table.
//! Anything outside that table is a configuration mismatch, not a
//! recoverable condition.
//!
//! Authorization is the union of two roles: the mutable operator (owned by
//! [`AllocationEngine`](crate::allocation::AllocationEngine)) and the
//! context's guardian, which can never be rotated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while resolving a chain profile.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The chain id is not in the profile table. Fatal: the vault has no
    /// guardian or portal on this chain and must not run here.
    #[error("unsupported chain id: {0}")]
    UnsupportedChain(u64),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The fixed per-chain identities the vault depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    /// Opaque chain identifier.
    pub chain_id: u64,
    /// Permanently authorized identity for all permissioned operations.
    pub guardian: String,
    /// Destination of the platform incentive leg.
    pub portal: String,
}

/// Immutable table of supported chain profiles.
///
/// Constructed once at initialization. The shipped table covers the two
/// supported chains; tests can build tables with synthetic contexts via
/// [`ChainTable::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainTable {
    profiles: Vec<ChainProfile>,
}

impl ChainTable {
    /// Builds a table from an explicit set of profiles.
    pub fn new(profiles: Vec<ChainProfile>) -> Self {
        Self { profiles }
    }

    /// The table shipped with the vault: mainnet and testnet, nothing else.
    pub fn builtin() -> Self {
        Self::new(vec![
            ChainProfile {
                chain_id: config::CHAIN_ID_MAINNET,
                guardian: config::MAINNET_GUARDIAN.to_string(),
                portal: config::MAINNET_PORTAL.to_string(),
            },
            ChainProfile {
                chain_id: config::CHAIN_ID_TESTNET,
                guardian: config::TESTNET_GUARDIAN.to_string(),
                portal: config::TESTNET_PORTAL.to_string(),
            },
        ])
    }

    /// Looks up the profile for a chain id, or `None` if unsupported.
    pub fn profile(&self, chain_id: u64) -> Option<&ChainProfile> {
        self.profiles.iter().find(|p| p.chain_id == chain_id)
    }

    /// All profiles in the table, in declaration order.
    pub fn profiles(&self) -> &[ChainProfile] {
        &self.profiles
    }
}

// ---------------------------------------------------------------------------
// AuthorizationResolver
// ---------------------------------------------------------------------------

/// Resolves the guardian/portal pair for one execution context and exposes
/// the authorization predicate.
///
/// Pure lookup: the resolver holds no mutable state. The operator half of
/// the predicate is passed in by the caller because the operator lives in
/// the allocation engine and can be rotated there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResolver {
    profile: ChainProfile,
}

impl AuthorizationResolver {
    /// Resolves the profile for `chain_id` from `table`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::UnsupportedChain`] for any id outside the
    /// table. Callers should treat this as fatal, not retry it.
    pub fn resolve(table: &ChainTable, chain_id: u64) -> Result<Self, ChainError> {
        let profile = table
            .profile(chain_id)
            .cloned()
            .ok_or(ChainError::UnsupportedChain(chain_id))?;
        Ok(Self { profile })
    }

    /// The chain this resolver was built for.
    pub fn chain_id(&self) -> u64 {
        self.profile.chain_id
    }

    /// The fixed guardian identity for this chain.
    pub fn guardian(&self) -> &str {
        &self.profile.guardian
    }

    /// The fixed portal identity for this chain.
    pub fn portal(&self) -> &str {
        &self.profile.portal
    }

    /// Returns `true` iff `caller` is the current operator or the guardian.
    pub fn is_authorized(&self, caller: &str, operator: &str) -> bool {
        caller == operator || caller == self.profile.guardian
    }
}
