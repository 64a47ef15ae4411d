//! # Vault Events
//!
//! Every state-changing operation records a [`VaultEvent`] in its engine's
//! journal. The journal is audit-only: nothing in the vault reads it back
//! for control flow, and external consumers can serialize it as JSON lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification recorded by a vault engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VaultEvent {
    /// Native value arrived at the vault.
    Deposit {
        /// Identity the value came from.
        from: String,
        /// Raw amount received.
        amount: u64,
        /// When the deposit was recorded.
        at: DateTime<Utc>,
    },

    /// A buyback completed all three external legs.
    BuybackExecuted {
        /// The top-level amount requested.
        amount: u64,
        /// Portion routed into the burn swap.
        burn: u64,
        /// Portion pushed to the reward pool.
        reward: u64,
        /// Portion pushed to the portal.
        platform: u64,
        /// When the buyback committed.
        at: DateTime<Utc>,
    },

    /// The operator role was reassigned.
    OperatorChanged {
        /// Previous operator identity.
        previous: String,
        /// New operator identity.
        current: String,
        /// When the change was made.
        at: DateTime<Utc>,
    },

    /// A holder's eligibility clock restarted because their tracked balance
    /// decreased. (Increases restart the clock too, silently.)
    EligibilityReset {
        /// The holder whose window restarted.
        holder: String,
        /// When the balance change was observed.
        at: DateTime<Utc>,
    },

    /// An eligible holder drew their proportional share from the pool.
    RewardClaimed {
        /// The claiming holder.
        holder: String,
        /// Amount paid out.
        amount: u64,
        /// When the claim committed.
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = VaultEvent::Deposit {
            from: "alice".into(),
            amount: 42,
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"type\":\"deposit\""));
        assert!(json.contains("\"amount\":42"));
    }
}
