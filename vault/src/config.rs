//! # Vault Configuration & Constants
//!
//! Every magic number in the EMBER vault lives here. The split percentages
//! are consensus-critical: changing them after launch changes where real
//! revenue flows, so they are plain constants rather than runtime config.
//!
//! Two sums must hold forever (asserted in tests, not at runtime):
//!
//! - buyback share + reserve share = 100% of the top-level amount
//! - burn + reward + platform = 80% = the whole buyback share

use chrono::Duration;

// ---------------------------------------------------------------------------
// Supported Execution Contexts
// ---------------------------------------------------------------------------

/// Mainnet chain identifier. The vault is only ever deployed on two chains;
/// the ids are opaque configuration, inherited from the original deployment.
pub const CHAIN_ID_MAINNET: u64 = 56;

/// Testnet chain identifier.
pub const CHAIN_ID_TESTNET: u64 = 97;

/// Guardian identity on mainnet. The guardian is permanently authorized for
/// every permissioned vault operation and can never be rotated.
pub const MAINNET_GUARDIAN: &str = "ember:9f41c2a8d0b37e65f1a28c5d4e90b713a6cd08e2";

/// Portal (platform incentive) identity on mainnet. Receives the platform
/// leg of every buyback.
pub const MAINNET_PORTAL: &str = "ember:4b7d91e3c5f20a86d4b19e7c3f52a08d61e94cb0";

/// Guardian identity on testnet.
pub const TESTNET_GUARDIAN: &str = "tember:2c58e0a91fd4b37c68a05d12e94fb806c3a71d5e";

/// Portal identity on testnet.
pub const TESTNET_PORTAL: &str = "tember:8a03f6d21b59c47e80d3a15f62c9e708b4d52a19";

/// Canonical dead destination for the burn leg. Value swapped here is
/// unrecoverable by construction.
pub const BURN_SINK: &str = "ember:000000000000000000000000000000000000dead";

/// First hop of the burn swap path: the chain's native value unit.
pub const SWAP_PATH_NATIVE: &str = "asset:native";

/// Second hop of the burn swap path: the EMBER ecosystem token.
pub const SWAP_PATH_TOKEN: &str = "asset:embr";

// ---------------------------------------------------------------------------
// Split Percentages
// ---------------------------------------------------------------------------

/// Denominator for all basis-point math. One bp = 0.01%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Buyback share of the top-level amount (80%). The complement is the
/// strategic reserve, which never leaves the vault.
pub const BUYBACK_BPS: u64 = 8_000;

/// Burn leg, applied to the buyback portion (20%).
pub const BURN_BPS: u64 = 2_000;

/// Holder-reward leg, applied to the buyback portion (40%).
pub const REWARD_BPS: u64 = 4_000;

/// Platform incentive leg, applied to the buyback portion (20%).
pub const PLATFORM_BPS: u64 = 2_000;

// ---------------------------------------------------------------------------
// Reward Eligibility
// ---------------------------------------------------------------------------

/// Minimum uninterrupted holding period before a holder can claim.
/// Any tracked balance change restarts this window.
pub fn hold_period() -> Duration {
    Duration::hours(24)
}

/// Hold period in seconds, for callers that want a plain integer.
pub const HOLD_PERIOD_SECS: i64 = 24 * 60 * 60;

/// Minimum holding share required for eligibility: 1 bp = 0.01% of total
/// supply, floored.
pub const MIN_HOLD_SHARE_BPS: u64 = 1;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Decimal places of the vault's native value unit. 8, same as the rest of
/// the EMBER ecosystem.
pub const VALUE_DECIMALS: u32 = 8;

/// Fractional digits rendered by `description()`. The status string shows
/// the balance at a resolution of one part in 10,000 of a whole unit.
pub const DISPLAY_FRACTION_DIGITS: u32 = 4;

/// Divisor that takes a raw balance down to display resolution:
/// 10^(VALUE_DECIMALS - DISPLAY_FRACTION_DIGITS).
pub const DISPLAY_SCALE: u64 = 10_u64.pow(VALUE_DECIMALS - DISPLAY_FRACTION_DIGITS);

/// Divisor separating the integer part from the fractional part of the
/// scaled balance.
pub const DISPLAY_FRACTION_DIV: u64 = 10_u64.pow(DISPLAY_FRACTION_DIGITS);
