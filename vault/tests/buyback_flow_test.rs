//! Integration tests for the allocation engine.
//!
//! These tests exercise the full buyback flow across module boundaries:
//! deposits, authorization via the chain table, the three external legs,
//! and the audit counters after sequences of operations.

use ember_vault::chain::{AuthorizationResolver, ChainTable};
use ember_vault::config;
use ember_vault::ledger::{SwapError, SwapFacility, ValueTransfer};
use ember_vault::{AllocationEngine, AllocationError, SplitPlan};

/// Records every external call the vault makes, in order.
#[derive(Default)]
struct Outside {
    burns: Vec<u64>,
    payments: Vec<(String, u64)>,
}

impl SwapFacility for Outside {
    fn swap(
        &mut self,
        amount_in: u64,
        amount_out_min: u64,
        path: [&str; 2],
        recipient: &str,
        _deadline: i64,
    ) -> Result<(), SwapError> {
        assert_eq!(amount_out_min, 0);
        assert_eq!(path, [config::SWAP_PATH_NATIVE, config::SWAP_PATH_TOKEN]);
        assert_eq!(recipient, config::BURN_SINK);
        self.burns.push(amount_in);
        Ok(())
    }
}

/// Separate transfer recorder so swap and transfer can be borrowed together.
#[derive(Default)]
struct Payments {
    sent: Vec<(String, u64)>,
}

impl ValueTransfer for Payments {
    fn transfer(&mut self, to: &str, amount: u64) -> bool {
        self.sent.push((to.to_string(), amount));
        true
    }
}

fn mainnet_vault() -> AllocationEngine {
    let table = ChainTable::builtin();
    let resolver = AuthorizationResolver::resolve(&table, config::CHAIN_ID_MAINNET).unwrap();
    AllocationEngine::new(resolver, "operator", "reward_pool")
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn deposit_then_buyback_then_counters() {
    let mut vault = mainnet_vault();

    // Revenue arrives from several sources; intake is never gated.
    vault.deposit("router_fees", 300_000_000).unwrap();
    vault.deposit("listing_fees", 200_000_000).unwrap();
    assert_eq!(vault.total_received(), 500_000_000);

    let mut swap = Outside::default();
    let mut payments = Payments::default();
    let receipt = vault
        .execute_buyback("operator", 100_000_000, &mut swap, &mut payments)
        .unwrap();

    // 5.0 held, 1.0 bought back: 0.64 disbursed, 4.36 remains.
    assert_eq!(receipt.held_after, 436_000_000);
    assert_eq!(vault.held_value(), 436_000_000);
    assert_eq!(swap.burns, vec![16_000_000]);
    assert_eq!(
        payments.sent,
        vec![
            ("reward_pool".to_string(), 32_000_000),
            (config::MAINNET_PORTAL.to_string(), 16_000_000),
        ]
    );

    // The balance invariant: held = received - sent.
    let sent = vault.total_burn() + vault.total_reward() + vault.total_platform();
    assert_eq!(vault.held_value(), vault.total_received() - sent);
}

#[test]
fn repeated_buybacks_accumulate_counters() {
    let mut vault = mainnet_vault();
    vault.deposit("fees", 1_000_000_000).unwrap();

    let mut swap = Outside::default();
    let mut payments = Payments::default();
    for _ in 0..3 {
        vault
            .execute_buyback("operator", 100_000_000, &mut swap, &mut payments)
            .unwrap();
    }

    assert_eq!(vault.total_buyback(), 240_000_000);
    assert_eq!(vault.total_burn(), 48_000_000);
    assert_eq!(vault.total_reward(), 96_000_000);
    assert_eq!(vault.total_platform(), 48_000_000);
    assert_eq!(vault.held_value(), 1_000_000_000 - 3 * 64_000_000);
}

#[test]
fn guardian_authorization_survives_operator_rotation() {
    let mut vault = mainnet_vault();
    vault.deposit("fees", 10_000).unwrap();

    vault.set_operator("operator", "successor").unwrap();

    let mut swap = Outside::default();
    let mut payments = Payments::default();

    // The replaced operator is locked out.
    let result = vault.execute_buyback("operator", 1_000, &mut swap, &mut payments);
    assert!(matches!(result, Err(AllocationError::NotAuthorized { .. })));

    // The guardian keeps permanent access.
    vault
        .execute_buyback(config::MAINNET_GUARDIAN, 1_000, &mut swap, &mut payments)
        .unwrap();
}

// ---------------------------------------------------------------------------
// Split arithmetic at the boundary
// ---------------------------------------------------------------------------

#[test]
fn dust_stays_in_the_vault() {
    let mut vault = mainnet_vault();
    // 1003 raw units: buyback 802, which is not a multiple of 5.
    vault.deposit("fees", 1_003).unwrap();

    let plan = SplitPlan::compute(1_003);
    assert_eq!(plan.buyback_portion, 802);
    assert_eq!(plan.burn_portion, 160);
    assert_eq!(plan.reward_portion, 320);
    assert_eq!(plan.platform_portion, 160);
    assert_eq!(plan.disbursed(), 640);

    let mut swap = Outside::default();
    let mut payments = Payments::default();
    vault
        .execute_buyback("operator", 1_003, &mut swap, &mut payments)
        .unwrap();

    // Reserve (201) and the undisbursed buyback remainder (162) both stay.
    assert_eq!(vault.held_value(), 1_003 - 640);
    // total_buyback records the full portion even though part never moved.
    assert_eq!(vault.total_buyback(), 802);
}

#[test]
fn buyback_of_entire_balance_leaves_only_the_reserve_and_dust() {
    let mut vault = mainnet_vault();
    vault.deposit("fees", 100_000_000).unwrap();

    let mut swap = Outside::default();
    let mut payments = Payments::default();
    vault
        .execute_buyback("operator", 100_000_000, &mut swap, &mut payments)
        .unwrap();

    // 20% reserve + 20% of the buyback portion remain: 36% of the amount.
    assert_eq!(vault.held_value(), 36_000_000);
}

#[test]
fn zero_amount_buyback_is_a_recorded_noop() {
    let mut vault = mainnet_vault();
    vault.deposit("fees", 1_000).unwrap();

    let mut swap = Outside::default();
    let mut payments = Payments::default();
    let receipt = vault
        .execute_buyback("operator", 0, &mut swap, &mut payments)
        .unwrap();

    assert_eq!(receipt.plan.disbursed(), 0);
    assert_eq!(vault.held_value(), 1_000);
    // The legs still ran, pushing zero. The counters record the attempt.
    assert_eq!(swap.burns, vec![0]);
    assert_eq!(vault.total_buyback(), 0);
}
