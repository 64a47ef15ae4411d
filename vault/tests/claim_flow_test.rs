//! Integration tests for the reward pool.
//!
//! Wires the allocation engine's reward leg into the claim engine the way a
//! deployment does: the buyback pushes the reward portion to the pool, the
//! pool pays eligible holders proportional shares.

use chrono::{DateTime, Duration, TimeZone, Utc};

use ember_vault::chain::{AuthorizationResolver, ChainTable};
use ember_vault::config;
use ember_vault::ledger::{SwapError, SwapFacility, ValueTransfer};
use ember_vault::{AllocationEngine, ClaimEngine, ClaimError, EligibilityTracker, InMemoryLedger};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
}

/// Swap facility that accepts everything.
struct Router;

impl SwapFacility for Router {
    fn swap(
        &mut self,
        _amount_in: u64,
        _amount_out_min: u64,
        _path: [&str; 2],
        _recipient: &str,
        _deadline: i64,
    ) -> Result<(), SwapError> {
        Ok(())
    }
}

/// Transfer primitive that forwards reward-pool payments into the claim
/// engine, the way the deployed wiring does.
struct PoolWire<'a> {
    pool: &'a mut ClaimEngine,
    reward_pool_id: &'a str,
}

impl ValueTransfer for PoolWire<'_> {
    fn transfer(&mut self, to: &str, amount: u64) -> bool {
        if to == self.reward_pool_id {
            return self.pool.fund(amount).is_ok();
        }
        true
    }
}

/// Plain recorder used for claim payouts.
#[derive(Default)]
struct Payout {
    sent: Vec<(String, u64)>,
}

impl ValueTransfer for Payout {
    fn transfer(&mut self, to: &str, amount: u64) -> bool {
        self.sent.push((to.to_string(), amount));
        true
    }
}

#[test]
fn buyback_funds_pool_and_holder_claims() {
    let table = ChainTable::builtin();
    let resolver = AuthorizationResolver::resolve(&table, config::CHAIN_ID_TESTNET).unwrap();
    let mut vault = AllocationEngine::new(resolver, "operator", "pool");
    let mut pool = ClaimEngine::new();

    vault.deposit("fees", 1_000_000_000).unwrap();
    {
        let mut wire = PoolWire {
            pool: &mut pool,
            reward_pool_id: "pool",
        };
        vault
            .execute_buyback("operator", 1_000_000_000, &mut Router, &mut wire)
            .unwrap();
    }

    // 40% of the 800M buyback portion landed in the pool.
    assert_eq!(pool.pool_balance(), 320_000_000);

    // alice holds 2% of supply and has held for 25 hours.
    let mut tracker = EligibilityTracker::new();
    tracker.on_balance_increased("alice", t0());
    let mut ledger = InMemoryLedger::with_supply(1_000_000);
    ledger.set_balance("alice", 20_000);

    let mut payout = Payout::default();
    let reward = pool
        .claim("alice", &tracker, &ledger, &mut payout, t0() + Duration::hours(25))
        .unwrap();

    assert_eq!(reward, 6_400_000); // floor(320M * 2%)
    assert_eq!(pool.pool_balance(), 313_600_000);
    assert_eq!(payout.sent, vec![("alice".to_string(), 6_400_000)]);
}

#[test]
fn repeat_claims_drain_progressively_smaller_amounts() {
    let mut pool = ClaimEngine::new();
    pool.fund(1_000_000).unwrap();

    let mut tracker = EligibilityTracker::new();
    tracker.on_balance_increased("whale", t0());
    let mut ledger = InMemoryLedger::with_supply(100);
    ledger.set_balance("whale", 50); // half the supply

    let now = t0() + Duration::hours(24);
    let mut payout = Payout::default();

    let mut previous = u64::MAX;
    for _ in 0..5 {
        let reward = pool.claim("whale", &tracker, &ledger, &mut payout, now).unwrap();
        assert!(reward <= previous);
        previous = reward;
    }

    // Halving each round: 500_000, 250_000, 125_000, 62_500, 31_250.
    assert_eq!(pool.pool_balance(), 31_250);
    assert_eq!(pool.total_claimed("whale"), 968_750);
}

#[test]
fn claim_after_balance_change_is_rejected_until_window_elapses() {
    let mut pool = ClaimEngine::new();
    pool.fund(1_000_000).unwrap();

    let mut tracker = EligibilityTracker::new();
    tracker.on_balance_increased("alice", t0());
    let mut ledger = InMemoryLedger::with_supply(1_000_000);
    ledger.set_balance("alice", 10_000);

    let mut payout = Payout::default();
    let eligible = t0() + Duration::hours(25);
    pool.claim("alice", &tracker, &ledger, &mut payout, eligible).unwrap();

    // She tops up; her window restarts and the very next claim fails.
    tracker.on_balance_increased("alice", eligible);
    let result = pool.claim("alice", &tracker, &ledger, &mut payout, eligible + Duration::hours(1));
    assert!(matches!(result, Err(ClaimError::NotEligible { .. })));

    // A full day later she can claim again.
    assert!(pool
        .claim("alice", &tracker, &ledger, &mut payout, eligible + Duration::hours(24))
        .is_ok());
}
