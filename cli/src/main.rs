// Copyright (c) 2026 Ember Labs. MIT License.
// See LICENSE for details.

//! # EMBER Operator CLI
//!
//! Entry point for the `ember` binary. Parses CLI arguments, initializes
//! logging, and runs one of the offline vault tools:
//!
//! - `split`       — preview the four-way split of a buyback amount
//! - `eligibility` — evaluate the reward-eligibility predicate
//! - `describe`    — render the vault status string for a balance
//! - `chains`      — list supported chain profiles
//! - `version`     — print build version information

mod cli;
mod logging;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use ember_vault::allocation::format_held_value;
use ember_vault::chain::ChainTable;
use ember_vault::config;
use ember_vault::{EligibilityTracker, InMemoryLedger, SplitPlan, TokenLedger};

use cli::{Commands, DescribeArgs, EligibilityArgs, EmberCli, SplitArgs};
use logging::LogFormat;

fn main() -> Result<()> {
    let args = EmberCli::parse();
    logging::init_logging(
        "ember_cli=info,ember_vault=info",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::debug!(command = ?args.command, json = args.json, "dispatching");

    match args.command {
        Commands::Split(split) => run_split(split, args.json),
        Commands::Eligibility(elig) => run_eligibility(elig, args.json),
        Commands::Describe(describe) => run_describe(describe),
        Commands::Chains => run_chains(args.json),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Prints the split of a buyback amount, leg by leg.
fn run_split(args: SplitArgs, json: bool) -> Result<()> {
    let plan = SplitPlan::compute(args.amount);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Buyback split for {} EMBER", format_held_value(args.amount));
    println!("  buyback portion : {:>14}", plan.buyback_portion);
    println!("  reserve portion : {:>14}", plan.reserve_portion);
    println!("  burn leg        : {:>14}", plan.burn_portion);
    println!("  reward leg      : {:>14}", plan.reward_portion);
    println!("  platform leg    : {:>14}", plan.platform_portion);
    println!("  disbursed total : {:>14}", plan.disbursed());
    println!("  buyback dust    : {:>14}", plan.dust());
    Ok(())
}

/// Evaluates the eligibility predicate for a hypothetical holder and
/// explains which gate failed, if any.
fn run_eligibility(args: EligibilityArgs, json: bool) -> Result<()> {
    let now = args.at.unwrap_or_else(Utc::now);
    let holder = "holder";

    let mut tracker = EligibilityTracker::new();
    tracker.on_balance_increased(holder, args.last_change);

    let mut ledger = InMemoryLedger::with_supply(args.supply);
    ledger.set_balance(holder, args.balance);

    let eligible = tracker.is_eligible(holder, &ledger, now);

    let window_ends = args.last_change + config::hold_period();
    let threshold = ((args.supply as u128 * config::MIN_HOLD_SHARE_BPS as u128)
        / config::BPS_DENOMINATOR as u128) as u64;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "eligible": eligible,
                "window_ends": window_ends,
                "window_elapsed": now >= window_ends,
                "threshold": threshold,
                "balance": ledger.balance_of(holder),
                "supply": ledger.total_supply(),
            })
        );
        return Ok(());
    }

    println!("Eligible: {}", if eligible { "yes" } else { "no" });
    println!(
        "  holding window  : ends {} ({})",
        window_ends,
        if now >= window_ends { "elapsed" } else { "still open" }
    );
    println!(
        "  minimum balance : {} of {} supply ({})",
        threshold,
        args.supply,
        if args.supply == 0 {
            "zero supply, nobody eligible"
        } else if args.balance >= threshold {
            "met"
        } else {
            "not met"
        }
    );
    Ok(())
}

/// Renders the vault status string for a raw balance, through the same
/// code path a deployed vault uses.
fn run_describe(args: DescribeArgs) -> Result<()> {
    let table = ChainTable::builtin();
    let resolver =
        ember_vault::AuthorizationResolver::resolve(&table, config::CHAIN_ID_MAINNET)?;
    let mut vault = ember_vault::AllocationEngine::new(resolver, "", "");
    vault.deposit("describe", args.held)?;
    println!("{}", vault.description());
    Ok(())
}

/// Lists the supported chain profiles.
fn run_chains(json: bool) -> Result<()> {
    let table = ChainTable::builtin();

    if json {
        println!("{}", serde_json::to_string_pretty(table.profiles())?);
        return Ok(());
    }

    for profile in table.profiles() {
        println!("chain {}", profile.chain_id);
        println!("  guardian : {}", profile.guardian);
        println!("  portal   : {}", profile.portal);
    }
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("ember {}", env!("CARGO_PKG_VERSION"));
    println!("rustc {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
