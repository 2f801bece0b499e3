#![deny(warnings)]

//! Headless CLI: plays a Startup Tycoon game against the in-memory store
//! with a fixed per-quarter decision and prints one KPI line per turn.

use anyhow::Result;
use game_store::{MemoryStore, StoreError};
use sim_core::AdvanceDecision;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    quarters: u32,
    price: f64,
    engineers: f64,
    sales: f64,
    salary_pct: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        quarters: 40,
        price: 1000.0,
        engineers: 0.0,
        sales: 0.0,
        salary_pct: 100.0,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--quarters" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.quarters = v;
                }
            }
            "--price" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.price = v;
                }
            }
            "--engineers" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.engineers = v;
                }
            }
            "--sales" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.sales = v;
                }
            }
            "--salary-pct" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.salary_pct = v;
                }
            }
            _ => {}
        }
    }
    args
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(
        quarters = args.quarters,
        price = args.price,
        engineers = args.engineers,
        sales = args.sales,
        salary_pct = args.salary_pct,
        "starting CLI"
    );

    let decision = AdvanceDecision {
        price: args.price,
        new_engineers: args.engineers,
        new_sales: args.sales,
        salary_pct: args.salary_pct,
    };

    let store = MemoryStore::new();
    let player = "local";

    for _ in 0..args.quarters {
        let outcome = match store.advance(player, &decision) {
            Ok(outcome) => outcome,
            Err(err @ StoreError::GameFinished(_)) => {
                info!(%err, "stopping");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        println!(
            "Y{} Q{} | units: {} | revenue: ${:.0} | net: ${:.0} | cash: ${:.0} | quality: {:.1} | status: {}",
            outcome.year,
            outcome.quarter_in_year,
            outcome.units_sold,
            outcome.revenue,
            outcome.net_income,
            outcome.cash_end,
            outcome.product_quality,
            outcome.status
        );
        if outcome.status.is_terminal() {
            break;
        }
    }

    let game = store.get_or_create(player);
    println!(
        "Final | next quarter: {} | cash: ${:.0} | cumulative profit: ${:.0} | status: {}",
        game.quarter, game.cash, game.cumulative_profit, game.status
    );

    Ok(())
}
