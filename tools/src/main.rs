//! rfm-runner: headless reporting runner for the RFM pipeline.
//!
//! Usage:
//!   rfm-runner --db olist.db
//!   rfm-runner --db olist.db --data-dir ./data --top 20
//!
//! The database is expected to be pre-loaded with the customers, orders,
//! and order_payments record sets. An empty database produces empty
//! reports, not an error.

use anyhow::Result;
use rfm_core::{config::AnalyticsConfig, engine::RfmEngine, store::RfmStore};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str());
    let top = parse_arg(&args, "--top", 20usize);

    println!("rfm-runner — customer segmentation report");
    println!("  db:   {db}");
    println!("  top:  {top}");
    println!();

    let config = match data_dir {
        Some(dir) => AnalyticsConfig::load(dir)?,
        None => AnalyticsConfig::default(),
    };

    let store = RfmStore::open(db)?;
    store.migrate()?;

    let mut engine = RfmEngine::new(config, store);
    let population = engine.recompute()?;
    if population == 0 {
        log::warn!("no scored customers — is the database loaded?");
    }

    print_summary(&mut engine, population, top)
}

fn print_summary(engine: &mut RfmEngine, population: usize, top: usize) -> Result<()> {
    println!("=== RUN SUMMARY ===");
    println!("  customer accounts: {}", engine.store.customer_account_count()?);
    println!("  orders:            {}", engine.store.order_count()?);
    println!("  delivered orders:  {}", engine.store.delivered_order_count()?);
    println!("  scored customers:  {population}");

    println!();
    println!("=== CHAMPIONS (top {top} by spend) ===");
    let champions = engine.champions()?;
    if champions.is_empty() {
        println!("  (none)");
    } else {
        for row in champions.iter().take(top) {
            println!(
                "  {} | {} | R{} F{} M{} | ${:.2}",
                row.customer_unique_id,
                row.rfm_segment,
                row.r_score,
                row.f_score,
                row.m_score,
                row.monetary
            );
        }
        if champions.len() > top {
            println!("  ... and {} more", champions.len() - top);
        }
    }

    println!();
    println!("=== FREQUENCY DISTRIBUTION ===");
    let distribution = engine.frequency_distribution()?;
    if distribution.is_empty() {
        println!("  (empty population)");
    } else {
        for row in &distribution {
            println!(
                "  f_score {} | {:>8} customers | {:>8}",
                row.f_score, row.customer_count, row.share
            );
        }
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
