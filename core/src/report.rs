//! Reporting views over the scored population.
//!
//! Two views, both pure reads of ScoredCustomer rows:
//!   1. Champion list — the highest-value segment, richest first
//!   2. Frequency distribution — per-f_score share of the population,
//!      a skew sanity check on the absolute scorer
//!
//! Neither view mutates anything; recomputing from source must produce
//! the same rows as reading the engine's cache.

use crate::{config::ChampionConfig, scoring::ScoredCustomer, types::Score};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionRow {
    pub customer_unique_id: String,
    pub r_score: Score,
    pub f_score: Score,
    pub m_score: Score,
    pub rfm_segment: String,
    pub monetary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRow {
    pub f_score: Score,
    pub customer_count: i64,
    /// Population share, two decimal places with a trailing `%`.
    pub share: String,
}

/// Customers meeting all three champion thresholds, ordered by monetary
/// descending. With the shipped config this is r = 5, f >= 4, m = 5.
pub fn champion_list(scored: &[ScoredCustomer], config: &ChampionConfig) -> Vec<ChampionRow> {
    let mut rows: Vec<ChampionRow> = scored
        .iter()
        .filter(|c| {
            c.r_score >= config.min_recency_score
                && c.f_score >= config.min_frequency_score
                && c.m_score >= config.min_monetary_score
        })
        .map(|c| ChampionRow {
            customer_unique_id: c.customer_unique_id.clone(),
            r_score: c.r_score,
            f_score: c.f_score,
            m_score: c.m_score,
            rfm_segment: c.rfm_segment.clone(),
            monetary: c.monetary,
        })
        .collect();
    rows.sort_by(|a, b| b.monetary.total_cmp(&a.monetary));
    rows
}

/// Count and population share per f_score bucket, highest bucket first.
///
/// Buckets with no customers are omitted. A healthy dataset shows bucket 1
/// dominant and shares shrinking toward bucket 5 — an expectation to eyeball,
/// not an enforced invariant. An empty population yields an empty report
/// instead of dividing by zero.
pub fn frequency_distribution(scored: &[ScoredCustomer]) -> Vec<DistributionRow> {
    if scored.is_empty() {
        return Vec::new();
    }
    let total = scored.len() as f64;

    let mut counts: BTreeMap<Score, i64> = BTreeMap::new();
    for customer in scored {
        *counts.entry(customer.f_score).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .rev()
        .map(|(f_score, customer_count)| {
            let share = customer_count as f64 * 100.0 / total;
            DistributionRow {
                f_score,
                customer_count,
                share: format!("{share:.2}%"),
            }
        })
        .collect()
}
