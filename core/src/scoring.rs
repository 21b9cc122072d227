//! RFM scoring — relative percentile buckets plus absolute frequency tiers.
//!
//! This module:
//!   1. Buckets recency and monetary by population-relative rank
//!   2. Scores frequency by fixed business tiers from config
//!   3. Composes the three digits into the segment code
//!
//! RULES:
//!   - Recency and monetary are relative: rerunning against a different
//!     population may move a customer's bucket.
//!   - Frequency is absolute: the same order count always yields the same
//!     score, whatever else is in the run. Most customers buy exactly once,
//!     so rank-bucketing this axis would promote one-time buyers into high
//!     scores purely to fill quota.
//!   - Ties on a relative axis keep input order (stable sort); the store
//!     emits metrics in customer_unique_id order, so runs are repeatable.

use crate::{config::AnalyticsConfig, types::Score};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of buckets on each relative axis. Keeping this at 5 guarantees
/// every sub-score is a single digit, which the segment code relies on.
pub const SCORE_BUCKETS: usize = 5;

// ── Public types ─────────────────────────────────────────────────────────────

/// One row per real-world customer with at least one delivered order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    pub customer_unique_id: String,
    /// Latest purchase timestamp among the customer's delivered orders.
    pub last_purchase: NaiveDateTime,
    /// Count of distinct delivered orders. Always >= 1.
    pub frequency: i64,
    /// Sum of every payment line across those orders — total amount paid.
    pub monetary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCustomer {
    pub customer_unique_id: String,
    pub last_purchase: NaiveDateTime,
    pub frequency: i64,
    pub monetary: f64,
    pub r_score: Score,
    pub f_score: Score,
    pub m_score: Score,
    pub rfm_segment: String,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Score the whole aggregated population in one pass.
pub fn score_population(
    metrics: &[CustomerMetrics],
    config: &AnalyticsConfig,
) -> Vec<ScoredCustomer> {
    let recency = relative_buckets(metrics, |a, b| a.last_purchase.cmp(&b.last_purchase));
    let monetary = relative_buckets(metrics, |a, b| a.monetary.total_cmp(&b.monetary));

    metrics
        .iter()
        .enumerate()
        .map(|(i, customer)| {
            let r_score = recency[i];
            let f_score = frequency_score(customer.frequency, config);
            let m_score = monetary[i];
            ScoredCustomer {
                customer_unique_id: customer.customer_unique_id.clone(),
                last_purchase: customer.last_purchase,
                frequency: customer.frequency,
                monetary: customer.monetary,
                r_score,
                f_score,
                m_score,
                rfm_segment: segment_code(r_score, f_score, m_score),
            }
        })
        .collect()
}

/// Absolute frequency score: the best tier the customer qualifies for.
///
/// Taking the max over qualifying tiers keeps the mapping monotone in
/// frequency for any tier set, and the config's min_orders = 1 catch-all
/// makes it total over frequency >= 1.
pub fn frequency_score(frequency: i64, config: &AnalyticsConfig) -> Score {
    config
        .frequency_tiers
        .iter()
        .filter(|tier| frequency >= tier.min_orders)
        .map(|tier| tier.score)
        .max()
        .unwrap_or(1)
}

/// The three digits concatenated, r first. All inputs are single digits
/// by construction.
pub fn segment_code(r: Score, f: Score, m: Score) -> String {
    format!("{r}{f}{m}")
}

/// Bucket every row on one axis by ordinal rank.
///
/// Stable ascending sort, then bucket = ceil(rank * 5 / n) for 1-based
/// rank: the earliest-sorted rows land in bucket 1, the latest in bucket 5,
/// bucket sizes equal to within one whatever the shape of the distribution.
/// Equal keys keep input order.
fn relative_buckets<F>(metrics: &[CustomerMetrics], compare: F) -> Vec<Score>
where
    F: Fn(&CustomerMetrics, &CustomerMetrics) -> Ordering,
{
    let n = metrics.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| compare(&metrics[a], &metrics[b]));

    let mut buckets = vec![0 as Score; n];
    for (position, &index) in order.iter().enumerate() {
        buckets[index] = bucket_for_rank(position + 1, n);
    }
    buckets
}

/// ceil(rank * SCORE_BUCKETS / total) in integer arithmetic.
fn bucket_for_rank(rank: usize, total: usize) -> Score {
    ((rank * SCORE_BUCKETS + total - 1) / total) as Score
}

// ── Tests ────────────────────────────────────────────────────────────────────
