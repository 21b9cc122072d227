use chrono::NaiveDateTime;
use rfm_core::{
    config::AnalyticsConfig,
    report,
    scoring::{self, CustomerMetrics, ScoredCustomer},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn scored(id: &str, r: u8, f: u8, m: u8, monetary: f64) -> ScoredCustomer {
    ScoredCustomer {
        customer_unique_id: id.to_string(),
        last_purchase: NaiveDateTime::parse_from_str("2018-06-01 10:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
        frequency: i64::from(f),
        monetary,
        r_score: r,
        f_score: f,
        m_score: m,
        rfm_segment: format!("{r}{f}{m}"),
    }
}

fn metrics(id: &str, timestamp: &str, frequency: i64, monetary: f64) -> CustomerMetrics {
    CustomerMetrics {
        customer_unique_id: id.to_string(),
        last_purchase: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap(),
        frequency,
        monetary,
    }
}

fn share_value(share: &str) -> f64 {
    share
        .strip_suffix('%')
        .expect("share string missing % marker")
        .parse()
        .expect("share string is not a number")
}

// ── Champion filter ──────────────────────────────────────────────────────────

/// Champions are exactly r = 5, f >= 4, m = 5 under the shipped config.
#[test]
fn champion_predicate() {
    let config = AnalyticsConfig::default();
    let population = vec![
        scored("keep-555", 5, 5, 5, 900.0),
        scored("keep-545", 5, 4, 5, 700.0),
        scored("drop-535", 5, 3, 5, 800.0),
        scored("drop-455", 4, 5, 5, 950.0),
        scored("drop-554", 5, 5, 4, 960.0),
    ];

    let champions = report::champion_list(&population, &config.champion);
    let ids: Vec<&str> = champions.iter().map(|c| c.customer_unique_id.as_str()).collect();
    assert_eq!(ids, vec!["keep-555", "keep-545"]);
}

/// Champion rows come back richest first.
#[test]
fn champions_ordered_by_spend() {
    let config = AnalyticsConfig::default();
    let population = vec![
        scored("mid", 5, 4, 5, 500.0),
        scored("top", 5, 5, 5, 2_000.0),
        scored("low", 5, 4, 5, 120.0),
    ];

    let champions = report::champion_list(&population, &config.champion);
    let spends: Vec<f64> = champions.iter().map(|c| c.monetary).collect();
    assert_eq!(spends, vec![2_000.0, 500.0, 120.0]);
}

/// Champion rows carry the segment code consistent with their scores.
#[test]
fn champion_rows_carry_segment() {
    let config = AnalyticsConfig::default();
    let population = vec![scored("only", 5, 4, 5, 10.0)];

    let champions = report::champion_list(&population, &config.champion);
    assert_eq!(champions.len(), 1);
    assert_eq!(champions[0].rfm_segment, "545");
}

// ── Distribution validator ───────────────────────────────────────────────────

/// Bucket counts sum back to the whole scored population.
#[test]
fn distribution_counts_sum_to_population() {
    let config = AnalyticsConfig::default();
    let population: Vec<CustomerMetrics> = (0..37)
        .map(|i| {
            metrics(
                &format!("cust-{i:02}"),
                "2018-06-01 10:00:00",
                1 + i % 7,
                i as f64,
            )
        })
        .collect();
    let scored = scoring::score_population(&population, &config);

    let rows = report::frequency_distribution(&scored);
    let total: i64 = rows.iter().map(|r| r.customer_count).sum();
    assert_eq!(total, 37);
}

/// Percentages across buckets sum to 100.00, give or take independent
/// per-bucket rounding.
#[test]
fn distribution_shares_sum_to_hundred() {
    let config = AnalyticsConfig::default();
    let population: Vec<CustomerMetrics> = (0..23)
        .map(|i| {
            metrics(
                &format!("cust-{i:02}"),
                "2018-06-01 10:00:00",
                1 + i % 5,
                i as f64,
            )
        })
        .collect();
    let scored = scoring::score_population(&population, &config);

    let rows = report::frequency_distribution(&scored);
    let sum: f64 = rows.iter().map(|r| share_value(&r.share)).sum();
    assert!(
        (sum - 100.0).abs() <= 0.05,
        "shares sum to {sum}, expected 100.00 ± 0.05"
    );
}

/// The worked example: frequencies [1,1,1,1,1,2,3,5] report
/// f=1 → 5 rows (62.50%), then one row each for 2, 3, 5, highest first.
/// Bucket 4 is empty and therefore absent.
#[test]
fn distribution_worked_example() {
    let config = AnalyticsConfig::default();
    let frequencies = [1, 1, 1, 1, 1, 2, 3, 5];
    let population: Vec<CustomerMetrics> = frequencies
        .iter()
        .enumerate()
        .map(|(i, &f)| {
            metrics(&format!("cust-{i}"), "2018-06-01 10:00:00", f, 10.0 * i as f64)
        })
        .collect();
    let scored = scoring::score_population(&population, &config);

    let rows = report::frequency_distribution(&scored);
    let summary: Vec<(u8, i64, &str)> = rows
        .iter()
        .map(|r| (r.f_score, r.customer_count, r.share.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (5, 1, "12.50%"),
            (3, 1, "12.50%"),
            (2, 1, "12.50%"),
            (1, 5, "62.50%"),
        ]
    );
}

/// An empty population yields empty reports — no division by zero, no rows.
#[test]
fn empty_population_is_guarded() {
    let config = AnalyticsConfig::default();
    assert!(report::frequency_distribution(&[]).is_empty());
    assert!(report::champion_list(&[], &config.champion).is_empty());
}
