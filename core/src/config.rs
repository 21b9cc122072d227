//! Scoring configuration — the business rules that are data, not code.
//!
//! The absolute frequency tiers and the champion thresholds live in
//! `data/scoring/rfm_scoring.json`. The `Default` impl carries the same
//! shipped values so the library works without a data directory.

use crate::types::Score;
use serde::{Deserialize, Serialize};

/// One absolute frequency tier: customers with at least `min_orders`
/// delivered orders receive `score` (first matching tier wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyTier {
    pub min_orders: i64,
    pub score: Score,
}

/// Thresholds selecting the highest-value segment for action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionConfig {
    pub min_recency_score: Score,
    pub min_frequency_score: Score,
    pub min_monetary_score: Score,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Evaluated top-down; must end with a `min_orders: 1` catch-all so the
    /// mapping is total over frequency >= 1.
    pub frequency_tiers: Vec<FrequencyTier>,
    pub champion: ChampionConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            frequency_tiers: vec![
                FrequencyTier { min_orders: 5, score: 5 },
                FrequencyTier { min_orders: 4, score: 4 },
                FrequencyTier { min_orders: 3, score: 3 },
                FrequencyTier { min_orders: 2, score: 2 },
                FrequencyTier { min_orders: 1, score: 1 },
            ],
            champion: ChampionConfig {
                min_recency_score: 5,
                min_frequency_score: 4,
                min_monetary_score: 5,
            },
        }
    }
}

impl AnalyticsConfig {
    /// Load from the data/ directory.
    /// In tests, use AnalyticsConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/scoring/rfm_scoring.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AnalyticsConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that could emit scores outside 1..=5 or leave a
    /// frequency unmapped.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.frequency_tiers.is_empty() {
            anyhow::bail!("frequency_tiers must not be empty");
        }
        for tier in &self.frequency_tiers {
            if !(1..=5).contains(&tier.score) {
                anyhow::bail!("frequency tier score {} outside 1..=5", tier.score);
            }
            if tier.min_orders < 1 {
                anyhow::bail!("frequency tier min_orders {} below 1", tier.min_orders);
            }
        }
        if !self.frequency_tiers.iter().any(|t| t.min_orders == 1) {
            anyhow::bail!("frequency_tiers must include a min_orders = 1 catch-all");
        }
        for score in [
            self.champion.min_recency_score,
            self.champion.min_frequency_score,
            self.champion.min_monetary_score,
        ] {
            if !(1..=5).contains(&score) {
                anyhow::bail!("champion threshold {score} outside 1..=5");
            }
        }
        Ok(())
    }
}
