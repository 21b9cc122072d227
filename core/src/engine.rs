//! Pipeline orchestration — one read → aggregate → score → report run.
//!
//! RULES:
//!   - The engine owns the store and the loaded config.
//!   - recompute() is one full pipeline pass. The scored population is
//!     cached in memory for the rest of the run and materialized into the
//!     rfm_score table; both are throwaway, and recomputing from source
//!     always yields identical results.
//!   - The report views read the cache, never the database.

use crate::{
    config::AnalyticsConfig,
    error::RfmResult,
    report::{self, ChampionRow, DistributionRow},
    scoring::{self, ScoredCustomer},
    store::RfmStore,
};

pub struct RfmEngine {
    pub store: RfmStore,
    config: AnalyticsConfig,
    scored: Option<Vec<ScoredCustomer>>,
}

impl RfmEngine {
    pub fn new(config: AnalyticsConfig, store: RfmStore) -> Self {
        Self {
            store,
            config,
            scored: None,
        }
    }

    /// In-memory store with migrations applied and the default config.
    /// Used by tests.
    pub fn build_test() -> RfmResult<Self> {
        let store = RfmStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(AnalyticsConfig::default(), store))
    }

    /// Run the full pipeline once: aggregate, score, materialize, cache.
    /// Returns the scored population size.
    pub fn recompute(&mut self) -> RfmResult<usize> {
        let metrics = self.store.customer_metrics()?;
        let scored = scoring::score_population(&metrics, &self.config);
        self.store.replace_scores(&scored)?;
        log::info!(
            "scored {} customers from {} delivered orders",
            scored.len(),
            self.store.delivered_order_count()?
        );
        let population = scored.len();
        self.scored = Some(scored);
        Ok(population)
    }

    /// The scored population, recomputing on first access.
    pub fn scored_customers(&mut self) -> RfmResult<&[ScoredCustomer]> {
        if self.scored.is_none() {
            self.recompute()?;
        }
        Ok(self.scored.as_deref().unwrap_or(&[]))
    }

    /// Champion reporting view: top-value customers, richest first.
    pub fn champions(&mut self) -> RfmResult<Vec<ChampionRow>> {
        let champion_config = self.config.champion.clone();
        let scored = self.scored_customers()?;
        Ok(report::champion_list(scored, &champion_config))
    }

    /// Distribution reporting view: per-f_score population share.
    pub fn frequency_distribution(&mut self) -> RfmResult<Vec<DistributionRow>> {
        let scored = self.scored_customers()?;
        Ok(report::frequency_distribution(scored))
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }
}
