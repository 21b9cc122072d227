//! rfm-core — RFM customer segmentation over the Olist order store.
//!
//! One pipeline: aggregate delivered orders per real-world customer,
//! assign Recency/Frequency/Monetary scores, and report the champion
//! segment plus the frequency distribution. Stateless between runs —
//! every recompute starts from the raw record sets.

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod scoring;
pub mod store;
pub mod types;
