//! Shared primitive types used across the whole pipeline.

/// A customer account identifier (`customer_id` column).
/// One real-world customer may own several accounts.
pub type CustomerId = String;

/// The cross-account identifier of a real-world customer
/// (`customer_unique_id` column). All aggregation keys on this.
pub type UniqueCustomerId = String;

/// An order identifier.
pub type OrderId = String;

/// A single RFM sub-score. Always in 1..=5.
pub type Score = u8;
