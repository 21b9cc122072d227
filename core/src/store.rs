//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Scoring and reporting consume typed rows from store methods — they
//! never execute SQL directly.

use crate::{
    error::{RfmError, RfmResult},
    scoring::{CustomerMetrics, ScoredCustomer},
    types::Score,
};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

/// Timestamp layout used by the order dataset. Lexicographic order of this
/// layout equals chronological order, which MAX() in SQL relies on.
const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct RfmStore {
    conn: Connection,
}

impl RfmStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> RfmResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RfmResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RfmResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_rfm_scores.sql"))?;
        Ok(())
    }

    // ── Record sets ────────────────────────────────────────────

    pub fn insert_customer(&self, customer_id: &str, customer_unique_id: &str) -> RfmResult<()> {
        self.conn.execute(
            "INSERT INTO customers (customer_id, customer_unique_id) VALUES (?1, ?2)",
            params![customer_id, customer_unique_id],
        )?;
        Ok(())
    }

    pub fn insert_order(
        &self,
        order_id: &str,
        customer_id: &str,
        order_status: &str,
        purchase_timestamp: &str,
    ) -> RfmResult<()> {
        self.conn.execute(
            "INSERT INTO orders (order_id, customer_id, order_status, order_purchase_timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![order_id, customer_id, order_status, purchase_timestamp],
        )?;
        Ok(())
    }

    pub fn insert_payment(
        &self,
        order_id: &str,
        payment_sequential: i64,
        payment_value: f64,
    ) -> RfmResult<()> {
        self.conn.execute(
            "INSERT INTO order_payments (order_id, payment_sequential, payment_value)
             VALUES (?1, ?2, ?3)",
            params![order_id, payment_sequential, payment_value],
        )?;
        Ok(())
    }

    // ── Aggregation ────────────────────────────────────────────

    /// One CustomerMetrics row per real-world customer with at least one
    /// delivered order.
    ///
    /// Inner joins throughout: a customer with no delivered order, and a
    /// payment line with no matching order, never appear downstream. An
    /// order with N payment lines contributes all N values to monetary —
    /// total amount paid, not amount owed.
    ///
    /// Ordered by customer_unique_id so downstream tie-breaks are the same
    /// on every run against the same data.
    pub fn customer_metrics(&self) -> RfmResult<Vec<CustomerMetrics>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.customer_unique_id,
                    MAX(o.order_purchase_timestamp) AS last_purchase,
                    COUNT(DISTINCT o.order_id)      AS frequency,
                    SUM(p.payment_value)            AS monetary
             FROM customers c
             JOIN orders o         ON o.customer_id = c.customer_id
             JOIN order_payments p ON p.order_id    = o.order_id
             WHERE o.order_status = 'delivered'
             GROUP BY c.customer_unique_id
             ORDER BY c.customer_unique_id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(customer_unique_id, timestamp, frequency, monetary)| {
                Ok(CustomerMetrics {
                    customer_unique_id,
                    last_purchase: parse_purchase_ts(&timestamp)?,
                    frequency,
                    monetary,
                })
            })
            .collect()
    }

    // ── Materialized scores ────────────────────────────────────

    /// Clear and rewrite the rfm_score cache table. The table carries no
    /// state of its own; every recompute rebuilds it from scratch.
    pub fn replace_scores(&self, scored: &[ScoredCustomer]) -> RfmResult<()> {
        self.conn.execute("DELETE FROM rfm_score", [])?;
        let mut stmt = self.conn.prepare(
            "INSERT INTO rfm_score (
                customer_unique_id, last_purchase, frequency, monetary,
                r_score, f_score, m_score, rfm_segment
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for customer in scored {
            stmt.execute(params![
                customer.customer_unique_id,
                customer.last_purchase.format(TS_FORMAT).to_string(),
                customer.frequency,
                customer.monetary,
                customer.r_score as i64,
                customer.f_score as i64,
                customer.m_score as i64,
                customer.rfm_segment,
            ])?;
        }
        Ok(())
    }

    /// Read back the materialized scores, in customer_unique_id order.
    pub fn scored_customers(&self) -> RfmResult<Vec<ScoredCustomer>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_unique_id, last_purchase, frequency, monetary,
                    r_score, f_score, m_score, rfm_segment
             FROM rfm_score
             ORDER BY customer_unique_id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(customer_unique_id, timestamp, frequency, monetary, r, f, m, rfm_segment)| {
                    Ok(ScoredCustomer {
                        customer_unique_id,
                        last_purchase: parse_purchase_ts(&timestamp)?,
                        frequency,
                        monetary,
                        r_score: r as Score,
                        f_score: f as Score,
                        m_score: m as Score,
                        rfm_segment,
                    })
                },
            )
            .collect()
    }

    pub fn score_count(&self) -> RfmResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM rfm_score", [], |row| row.get(0))
            .map_err(Into::into)
    }

    // ── Test / summary helpers ─────────────────────────────────

    pub fn customer_account_count(&self) -> RfmResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn order_count(&self) -> RfmResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn delivered_order_count(&self) -> RfmResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM orders WHERE order_status = 'delivered'",
                [],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

fn parse_purchase_ts(value: &str) -> Result<NaiveDateTime, RfmError> {
    NaiveDateTime::parse_from_str(value, TS_FORMAT).map_err(|_| RfmError::InvalidTimestamp {
        value: value.to_string(),
    })
}
