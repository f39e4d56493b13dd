// 🧹 Normalizer - Batch cleaning before classification
// Missing-value fill, amount-outlier flagging, duplicate elimination,
// identifier assignment. Malformed individual rows never fail the stage.

use crate::model::RawRow;
use std::collections::HashSet;
use tracing::debug;

/// Placeholder description for rows that arrive without one
pub const UNKNOWN_DESCRIPTION: &str = "Unknown Transaction";

/// Tag appended to rows whose amount is an outlier for the batch
pub const ANOMALY_TAG: &str = "potential_anomaly";

// ============================================================================
// NORMALIZER
// ============================================================================

pub struct Normalizer {
    /// Standard deviations above the batch mean before a row is flagged
    pub anomaly_sigma: f64,
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer { anomaly_sigma: 3.0 }
    }

    /// Clean a raw row batch. Order matters: descriptions are filled and
    /// anomalies flagged over the full batch (duplicates included), then
    /// duplicates are dropped and ids backfilled.
    ///
    /// An empty batch yields an empty result - an explicit no-op, not an
    /// error.
    pub fn normalize(&self, rows: Vec<RawRow>) -> Vec<RawRow> {
        if rows.is_empty() {
            return Vec::new();
        }

        let input_count = rows.len();
        let mut rows = rows;

        // 1. Fill missing descriptions
        for row in &mut rows {
            let missing = match &row.description {
                Some(d) => d.trim().is_empty(),
                None => true,
            };
            if missing {
                row.description = Some(UNKNOWN_DESCRIPTION.to_string());
            }
        }

        // 2. Flag amount outliers
        self.flag_anomalies(&mut rows);

        // 3. Drop duplicates keyed on (date, amount, description),
        //    keeping the first occurrence in input order
        let mut seen = HashSet::new();
        let mut deduped = Vec::with_capacity(rows.len());
        for row in rows {
            let key = (
                row.date,
                row.amount.to_bits(),
                row.description.clone().unwrap_or_default(),
            );
            if seen.insert(key) {
                deduped.push(row);
            }
        }

        // 4. Backfill ids
        for row in &mut deduped {
            let missing = match &row.id {
                Some(id) => id.is_empty(),
                None => true,
            };
            if missing {
                row.id = Some(uuid::Uuid::new_v4().to_string());
            }
        }

        debug!(
            "normalized {} raw rows into {} unique rows",
            input_count,
            deduped.len()
        );

        deduped
    }

    /// Append ANOMALY_TAG to rows whose amount reaches mean + sigma * stddev
    /// over the whole batch. Single-row and zero-variance batches produce no
    /// flags. The tag is never duplicated.
    fn flag_anomalies(&self, rows: &mut [RawRow]) {
        if rows.len() < 2 {
            return;
        }

        let n = rows.len() as f64;
        let mean = rows.iter().map(|r| r.amount).sum::<f64>() / n;
        let variance = rows.iter().map(|r| (r.amount - mean).powi(2)).sum::<f64>() / n;
        if variance <= f64::EPSILON {
            return;
        }

        let threshold = mean + self.anomaly_sigma * variance.sqrt();
        for row in rows.iter_mut() {
            if row.amount >= threshold && !row.tags.iter().any(|t| t == ANOMALY_TAG) {
                row.tags.push(ANOMALY_TAG.to_string());
            }
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
