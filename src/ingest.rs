// 📂 Ingest - CSV hand-off from the extraction collaborator
// Loads raw statement rows for the pipeline. Individual malformed rows
// (unparsable amount or date) are skipped, never fatal; structural
// problems (unreadable file, missing amount column) are errors.

use crate::model::{RawRow, TransactionCategory};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    date: Option<String>,

    #[serde(default)]
    description: Option<String>,

    amount: f64,

    #[serde(default)]
    category: Option<TransactionCategory>,
}

/// Load raw rows from a headered CSV file (`date`, `description`, `amount`,
/// optional `id` and `category`)
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>> {
    let mut rdr = csv::Reader::from_path(path.as_ref())
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;

    read_rows(&mut rdr)
}

fn read_rows<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<RawRow>> {
    let headers = rdr.headers().context("Failed to read CSV header")?;
    if !headers.iter().any(|h| h.eq_ignore_ascii_case("amount")) {
        bail!("CSV is missing required 'amount' column");
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize::<CsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                debug!("skipping malformed row: {}", err);
                continue;
            }
        };

        let date = match record.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    debug!("skipping row with unparsable date: {}", raw);
                    continue;
                }
            },
            None => None,
        };

        rows.push(RawRow {
            id: record.id.filter(|id| !id.is_empty()),
            date,
            description: record.description.filter(|d| !d.is_empty()),
            amount: record.amount,
            category: record.category,
            tags: Vec::new(),
            metadata: HashMap::new(),
        });
    }

    Ok(rows)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_from_str(data: &str) -> Result<Vec<RawRow>> {
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        read_rows(&mut rdr)
    }

    #[test]
    fn test_loads_well_formed_rows() {
        let rows = rows_from_str(
            "date,description,amount\n\
             2024-01-01,Salary Deposit,5000\n\
             2024-01-02,Rent Payment,-1500\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(rows[0].description.as_deref(), Some("Salary Deposit"));
        assert_eq!(rows[0].amount, 5000.0);
        assert_eq!(rows[1].amount, -1500.0);
    }

    #[test]
    fn test_unparsable_amount_skips_row_only() {
        let rows = rows_from_str(
            "date,description,amount\n\
             2024-01-01,Salary Deposit,5000\n\
             2024-01-02,Broken Row,not-a-number\n\
             2024-01-03,Groceries,-250\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].description.as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_unparsable_date_skips_row_only() {
        let rows = rows_from_str(
            "date,description,amount\n\
             01/02/2024,Wrong Format,-100\n\
             2024-01-03,Groceries,-250\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description.as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_empty_optional_fields_become_none() {
        let rows = rows_from_str(
            "id,date,description,amount\n\
             ,,,42.5\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].id.is_none());
        assert!(rows[0].date.is_none());
        assert!(rows[0].description.is_none());
        assert_eq!(rows[0].amount, 42.5);
    }

    #[test]
    fn test_category_column_is_honored() {
        let rows = rows_from_str(
            "date,description,amount,category\n\
             2024-01-01,Mystery Inflow,100,income\n",
        )
        .unwrap();

        assert_eq!(rows[0].category, Some(TransactionCategory::Income));
    }

    #[test]
    fn test_missing_amount_column_is_structural_error() {
        let result = rows_from_str("date,description\n2024-01-01,No Amounts\n");
        assert!(result.is_err());
    }
}
