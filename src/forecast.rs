// 🔮 Forecast Adapter - Boundary to the external forecasting collaborator
// The core only owns the fit/predict contract: a time-indexed series goes
// in, a bounded forecast comes out. No forecasting algorithm lives here.

use crate::model::{FinancialDataset, TransactionCategory};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One observed (date, value) point handed to the forecaster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One forecast point returned by the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// The external forecasting contract. Implementations may fail (model did
/// not converge, series too short); the core never inspects internals.
pub trait Forecaster {
    fn forecast(&self, series: &[SeriesPoint], horizon_days: u32) -> Result<Vec<ForecastPoint>>;
}

/// Per-date expense magnitudes in ascending date order - the series fed to
/// an expense forecaster
pub fn expense_series(dataset: &FinancialDataset) -> Vec<SeriesPoint> {
    category_series(dataset, TransactionCategory::Expense)
}

/// Per-date savings magnitudes in ascending date order
pub fn savings_series(dataset: &FinancialDataset) -> Vec<SeriesPoint> {
    category_series(dataset, TransactionCategory::Savings)
}

fn category_series(dataset: &FinancialDataset, category: TransactionCategory) -> Vec<SeriesPoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in &dataset.transactions {
        if tx.category == category {
            *by_date.entry(tx.date).or_insert(0.0) += tx.magnitude();
        }
    }

    by_date
        .into_iter()
        .map(|(date, value)| SeriesPoint { date, value })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
