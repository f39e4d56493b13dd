// 📒 Canonical Data Model - Transactions and datasets
// Signed amounts: positive = inflow, negative = outflow. Category is
// assigned independently of sign; all reported totals are magnitudes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// TRANSACTION CATEGORY
// ============================================================================

/// Top-level classification. Closed enum so category handling is
/// exhaustiveness-checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    Income,
    Expense,
    Savings,
    Investment,
    Transfer,
    Other,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Income => "income",
            TransactionCategory::Expense => "expense",
            TransactionCategory::Savings => "savings",
            TransactionCategory::Investment => "investment",
            TransactionCategory::Transfer => "transfer",
            TransactionCategory::Other => "other",
        }
    }

    /// Subcategory assigned when no keyword rule matched.
    pub fn fallback_subcategory(&self) -> &'static str {
        match self {
            TransactionCategory::Income => "Other Income",
            TransactionCategory::Expense => "Other Expense",
            TransactionCategory::Savings => "General Savings",
            TransactionCategory::Investment => "General Investment",
            TransactionCategory::Transfer | TransactionCategory::Other => "Uncategorized",
        }
    }
}

impl Default for TransactionCategory {
    fn default() -> Self {
        TransactionCategory::Other
    }
}

// ============================================================================
// RAW ROW (upstream contract)
// ============================================================================

/// One row as delivered by the extraction collaborator. Only `amount` is
/// guaranteed; everything else is best-effort and filled in downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub amount: f64,

    /// Category supplied by the extractor, if any. Keyword rules override it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TransactionCategory>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

// ============================================================================
// TRANSACTION (canonical, post-pipeline)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identity (UUID string) - assigned during normalization if absent
    pub id: String,

    pub date: NaiveDate,

    /// Never empty; "Unknown Transaction" sentinel when missing upstream
    pub description: String,

    /// Signed amount in account currency (positive = inflow)
    pub amount: f64,

    pub category: TransactionCategory,

    /// Always Some(..) after classification (fallback per category)
    pub subcategory: Option<String>,

    /// May include "potential_anomaly"; tags are add-only and never duplicated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Extensible metadata - preserved, unused by the core
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Transaction {
    /// Magnitude of the amount, used by every reported total.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

// ============================================================================
// CATEGORY SUMMARY
// ============================================================================

/// Per-category magnitude totals, cached on the dataset at classification
/// time. Consumers needing fresh numbers recompute via the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub total_investments: f64,
}

// ============================================================================
// FINANCIAL DATASET
// ============================================================================

/// The classified ledger for one ingested file. Immutable to outside
/// collaborators after classification; re-analysis builds a fresh dataset
/// via a new Normalizer → Classifier pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialDataset {
    /// Identity of the ingested file (UUID string)
    pub file_id: String,

    /// Transactions in arrival order
    pub transactions: Vec<Transaction>,

    /// Cached at classification time, never implicitly refreshed
    pub summary: CategorySummary,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl FinancialDataset {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transaction() -> Transaction {
        Transaction {
            id: "tx-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "Salary Deposit".to_string(),
            amount: 5000.0,
            category: TransactionCategory::Income,
            subcategory: Some("Salary".to_string()),
            tags: vec!["recurring".to_string()],
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionCategory::Income).unwrap();
        assert_eq!(json, "\"income\"");

        let parsed: TransactionCategory = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(parsed, TransactionCategory::Expense);
    }

    #[test]
    fn test_fallback_subcategories() {
        assert_eq!(
            TransactionCategory::Income.fallback_subcategory(),
            "Other Income"
        );
        assert_eq!(
            TransactionCategory::Expense.fallback_subcategory(),
            "Other Expense"
        );
        assert_eq!(
            TransactionCategory::Savings.fallback_subcategory(),
            "General Savings"
        );
        assert_eq!(
            TransactionCategory::Investment.fallback_subcategory(),
            "General Investment"
        );
        assert_eq!(
            TransactionCategory::Transfer.fallback_subcategory(),
            "Uncategorized"
        );
        assert_eq!(
            TransactionCategory::Other.fallback_subcategory(),
            "Uncategorized"
        );
    }

    #[test]
    fn test_dataset_json_round_trip_is_lossless() {
        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), serde_json::json!("statement.csv"));

        let dataset = FinancialDataset {
            file_id: "file-1".to_string(),
            transactions: vec![sample_transaction()],
            summary: CategorySummary {
                total_income: 5000.0,
                total_expenses: 0.0,
                total_savings: 0.0,
                total_investments: 0.0,
            },
            metadata,
        };

        let json = serde_json::to_string(&dataset).unwrap();
        let restored: FinancialDataset = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.file_id, dataset.file_id);
        assert_eq!(restored.transactions.len(), 1);
        assert_eq!(restored.transactions[0].id, "tx-1");
        assert_eq!(restored.transactions[0].amount, 5000.0);
        assert_eq!(restored.transactions[0].category, TransactionCategory::Income);
        assert_eq!(
            restored.transactions[0].subcategory,
            Some("Salary".to_string())
        );
        assert_eq!(restored.transactions[0].tags, vec!["recurring".to_string()]);
        assert_eq!(restored.summary, dataset.summary);
        assert_eq!(
            restored.metadata.get("source"),
            Some(&serde_json::json!("statement.csv"))
        );
    }

    #[test]
    fn test_raw_row_defaults() {
        let row: RawRow = serde_json::from_str("{\"amount\": 42.5}").unwrap();
        assert_eq!(row.amount, 42.5);
        assert!(row.id.is_none());
        assert!(row.date.is_none());
        assert!(row.description.is_none());
        assert!(row.category.is_none());
        assert!(row.tags.is_empty());
        assert!(row.metadata.is_empty());
    }
}
