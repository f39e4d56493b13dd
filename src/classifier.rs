// 🏷️ Classifier - Rules as Data
// Ordered keyword tables assign category and subcategory to normalized
// rows. First-match-wins in table-declaration order; unmatched rows fall
// through to defaults. The stage never fails on well-formed input.

use crate::model::{
    CategorySummary, FinancialDataset, RawRow, Transaction, TransactionCategory,
};
use crate::normalizer::UNKNOWN_DESCRIPTION;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

// ============================================================================
// RULE TABLES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: TransactionCategory,

    /// Lower-case substrings matched against the lower-cased description
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryRule {
    pub subcategory: String,
    pub keywords: Vec<String>,
}

/// Immutable, explicitly ordered keyword configuration. Declaration order
/// is the tie-break: the first rule with a matching keyword wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRules {
    pub categories: Vec<CategoryRule>,

    /// Tested independently of the category table, across all categories
    pub subcategories: Vec<SubcategoryRule>,
}

impl ClassifierRules {
    /// Load rule tables from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rules file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse rules JSON")
    }
}

fn category_rule(category: TransactionCategory, keywords: &[&str]) -> CategoryRule {
    CategoryRule {
        category,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn subcategory_rule(subcategory: &str, keywords: &[&str]) -> SubcategoryRule {
    SubcategoryRule {
        subcategory: subcategory.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        ClassifierRules {
            categories: vec![
                category_rule(
                    TransactionCategory::Income,
                    &[
                        "salary",
                        "deposit",
                        "payroll",
                        "interest",
                        "dividend",
                        "refund",
                        "reimbursement",
                        "payment received",
                        "income",
                        "revenue",
                        "wage",
                        "bonus",
                        "commission",
                    ],
                ),
                category_rule(
                    TransactionCategory::Expense,
                    &[
                        "payment",
                        "purchase",
                        "bill",
                        "withdrawal",
                        "fee",
                        "charge",
                        "subscription",
                        "restaurant",
                        "food",
                        "grocery",
                        "transport",
                        "uber",
                        "taxi",
                        "shopping",
                    ],
                ),
                category_rule(
                    TransactionCategory::Savings,
                    &["saving", "transfer to savings", "reserve", "emergency fund"],
                ),
                category_rule(
                    TransactionCategory::Investment,
                    &[
                        "investment",
                        "stock",
                        "bond",
                        "etf",
                        "mutual fund",
                        "brokerage",
                        "401k",
                        "ira",
                        "roth",
                    ],
                ),
                category_rule(
                    TransactionCategory::Transfer,
                    &["transfer", "zelle", "venmo", "paypal", "wire", "ach"],
                ),
            ],
            subcategories: vec![
                subcategory_rule(
                    "Housing",
                    &["rent", "mortgage", "property tax", "hoa", "maintenance", "repair"],
                ),
                subcategory_rule(
                    "Utilities",
                    &["electricity", "water", "gas", "internet", "phone", "cable", "utility"],
                ),
                subcategory_rule(
                    "Food",
                    &["grocery", "restaurant", "meal", "doordash", "uber eats", "dining"],
                ),
                subcategory_rule(
                    "Transportation",
                    &[
                        "gas", "fuel", "uber", "lyft", "taxi", "public transport", "car",
                        "auto", "vehicle",
                    ],
                ),
                subcategory_rule(
                    "Healthcare",
                    &[
                        "medical",
                        "doctor",
                        "hospital",
                        "pharmacy",
                        "prescription",
                        "health",
                        "dental",
                        "vision",
                    ],
                ),
                subcategory_rule(
                    "Entertainment",
                    &[
                        "movie",
                        "theatre",
                        "concert",
                        "subscription",
                        "netflix",
                        "spotify",
                        "game",
                    ],
                ),
                subcategory_rule(
                    "Shopping",
                    &[
                        "amazon",
                        "walmart",
                        "target",
                        "store",
                        "mall",
                        "clothing",
                        "electronics",
                    ],
                ),
                subcategory_rule(
                    "Education",
                    &[
                        "tuition", "book", "course", "class", "school", "university",
                        "college", "student",
                    ],
                ),
                subcategory_rule("Personal", &["haircut", "salon", "spa", "gym", "fitness"]),
                subcategory_rule(
                    "Travel",
                    &["hotel", "flight", "airbnb", "vacation", "trip", "airline", "booking"],
                ),
                subcategory_rule(
                    "Insurance",
                    &["insurance", "premium", "coverage", "policy"],
                ),
                subcategory_rule(
                    "Debt",
                    &["loan", "credit card", "interest", "debt", "payment"],
                ),
                subcategory_rule(
                    "Salary",
                    &["salary", "payroll", "wage", "income", "earnings"],
                ),
                subcategory_rule(
                    "Investment",
                    &[
                        "dividend",
                        "capital gain",
                        "interest",
                        "stock",
                        "bond",
                        "etf",
                        "mutual fund",
                    ],
                ),
                subcategory_rule("Savings", &["savings", "deposit", "emergency fund"]),
                subcategory_rule("Gift", &["gift", "donation", "charity"]),
            ],
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct Classifier {
    rules: ClassifierRules,
}

impl Classifier {
    /// Classifier with the built-in rule tables
    pub fn new() -> Self {
        Classifier {
            rules: ClassifierRules::default(),
        }
    }

    /// Classifier with substituted rule tables (test fixtures, tenant
    /// overrides)
    pub fn with_rules(rules: ClassifierRules) -> Self {
        Classifier { rules }
    }

    /// Classify normalized rows into a FinancialDataset. Rows without a
    /// date are dropped here under the malformed-row policy: the canonical
    /// transaction requires one. The dataset summary is computed exactly
    /// once, at the end.
    pub fn classify(&self, rows: Vec<RawRow>) -> FinancialDataset {
        let mut transactions = Vec::with_capacity(rows.len());

        for row in rows {
            let date = match row.date {
                Some(d) => d,
                None => {
                    debug!("dropping undated row: {:?}", row.description);
                    continue;
                }
            };

            let description = row
                .description
                .unwrap_or_else(|| UNKNOWN_DESCRIPTION.to_string());
            let lowered = description.to_lowercase();

            // First category whose keyword list matches wins; otherwise keep
            // whatever the extractor supplied, defaulting to Other
            let mut category = row.category.unwrap_or_default();
            for rule in &self.rules.categories {
                if rule.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                    category = rule.category;
                    break;
                }
            }

            // Subcategory lookup is independent of the category table
            let subcategory = self
                .rules
                .subcategories
                .iter()
                .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k.as_str())))
                .map(|rule| rule.subcategory.clone())
                .unwrap_or_else(|| category.fallback_subcategory().to_string());

            transactions.push(Transaction {
                id: row
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                date,
                description,
                amount: row.amount,
                category,
                subcategory: Some(subcategory),
                tags: row.tags,
                metadata: row.metadata,
            });
        }

        let summary = summarize(&transactions);

        debug!(
            "classified {} transactions (income={:.2}, expenses={:.2})",
            transactions.len(),
            summary.total_income,
            summary.total_expenses
        );

        FinancialDataset {
            file_id: uuid::Uuid::new_v4().to_string(),
            transactions,
            summary,
            metadata: HashMap::new(),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Magnitude sums per category, computed once at classification time
fn summarize(transactions: &[Transaction]) -> CategorySummary {
    let mut summary = CategorySummary::default();
    for tx in transactions {
        let magnitude = tx.magnitude();
        match tx.category {
            TransactionCategory::Income => summary.total_income += magnitude,
            TransactionCategory::Expense => summary.total_expenses += magnitude,
            TransactionCategory::Savings => summary.total_savings += magnitude,
            TransactionCategory::Investment => summary.total_investments += magnitude,
            TransactionCategory::Transfer | TransactionCategory::Other => {}
        }
    }
    summary
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(date: &str, description: &str, amount: f64) -> RawRow {
        RawRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            description: Some(description.to_string()),
            amount,
            ..RawRow::default()
        }
    }

    #[test]
    fn test_income_classification() {
        let classifier = Classifier::new();
        let dataset = classifier.classify(vec![row("2024-01-01", "Salary Deposit", 5000.0)]);

        assert_eq!(dataset.transactions.len(), 1);
        assert_eq!(dataset.transactions[0].category, TransactionCategory::Income);
        assert_eq!(
            dataset.transactions[0].subcategory.as_deref(),
            Some("Salary")
        );
    }

    #[test]
    fn test_expense_classification_with_housing_subcategory() {
        let classifier = Classifier::new();
        let dataset = classifier.classify(vec![row("2024-01-02", "Rent Payment", -1500.0)]);

        assert_eq!(dataset.transactions[0].category, TransactionCategory::Expense);
        assert_eq!(
            dataset.transactions[0].subcategory.as_deref(),
            Some("Housing")
        );
    }

    #[test]
    fn test_first_match_wins_across_categories() {
        // "salary" (income) and "transfer" (transfer) both match; income is
        // declared earlier, so income wins
        let classifier = Classifier::new();
        let dataset =
            classifier.classify(vec![row("2024-01-01", "Salary Transfer", 3000.0)]);

        assert_eq!(dataset.transactions[0].category, TransactionCategory::Income);
    }

    #[test]
    fn test_subcategory_lookup_is_independent_of_category() {
        // "Interest Payment on Loan" classifies as income ("interest") but
        // its subcategory comes from the full table: Debt ("loan") is
        // declared before Salary
        let classifier = Classifier::new();
        let dataset =
            classifier.classify(vec![row("2024-01-05", "Loan Interest", 12.0)]);

        assert_eq!(dataset.transactions[0].category, TransactionCategory::Income);
        assert_eq!(dataset.transactions[0].subcategory.as_deref(), Some("Debt"));
    }

    #[test]
    fn test_unmatched_row_keeps_upstream_category() {
        let classifier = Classifier::new();

        let mut upstream = row("2024-01-03", "xyzzy", -10.0);
        upstream.category = Some(TransactionCategory::Expense);

        let dataset = classifier.classify(vec![upstream, row("2024-01-04", "qwerty", -5.0)]);

        assert_eq!(dataset.transactions[0].category, TransactionCategory::Expense);
        assert_eq!(
            dataset.transactions[0].subcategory.as_deref(),
            Some("Other Expense")
        );
        assert_eq!(dataset.transactions[1].category, TransactionCategory::Other);
        assert_eq!(
            dataset.transactions[1].subcategory.as_deref(),
            Some("Uncategorized")
        );
    }

    #[test]
    fn test_fallback_subcategory_per_category() {
        let classifier = Classifier::new();

        // "reserve" matches savings but no subcategory keyword
        let dataset = classifier.classify(vec![row("2024-01-06", "Monthly Reserve", -200.0)]);

        assert_eq!(dataset.transactions[0].category, TransactionCategory::Savings);
        assert_eq!(
            dataset.transactions[0].subcategory.as_deref(),
            Some("General Savings")
        );
    }

    #[test]
    fn test_undated_rows_are_dropped() {
        let classifier = Classifier::new();

        let undated = RawRow {
            description: Some("Salary Deposit".to_string()),
            amount: 5000.0,
            ..RawRow::default()
        };

        let dataset =
            classifier.classify(vec![undated, row("2024-01-02", "Rent Payment", -1500.0)]);
        assert_eq!(dataset.transactions.len(), 1);
    }

    #[test]
    fn test_summary_uses_magnitudes() {
        let classifier = Classifier::new();
        let dataset = classifier.classify(vec![
            row("2024-01-01", "Salary Deposit", 5000.0),
            row("2024-01-02", "Rent Payment", -1500.0),
            row("2024-01-03", "Transfer to Savings", -400.0),
            row("2024-01-04", "Brokerage ETF Buy", -300.0),
        ]);

        assert_eq!(dataset.summary.total_income, 5000.0);
        assert_eq!(dataset.summary.total_expenses, 1500.0);
        assert_eq!(dataset.summary.total_savings, 400.0);
        assert_eq!(dataset.summary.total_investments, 300.0);
    }

    #[test]
    fn test_substituted_rules_fixture() {
        // Tables are plain data, so tests can swap in fixtures
        let rules = ClassifierRules {
            categories: vec![category_rule(TransactionCategory::Expense, &["coffee"])],
            subcategories: vec![subcategory_rule("Caffeine", &["coffee"])],
        };
        let classifier = Classifier::with_rules(rules);

        let dataset = classifier.classify(vec![row("2024-01-01", "Coffee Shop", -4.5)]);
        assert_eq!(dataset.transactions[0].category, TransactionCategory::Expense);
        assert_eq!(
            dataset.transactions[0].subcategory.as_deref(),
            Some("Caffeine")
        );
    }

    #[test]
    fn test_empty_input_yields_zero_summary() {
        let classifier = Classifier::new();
        let dataset = classifier.classify(Vec::new());

        assert!(dataset.is_empty());
        assert_eq!(dataset.summary, CategorySummary::default());
    }
}
