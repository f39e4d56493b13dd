// 📊 Aggregator - Read-only views over a FinancialDataset
// Three independent derivations: spending by subcategory, dated cash flow
// with running cumulative balance, and the dashboard summary with
// rule-based recommendations. Empty datasets yield zero-valued reports.

use crate::model::{FinancialDataset, TransactionCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Breakdown label for expense transactions without a subcategory
pub const DEFAULT_SUBCATEGORY: &str = "Other";

/// Subcategories exempt from the expense-concentration check
const CONCENTRATION_EXEMPT: [&str; 2] = ["Housing", "Mortgage"];

const SAVINGS_RATE_ADVICE: &str =
    "Consider increasing your savings rate to at least 20% of income.";

const INVESTMENT_ADVICE: &str =
    "Consider allocating at least 15% of your income to investments for long-term growth.";

// ============================================================================
// REPORT TYPES
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpendingReport {
    /// Magnitude sums over expense transactions, keyed by subcategory
    pub by_subcategory: BTreeMap<String, f64>,

    /// Exactly the sum of `by_subcategory` values
    pub total_spending: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyFlow {
    pub income: f64,
    pub expense: f64,
    pub net: f64,

    /// Running sum of nets in ascending date order, starting at zero
    pub cumulative: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// BTreeMap so iteration is strictly date-ascending - the cumulative
    /// column is only well-defined under that ordering
    pub by_date: BTreeMap<NaiveDate, DailyFlow>,

    pub total_income: f64,
    pub total_expense: f64,
    pub net_cashflow: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub total_investments: f64,
    pub net_cashflow: f64,

    /// total_savings / total_income, 0.0 when there is no income
    pub savings_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub summary: FinancialSummary,

    /// Expense subcategories sorted by amount descending (name ascending
    /// on ties)
    pub expense_breakdown: Vec<(String, f64)>,

    /// Order-stable: savings-rate check, then concentration checks in
    /// breakdown order, then the investment check
    pub recommendations: Vec<String>,
}

// ============================================================================
// SPENDING BY CATEGORY
// ============================================================================

pub fn spending_by_category(dataset: &FinancialDataset) -> SpendingReport {
    let mut by_subcategory: BTreeMap<String, f64> = BTreeMap::new();

    for tx in &dataset.transactions {
        if tx.category != TransactionCategory::Expense {
            continue;
        }
        let label = tx
            .subcategory
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBCATEGORY.to_string());
        *by_subcategory.entry(label).or_insert(0.0) += tx.magnitude();
    }

    // Total is derived from the map so the two always agree exactly
    let total_spending = by_subcategory.values().sum();

    SpendingReport {
        by_subcategory,
        total_spending,
    }
}

// ============================================================================
// CASH FLOW BY DATE
// ============================================================================

pub fn cash_flow_by_date(dataset: &FinancialDataset) -> CashFlowReport {
    let mut by_date: BTreeMap<NaiveDate, DailyFlow> = BTreeMap::new();

    for tx in &dataset.transactions {
        let flow = by_date.entry(tx.date).or_default();
        match tx.category {
            TransactionCategory::Income => flow.income += tx.magnitude(),
            TransactionCategory::Expense => flow.expense += tx.magnitude(),
            _ => {}
        }
    }

    let mut cumulative = 0.0;
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    for flow in by_date.values_mut() {
        flow.net = flow.income - flow.expense;
        cumulative += flow.net;
        flow.cumulative = cumulative;
        total_income += flow.income;
        total_expense += flow.expense;
    }

    CashFlowReport {
        by_date,
        total_income,
        total_expense,
        net_cashflow: total_income - total_expense,
    }
}

// ============================================================================
// DASHBOARD SUMMARY
// ============================================================================

pub fn dashboard_summary(dataset: &FinancialDataset) -> DashboardSummary {
    let mut summary = FinancialSummary::default();
    let mut breakdown_map: BTreeMap<String, f64> = BTreeMap::new();

    for tx in &dataset.transactions {
        let magnitude = tx.magnitude();
        match tx.category {
            TransactionCategory::Income => summary.total_income += magnitude,
            TransactionCategory::Expense => {
                summary.total_expenses += magnitude;
                let label = tx
                    .subcategory
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUBCATEGORY.to_string());
                *breakdown_map.entry(label).or_insert(0.0) += magnitude;
            }
            TransactionCategory::Savings => summary.total_savings += magnitude,
            TransactionCategory::Investment => summary.total_investments += magnitude,
            TransactionCategory::Transfer | TransactionCategory::Other => {}
        }
    }

    summary.net_cashflow = summary.total_income - summary.total_expenses;
    summary.savings_rate = if summary.total_income > 0.0 {
        summary.total_savings / summary.total_income
    } else {
        0.0
    };

    let mut expense_breakdown: Vec<(String, f64)> = breakdown_map.into_iter().collect();
    expense_breakdown
        .sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let recommendations = recommendations(&summary, &expense_breakdown);

    DashboardSummary {
        summary,
        expense_breakdown,
        recommendations,
    }
}

/// Each rule triggers independently; emission order is fixed.
fn recommendations(summary: &FinancialSummary, breakdown: &[(String, f64)]) -> Vec<String> {
    let mut out = Vec::new();

    if summary.savings_rate < 0.20 {
        out.push(SAVINGS_RATE_ADVICE.to_string());
    }

    // Concentration checks are skipped entirely on a zero-expense dataset
    if summary.total_expenses > 0.0 {
        for (name, amount) in breakdown {
            let share = amount / summary.total_expenses;
            if share > 0.30 && !CONCENTRATION_EXEMPT.contains(&name.as_str()) {
                out.push(format!(
                    "Your spending on {} is relatively high at {:.1}% of expenses. \
                     Consider evaluating this area for potential savings.",
                    name,
                    share * 100.0
                ));
            }
        }
    }

    if summary.total_investments < summary.total_income * 0.15 {
        out.push(INVESTMENT_ADVICE.to_string());
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
