// Ledger Pipeline - Core Library
// Raw bank-statement rows → normalized, categorized, analyzable ledger,
// plus spending / cash-flow / dashboard / allocation summaries

pub mod model;
pub mod ingest;
pub mod normalizer;
pub mod classifier;
pub mod aggregator;
pub mod allocator;
pub mod forecast;

// Re-export commonly used types
pub use model::{
    CategorySummary, FinancialDataset, RawRow, Transaction, TransactionCategory,
};
pub use ingest::load_rows;
pub use normalizer::{Normalizer, ANOMALY_TAG, UNKNOWN_DESCRIPTION};
pub use classifier::{CategoryRule, Classifier, ClassifierRules, SubcategoryRule};
pub use aggregator::{
    cash_flow_by_date, dashboard_summary, spending_by_category, CashFlowReport,
    DailyFlow, DashboardSummary, FinancialSummary, SpendingReport,
};
pub use allocator::{
    FirstEligible, Instrument, InstrumentCatalog, InvestmentAllocator,
    InvestmentSuggestion, RiskTier, SelectionStrategy, TierAllocation,
    UniformSelection,
};
pub use forecast::{expense_series, savings_series, ForecastPoint, Forecaster, SeriesPoint};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the full Normalizer → Classifier pass over a raw row batch. Each
/// call builds a fresh dataset; nothing is shared between invocations.
pub fn process_rows(rows: Vec<RawRow>) -> FinancialDataset {
    let normalized = Normalizer::new().normalize(rows);
    Classifier::new().classify(normalized)
}
