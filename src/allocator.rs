// 💼 Investment Allocator - Risk-tiered allocation over a static catalog
// Splits an investable amount across low/medium/high risk tiers from a
// risk-tolerance scalar, then picks one affordable instrument per tier.
// Instrument selection is the only non-deterministic step and sits behind
// a strategy trait so tests can inject a fixed choice.

use anyhow::{Context as AnyhowContext, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// RISK TIERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Suggestion emission order
    pub const ORDERED: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

// ============================================================================
// TIER ALLOCATION
// ============================================================================

/// Percentage split across the three risk tiers. Always sums to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAllocation {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
}

impl TierAllocation {
    /// Derive the split from a risk tolerance in [0, 1] (values outside the
    /// range are clamped). Raw weights get a floor of 10, are scaled to 100
    /// with integer division, and the rounding remainder lands on the tier
    /// matching the risk band (<0.33 low, <0.66 medium, else high).
    pub fn from_risk_tolerance(risk_tolerance: f64) -> Self {
        let r = risk_tolerance.clamp(0.0, 1.0);

        let low = ((100.0 * (1.0 - r) * 0.7) as u32).max(10);
        let medium = ((100.0 * (1.0 - (r - 0.5).abs() * 1.5)) as u32).max(10);
        let high = ((100.0 * r * 0.7) as u32).max(10);

        let total = low + medium + high;
        let mut low = low * 100 / total;
        let mut medium = medium * 100 / total;
        let mut high = high * 100 / total;

        let remainder = 100 - (low + medium + high);
        if r < 0.33 {
            low += remainder;
        } else if r < 0.66 {
            medium += remainder;
        } else {
            high += remainder;
        }

        TierAllocation { low, medium, high }
    }

    pub fn for_tier(&self, tier: RiskTier) -> u32 {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::Medium => self.medium,
            RiskTier::High => self.high,
        }
    }

    pub fn total(&self) -> u32 {
        self.low + self.medium + self.high
    }
}

// ============================================================================
// INSTRUMENT CATALOG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    #[serde(rename = "type")]
    pub instrument_type: String,

    pub name: String,

    /// Expected annual return as a fraction (0.07 = 7%)
    pub expected_return: f64,

    pub risk_level: String,

    pub description: String,

    pub min_investment: f64,
}

fn instrument(
    instrument_type: &str,
    name: &str,
    expected_return: f64,
    risk_level: &str,
    description: &str,
    min_investment: f64,
) -> Instrument {
    Instrument {
        instrument_type: instrument_type.to_string(),
        name: name.to_string(),
        expected_return,
        risk_level: risk_level.to_string(),
        description: description.to_string(),
        min_investment,
    }
}

/// Static catalog, three instruments per tier. Loadable from JSON so
/// deployments can swap the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentCatalog {
    pub low_risk: Vec<Instrument>,
    pub medium_risk: Vec<Instrument>,
    pub high_risk: Vec<Instrument>,
}

impl InstrumentCatalog {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read catalog file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse catalog JSON")
    }

    pub fn for_tier(&self, tier: RiskTier) -> &[Instrument] {
        match tier {
            RiskTier::Low => &self.low_risk,
            RiskTier::Medium => &self.medium_risk,
            RiskTier::High => &self.high_risk,
        }
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        InstrumentCatalog {
            low_risk: vec![
                instrument(
                    "Bond",
                    "Treasury Bonds",
                    0.03,
                    "Low",
                    "Government bonds with stable returns and low risk",
                    100.0,
                ),
                instrument(
                    "ETF",
                    "Short-Term Bond ETF",
                    0.035,
                    "Low",
                    "Exchange-traded fund focusing on short-term bonds",
                    50.0,
                ),
                instrument(
                    "Fund",
                    "Money Market Fund",
                    0.02,
                    "Very Low",
                    "Liquid investments in high-quality, short-term debt",
                    500.0,
                ),
            ],
            medium_risk: vec![
                instrument(
                    "ETF",
                    "S&P 500 Index ETF",
                    0.07,
                    "Medium",
                    "Broad market exposure to the top 500 US companies",
                    100.0,
                ),
                instrument(
                    "Fund",
                    "Balanced Mutual Fund",
                    0.06,
                    "Medium",
                    "Mix of stocks and bonds for balanced growth and income",
                    1000.0,
                ),
                instrument(
                    "ETF",
                    "Dividend Aristocrats ETF",
                    0.055,
                    "Medium-Low",
                    "Companies with a history of increasing dividends",
                    200.0,
                ),
            ],
            high_risk: vec![
                instrument(
                    "ETF",
                    "Technology Sector ETF",
                    0.12,
                    "High",
                    "Exposure to high-growth technology companies",
                    200.0,
                ),
                instrument(
                    "ETF",
                    "Small Cap Growth ETF",
                    0.10,
                    "High",
                    "Small companies with high growth potential",
                    150.0,
                ),
                instrument(
                    "Fund",
                    "Emerging Markets Fund",
                    0.11,
                    "Very High",
                    "Investments in developing economies with high growth potential",
                    500.0,
                ),
            ],
        }
    }
}

// ============================================================================
// SELECTION STRATEGY
// ============================================================================

/// Chooses one of `n` eligible options. The uniform implementation is the
/// only source of non-determinism in the core; tests inject a fixed one.
pub trait SelectionStrategy {
    /// Index into the eligible list, or None when it is empty
    fn choose(&mut self, n: usize) -> Option<usize>;
}

/// Uniform random choice
pub struct UniformSelection;

impl SelectionStrategy for UniformSelection {
    fn choose(&mut self, n: usize) -> Option<usize> {
        if n == 0 {
            None
        } else {
            Some(rand::thread_rng().gen_range(0..n))
        }
    }
}

/// Always the first eligible option - deterministic, for tests and
/// reproducible runs
pub struct FirstEligible;

impl SelectionStrategy for FirstEligible {
    fn choose(&mut self, n: usize) -> Option<usize> {
        if n == 0 {
            None
        } else {
            Some(0)
        }
    }
}

// ============================================================================
// INVESTMENT SUGGESTIONS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentSuggestion {
    pub tier: RiskTier,

    #[serde(rename = "type")]
    pub instrument_type: String,

    pub name: String,
    pub allocation_percentage: u32,
    pub expected_return: f64,
    pub risk_level: String,
    pub description: String,
    pub min_investment: f64,
}

pub struct InvestmentAllocator {
    catalog: InstrumentCatalog,
}

impl InvestmentAllocator {
    pub fn new() -> Self {
        InvestmentAllocator {
            catalog: InstrumentCatalog::default(),
        }
    }

    pub fn with_catalog(catalog: InstrumentCatalog) -> Self {
        InvestmentAllocator { catalog }
    }

    /// Produce 0-3 suggestions in low → medium → high order. A tier with a
    /// positive allocation but no affordable instrument is silently
    /// omitted - never an error.
    pub fn suggest(
        &self,
        investable_amount: f64,
        risk_tolerance: f64,
        strategy: &mut dyn SelectionStrategy,
    ) -> Vec<InvestmentSuggestion> {
        let allocation = TierAllocation::from_risk_tolerance(risk_tolerance);
        let mut suggestions = Vec::new();

        for tier in RiskTier::ORDERED {
            let percentage = allocation.for_tier(tier);
            if percentage == 0 {
                continue;
            }

            let budget = investable_amount * f64::from(percentage) / 100.0;
            let eligible: Vec<&Instrument> = self
                .catalog
                .for_tier(tier)
                .iter()
                .filter(|i| i.min_investment <= budget)
                .collect();

            let pick = match strategy.choose(eligible.len()).and_then(|i| eligible.get(i)) {
                Some(pick) => *pick,
                None => continue,
            };

            suggestions.push(InvestmentSuggestion {
                tier,
                instrument_type: pick.instrument_type.clone(),
                name: pick.name.clone(),
                allocation_percentage: percentage,
                expected_return: pick.expected_return,
                risk_level: pick.risk_level.clone(),
                description: pick.description.clone(),
                min_investment: pick.min_investment,
            });
        }

        suggestions
    }

    /// Convenience wrapper using uniform random selection
    pub fn suggest_uniform(
        &self,
        investable_amount: f64,
        risk_tolerance: f64,
    ) -> Vec<InvestmentSuggestion> {
        self.suggest(investable_amount, risk_tolerance, &mut UniformSelection)
    }
}

impl Default for InvestmentAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
