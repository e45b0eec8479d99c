//! Problem classification.
//!
//! Classification is total: every input maps to exactly one topic, with
//! `Topic::General` as the fallback. The classifier is a trait so the
//! keyword matcher can be swapped for a real intent model without touching
//! the responder or the reasoning loop.

/// The closed set of problem categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    SupplyDemand,
    Elasticity,
    MarketEquilibrium,
    Surplus,
    Gdp,
    MacroIndicators,
    MarketStructure,
    /// Fallback when no category matches.
    General,
}

impl Topic {
    /// Stable label, used in logs and tool output.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::SupplyDemand => "supply_demand",
            Topic::Elasticity => "elasticity",
            Topic::MarketEquilibrium => "market_equilibrium",
            Topic::Surplus => "consumer_producer_surplus",
            Topic::Gdp => "gdp_analysis",
            Topic::MacroIndicators => "inflation_unemployment",
            Topic::MarketStructure => "market_structures",
            Topic::General => "general",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps free-text problems to a single topic.
pub trait Classifier: Send + Sync {
    fn classify(&self, problem: &str) -> Topic;
}

/// Keyword tables, checked in priority order. First hit wins.
const RULES: &[(Topic, &[&str])] = &[
    (Topic::SupplyDemand, &["supply", "demand", "curve", "shift"]),
    (
        Topic::Elasticity,
        &["elasticity", "elastic", "inelastic", "responsive"],
    ),
    (
        Topic::MarketEquilibrium,
        &["equilibrium", "market clearing", "intersection"],
    ),
    (
        Topic::Surplus,
        &["consumer surplus", "producer surplus", "deadweight loss"],
    ),
    (
        Topic::Gdp,
        &["gdp", "gross domestic product", "economic growth"],
    ),
    (
        Topic::MacroIndicators,
        &["inflation", "unemployment", "cpi", "price level"],
    ),
    (
        Topic::MarketStructure,
        &["monopoly", "competition", "oligopoly", "market structure"],
    ),
];

/// Case-insensitive substring classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl Classifier for KeywordClassifier {
    fn classify(&self, problem: &str) -> Topic {
        let lowered = problem.to_lowercase();
        for (topic, keywords) in RULES {
            if keywords.iter().any(|kw| lowered.contains(kw)) {
                return *topic;
            }
        }
        Topic::General
    }
}
