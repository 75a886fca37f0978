//! Traffic value estimation from cost-per-click rates
//!
//! Each query is assigned to a category by matching its words against the
//! category terms, in table order. Queries that match no category are
//! priced at the table's default CPC and reported as such.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Currency per click used when no category matches
pub const DEFAULT_CPC: f64 = 1.50;

/// CPC rate for a group of related query terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpcCategory {
    /// Category name
    pub name: String,
    /// Lowercase words that place a query in this category
    pub terms: Vec<String>,
    /// Currency per click
    pub cpc: f64,
}

impl CpcCategory {
    fn matches(&self, words: &[String]) -> bool {
        self.terms.iter().any(|term| words.iter().any(|w| w == term))
    }
}

/// Category lookup plus global default rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpcTable {
    categories: Vec<CpcCategory>,
    default_cpc: f64,
}

impl Default for CpcTable {
    fn default() -> Self {
        CpcTable::new(DEFAULT_CPC)
            .with_category("legal", &["lawyer", "attorney", "legal", "lawsuit"], 7.00)
            .with_category(
                "finance",
                &["loan", "loans", "mortgage", "insurance", "credit", "bank", "invest"],
                6.50,
            )
            .with_category(
                "software",
                &["software", "saas", "crm", "platform", "app", "tool", "tools"],
                3.50,
            )
            .with_category(
                "marketing",
                &["seo", "marketing", "advertising", "backlink", "keyword", "content"],
                2.80,
            )
            .with_category("health", &["doctor", "clinic", "treatment", "therapy", "dental"], 2.50)
            .with_category(
                "commerce",
                &["buy", "price", "pricing", "cheap", "deal", "discount", "shop"],
                1.80,
            )
            .with_category(
                "education",
                &["course", "courses", "degree", "training", "tutorial", "certification"],
                1.20,
            )
    }
}

impl CpcTable {
    /// Empty table with the given default rate
    pub fn new(default_cpc: f64) -> Self {
        Self {
            categories: Vec::new(),
            default_cpc,
        }
    }

    /// Add a category, matched after the ones already present
    pub fn with_category(mut self, name: &str, terms: &[&str], cpc: f64) -> Self {
        self.categories.push(CpcCategory {
            name: name.to_string(),
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
            cpc,
        });
        self
    }

    /// Global default CPC
    pub fn default_cpc(&self) -> f64 {
        self.default_cpc
    }

    /// Configured categories in match order
    pub fn categories(&self) -> &[CpcCategory] {
        &self.categories
    }

    /// Check every rate is a finite, non-negative number
    pub fn validate(&self) -> Result<()> {
        if !self.default_cpc.is_finite() || self.default_cpc < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Default CPC must be a non-negative number, got {}",
                self.default_cpc
            )));
        }

        for category in &self.categories {
            if !category.cpc.is_finite() || category.cpc < 0.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "CPC for category '{}' must be a non-negative number, got {}",
                    category.name, category.cpc
                )));
            }
        }

        Ok(())
    }

    /// First category whose terms appear among the query's words
    pub fn categorize(&self, query: &str) -> Option<&CpcCategory> {
        let words = query_words(query);
        self.categories.iter().find(|c| c.matches(&words))
    }

    /// Resolve the rate for a query
    pub fn rate_for(&self, query: &str) -> CpcRate {
        match self.categorize(query) {
            Some(category) => CpcRate {
                category: Some(category.name.clone()),
                cpc: category.cpc,
            },
            None => {
                log::debug!("No CPC category for '{}', using default {:.2}", query, self.default_cpc);
                CpcRate {
                    category: None,
                    cpc: self.default_cpc,
                }
            }
        }
    }

    /// Value of `projected_clicks` for a query
    pub fn value(&self, projected_clicks: f64, query: &str) -> f64 {
        self.rate_for(query).value(projected_clicks)
    }
}

/// Rate resolved for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpcRate {
    /// Matched category, `None` when the default rate applied
    pub category: Option<String>,
    /// Currency per click
    pub cpc: f64,
}

impl CpcRate {
    /// Whether the global default rate applied
    pub fn is_default(&self) -> bool {
        self.category.is_none()
    }

    /// Monetary value of a click count
    pub fn value(&self, clicks: f64) -> f64 {
        clicks * self.cpc
    }
}

fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
