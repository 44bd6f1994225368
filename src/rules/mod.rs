//! Association-rule generation and the immutable rule index.
//!
//! Every frequent itemset of size >= 2 is expanded into all 2^k - 2
//! antecedent/consequent partitions; confidence and lift come from support
//! lookups against the frequent-itemset table (every frequent subset is
//! guaranteed present by the miner). Rules failing either threshold are
//! discarded.
//!
//! With the `parallel` feature enabled, itemsets are sharded across rayon
//! workers; generation is read-only over the table and append-only into
//! the result.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{CestaError, Result};
use crate::mining::FrequentItemset;

/// Association rule `antecedent => consequent`.
///
/// Antecedent and consequent are disjoint, their union is a frequent
/// itemset, and both sides are sorted ascending by item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    /// Items in the antecedent (left side).
    pub antecedent: Vec<String>,
    /// Items in the consequent (right side).
    pub consequent: Vec<String>,
    /// Support of the full itemset: P(antecedent ∪ consequent).
    pub support: f64,
    /// P(consequent | antecedent) = support / P(antecedent), in [0, 1].
    pub confidence: f64,
    /// confidence / P(consequent); 1 signals independence.
    pub lift: f64,
}

/// The canonical rule ordering: lift descending, confidence descending,
/// antecedent size ascending, then item names for full determinism.
#[must_use]
pub fn canonical_order(a: &AssociationRule, b: &AssociationRule) -> std::cmp::Ordering {
    b.lift
        .total_cmp(&a.lift)
        .then(b.confidence.total_cmp(&a.confidence))
        .then(a.antecedent.len().cmp(&b.antecedent.len()))
        .then_with(|| a.antecedent.cmp(&b.antecedent))
        .then_with(|| a.consequent.cmp(&b.consequent))
}

/// Generates association rules from mined frequent itemsets.
///
/// # Examples
///
/// ```
/// use cesta::mining::FpGrowth;
/// use cesta::rules::RuleGenerator;
///
/// let transactions = vec![
///     vec!["bread", "milk"],
///     vec!["bread", "diaper", "beer"],
///     vec!["milk", "diaper", "beer", "eggs"],
///     vec!["bread", "milk", "diaper", "beer"],
///     vec!["bread", "milk", "diaper", "eggs"],
/// ];
/// let mut miner = FpGrowth::new().with_min_support(0.6);
/// miner.fit(&transactions).unwrap();
///
/// let rules = RuleGenerator::new()
///     .with_min_confidence(0.7)
///     .with_min_lift(0.0)
///     .generate(miner.frequent_itemsets(), miner.n_transactions())
///     .unwrap();
///
/// let rule = rules
///     .iter()
///     .find(|r| r.antecedent == ["milk"] && r.consequent == ["diaper"])
///     .unwrap();
/// assert!((rule.confidence - 0.75).abs() < 1e-12);
/// assert!((rule.lift - 0.9375).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct RuleGenerator {
    min_confidence: f64,
    min_lift: f64,
}

impl RuleGenerator {
    /// Create a generator with default thresholds (`min_confidence` 0.5,
    /// `min_lift` 1.0).
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_confidence: 0.5,
            min_lift: 1.0,
        }
    }

    /// Set the minimum confidence threshold, in `[0, 1]`.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Set the minimum lift threshold, non-negative. Values above 1 report
    /// only positively associated rules.
    #[must_use]
    pub fn with_min_lift(mut self, min_lift: f64) -> Self {
        self.min_lift = min_lift;
        self
    }

    /// Expand itemsets into rules, filtered by both thresholds and sorted
    /// canonically (lift desc, confidence desc, antecedent size asc).
    ///
    /// # Errors
    ///
    /// Returns [`CestaError::InvalidHyperparameter`] for thresholds outside
    /// their ranges.
    pub fn generate(
        &self,
        itemsets: &[FrequentItemset],
        n_transactions: u64,
    ) -> Result<Vec<AssociationRule>> {
        if !(self.min_confidence >= 0.0 && self.min_confidence <= 1.0) {
            return Err(CestaError::invalid_hyperparameter(
                "min_confidence",
                self.min_confidence,
                "in [0, 1]",
            ));
        }
        if !(self.min_lift >= 0.0) {
            return Err(CestaError::invalid_hyperparameter(
                "min_lift",
                self.min_lift,
                ">= 0",
            ));
        }
        if n_transactions == 0 || itemsets.is_empty() {
            return Ok(Vec::new());
        }

        let table: HashMap<&[String], u64> = itemsets
            .iter()
            .map(|fi| (fi.items.as_slice(), fi.count))
            .collect();
        let total = n_transactions as f64;

        #[cfg(feature = "parallel")]
        let mut rules: Vec<AssociationRule> = itemsets
            .par_iter()
            .flat_map_iter(|fi| self.rules_for_itemset(fi, &table, total))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let mut rules: Vec<AssociationRule> = itemsets
            .iter()
            .flat_map(|fi| self.rules_for_itemset(fi, &table, total))
            .collect();

        rules.sort_unstable_by(canonical_order);
        Ok(rules)
    }

    /// All threshold-passing partitions of one itemset.
    fn rules_for_itemset(
        &self,
        fi: &FrequentItemset,
        table: &HashMap<&[String], u64>,
        total: f64,
    ) -> Vec<AssociationRule> {
        let k = fi.items.len();
        if k < 2 {
            return Vec::new();
        }
        let mut rules = Vec::new();
        // every proper non-empty subset as antecedent
        for mask in 1u64..((1u64 << k) - 1) {
            let mut antecedent = Vec::new();
            let mut consequent = Vec::new();
            for (i, item) in fi.items.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    antecedent.push(item.clone());
                } else {
                    consequent.push(item.clone());
                }
            }

            let Some(&ant_count) = table.get(antecedent.as_slice()) else {
                debug_assert!(false, "antecedent {antecedent:?} missing from itemset table");
                continue;
            };
            let Some(&cons_count) = table.get(consequent.as_slice()) else {
                debug_assert!(false, "consequent {consequent:?} missing from itemset table");
                continue;
            };

            let confidence = fi.count as f64 / ant_count as f64;
            if confidence < self.min_confidence {
                continue;
            }
            let lift = confidence / (cons_count as f64 / total);
            if lift < self.min_lift {
                continue;
            }
            rules.push(AssociationRule {
                antecedent,
                consequent,
                support: fi.support,
                confidence,
                lift,
            });
        }
        rules
    }
}

impl Default for RuleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable collection of rules, keyed by antecedent.
///
/// Built once per training run and read-only afterwards; concurrent
/// lookups need no locking. Retraining builds a new index and swaps the
/// handle, never patches in place.
#[derive(Debug, Clone)]
pub struct RuleIndex {
    rules: Vec<AssociationRule>,
    by_antecedent: HashMap<Vec<String>, Vec<usize>>,
}

impl RuleIndex {
    /// Index a rule collection. Rules are stored in canonical order.
    #[must_use]
    pub fn from_rules(mut rules: Vec<AssociationRule>) -> Self {
        rules.sort_unstable_by(canonical_order);
        let mut by_antecedent: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            by_antecedent
                .entry(rule.antecedent.clone())
                .or_default()
                .push(i);
        }
        Self {
            rules,
            by_antecedent,
        }
    }

    /// All rules in canonical order.
    #[must_use]
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    /// Number of indexed rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the index holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose antecedent is exactly `antecedent` (sorted item names).
    #[must_use]
    pub fn rules_for(&self, antecedent: &[String]) -> Vec<&AssociationRule> {
        self.by_antecedent
            .get(antecedent)
            .map(|idxs| idxs.iter().map(|&i| &self.rules[i]).collect())
            .unwrap_or_default()
    }

    /// Rules whose antecedent is a subset of `basket`, in canonical order.
    /// Unknown basket items simply never match.
    pub fn matching<'a>(
        &'a self,
        basket: &'a HashSet<&'a str>,
    ) -> impl Iterator<Item = &'a AssociationRule> {
        self.rules
            .iter()
            .filter(move |r| r.antecedent.iter().all(|i| basket.contains(i.as_str())))
    }
}
