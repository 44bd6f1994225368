//! Rule-index lookup turning a live basket into ranked recommendations.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::artifact::ModelArtifact;
use crate::error::{CestaError, Result};
use crate::rules::{AssociationRule, RuleIndex};

/// One recommended item with the metrics of the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// The recommended item.
    pub item: String,
    /// Confidence of the winning rule.
    pub confidence: f64,
    /// Lift of the winning rule.
    pub lift: f64,
    /// Antecedent of the winning rule (why this was recommended).
    pub based_on: Vec<String>,
}

/// Read-only recommendation engine over an immutable rule index.
///
/// Construction is the only fallible step; a constructed engine answers
/// every basket, returning an empty list when no rule applies. Safe for
/// concurrent use (`&self` only, no interior mutability).
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    index: RuleIndex,
    catalogue: Vec<String>,
}

impl RecommendationEngine {
    /// Build an engine from freshly generated rules.
    #[must_use]
    pub fn from_rules(rules: Vec<AssociationRule>) -> Self {
        Self::from_index(RuleIndex::from_rules(rules))
    }

    /// Build an engine from an existing rule index.
    #[must_use]
    pub fn from_index(index: RuleIndex) -> Self {
        let mut names: HashSet<&str> = HashSet::new();
        for rule in index.rules() {
            names.extend(rule.antecedent.iter().map(String::as_str));
            names.extend(rule.consequent.iter().map(String::as_str));
        }
        let mut catalogue: Vec<String> = names.into_iter().map(str::to_string).collect();
        catalogue.sort_unstable();
        Self { index, catalogue }
    }

    /// Load an engine from a persisted training artifact.
    ///
    /// # Errors
    ///
    /// Fails fast on a missing, corrupt, or version-mismatched artifact;
    /// never falls back to an empty index.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let artifact = ModelArtifact::load(path)?;
        Ok(Self::from_rules(artifact.rules))
    }

    /// Recommend up to `top_n` items to add to `basket`.
    ///
    /// Every rule whose antecedent is contained in the basket contributes
    /// its consequent items; per item only the best-scoring rule counts
    /// (higher lift, then higher confidence, then smaller antecedent, then
    /// lexicographically smaller antecedent). Items already in the basket
    /// are never recommended; unknown basket items are ignored. An empty
    /// result means no rule applied; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CestaError::InvalidHyperparameter`] if `top_n` is zero.
    pub fn recommend<S: AsRef<str>>(&self, basket: &[S], top_n: usize) -> Result<Vec<Recommendation>> {
        if top_n == 0 {
            return Err(CestaError::invalid_hyperparameter(
                "top_n",
                top_n,
                "a positive integer",
            ));
        }

        let basket: HashSet<&str> = basket.iter().map(AsRef::as_ref).collect();
        let mut best: HashMap<&str, &AssociationRule> = HashMap::new();
        for rule in self.index.matching(&basket) {
            for item in &rule.consequent {
                if basket.contains(item.as_str()) {
                    continue;
                }
                best.entry(item.as_str())
                    .and_modify(|current| {
                        if beats(rule, current) {
                            *current = rule;
                        }
                    })
                    .or_insert(rule);
            }
        }

        let mut recs: Vec<Recommendation> = best
            .into_iter()
            .map(|(item, rule)| Recommendation {
                item: item.to_string(),
                confidence: rule.confidence,
                lift: rule.lift,
                based_on: rule.antecedent.clone(),
            })
            .collect();
        recs.sort_unstable_by(|a, b| {
            b.lift
                .total_cmp(&a.lift)
                .then(b.confidence.total_cmp(&a.confidence))
                .then(a.based_on.len().cmp(&b.based_on.len()))
                .then_with(|| a.item.cmp(&b.item))
        });
        recs.truncate(top_n);
        Ok(recs)
    }

    /// Items of the catalogue containing `query`, case-insensitively.
    #[must_use]
    pub fn search_items(&self, query: &str, max_results: usize) -> Vec<&str> {
        let q = query.trim().to_lowercase();
        self.catalogue
            .iter()
            .filter(|item| item.to_lowercase().contains(&q))
            .take(max_results)
            .map(String::as_str)
            .collect()
    }

    /// Every item appearing in at least one rule, sorted.
    #[must_use]
    pub fn catalogue(&self) -> &[String] {
        &self.catalogue
    }

    /// Number of indexed rules.
    #[must_use]
    pub fn n_rules(&self) -> usize {
        self.index.len()
    }

    /// The underlying rule index.
    #[must_use]
    pub fn index(&self) -> &RuleIndex {
        &self.index
    }
}

/// Whether `a` outranks `b` for the same consequent item: higher lift,
/// then higher confidence, then the smaller antecedent, then the
/// lexicographically smaller antecedent.
fn beats(a: &AssociationRule, b: &AssociationRule) -> bool {
    a.lift
        .total_cmp(&b.lift)
        .then(a.confidence.total_cmp(&b.confidence))
        .then(b.antecedent.len().cmp(&a.antecedent.len()))
        .then_with(|| b.antecedent.cmp(&a.antecedent))
        .is_gt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::FpGrowth;
    use crate::rules::RuleGenerator;

    fn rule(
        antecedent: &[&str],
        consequent: &[&str],
        confidence: f64,
        lift: f64,
    ) -> AssociationRule {
        AssociationRule {
            antecedent: antecedent.iter().map(|s| (*s).to_string()).collect(),
            consequent: consequent.iter().map(|s| (*s).to_string()).collect(),
            support: 0.5,
            confidence,
            lift,
        }
    }

    fn worked_engine() -> RecommendationEngine {
        let transactions = vec![
            vec!["bread", "milk"],
            vec!["bread", "diaper", "beer"],
            vec!["milk", "diaper", "beer", "eggs"],
            vec!["bread", "milk", "diaper", "beer"],
            vec!["bread", "milk", "diaper", "eggs"],
        ];
        let mut miner = FpGrowth::new().with_min_support(0.6);
        miner.fit(&transactions).unwrap();
        let rules = RuleGenerator::new()
            .with_min_confidence(0.0)
            .with_min_lift(0.0)
            .generate(miner.frequent_itemsets(), miner.n_transactions())
            .unwrap();
        RecommendationEngine::from_rules(rules)
    }

    #[test]
    fn test_recommend_worked_example() {
        let engine = worked_engine();
        let recs = engine.recommend(&["milk"], 5).unwrap();
        // milk => diaper and milk => bread, both lift 0.9375, conf 0.75;
        // item name breaks the tie
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].item, "bread");
        assert_eq!(recs[1].item, "diaper");
        assert!((recs[1].lift - 0.9375).abs() < 1e-12);
        assert_eq!(recs[0].based_on, ["milk"]);
    }

    #[test]
    fn test_never_recommends_basket_items() {
        let engine = worked_engine();
        let recs = engine.recommend(&["milk", "diaper", "beer"], 10).unwrap();
        for rec in &recs {
            assert!(rec.item != "milk" && rec.item != "diaper" && rec.item != "beer");
        }
        assert!(!recs.is_empty());
    }

    #[test]
    fn test_unknown_items_are_ignored() {
        let engine = worked_engine();
        let with_unknown = engine.recommend(&["milk", "spaceship"], 5).unwrap();
        let without = engine.recommend(&["milk"], 5).unwrap();
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn test_only_unknown_items_yield_empty() {
        let engine = worked_engine();
        let recs = engine.recommend(&["spaceship", "warp-core"], 5).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_empty_basket_yields_empty() {
        let engine = worked_engine();
        let none: Vec<&str> = vec![];
        assert!(engine.recommend(&none, 5).unwrap().is_empty());
    }

    #[test]
    fn test_top_n_bounds_results() {
        let engine = worked_engine();
        let recs = engine.recommend(&["milk", "beer"], 1).unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_top_n_zero_is_rejected() {
        let engine = worked_engine();
        assert!(engine.recommend(&["milk"], 0).is_err());
    }

    #[test]
    fn test_best_rule_wins_per_item() {
        // two rules recommend "x"; the higher-lift one must provide metrics
        let rules = vec![
            rule(&["a"], &["x"], 0.9, 1.2),
            rule(&["b"], &["x"], 0.5, 2.0),
        ];
        let engine = RecommendationEngine::from_rules(rules);
        let recs = engine.recommend(&["a", "b"], 5).unwrap();
        assert_eq!(recs.len(), 1);
        assert!((recs[0].lift - 2.0).abs() < 1e-12);
        assert_eq!(recs[0].based_on, ["b"]);
    }

    #[test]
    fn test_tie_break_prefers_smaller_antecedent() {
        let rules = vec![
            rule(&["a", "b"], &["x"], 0.8, 1.5),
            rule(&["a"], &["x"], 0.8, 1.5),
        ];
        let engine = RecommendationEngine::from_rules(rules);
        let recs = engine.recommend(&["a", "b"], 5).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].based_on, ["a"]);
    }

    #[test]
    fn test_tie_break_prefers_lexicographic_antecedent() {
        let rules = vec![
            rule(&["b"], &["x"], 0.8, 1.5),
            rule(&["a"], &["x"], 0.8, 1.5),
        ];
        let engine = RecommendationEngine::from_rules(rules);
        let recs = engine.recommend(&["a", "b"], 5).unwrap();
        assert_eq!(recs[0].based_on, ["a"]);
    }

    #[test]
    fn test_empty_rule_set_always_empty() {
        let engine = RecommendationEngine::from_rules(Vec::new());
        assert!(engine.recommend(&["milk"], 5).unwrap().is_empty());
        assert_eq!(engine.n_rules(), 0);
        assert!(engine.catalogue().is_empty());
    }

    #[test]
    fn test_search_items() {
        let engine = worked_engine();
        assert_eq!(engine.search_items("MILK", 10), ["milk"]);
        assert_eq!(engine.search_items("e", 2).len(), 2);
        assert!(engine.search_items("pasta", 10).is_empty());
    }

    #[test]
    fn test_catalogue_contents() {
        let engine = worked_engine();
        assert_eq!(engine.catalogue(), ["beer", "bread", "diaper", "milk"]);
    }
}
