//! Basket recommendations from mined association rules.
//!
//! [`RecommendationEngine`] is an immutable handle over a trained
//! [`crate::rules::RuleIndex`]: construct it from in-memory rules or load a
//! persisted artifact (construct-or-fail), then call
//! [`recommend`](basket::RecommendationEngine::recommend) concurrently from
//! as many callers as needed.
//!
//! # Quick Start
//!
//! ```
//! use cesta::mining::FpGrowth;
//! use cesta::recommend::RecommendationEngine;
//! use cesta::rules::RuleGenerator;
//!
//! let transactions = vec![
//!     vec!["bread", "milk"],
//!     vec!["bread", "diaper", "beer"],
//!     vec!["milk", "diaper", "beer", "eggs"],
//!     vec!["bread", "milk", "diaper", "beer"],
//!     vec!["bread", "milk", "diaper", "eggs"],
//! ];
//! let mut miner = FpGrowth::new().with_min_support(0.6);
//! miner.fit(&transactions).unwrap();
//! let rules = RuleGenerator::new()
//!     .with_min_confidence(0.7)
//!     .with_min_lift(0.0)
//!     .generate(miner.frequent_itemsets(), miner.n_transactions())
//!     .unwrap();
//!
//! let engine = RecommendationEngine::from_rules(rules);
//! let recs = engine.recommend(&["milk"], 3).unwrap();
//! assert!(!recs.is_empty());
//! assert!(recs.iter().all(|r| r.item != "milk"));
//! ```

pub mod basket;

pub use basket::{Recommendation, RecommendationEngine};
