//! Cesta: market basket analysis in pure Rust.
//!
//! Cesta mines co-occurrence patterns from historical transactions with
//! FP-Growth (a compressed prefix tree plus recursive conditional mining,
//! sidestepping the candidate blow-up of generate-and-test approaches),
//! derives association rules with support/confidence/lift semantics, and
//! turns a live basket into ranked recommendations.
//!
//! # Quick Start
//!
//! ```
//! use cesta::prelude::*;
//!
//! let transactions = vec![
//!     vec!["bread", "milk"],
//!     vec!["bread", "diaper", "beer"],
//!     vec!["milk", "diaper", "beer", "eggs"],
//!     vec!["bread", "milk", "diaper", "beer"],
//!     vec!["bread", "milk", "diaper", "eggs"],
//! ];
//!
//! // Mine itemsets appearing in at least 60% of baskets
//! let mut miner = FpGrowth::new().with_min_support(0.6);
//! miner.fit(&transactions).unwrap();
//!
//! // Derive rules and serve recommendations
//! let rules = RuleGenerator::new()
//!     .with_min_confidence(0.7)
//!     .with_min_lift(0.0)
//!     .generate(miner.frequent_itemsets(), miner.n_transactions())
//!     .unwrap();
//! let engine = RecommendationEngine::from_rules(rules);
//!
//! let recs = engine.recommend(&["milk"], 3).unwrap();
//! assert_eq!(recs[0].item, "bread");
//! assert_eq!(recs[1].item, "diaper");
//! ```
//!
//! # Modules
//!
//! - [`encode`]: Item interning, frequency counting, transaction reordering
//! - [`mining`]: FP-Growth frequent-itemset miner and the FP-tree arena
//! - [`rules`]: Association-rule generation and the immutable rule index
//! - [`recommend`]: Basket recommendation engine
//! - [`artifact`]: Versioned persistence of itemsets and rules
//!
//! Training (`encode` → `mining` → `rules`) is a batch job; the
//! recommendation engine only ever sees the rule output, loaded read-only.
//! Enable the `parallel` feature to shard rule generation with rayon.

pub mod artifact;
pub mod encode;
pub mod error;
pub mod mining;
pub mod prelude;
pub mod recommend;
pub mod rules;

pub use error::{CestaError, Result};
