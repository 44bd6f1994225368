//! Frequent-itemset mining over transactional data.
//!
//! [`FpGrowth`] discovers every itemset whose support meets a minimum
//! threshold by building a compressed co-occurrence tree ([`tree::FpTree`])
//! and recursively mining conditional sub-trees, avoiding the candidate
//! blow-up of generate-and-test miners.
//!
//! # Example
//!
//! ```
//! use cesta::mining::FpGrowth;
//!
//! let transactions = vec![
//!     vec!["bread", "milk"],
//!     vec!["bread", "diaper", "beer"],
//!     vec!["milk", "diaper", "beer", "eggs"],
//!     vec!["bread", "milk", "diaper", "beer"],
//!     vec!["bread", "milk", "diaper", "eggs"],
//! ];
//!
//! let mut miner = FpGrowth::new().with_min_support(0.6);
//! miner.fit(&transactions).unwrap();
//!
//! // {milk, diaper} is bought together in 3 of 5 baskets
//! let pair = miner
//!     .frequent_itemsets()
//!     .iter()
//!     .find(|fi| fi.items == ["diaper", "milk"])
//!     .unwrap();
//! assert_eq!(pair.count, 3);
//! ```

pub mod tree;

use serde::{Deserialize, Serialize};

use crate::encode::{encode_transactions, ItemId, ItemVocabulary};
use crate::error::Result;
use tree::FpTree;

/// A set of items with its absolute support count and support ratio.
///
/// Item names are sorted ascending, giving every itemset one canonical
/// representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemset {
    /// Sorted item names.
    pub items: Vec<String>,
    /// Number of transactions containing all items.
    pub count: u64,
    /// `count / total transactions`.
    pub support: f64,
}

/// FP-Growth frequent-itemset miner.
///
/// Follows the crate's builder-and-fit convention: configure thresholds
/// with `with_*`, call [`fit`](FpGrowth::fit), then read results through
/// the getters. Fitting again resets all prior state.
///
/// # Algorithm
///
/// 1. Count item frequencies, drop items below `min_support`, reorder each
///    transaction by descending global frequency.
/// 2. Insert the encoded transactions into a shared prefix tree.
/// 3. For each item, least frequent first, extract its conditional pattern
///    base, build a conditional tree, and recurse; a sub-tree that
///    degenerates to a single path is enumerated directly.
///
/// # Examples
///
/// ```
/// use cesta::mining::FpGrowth;
///
/// let transactions = vec![vec!["a", "b"], vec!["a", "b"], vec!["a", "c"]];
/// let mut miner = FpGrowth::new().with_min_support(0.5);
/// miner.fit(&transactions).unwrap();
/// assert!(!miner.frequent_itemsets().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FpGrowth {
    min_support: f64,
    max_len: Option<usize>,
    vocab: ItemVocabulary,
    itemsets: Vec<FrequentItemset>,
    n_transactions: u64,
    dropped: u64,
}

impl FpGrowth {
    /// Create a miner with default parameters (`min_support` 0.1, no
    /// itemset length cap).
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_support: 0.1,
            max_len: None,
            vocab: ItemVocabulary::new(),
            itemsets: Vec::new(),
            n_transactions: 0,
            dropped: 0,
        }
    }

    /// Set the minimum support ratio, in `(0, 1]`.
    #[must_use]
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Cap the size of emitted itemsets. Subsets below the cap are still
    /// mined, so rule generation keeps every antecedent it needs.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Mine all frequent itemsets from the given transactions.
    ///
    /// Baskets with duplicate items count each item once; baskets left
    /// empty after frequency filtering are dropped and tallied (see
    /// [`dropped_transactions`](FpGrowth::dropped_transactions)).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CestaError::InvalidHyperparameter`] if
    /// `min_support` is outside `(0, 1]`.
    pub fn fit<S: AsRef<str>>(&mut self, transactions: &[Vec<S>]) -> Result<()> {
        self.vocab = ItemVocabulary::new();
        self.itemsets = Vec::new();
        self.n_transactions = 0;
        self.dropped = 0;

        let encoded = encode_transactions(transactions, self.min_support, &mut self.vocab)?;
        self.n_transactions = encoded.n_transactions;
        self.dropped = encoded.dropped;
        if encoded.transactions.is_empty() {
            return Ok(());
        }

        let weighted: Vec<(Vec<ItemId>, u64)> = encoded
            .transactions
            .into_iter()
            .map(|t| (t, 1))
            .collect();
        let fp_tree = FpTree::build(&weighted, encoded.min_count);

        let mut raw: Vec<(Vec<ItemId>, u64)> = Vec::new();
        mine(&fp_tree, encoded.min_count, &[], self.max_len, &mut raw);

        let total = self.n_transactions as f64;
        self.itemsets = raw
            .into_iter()
            .map(|(ids, count)| {
                let mut items: Vec<String> =
                    ids.iter().map(|&id| self.vocab.name(id).to_string()).collect();
                items.sort_unstable();
                FrequentItemset {
                    items,
                    count,
                    support: count as f64 / total,
                }
            })
            .collect();
        // deterministic presentation: most supported first, then smaller,
        // then lexicographic
        self.itemsets.sort_unstable_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.items.len().cmp(&b.items.len()))
                .then_with(|| a.items.cmp(&b.items))
        });
        Ok(())
    }

    /// The mined frequent itemsets. Empty before [`fit`](FpGrowth::fit).
    #[must_use]
    pub fn frequent_itemsets(&self) -> &[FrequentItemset] {
        &self.itemsets
    }

    /// Total raw transactions seen by the last fit, including dropped ones.
    #[must_use]
    pub fn n_transactions(&self) -> u64 {
        self.n_transactions
    }

    /// Transactions dropped because no item survived frequency filtering.
    #[must_use]
    pub fn dropped_transactions(&self) -> u64 {
        self.dropped
    }

    /// The vocabulary of items seen by the last fit.
    #[must_use]
    pub fn vocabulary(&self) -> &ItemVocabulary {
        &self.vocab
    }
}

impl Default for FpGrowth {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively mine `tree`, emitting each frequent itemset exactly once as
/// `(suffix ∪ mined items, support)`.
fn mine(
    tree: &FpTree,
    min_count: u64,
    suffix: &[ItemId],
    max_len: Option<usize>,
    out: &mut Vec<(Vec<ItemId>, u64)>,
) {
    // Base case: a single path is enumerated directly instead of recursing.
    // Paths of 64+ items fall through to the general case (mask width);
    // their subset count is astronomical either way.
    if let Some(path) = tree.single_path() {
        if path.len() < 64 {
            enumerate_path(&path, min_count, suffix, max_len, out);
            return;
        }
    }

    for item in tree.items_ascending() {
        let support = tree.item_support(item);
        debug_assert!(support >= min_count, "header items are pre-filtered");

        let mut itemset = suffix.to_vec();
        itemset.push(item);
        let at_cap = max_len.map_or(false, |m| itemset.len() >= m);
        if max_len.map_or(true, |m| itemset.len() <= m) {
            out.push((itemset.clone(), support));
        }
        if at_cap {
            continue;
        }

        let base = tree.conditional_pattern_base(item);
        if base.is_empty() {
            continue;
        }
        let conditional = FpTree::build(&base, min_count);
        if !conditional.is_empty() {
            mine(&conditional, min_count, &itemset, max_len, out);
        }
    }
}

/// Emit every non-empty sub-combination of a single path, combined with the
/// accumulated suffix. The support of a combination is the minimum count
/// along it, i.e. the count of its deepest node.
fn enumerate_path(
    path: &[(ItemId, u64)],
    min_count: u64,
    suffix: &[ItemId],
    max_len: Option<usize>,
    out: &mut Vec<(Vec<ItemId>, u64)>,
) {
    for mask in 1u64..(1u64 << path.len()) {
        let mut items = suffix.to_vec();
        let mut support = u64::MAX;
        for (i, &(item, count)) in path.iter().enumerate() {
            if mask & (1 << i) != 0 {
                items.push(item);
                support = support.min(count);
            }
        }
        if max_len.map_or(false, |m| items.len() > m) {
            continue;
        }
        debug_assert!(support >= min_count, "path items are pre-filtered");
        out.push((items, support));
    }
}
