//! Frequency counting and transaction encoding.
//!
//! Raw baskets arrive as lists of item names. Before tree construction,
//! every item is interned to a dense [`ItemId`], globally counted, filtered
//! against the minimum-support threshold, and each surviving transaction is
//! reordered by descending global frequency (ties broken by ascending id,
//! i.e. first-appearance order). Transactions left empty by the filter are
//! dropped and tallied, never treated as errors.

use std::collections::{HashMap, HashSet};

use crate::error::{CestaError, Result};

/// Dense item identifier assigned in order of first appearance.
pub type ItemId = u32;

/// Bidirectional mapping between item names and dense [`ItemId`]s.
///
/// Ids are assigned in order of first appearance, which doubles as the
/// deterministic secondary sort key during transaction reordering.
///
/// # Examples
///
/// ```
/// use cesta::encode::ItemVocabulary;
///
/// let mut vocab = ItemVocabulary::new();
/// let bread = vocab.intern("bread");
/// let milk = vocab.intern("milk");
/// assert_eq!(vocab.intern("bread"), bread);
/// assert_eq!(vocab.name(milk), "milk");
/// assert_eq!(vocab.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ItemVocabulary {
    names: Vec<String>,
    ids: HashMap<String, ItemId>,
}

impl ItemVocabulary {
    /// Create an empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an item name, returning its id (existing or freshly assigned).
    pub fn intern(&mut self, name: &str) -> ItemId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as ItemId;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Look up the id of a known item name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ItemId> {
        self.ids.get(name).copied()
    }

    /// The name behind an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this vocabulary.
    #[must_use]
    pub fn name(&self, id: ItemId) -> &str {
        &self.names[id as usize]
    }

    /// Number of distinct interned items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Output of the encoding pass: filtered, reordered transactions plus the
/// global frequency table and bookkeeping counts.
#[derive(Debug, Clone)]
pub struct EncodedTransactions {
    /// Surviving transactions, items ordered by descending global count
    /// (ties: ascending id).
    pub transactions: Vec<Vec<ItemId>>,
    /// Global count per surviving item.
    pub counts: HashMap<ItemId, u64>,
    /// Total raw transactions seen, including dropped ones. Ratio
    /// computations divide by this.
    pub n_transactions: u64,
    /// Transactions dropped because no item survived the filter.
    pub dropped: u64,
    /// `min_support` converted to an absolute count.
    pub min_count: u64,
}

/// Smallest absolute count `c >= 1` such that `c / total >= min_support`.
///
/// Computed without trusting a single float rounding: the candidate from
/// `ceil` is checked one step down and one step up so thresholds like
/// `0.2 * 5` never land on the wrong side.
#[must_use]
pub fn absolute_support(min_support: f64, total: u64) -> u64 {
    if total == 0 {
        return 1;
    }
    let mut count = (min_support * total as f64).ceil() as u64;
    if count > 1 && ((count - 1) as f64 / total as f64) >= min_support {
        count -= 1;
    }
    while (count as f64 / total as f64) < min_support {
        count += 1;
    }
    count.max(1)
}

/// Run the two-pass encoding: count, filter, reorder.
///
/// Duplicate items within one basket count once. Items are interned into
/// `vocab` in first-appearance order.
///
/// # Errors
///
/// Returns [`CestaError::InvalidHyperparameter`] if `min_support` is not in
/// `(0, 1]`.
pub fn encode_transactions<S: AsRef<str>>(
    raw: &[Vec<S>],
    min_support: f64,
    vocab: &mut ItemVocabulary,
) -> Result<EncodedTransactions> {
    if !(min_support > 0.0 && min_support <= 1.0) {
        return Err(CestaError::invalid_hyperparameter(
            "min_support",
            min_support,
            "in (0, 1]",
        ));
    }

    let n_transactions = raw.len() as u64;
    let min_count = absolute_support(min_support, n_transactions);

    // Pass 1: global counts, each item once per basket.
    let mut all_counts: HashMap<ItemId, u64> = HashMap::new();
    let mut interned: Vec<Vec<ItemId>> = Vec::with_capacity(raw.len());
    for basket in raw {
        let mut seen: HashSet<ItemId> = HashSet::with_capacity(basket.len());
        let mut ids = Vec::with_capacity(basket.len());
        for item in basket {
            let id = vocab.intern(item.as_ref());
            if seen.insert(id) {
                ids.push(id);
                *all_counts.entry(id).or_insert(0) += 1;
            }
        }
        interned.push(ids);
    }

    let counts: HashMap<ItemId, u64> = all_counts
        .into_iter()
        .filter(|&(_, c)| c >= min_count)
        .collect();

    // Pass 2: filter and reorder each transaction.
    let mut transactions = Vec::new();
    let mut dropped = 0;
    for ids in interned {
        let mut filtered: Vec<ItemId> = ids
            .into_iter()
            .filter(|id| counts.contains_key(id))
            .collect();
        if filtered.is_empty() {
            dropped += 1;
            continue;
        }
        filtered.sort_unstable_by(|&a, &b| counts[&b].cmp(&counts[&a]).then(a.cmp(&b)));
        transactions.push(filtered);
    }

    Ok(EncodedTransactions {
        transactions,
        counts,
        n_transactions,
        dropped,
        min_count,
    })
}
