//! Compressed co-occurrence tree (FP-tree) backing the pattern miner.
//!
//! Nodes live in an arena (`Vec<FpNode>`) and refer to each other by index,
//! so the parent back-references and same-item chains form no ownership
//! cycles. Two transactions sharing a prefix share the corresponding path;
//! the tree never holds more nodes than the sum of transaction lengths.

use std::collections::HashMap;

use crate::encode::ItemId;

/// Index of a node within the tree arena.
pub type NodeId = usize;

/// The sentinel root occupies slot 0 of every arena.
const ROOT: NodeId = 0;

/// One node of the tree: an item, the number of transactions whose path
/// passes through it, and the index links that stitch the structure
/// together.
#[derive(Debug, Clone)]
pub struct FpNode {
    /// `None` only for the root sentinel.
    pub item: Option<ItemId>,
    /// Weighted number of transactions passing through this node.
    pub count: u64,
    /// Parent index; the root points at itself.
    pub parent: NodeId,
    /// Child index per item.
    pub children: HashMap<ItemId, NodeId>,
    /// Next node holding the same item (header chain).
    pub link: Option<NodeId>,
}

/// Arena FP-tree with a header index mapping each item to its same-item
/// chain of nodes.
///
/// Construction filters and reorders the given weighted item lists by the
/// frequencies observed *within those lists*, so the same type serves both
/// the initial tree over encoded transactions and every conditional tree
/// built from a pattern base.
#[derive(Debug)]
pub struct FpTree {
    nodes: Vec<FpNode>,
    /// Item -> first node of its chain.
    header: HashMap<ItemId, NodeId>,
    /// Item -> last node of its chain, for O(1) appends.
    tails: HashMap<ItemId, NodeId>,
    /// Item -> total weighted count within this tree (surviving items only).
    counts: HashMap<ItemId, u64>,
}

impl FpTree {
    /// Build a tree from weighted item lists, keeping only items whose
    /// weighted count reaches `min_count`.
    ///
    /// Each list is filtered and reordered by descending local count
    /// (ties: ascending id) before insertion, the same rule whether the
    /// lists are real transactions (weight 1) or a conditional pattern
    /// base (weight = path count).
    #[must_use]
    pub fn build(paths: &[(Vec<ItemId>, u64)], min_count: u64) -> Self {
        let mut local: HashMap<ItemId, u64> = HashMap::new();
        for (items, weight) in paths {
            for &item in items {
                *local.entry(item).or_insert(0) += weight;
            }
        }
        let counts: HashMap<ItemId, u64> = local
            .into_iter()
            .filter(|&(_, c)| c >= min_count)
            .collect();

        let mut tree = Self {
            nodes: vec![FpNode {
                item: None,
                count: 0,
                parent: ROOT,
                children: HashMap::new(),
                link: None,
            }],
            header: HashMap::new(),
            tails: HashMap::new(),
            counts,
        };

        for (items, weight) in paths {
            let mut filtered: Vec<ItemId> = items
                .iter()
                .copied()
                .filter(|id| tree.counts.contains_key(id))
                .collect();
            if filtered.is_empty() {
                continue;
            }
            filtered
                .sort_unstable_by(|&a, &b| tree.counts[&b].cmp(&tree.counts[&a]).then(a.cmp(&b)));
            tree.insert(&filtered, *weight);
        }
        tree
    }

    /// Insert one ordered item list, following or creating one child edge
    /// per item and incrementing every visited node by `weight`.
    fn insert(&mut self, items: &[ItemId], weight: u64) {
        let mut node = ROOT;
        for &item in items {
            let child = match self.nodes[node].children.get(&item) {
                Some(&existing) => existing,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(FpNode {
                        item: Some(item),
                        count: 0,
                        parent: node,
                        children: HashMap::new(),
                        link: None,
                    });
                    self.nodes[node].children.insert(item, id);
                    // append to the item's same-item chain
                    match self.tails.insert(item, id) {
                        Some(tail) => self.nodes[tail].link = Some(id),
                        None => {
                            self.header.insert(item, id);
                        }
                    }
                    id
                }
            };
            self.nodes[child].count += weight;
            node = child;
        }
    }

    /// Whether the tree holds no item nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].children.is_empty()
    }

    /// Total weighted count of an item within this tree (the sum over its
    /// same-item chain). Zero for items filtered out at build time.
    #[must_use]
    pub fn item_support(&self, item: ItemId) -> u64 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Header items in mining order: ascending local count, ties broken by
    /// descending id. This is the exact reverse of insertion order, so the
    /// least frequent item is processed first.
    #[must_use]
    pub fn items_ascending(&self) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = self.header.keys().copied().collect();
        items.sort_unstable_by(|&a, &b| self.counts[&a].cmp(&self.counts[&b]).then(b.cmp(&a)));
        items
    }

    /// The conditional pattern base of `item`: for every node in its chain,
    /// the root-to-parent prefix path weighted by that node's count.
    /// Prefixes are returned root-first; empty prefixes are omitted.
    #[must_use]
    pub fn conditional_pattern_base(&self, item: ItemId) -> Vec<(Vec<ItemId>, u64)> {
        let mut base = Vec::new();
        let mut next = self.header.get(&item).copied();
        while let Some(id) = next {
            let node = &self.nodes[id];
            let mut prefix = Vec::new();
            let mut up = node.parent;
            while let Some(ancestor_item) = self.nodes[up].item {
                prefix.push(ancestor_item);
                up = self.nodes[up].parent;
            }
            if !prefix.is_empty() {
                prefix.reverse();
                base.push((prefix, node.count));
            }
            next = node.link;
        }
        base
    }

    /// If every node has at most one child, the single root-to-leaf path as
    /// `(item, count)` pairs. `None` as soon as any branch is found.
    #[must_use]
    pub fn single_path(&self) -> Option<Vec<(ItemId, u64)>> {
        let mut path = Vec::new();
        let mut node = ROOT;
        loop {
            let children = &self.nodes[node].children;
            match children.len() {
                0 => return Some(path),
                1 => {
                    let &child = children.values().next().expect("len checked");
                    let n = &self.nodes[child];
                    path.push((n.item.expect("non-root node holds an item"), n.count));
                    node = child;
                }
                _ => return None,
            }
        }
    }

    /// Number of item nodes (excludes the root sentinel).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}
