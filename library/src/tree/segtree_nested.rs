//! Range insert / range K-th queries with a segment tree of segment trees.
//!
//! The outer tree is static and indexed by value rank. Every outer node owns
//! the root of an inner [`NodePool`] tree over the bins, counting how many
//! insertions with a rank inside the node's range touched each bin.

use std::ops::Range;

use log::{debug, trace};

use super::segtree_dynamic::{NodePool, NodeRef};
use crate::compress_coord::Discretizer;
use crate::error::{Error, Result};

/// Heap-style index into the outer tree (`1` is the root).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OuterIdx(usize);

#[derive(Clone, Debug)]
struct OuterNode {
    idx: OuterIdx,
    ranks: Range<usize>,
}

impl OuterNode {
    fn root(s: usize) -> Self {
        Self {
            idx: OuterIdx(1),
            ranks: 0..s,
        }
    }

    fn is_leaf(&self) -> bool {
        self.ranks.end - self.ranks.start <= 1
    }

    fn children(&self) -> Option<[OuterNode; 2]> {
        if self.is_leaf() {
            return None;
        }
        let Range { start, end } = self.ranks;
        let mid = (start + end) >> 1;
        Some([
            OuterNode {
                idx: OuterIdx(self.idx.0 << 1),
                ranks: start..mid,
            },
            OuterNode {
                idx: OuterIdx(self.idx.0 << 1 | 1),
                ranks: mid..end,
            },
        ])
    }
}

/// Static tree over ranks `0..s`; each slot holds its inner tree root.
struct RankTree {
    s: usize,
    slots: Vec<Option<NodeRef>>,
}

impl RankTree {
    fn with_size(s: usize) -> Self {
        Self {
            s,
            slots: vec![None; 4 * s],
        }
    }

    fn root(&self) -> OuterNode {
        OuterNode::root(self.s)
    }

    fn inner(&self, node: &OuterNode) -> Option<NodeRef> {
        self.slots.get(node.idx.0).copied().flatten()
    }

    /// Records `bins` in every node from the root down to the leaf of `rank`.
    fn insert_at_path(&mut self, pool: &mut NodePool, rank: usize, bins: Range<usize>) {
        debug_assert!(rank < self.s);
        let mut node = self.root();
        loop {
            let slot = &mut self.slots[node.idx.0];
            *slot = pool.add(*slot, bins.clone());

            match node.children() {
                Some([left, right]) => node = if rank < left.ranks.end { left } else { right },
                None => break,
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Largest,
    Smallest,
}

/// `n` bins, each a multiset over a closed value universe. Supports inserting
/// a value into a contiguous run of bins and asking for the K-th largest (or
/// smallest) value in the union of a contiguous run of bins.
///
/// Bins are addressed `1..=n`. A range with `bin_l > bin_r` is empty.
pub struct RangeKth<T> {
    values: Discretizer<T>,
    ranks: RankTree,
    pool: NodePool,
}

impl<T: Ord> RangeKth<T> {
    pub fn new(n: usize, values: Discretizer<T>) -> Self {
        debug!(
            "building range K-th structure: {} bins, {} distinct values",
            n,
            values.len()
        );
        Self {
            ranks: RankTree::with_size(values.len()),
            pool: NodePool::with_size(n),
            values,
        }
    }

    /// Builds the structure for every value that will ever be inserted.
    pub fn from_values(n: usize, values: impl IntoIterator<Item = T>) -> Self {
        Self::new(n, Discretizer::new(values))
    }

    pub fn bins(&self) -> usize {
        self.pool.n()
    }

    pub fn universe(&self) -> &Discretizer<T> {
        &self.values
    }

    pub fn inner_node_count(&self) -> usize {
        self.pool.len()
    }

    fn bin_range(&self, bin_l: usize, bin_r: usize) -> Result<Range<usize>> {
        if bin_l > bin_r {
            return Ok(0..0);
        }
        let n = self.bins();
        if bin_l == 0 || bin_r > n {
            return Err(Error::BinOutOfRange {
                l: bin_l,
                r: bin_r,
                n,
            });
        }
        Ok(bin_l - 1..bin_r)
    }

    /// Inserts `value` into every bin of `bin_l..=bin_r`.
    ///
    /// Panics if `value` is not part of the universe the structure was built
    /// with.
    pub fn insert(&mut self, bin_l: usize, bin_r: usize, value: &T) -> Result<()> {
        let bins = self.bin_range(bin_l, bin_r)?;
        let rank = self.values.rank_of(value);
        trace!("insert rank {} into bins {}..={}", rank, bin_l, bin_r);
        self.ranks.insert_at_path(&mut self.pool, rank, bins);
        Ok(())
    }

    /// Size of the multiset union of bins `bin_l..=bin_r`: an insertion counts
    /// once for every bin of the range it shares with the query.
    pub fn count(&self, bin_l: usize, bin_r: usize) -> Result<u64> {
        let bins = self.bin_range(bin_l, bin_r)?;
        Ok(self.count_bins(bins))
    }

    fn count_bins(&self, bins: Range<usize>) -> u64 {
        let root = self.ranks.root();
        self.pool.sum(self.ranks.inner(&root), bins)
    }

    /// The `k`-th largest value (1-based) over the bins `bin_l..=bin_r`.
    pub fn kth_largest(&self, bin_l: usize, bin_r: usize, k: u64) -> Result<&T> {
        self.kth(bin_l, bin_r, k, Order::Largest)
    }

    /// The `k`-th smallest value (1-based) over the bins `bin_l..=bin_r`.
    pub fn kth_smallest(&self, bin_l: usize, bin_r: usize, k: u64) -> Result<&T> {
        self.kth(bin_l, bin_r, k, Order::Smallest)
    }

    pub fn kth(&self, bin_l: usize, bin_r: usize, k: u64, order: Order) -> Result<&T> {
        let bins = self.bin_range(bin_l, bin_r)?;
        let total = self.count_bins(bins.clone());
        if k == 0 || k > total {
            return Err(Error::KOutOfRange { k, total });
        }

        let mut node = self.ranks.root();
        let mut k = k;
        while let Some([left, right]) = node.children() {
            let (near, far) = match order {
                Order::Largest => (right, left),
                Order::Smallest => (left, right),
            };
            let count = self.pool.sum(self.ranks.inner(&near), bins.clone());
            if k <= count {
                node = near;
            } else {
                k -= count;
                node = far;
            }
        }

        trace!(
            "{:?} query over bins {}..={} landed on rank {}",
            order,
            bin_l,
            bin_r,
            node.ranks.start
        );
        Ok(self.values.value_of(node.ranks.start))
    }
}
