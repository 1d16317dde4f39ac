use std::{num::NonZeroU32, ops::Range};

// Range-add / range-sum segment trees over bins `0..n`, many roots sharing
// one pool. Nodes are allocated on first write and never freed.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRef(NonZeroU32);

#[derive(Clone, Copy, Default)]
struct Node {
    // includes `lazy`, which has not reached the children yet
    sum: u64,
    lazy: u64,
    children: [Option<NodeRef>; 2],
}

pub struct NodePool {
    n: usize,
    nodes: Vec<Node>,
}

impl NodePool {
    pub fn with_size(n: usize) -> Self {
        Self {
            n,
            // index 0 is a dummy, so refs stay non-zero
            nodes: vec![Node::default()],
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of materialized nodes across all trees.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn alloc(&mut self) -> NodeRef {
        let idx = u32::try_from(self.nodes.len()).expect("node pool exceeds u32 indices");
        self.nodes.push(Node::default());
        NodeRef(NonZeroU32::new(idx).expect("slot 0 is reserved"))
    }

    fn get(&self, u: NodeRef) -> &Node {
        &self.nodes[u.0.get() as usize]
    }

    fn get_mut(&mut self, u: NodeRef) -> &mut Node {
        &mut self.nodes[u.0.get() as usize]
    }

    fn sum_of(&self, node: Option<NodeRef>) -> u64 {
        node.map_or(0, |u| self.get(u).sum)
    }

    /// Adds `lazy` to every bin of a subtree of width `width`, materializing
    /// its root if needed.
    fn apply(&mut self, node: Option<NodeRef>, width: usize, lazy: u64) -> NodeRef {
        let u = node.unwrap_or_else(|| self.alloc());
        let node = self.get_mut(u);
        node.sum += lazy * width as u64;
        node.lazy += lazy;
        u
    }

    fn push_down(&mut self, u: NodeRef, node_range: Range<usize>) {
        let Node { lazy, children, .. } = *self.get(u);
        if lazy == 0 {
            return;
        }
        let Range { start, end } = node_range;
        let mid = (start + end) >> 1;
        let [left, right] = children;
        let left = self.apply(left, mid - start, lazy);
        let right = self.apply(right, end - mid, lazy);
        let node = self.get_mut(u);
        node.children = [Some(left), Some(right)];
        node.lazy = 0;
    }

    /// Increments every bin in `range` by one in the tree rooted at `root`,
    /// and returns the (possibly new) root. An empty range allocates nothing.
    pub fn add(&mut self, root: Option<NodeRef>, range: Range<usize>) -> Option<NodeRef> {
        if range.start >= range.end {
            return root;
        }
        debug_assert!(range.end <= self.n);
        Some(self.add_rec(root, 0..self.n, &range))
    }

    fn add_rec(
        &mut self,
        node: Option<NodeRef>,
        node_range: Range<usize>,
        job: &Range<usize>,
    ) -> NodeRef {
        let Range { start, end } = node_range;
        if job.start <= start && end <= job.end {
            return self.apply(node, end - start, 1);
        }

        let u = node.unwrap_or_else(|| self.alloc());
        self.push_down(u, start..end);

        let mid = (start + end) >> 1;
        let [mut left, mut right] = self.get(u).children;
        if job.start < mid {
            left = Some(self.add_rec(left, start..mid, job));
        }
        if mid < job.end {
            right = Some(self.add_rec(right, mid..end, job));
        }

        let sum = self.sum_of(left) + self.sum_of(right);
        let node = self.get_mut(u);
        node.children = [left, right];
        node.sum = sum;
        u
    }

    /// Total increments recorded over `range`. Never allocates.
    pub fn sum(&self, root: Option<NodeRef>, range: Range<usize>) -> u64 {
        if range.start >= range.end {
            return 0;
        }
        debug_assert!(range.end <= self.n);
        self.sum_rec(root, 0..self.n, &range)
    }

    fn sum_rec(
        &self,
        node: Option<NodeRef>,
        node_range: Range<usize>,
        query: &Range<usize>,
    ) -> u64 {
        let Some(u) = node else {
            return 0;
        };
        let Range { start, end } = node_range;
        if query.end <= start || end <= query.start {
            return 0;
        }
        let node = self.get(u);
        if query.start <= start && end <= query.end {
            return node.sum;
        }

        // a pending lazy is not pushed on read; count it over the overlap
        let overlap = query.end.min(end) - query.start.max(start);
        let mid = (start + end) >> 1;
        node.lazy * overlap as u64
            + self.sum_rec(node.children[0], start..mid, query)
            + self.sum_rec(node.children[1], mid..end, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sum(bins: &[u64], range: Range<usize>) -> u64 {
        bins[range].iter().sum()
    }

    #[test]
    fn matches_naive_counts() {
        let n = 13;
        let mut pool = NodePool::with_size(n);
        let mut root = None;
        let mut bins = vec![0u64; n];

        let mut seed = 0x2545_f491_u64;
        for _ in 0..200 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let a = (seed >> 33) as usize % n;
            let b = (seed >> 17) as usize % n;
            let (l, r) = (a.min(b), a.max(b) + 1);
            root = pool.add(root, l..r);
            for x in &mut bins[l..r] {
                *x += 1;
            }

            for l in 0..n {
                for r in l..=n {
                    assert_eq!(pool.sum(root, l..r), naive_sum(&bins, l..r));
                }
            }
        }
    }

    #[test]
    fn whole_range_is_absorbed_by_root() {
        let mut pool = NodePool::with_size(1 << 20);
        let mut root = None;
        for _ in 0..5 {
            root = pool.add(root, 0..1 << 20);
        }
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.sum(root, 0..1 << 20), 5 << 20);
        assert_eq!(pool.sum(root, 17..18), 5);
    }

    #[test]
    fn empty_range_allocates_nothing() {
        let mut pool = NodePool::with_size(8);
        assert_eq!(pool.add(None, 5..5), None);
        assert_eq!(pool.add(None, 6..3), None);
        assert!(pool.is_empty());
        assert_eq!(pool.sum(None, 0..8), 0);
    }

    #[test]
    fn reads_do_not_allocate() {
        let mut pool = NodePool::with_size(64);
        let root = pool.add(None, 3..40);
        let before = pool.len();
        assert_eq!(pool.sum(root, 0..64), 37);
        assert_eq!(pool.sum(root, 39..41), 1);
        assert_eq!(pool.sum(None, 0..64), 0);
        assert_eq!(pool.len(), before);
    }

    #[test]
    fn lazy_reaches_children_on_split() {
        let mut pool = NodePool::with_size(8);
        let mut root = pool.add(None, 0..8);
        root = pool.add(root, 2..3);
        assert_eq!(pool.sum(root, 2..3), 2);
        assert_eq!(pool.sum(root, 0..2), 2);
        assert_eq!(pool.sum(root, 3..8), 5);
        assert_eq!(pool.sum(root, 0..8), 9);
    }

    #[test]
    fn roots_are_independent() {
        let mut pool = NodePool::with_size(10);
        let a = pool.add(None, 0..5);
        let b = pool.add(None, 5..10);
        assert_eq!(pool.sum(a, 0..10), 5);
        assert_eq!(pool.sum(b, 0..5), 0);
        assert_eq!(pool.sum(b, 4..6), 1);
    }
}
