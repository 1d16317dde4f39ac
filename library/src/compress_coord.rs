/// Sorted, deduplicated value universe. Ranks are `0..len()` in increasing
/// value order.
#[derive(Debug, Clone)]
pub struct Discretizer<T> {
    values: Vec<T>,
}

impl<T: Ord> Discretizer<T> {
    pub fn new(xs: impl IntoIterator<Item = T>) -> Self {
        let mut values: Vec<T> = xs.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn try_rank_of(&self, x: &T) -> Option<usize> {
        self.values.binary_search(x).ok()
    }

    /// Panics if `x` was not part of the universe passed to `new`.
    pub fn rank_of(&self, x: &T) -> usize {
        match self.try_rank_of(x) {
            Some(rank) => rank,
            None => panic!("value was not collected before the structure was built"),
        }
    }

    pub fn value_of(&self, rank: usize) -> &T {
        &self.values[rank]
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}
