pub mod segtree_dynamic;
pub mod segtree_nested;
