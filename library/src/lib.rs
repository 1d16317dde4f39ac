pub mod compress_coord;
pub mod error;
pub mod io;
pub mod oplog;
pub mod tree;

pub use compress_coord::Discretizer;
pub use error::{Error, Result};
pub use tree::segtree_nested::{Order, RangeKth};
