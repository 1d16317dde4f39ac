use thiserror::Error;

/// An error reported by the range K-th structure or by the op-log driver.
#[derive(Debug, Error)]
pub enum Error {
    /// A bin bound lies outside `1..=n`.
    #[error("bin range {l}..={r} is out of bounds for {n} bins")]
    BinOutOfRange { l: usize, r: usize, n: usize },

    /// `k` is zero, or larger than the number of insertions touching the
    /// queried bins.
    #[error("k = {k} is out of range: only {total} insertions touch the queried bins")]
    KOutOfRange { k: u64, total: u64 },

    /// The op log ended early.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    /// A token could not be parsed.
    #[error("invalid token {token:?}, expected {expected}")]
    InvalidToken {
        token: String,
        expected: &'static str,
    },

    /// Operation codes other than `1` (insert) and `2` (query).
    #[error("unknown operation code {0:?}")]
    UnknownOp(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
