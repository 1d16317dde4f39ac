//! Text operation logs: `n m` followed by `m` lines `op a b c`.
//!
//! * `1 a b c` inserts the value `c` into every bin of `a..=b`.
//! * `2 a b c` asks for the `c`-th value over bins `a..=b`.

use std::io::Write;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::io::InputStream;
use crate::tree::segtree_nested::{Order, RangeKth};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Insert { l: usize, r: usize, value: i64 },
    Query { l: usize, r: usize, k: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpLog {
    pub n: usize,
    pub ops: Vec<Op>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub inserts: usize,
    pub queries: usize,
    pub inner_nodes: usize,
}

impl OpLog {
    pub fn parse(mut input: &[u8]) -> Result<Self> {
        let n: usize = input.value("bin count")?;
        let m: usize = input.value("operation count")?;

        let mut ops = Vec::with_capacity(m);
        for _ in 0..m {
            let code = input
                .token()
                .ok_or(Error::UnexpectedEof {
                    expected: "operation code",
                })?
                .to_vec();
            let l = input.value("left bin")?;
            let r = input.value("right bin")?;
            let op = match &code[..] {
                b"1" => Op::Insert {
                    l,
                    r,
                    value: input.value("value")?,
                },
                b"2" => Op::Query {
                    l,
                    r,
                    k: input.value("k")?,
                },
                _ => return Err(Error::UnknownOp(String::from_utf8_lossy(&code).into_owned())),
            };
            ops.push(op);
        }

        if input.token().is_some() {
            warn!("ignoring trailing input after {} operations", m);
        }
        Ok(Self { n, ops })
    }

    /// Every value any insert will use; the universe of the structure.
    pub fn insert_values(&self) -> impl Iterator<Item = i64> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            Op::Insert { value, .. } => Some(value),
            Op::Query { .. } => None,
        })
    }

    /// Replays the log, writing one answer per query line.
    pub fn run(&self, order: Order, out: &mut impl Write) -> Result<RunStats> {
        let mut tree = RangeKth::from_values(self.n, self.insert_values());
        let mut stats = RunStats::default();

        for op in &self.ops {
            match *op {
                Op::Insert { l, r, value } => {
                    tree.insert(l, r, &value)?;
                    stats.inserts += 1;
                }
                Op::Query { l, r, k } => {
                    let value = tree.kth(l, r, k, order)?;
                    writeln!(out, "{}", value)?;
                    stats.queries += 1;
                }
            }
        }

        stats.inner_nodes = tree.inner_node_count();
        debug!(
            "replayed {} inserts and {} queries, {} inner nodes materialized",
            stats.inserts, stats.queries, stats.inner_nodes
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"2 5\n1 1 2 1\n1 1 2 2\n2 1 1 2\n2 1 1 1\n2 1 2 3\n";

    #[test]
    fn parses_ops() {
        let log = OpLog::parse(SAMPLE).unwrap();
        assert_eq!(log.n, 2);
        assert_eq!(log.ops.len(), 5);
        assert_eq!(log.ops[1], Op::Insert { l: 1, r: 2, value: 2 });
        assert_eq!(log.ops[4], Op::Query { l: 1, r: 2, k: 3 });
        assert_eq!(log.insert_values().collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn replays_sample() {
        let log = OpLog::parse(SAMPLE).unwrap();
        let mut out = vec![];
        let stats = log.run(Order::Largest, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n2\n1\n");
        assert_eq!((stats.inserts, stats.queries), (2, 3));
    }

    #[test]
    fn rejects_unknown_op() {
        let err = OpLog::parse(b"3 1\n7 1 2 3\n").unwrap_err();
        assert!(matches!(err, Error::UnknownOp(ref code) if code == "7"));
    }

    #[test]
    fn rejects_truncated_log() {
        let err = OpLog::parse(b"3 2\n1 1 2 3\n2 1").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { expected: "right bin" }));
    }
}
