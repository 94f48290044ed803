use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::topology::NodeId;

/// Per-node count of interior rows filtered directly by that node,
/// accumulated across all tasks.
///
/// Only nodes that act as a leaf ever add to their own slot; internal
/// nodes' slots stay at whatever was last merged from descendants
/// (zero in a well-formed run). One vector travels up each tree edge
/// during shutdown, merged on receive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsVector {
    rows: Vec<u64>,
}

impl StatsVector {
    pub fn new(node_count: usize) -> Self {
        Self {
            rows: vec![0; node_count],
        }
    }

    pub fn add(&mut self, id: NodeId, rows: u64) {
        self.rows[id] += rows;
    }

    pub fn get(&self, id: NodeId) -> u64 {
        self.rows[id]
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().sum()
    }

    /// Fold a child's reply into this vector: any nonzero entry in the
    /// child's vector overwrites the local one. Zero entries carry no
    /// information (a node that filtered nothing reports zero), so they
    /// never clobber counts merged from other subtrees.
    pub fn merge(&mut self, other: &StatsVector) {
        for (local, &remote) in self.rows.iter_mut().zip(&other.rows) {
            if remote != 0 {
                *local = remote;
            }
        }
    }

    /// Render as the statistics file format: one `<id>: <rows>` line
    /// per node in increasing id order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (id, rows) in self.rows.iter().enumerate() {
            let _ = writeln!(out, "{id}: {rows}");
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}
