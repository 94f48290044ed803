use tracing::{debug, info};

use crate::comm::{Links, Mailbox, Message};
use crate::error::{CanopyError, Result};
use crate::filter::{apply_filter, FilterKind};
use crate::grid::PixelGrid;
use crate::partition::plan_rows;
use crate::stats::StatsVector;
use crate::topology::TreeNode;

/// Per-node runtime state after discovery: the node's place in the
/// tree, its communication endpoints, and its statistics vector.
///
/// The root drives it once per task via [`NodeRuntime::process`] and
/// closes the run with [`NodeRuntime::shutdown`]; every other node
/// loops in [`NodeRuntime::run_worker`] until its parent sends `Stop`.
pub struct NodeRuntime {
    tree: TreeNode,
    links: Links,
    mailbox: Mailbox,
    stats: StatsVector,
}

impl NodeRuntime {
    pub fn new(tree: TreeNode, links: Links, mailbox: Mailbox, node_count: usize) -> Self {
        Self {
            tree,
            links,
            mailbox,
            stats: StatsVector::new(node_count),
        }
    }

    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    /// Run one scatter/filter/gather cycle on `grid`.
    ///
    /// A leaf filters the whole grid itself and charges its own
    /// statistics slot; an internal node splits the rows across its
    /// children and folds their results back in at the same offsets.
    pub fn process(&mut self, kind: FilterKind, grid: &mut PixelGrid) -> Result<()> {
        if self.tree.is_leaf() {
            apply_filter(grid, kind);
            self.stats.add(self.tree.id, grid.height() as u64);
            debug!(node = self.tree.id, rows = grid.height(), "filtered locally");
            return Ok(());
        }
        self.scatter(kind, grid)?;
        self.gather(grid)
    }

    fn scatter(&mut self, kind: FilterKind, grid: &PixelGrid) -> Result<()> {
        let plan = plan_rows(grid.height(), self.tree.children.len());
        debug!(
            node = self.tree.id,
            rows = grid.height(),
            active_children = plan.len(),
            "scatter"
        );
        for (&child, &range) in self.tree.children.iter().zip(&plan) {
            self.links.send(
                child,
                Message::Chunk {
                    kind,
                    grid: grid.chunk(range),
                },
            )?;
        }
        Ok(())
    }

    fn gather(&mut self, grid: &mut PixelGrid) -> Result<()> {
        // Recomputing the same plan from the same inputs is what keeps
        // scatter and gather offsets in agreement.
        let plan = plan_rows(grid.height(), self.tree.children.len());
        for (&child, &range) in self.tree.children.iter().zip(&plan) {
            match self.mailbox.recv_from(child)? {
                Message::RowsBack(rows) if rows.nrows() == range.len => {
                    grid.write_rows(range.start, &rows)?;
                }
                Message::RowsBack(rows) => {
                    return Err(CanopyError::Protocol(format!(
                        "node {} returned {} rows, expected {}",
                        child,
                        rows.nrows(),
                        range.len
                    )));
                }
                other => {
                    return Err(CanopyError::Protocol(format!(
                        "node {} expected RowsBack from {child}, got {}",
                        self.tree.id,
                        other.kind_name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Main loop for every non-root node: block on the parent, process
    /// chunks until `Stop` arrives, then join the statistics reduction
    /// and return this subtree's merged vector.
    pub fn run_worker(mut self) -> Result<StatsVector> {
        let parent = self.tree.parent.ok_or_else(|| {
            CanopyError::Protocol(format!("node {} has no parent to serve", self.tree.id))
        })?;

        loop {
            match self.mailbox.recv_from(parent)? {
                Message::Chunk { kind, mut grid } => {
                    self.process(kind, &mut grid)?;
                    // Only interior rows go back; the parent's copy of
                    // the border rows is already correct.
                    self.links.send(parent, Message::RowsBack(grid.interior_rows()))?;
                }
                Message::Stop => {
                    self.reduce_children_stats()?;
                    info!(node = self.tree.id, "terminating");
                    self.links.send(parent, Message::Stats(self.stats.clone()))?;
                    return Ok(self.stats);
                }
                other => {
                    return Err(CanopyError::Protocol(format!(
                        "node {} expected Chunk or Stop, got {}",
                        self.tree.id,
                        other.kind_name()
                    )));
                }
            }
        }
    }

    /// Root side of the shutdown: push `Stop` down the tree, fold every
    /// child's statistics reply into the local vector, and hand the
    /// final vector to the caller for persisting.
    pub fn shutdown(mut self) -> Result<StatsVector> {
        self.reduce_children_stats()?;
        info!(total_rows = self.stats.total(), "statistics reduction complete");
        Ok(self.stats)
    }

    /// Forward `Stop` to all children in stored order, then block for
    /// each child's `Stats` reply in the same order, merging
    /// nonzero-overwrites into the local vector.
    fn reduce_children_stats(&mut self) -> Result<()> {
        for &child in &self.tree.children {
            self.links.send(child, Message::Stop)?;
        }
        for &child in &self.tree.children {
            match self.mailbox.recv_from(child)? {
                Message::Stats(partial) => self.stats.merge(&partial),
                other => {
                    return Err(CanopyError::Protocol(format!(
                        "node {} expected Stats from {child}, got {}",
                        self.tree.id,
                        other.kind_name()
                    )));
                }
            }
        }
        Ok(())
    }
}
