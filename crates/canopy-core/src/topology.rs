use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use crate::error::{CanopyError, Result};

/// Index of a node within the cluster. Node 0 is always the root.
pub type NodeId = usize;

/// Per-node ordered neighbor lists for the whole cluster.
///
/// Parsed from the adjacency file: one line per node in increasing id
/// order, each line holding the node's own id followed by its neighbor
/// ids, whitespace-separated. Neighbor order is load-bearing — the
/// partition planner indexes children positionally — so it is kept
/// exactly as written.
#[derive(Clone, Debug)]
pub struct Topology {
    neighbors: Vec<Vec<NodeId>>,
}

impl Topology {
    pub fn new(neighbors: Vec<Vec<NodeId>>) -> Self {
        Self { neighbors }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut neighbors = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut ids = line.split_whitespace().map(|tok| {
                tok.parse::<NodeId>().map_err(|_| {
                    CanopyError::InvalidTopologyFile(format!(
                        "line {}: '{tok}' is not a node id",
                        lineno + 1
                    ))
                })
            });
            let own = ids.next().ok_or_else(|| {
                CanopyError::InvalidTopologyFile(format!("line {}: empty", lineno + 1))
            })??;
            if own != neighbors.len() {
                return Err(CanopyError::InvalidTopologyFile(format!(
                    "line {}: expected node {}, found {own}",
                    lineno + 1,
                    neighbors.len()
                )));
            }
            neighbors.push(ids.collect::<Result<Vec<_>>>()?);
        }
        if neighbors.is_empty() {
            return Err(CanopyError::InvalidTopologyFile("no nodes".into()));
        }
        Ok(Self { neighbors })
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn neighbors_of(&self, id: NodeId) -> &[NodeId] {
        &self.neighbors[id]
    }

    /// Check the assumed precondition that the adjacency description is
    /// a single tree over all nodes: every neighbor id in range, the
    /// relation symmetric, exactly `n - 1` edges, and every node
    /// reachable from `root`. The discovery protocol itself runs
    /// unguarded, so this is verified once before any node starts.
    pub fn validate_tree(&self, root: NodeId) -> Result<()> {
        let n = self.len();
        if root >= n {
            return Err(CanopyError::Topology(format!("root {root} out of range")));
        }

        let mut edge_ends = 0usize;
        for (id, peers) in self.neighbors.iter().enumerate() {
            for &peer in peers {
                if peer >= n {
                    return Err(CanopyError::Topology(format!(
                        "node {id} lists unknown neighbor {peer}"
                    )));
                }
                if peer == id {
                    return Err(CanopyError::Topology(format!("node {id} lists itself")));
                }
                if !self.neighbors[peer].contains(&id) {
                    return Err(CanopyError::Topology(format!(
                        "edge {id}-{peer} is not symmetric"
                    )));
                }
                edge_ends += 1;
            }
        }
        if edge_ends != 2 * (n - 1) {
            return Err(CanopyError::Topology(format!(
                "{} edges for {n} nodes, expected {}",
                edge_ends / 2,
                n - 1
            )));
        }

        // n - 1 symmetric edges + full reachability means acyclic.
        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([root]);
        seen[root] = true;
        while let Some(id) = queue.pop_front() {
            for &peer in &self.neighbors[id] {
                if !seen[peer] {
                    seen[peer] = true;
                    queue.push_back(peer);
                }
            }
        }
        if let Some(unreached) = seen.iter().position(|&s| !s) {
            return Err(CanopyError::Topology(format!(
                "node {unreached} is unreachable from the root"
            )));
        }
        Ok(())
    }
}

/// Parent/children view of one node after spanning-tree discovery.
///
/// `parent` is `None` only for the root. `children` preserves the
/// relative order of the adjacency list minus the parent; the same
/// order drives both scatter/gather and the statistics reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
