use std::collections::HashMap;
use std::thread::JoinHandle;

use tracing::{info, warn};

use crate::comm::{mailbox, Links};
use crate::discovery::discover;
use crate::error::{CanopyError, Result};
use crate::filter::FilterKind;
use crate::grid::PixelGrid;
use crate::io::pnm;
use crate::node::NodeRuntime;
use crate::stats::StatsVector;
use crate::tasks::FilterTask;
use crate::topology::{NodeId, Topology};

/// The coordinating node's id within the cluster.
pub const ROOT: NodeId = 0;

/// A running filtering tree: one thread per non-root node, the root
/// runtime living on the caller's thread.
///
/// This is the single-process stand-in for a real process group. Each
/// node owns a mailbox; send handles are restricted to its neighbors,
/// so after discovery no message can traverse a non-tree edge.
pub struct Cluster {
    root: NodeRuntime,
    workers: Vec<JoinHandle<Result<StatsVector>>>,
}

impl Cluster {
    /// Validate the topology, wire the channels, spawn the worker
    /// threads, and run spanning-tree discovery on every node.
    pub fn spawn(topology: &Topology) -> Result<Self> {
        topology.validate_tree(ROOT)?;
        let n = topology.len();

        let mut senders = Vec::with_capacity(n);
        let mut mailboxes = Vec::with_capacity(n);
        for _ in 0..n {
            let (tx, mb) = mailbox();
            senders.push(tx);
            mailboxes.push(Some(mb));
        }

        let mut workers = Vec::with_capacity(n.saturating_sub(1));
        for id in 1..n {
            let neighbors = topology.neighbors_of(id).to_vec();
            let peers: HashMap<NodeId, _> = neighbors
                .iter()
                .map(|&peer| (peer, senders[peer].clone()))
                .collect();
            let links = Links::new(id, peers);
            let mut mb = mailboxes[id].take().expect("mailbox taken once");

            let handle = std::thread::Builder::new()
                .name(format!("canopy-node-{id}"))
                .spawn(move || {
                    let tree = discover(ROOT, &neighbors, &links, &mut mb)?;
                    NodeRuntime::new(tree, links, mb, n).run_worker()
                })
                .map_err(CanopyError::Io)?;
            workers.push(handle);
        }

        let root_neighbors = topology.neighbors_of(ROOT).to_vec();
        let peers: HashMap<NodeId, _> = root_neighbors
            .iter()
            .map(|&peer| (peer, senders[peer].clone()))
            .collect();
        let links = Links::new(ROOT, peers);
        let mut mb = mailboxes[ROOT].take().expect("mailbox taken once");
        // Harness-held send handles die here so that a vanished worker
        // is observable as a disconnected channel.
        drop(senders);

        let tree = discover(ROOT, &root_neighbors, &links, &mut mb)?;
        info!(nodes = n, root_children = tree.children.len(), "cluster up");
        let root = NodeRuntime::new(tree, links, mb, n);

        Ok(Self { root, workers })
    }

    /// Run one task's scatter/filter/gather cycle on the root.
    pub fn process(&mut self, kind: FilterKind, grid: &mut PixelGrid) -> Result<()> {
        self.root.process(kind, grid)
    }

    /// Stop every node, reduce the statistics up the tree, join the
    /// worker threads, and return the final vector.
    pub fn finish(self) -> Result<StatsVector> {
        let stats = self.root.shutdown()?;
        for handle in self.workers {
            match handle.join() {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => return Err(err),
                Err(_) => return Err(CanopyError::Worker("node thread panicked".into())),
            }
        }
        Ok(stats)
    }
}

/// Run a full task list over the given topology and return the final
/// statistics vector. Each task decodes its input image at the root,
/// pushes it through the tree, and writes the filtered result.
///
/// A task whose image cannot be read or decoded is skipped with a
/// warning; the tree never sees it, so the run continues with the
/// next task. Protocol and worker failures still abort the run.
pub fn run(topology: &Topology, tasks: &[FilterTask]) -> Result<StatsVector> {
    let mut cluster = Cluster::spawn(topology)?;
    for task in tasks {
        let (header, mut grid) = match pnm::load_image(&task.input) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(input = %task.input.display(), %err, "skipping task");
                continue;
            }
        };
        info!(
            input = %task.input.display(),
            kind = ?task.kind,
            width = grid.width(),
            height = grid.height(),
            "processing task"
        );
        cluster.process(task.kind, &mut grid)?;
        pnm::save_image(&task.output, &header, &grid)?;
    }
    cluster.finish()
}
