use tracing::debug;

use crate::comm::{Links, Mailbox, Message};
use crate::error::{CanopyError, Result};
use crate::topology::{NodeId, TreeNode};

/// One-shot spanning-tree formation, run once per node at startup.
///
/// The root wakes every neighbor in adjacency order. Every other node
/// blocks for exactly one `Wake`; its sender becomes the parent, the
/// parent is removed from the neighbor list (relative order of the
/// rest preserved), and the wave is forwarded to the remaining
/// neighbors. No acknowledgements: on a valid tree each non-root node
/// receives exactly one wake, so the wave terminates after
/// diameter-many hops. The cluster validates the topology before any
/// node runs, which is what rules out stray or missing wakes.
pub fn discover(
    root: NodeId,
    neighbors: &[NodeId],
    links: &Links,
    mailbox: &mut Mailbox,
) -> Result<TreeNode> {
    let id = links.id();

    if id == root {
        for &peer in neighbors {
            links.send(peer, Message::Wake)?;
        }
        debug!(node = id, children = ?neighbors, "discovery: root woke its neighbors");
        return Ok(TreeNode {
            id,
            parent: None,
            children: neighbors.to_vec(),
        });
    }

    let envelope = mailbox.recv_any()?;
    let parent = match envelope.msg {
        Message::Wake => envelope.from,
        other => {
            return Err(CanopyError::Protocol(format!(
                "node {id} expected Wake during discovery, got {}",
                other.kind_name()
            )))
        }
    };

    let children: Vec<NodeId> = neighbors.iter().copied().filter(|&n| n != parent).collect();
    for &child in &children {
        links.send(child, Message::Wake)?;
    }
    debug!(node = id, parent, children = ?children, "discovery: adopted parent");

    Ok(TreeNode {
        id,
        parent: Some(parent),
        children,
    })
}
