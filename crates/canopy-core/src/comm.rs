use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};

use ndarray::Array2;

use crate::error::{CanopyError, Result};
use crate::filter::FilterKind;
use crate::grid::PixelGrid;
use crate::stats::StatsVector;
use crate::topology::NodeId;

/// Everything that travels over a tree edge.
///
/// Receivers dispatch by pattern match on the variant. Payload-carrying
/// variants move ownership of their buffers with the message.
#[derive(Debug)]
pub enum Message {
    /// Discovery wave. The first sender becomes the receiver's parent.
    Wake,
    /// A bordered block of rows to filter.
    Chunk { kind: FilterKind, grid: PixelGrid },
    /// Filtered interior rows flowing back up, border columns included.
    RowsBack(Array2<i32>),
    /// Shutdown signal flowing down the tree.
    Stop,
    /// Statistics reduction reply flowing back up.
    Stats(StatsVector),
}

impl Message {
    /// Short name for protocol-violation diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Message::Wake => "Wake",
            Message::Chunk { .. } => "Chunk",
            Message::RowsBack(_) => "RowsBack",
            Message::Stop => "Stop",
            Message::Stats(_) => "Stats",
        }
    }
}

/// A message stamped with its sender, as delivered to a mailbox.
#[derive(Debug)]
pub struct Envelope {
    pub from: NodeId,
    pub msg: Message,
}

/// Send side of one node: its own id plus a sender handle per
/// neighbor. After discovery only tree edges are ever used.
pub struct Links {
    id: NodeId,
    peers: HashMap<NodeId, Sender<Envelope>>,
}

impl Links {
    pub fn new(id: NodeId, peers: HashMap<NodeId, Sender<Envelope>>) -> Self {
        Self { id, peers }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn send(&self, to: NodeId, msg: Message) -> Result<()> {
        let sender = self
            .peers
            .get(&to)
            .ok_or_else(|| CanopyError::Protocol(format!("node {} has no link to {to}", self.id)))?;
        sender
            .send(Envelope { from: self.id, msg })
            .map_err(|_| CanopyError::Worker(format!("node {to} hung up")))
    }
}

/// Receive side of one node.
///
/// All neighbors deliver into a single queue; `recv_from` gives the
/// source-addressed blocking receive the protocol needs by stashing
/// envelopes from other peers until they are asked for. Per-edge FIFO
/// order is preserved: stashed envelopes are replayed in arrival
/// order.
pub struct Mailbox {
    rx: Receiver<Envelope>,
    stash: VecDeque<Envelope>,
}

impl Mailbox {
    pub fn new(rx: Receiver<Envelope>) -> Self {
        Self {
            rx,
            stash: VecDeque::new(),
        }
    }

    /// Next envelope from any peer.
    pub fn recv_any(&mut self) -> Result<Envelope> {
        if let Some(envelope) = self.stash.pop_front() {
            return Ok(envelope);
        }
        self.rx
            .recv()
            .map_err(|_| CanopyError::Worker("all peers hung up".into()))
    }

    /// Next message from `peer`, blocking until one arrives. Messages
    /// from other peers received in the meantime are kept for later.
    pub fn recv_from(&mut self, peer: NodeId) -> Result<Message> {
        if let Some(pos) = self.stash.iter().position(|e| e.from == peer) {
            // remove keeps the remaining stash in arrival order
            return Ok(self.stash.remove(pos).expect("position just found").msg);
        }
        loop {
            let envelope = self
                .rx
                .recv()
                .map_err(|_| CanopyError::Worker(format!("node {peer} hung up")))?;
            if envelope.from == peer {
                return Ok(envelope.msg);
            }
            self.stash.push_back(envelope);
        }
    }
}

/// Build a mailbox and its feeding sender for one node.
pub fn mailbox() -> (Sender<Envelope>, Mailbox) {
    let (tx, rx) = channel();
    (tx, Mailbox::new(rx))
}
