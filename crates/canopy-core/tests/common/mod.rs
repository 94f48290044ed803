use ndarray::Array2;

use canopy_core::grid::PixelGrid;
use canopy_core::topology::Topology;

/// Grid whose every cell — border included — holds `fill`.
pub fn uniform_grid(width: usize, height: usize, fill: i32) -> PixelGrid {
    let data = Array2::from_elem((height + 2, width + 2), fill);
    PixelGrid::from_bordered(data, 255).unwrap()
}

/// Grid with zero borders and a distinct value per interior cell.
pub fn ramp_grid(width: usize, height: usize) -> PixelGrid {
    let mut grid = PixelGrid::new(width, height, 255).unwrap();
    for row in 1..=height {
        for col in 1..=width {
            grid.set(row, col, ((row - 1) * width + col) as i32);
        }
    }
    grid
}

/// Star tree: node 0 adjacent to every other node.
pub fn star_topology(nodes: usize) -> Topology {
    let mut lists = vec![(1..nodes).collect::<Vec<_>>()];
    for _ in 1..nodes {
        lists.push(vec![0]);
    }
    Topology::new(lists)
}

/// Chain tree: 0 - 1 - 2 - ... - (nodes - 1).
pub fn chain_topology(nodes: usize) -> Topology {
    let lists = (0..nodes)
        .map(|id| {
            let mut peers = Vec::new();
            if id > 0 {
                peers.push(id - 1);
            }
            if id + 1 < nodes {
                peers.push(id + 1);
            }
            peers
        })
        .collect();
    Topology::new(lists)
}
