mod common;

use std::fs;

use canopy_core::cluster::{self, Cluster};
use canopy_core::error::CanopyError;
use canopy_core::filter::{apply_filter, FilterKind};
use canopy_core::tasks::parse_tasks;
use canopy_core::topology::Topology;
use common::{ramp_grid, star_topology, uniform_grid};

// ---------------------------------------------------------------------------
// Partition scenarios through a live tree
// ---------------------------------------------------------------------------

#[test]
fn test_two_children_split_four_rows() {
    // Tree 0 -> {1, 2}, image 2 wide and 4 tall: child 1 gets rows
    // [1,2] (step = 2), child 2 the remainder [3,4].
    let topo = star_topology(3);
    let mut cluster = Cluster::spawn(&topo).unwrap();

    let mut grid = ramp_grid(2, 4);
    cluster.process(FilterKind::Sobel, &mut grid).unwrap();
    let stats = cluster.finish().unwrap();

    assert_eq!(stats.get(0), 0);
    assert_eq!(stats.get(1), 2);
    assert_eq!(stats.get(2), 2);

    // The distributed result matches filtering in one place.
    let mut expected = ramp_grid(2, 4);
    apply_filter(&mut expected, FilterKind::Sobel);
    assert_eq!(grid.interior(), expected.interior());
}

#[test]
fn test_single_node_filters_everything_itself() {
    let topo = Topology::new(vec![vec![]]);
    let mut cluster = Cluster::spawn(&topo).unwrap();

    let mut grid = ramp_grid(3, 5);
    cluster.process(FilterKind::Mean, &mut grid).unwrap();
    let stats = cluster.finish().unwrap();

    assert_eq!(stats.get(0), 5);
}

#[test]
fn test_idle_children_do_not_block_gather() {
    // 5 children, 2 rows: children 1 and 2 get one row each, 3..5
    // receive nothing and must not stall the cycle or the shutdown.
    let topo = star_topology(6);
    let mut cluster = Cluster::spawn(&topo).unwrap();

    let mut grid = ramp_grid(4, 2);
    cluster.process(FilterKind::Sobel, &mut grid).unwrap();
    let stats = cluster.finish().unwrap();

    assert_eq!(stats.get(1), 1);
    assert_eq!(stats.get(2), 1);
    for id in 3..6 {
        assert_eq!(stats.get(id), 0);
    }
}

#[test]
fn test_mean_identity_survives_the_tree() {
    // Ghost rows travel with each chunk, so a uniform image comes back
    // bit-identical through any topology.
    let topo = star_topology(4);
    let mut cluster = Cluster::spawn(&topo).unwrap();

    let mut grid = uniform_grid(5, 6, 100);
    cluster.process(FilterKind::Mean, &mut grid).unwrap();
    cluster.finish().unwrap();

    for &v in grid.interior().iter() {
        assert_eq!(v, 100);
    }
}

// ---------------------------------------------------------------------------
// Deeper trees and accumulation
// ---------------------------------------------------------------------------

#[test]
fn test_two_level_tree_statistics() {
    // 0 -> {1, 2}, 1 -> {3, 4}: rows [1,2] split again between the
    // grandchildren, rows [3,4] filtered by node 2.
    let topo = Topology::parse("0 1 2\n1 0 3 4\n2 0\n3 1\n4 1\n").unwrap();
    let mut cluster = Cluster::spawn(&topo).unwrap();

    let mut grid = ramp_grid(3, 4);
    cluster.process(FilterKind::Sobel, &mut grid).unwrap();
    let stats = cluster.finish().unwrap();

    assert_eq!(stats.get(0), 0);
    assert_eq!(stats.get(1), 0); // internal node filters nothing itself
    assert_eq!(stats.get(2), 2);
    assert_eq!(stats.get(3), 1);
    assert_eq!(stats.get(4), 1);
    assert_eq!(stats.total(), 4);

    let mut expected = ramp_grid(3, 4);
    apply_filter(&mut expected, FilterKind::Sobel);
    assert_eq!(grid.interior(), expected.interior());
}

#[test]
fn test_statistics_accumulate_across_tasks() {
    let topo = star_topology(3);
    let mut cluster = Cluster::spawn(&topo).unwrap();

    let mut first = ramp_grid(2, 4);
    cluster.process(FilterKind::Sobel, &mut first).unwrap();
    let mut second = ramp_grid(2, 5);
    cluster.process(FilterKind::Mean, &mut second).unwrap();

    let stats = cluster.finish().unwrap();
    // 4 rows then 5 rows, every row counted exactly once
    assert_eq!(stats.total(), 9);
    assert_eq!(stats.get(1), 4); // 2 + 2
    assert_eq!(stats.get(2), 5); // 2 + 3
}

#[test]
fn test_spawn_rejects_non_tree_topology() {
    let triangle = Topology::new(vec![vec![1, 2], vec![0, 2], vec![0, 1]]);
    assert!(matches!(
        Cluster::spawn(&triangle),
        Err(CanopyError::Topology(_))
    ));
}

// ---------------------------------------------------------------------------
// End-to-end file run
// ---------------------------------------------------------------------------

#[test]
fn test_run_task_list_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let img = dir.path().join("in.txt");
    let out_sobel = dir.path().join("sobel.txt");
    let out_mean = dir.path().join("mean.txt");

    fs::write(&img, "P2\n# test\n3 4\n255\n10 20 30\n40 50 60\n70 80 90\n100 110 120\n").unwrap();

    let topo = Topology::parse("0 1 2\n1 0\n2 0\n").unwrap();
    let tasks = parse_tasks(&format!(
        "2\nsobel {} {}\nmean removal {} {}\n",
        img.display(),
        out_sobel.display(),
        img.display(),
        out_mean.display()
    ))
    .unwrap();

    let stats = cluster::run(&topo, &tasks).unwrap();

    // 4 rows per task, two tasks, no row dropped or double-counted
    assert_eq!(stats.total(), 8);
    assert_eq!(stats.get(0), 0);

    // Outputs match single-node filtering of the same image
    let (header, original) = canopy_core::io::pnm::load_image(&img).unwrap();
    for (kind, path) in [(FilterKind::Sobel, &out_sobel), (FilterKind::Mean, &out_mean)] {
        let mut expected = original.clone();
        apply_filter(&mut expected, kind);
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            canopy_core::io::pnm::render_image(&header, &expected)
        );
    }
}

#[test]
fn test_run_skips_unreadable_task() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    let bad = dir.path().join("bad.txt");
    let out_good = dir.path().join("out_good.txt");
    let out_bad = dir.path().join("out_bad.txt");

    fs::write(&good, "P2\n#\n2 2\n255\n1 2\n3 4\n").unwrap();
    fs::write(&bad, "P2\n#\n-2 2\n255\n").unwrap();

    let topo = star_topology(2);
    let tasks = parse_tasks(&format!(
        "2\nsobel {} {}\nsobel {} {}\n",
        bad.display(),
        out_bad.display(),
        good.display(),
        out_good.display()
    ))
    .unwrap();

    let stats = cluster::run(&topo, &tasks).unwrap();

    // The malformed image lost only its own task
    assert!(!out_bad.exists());
    assert!(out_good.exists());
    assert_eq!(stats.total(), 2);
    assert_eq!(stats.get(1), 2);
}
