use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use canopy_core::cluster::Cluster;
use canopy_core::io::pnm::{load_image, save_image};
use canopy_core::tasks::load_tasks;
use canopy_core::topology::Topology;

#[derive(Args)]
pub struct RunArgs {
    /// Adjacency-list file describing the worker tree
    pub topology: PathBuf,

    /// Task-list file
    pub tasks: PathBuf,

    /// Statistics output path
    #[arg(short, long, default_value = "statistics.txt")]
    pub stats: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let topology = Topology::load(&args.topology)
        .with_context(|| format!("Failed to load topology {}", args.topology.display()))?;
    let tasks = load_tasks(&args.tasks)
        .with_context(|| format!("Failed to load task list {}", args.tasks.display()))?;

    let title = Style::new().cyan().bold();
    let label = Style::new().dim();
    println!("{}", title.apply_to("Canopy"));
    println!("  {:<12}{}", label.apply_to("Nodes"), topology.len());
    println!("  {:<12}{}", label.apply_to("Tasks"), tasks.len());
    println!("  {:<12}{}", label.apply_to("Stats"), args.stats.display());
    println!();

    let mut cluster = Cluster::spawn(&topology).context("Failed to start the worker tree")?;

    let pb = ProgressBar::new(tasks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:30} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    for task in &tasks {
        pb.set_message(task.input.display().to_string());
        // A bad input image only loses its own task.
        match load_image(&task.input) {
            Ok((header, mut grid)) => {
                cluster.process(task.kind, &mut grid)?;
                save_image(&task.output, &header, &grid)
                    .with_context(|| format!("Failed to write {}", task.output.display()))?;
            }
            Err(err) => {
                pb.println(format!("skipping {}: {err}", task.input.display()));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    let stats = cluster.finish()?;
    stats
        .save(&args.stats)
        .with_context(|| format!("Failed to write {}", args.stats.display()))?;

    println!("\nRows filtered per node:");
    print!("{}", stats.render());

    Ok(())
}
