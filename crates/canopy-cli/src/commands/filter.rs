use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use canopy_core::filter::{apply_filter, FilterKind};
use canopy_core::io::pnm::{load_image, save_image};

#[derive(Clone, Copy, ValueEnum)]
pub enum FilterKindArg {
    Sobel,
    Mean,
}

impl From<FilterKindArg> for FilterKind {
    fn from(arg: FilterKindArg) -> Self {
        match arg {
            FilterKindArg::Sobel => FilterKind::Sobel,
            FilterKindArg::Mean => FilterKind::Mean,
        }
    }
}

#[derive(Args)]
pub struct FilterArgs {
    /// Input image file (plain-text format)
    pub file: PathBuf,

    /// Filter to apply
    #[arg(long, value_enum, default_value = "sobel")]
    pub kind: FilterKindArg,

    /// Output file path
    #[arg(short, long, default_value = "filtered.txt")]
    pub output: PathBuf,
}

pub fn run(args: &FilterArgs) -> Result<()> {
    let (header, mut grid) = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    println!("Loaded {}x{} image", grid.width(), grid.height());

    apply_filter(&mut grid, args.kind.into());

    save_image(&args.output, &header, &grid)?;
    println!("Saved to {}", args.output.display());

    Ok(())
}
