use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use canopy_core::io::pnm::load_image;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file (plain-text format)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let (header, grid) = load_image(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Header:      {}", header.lines[0]);
    println!("             {}", header.lines[1]);
    println!("Dimensions:  {}x{}", grid.width(), grid.height());
    println!("Max value:   {}", grid.max_value());

    Ok(())
}
