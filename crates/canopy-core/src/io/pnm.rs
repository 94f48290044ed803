//! Plain-text image format: two opaque header lines copied verbatim
//! from input to output, then `width height`, then the maximum pixel
//! value, then `width * height` integers in row-major order. Output
//! pixels are written one per line.

use std::fs;
use std::path::Path;

use crate::error::{CanopyError, Result};
use crate::grid::PixelGrid;

/// The two leading header lines, carried through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    pub lines: [String; 2],
}

pub fn load_image(path: &Path) -> Result<(ImageHeader, PixelGrid)> {
    let contents = fs::read_to_string(path)?;
    parse_image(&contents)
}

pub fn parse_image(contents: &str) -> Result<(ImageHeader, PixelGrid)> {
    let mut lines = contents.lines();
    let first = lines
        .next()
        .ok_or_else(|| CanopyError::InvalidImage("missing header".into()))?
        .to_string();
    let second = lines
        .next()
        .ok_or_else(|| CanopyError::InvalidImage("missing second header line".into()))?
        .to_string();

    let rest = lines.collect::<Vec<_>>().join("\n");
    let mut tokens = rest.split_whitespace();
    let mut next_int = |what: &str| -> Result<i64> {
        tokens
            .next()
            .ok_or_else(|| CanopyError::InvalidImage(format!("missing {what}")))?
            .parse::<i64>()
            .map_err(|_| CanopyError::InvalidImage(format!("{what} is not an integer")))
    };

    let width = next_int("width")?;
    let height = next_int("height")?;
    if width <= 0 || height <= 0 {
        return Err(CanopyError::InvalidDimensions { width, height });
    }
    let (width, height) = (width as usize, height as usize);
    let max_value = next_int("max value")? as i32;

    let mut grid = PixelGrid::new(width, height, max_value)?;
    for row in 1..=height {
        for col in 1..=width {
            grid.set(row, col, next_int("pixel")? as i32);
        }
    }

    Ok((
        ImageHeader {
            lines: [first, second],
        },
        grid,
    ))
}

pub fn save_image(path: &Path, header: &ImageHeader, grid: &PixelGrid) -> Result<()> {
    fs::write(path, render_image(header, grid))?;
    Ok(())
}

pub fn render_image(header: &ImageHeader, grid: &PixelGrid) -> String {
    let mut out = String::with_capacity(grid.width() * grid.height() * 4 + 64);
    out.push_str(&header.lines[0]);
    out.push('\n');
    out.push_str(&header.lines[1]);
    out.push('\n');
    out.push_str(&format!("{} {}\n", grid.width(), grid.height()));
    out.push_str(&format!("{}\n", grid.max_value()));
    for value in grid.interior().iter() {
        out.push_str(&format!("{value}\n"));
    }
    out
}
