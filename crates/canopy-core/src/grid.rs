use ndarray::{s, Array2, ArrayView2};

use crate::error::{CanopyError, Result};
use crate::partition::RowRange;

/// A rectangular pixel block with a one-cell ghost border on every side.
///
/// `width` and `height` describe the interior; the backing array is
/// `(height + 2) x (width + 2)`. Interior rows are indexed `1..=height`
/// and interior columns `1..=width`. Border cells are supplied by
/// whoever produced the grid and are never recomputed locally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    max_value: i32,
    data: Array2<i32>,
}

impl PixelGrid {
    /// Create a zero-filled grid with the given interior dimensions.
    pub fn new(width: usize, height: usize, max_value: i32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CanopyError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        Ok(Self {
            width,
            height,
            max_value,
            data: Array2::zeros((height + 2, width + 2)),
        })
    }

    /// Wrap an existing bordered array. The array shape must already
    /// include the ghost border.
    pub fn from_bordered(data: Array2<i32>, max_value: i32) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows < 3 || cols < 3 {
            return Err(CanopyError::InvalidDimensions {
                width: cols as i64 - 2,
                height: rows as i64 - 2,
            });
        }
        Ok(Self {
            width: cols - 2,
            height: rows - 2,
            max_value,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    /// The full backing array, border included.
    pub fn bordered(&self) -> &Array2<i32> {
        &self.data
    }

    pub fn bordered_mut(&mut self) -> &mut Array2<i32> {
        &mut self.data
    }

    /// View of the interior, border excluded.
    pub fn interior(&self) -> ArrayView2<'_, i32> {
        self.data
            .slice(s![1..=self.height, 1..=self.width])
    }

    /// Interior pixel at `(row, col)`, both 1-based.
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[[row, col]]
    }

    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[[row, col]] = value;
    }

    /// Cut the chunk for one child: the range's interior rows plus the
    /// adjacent row above and below, full width with border columns.
    /// The result is a self-contained bordered grid of height `range.len`.
    pub fn chunk(&self, range: RowRange) -> Self {
        let data = self
            .data
            .slice(s![range.start - 1..=range.start + range.len, ..])
            .to_owned();
        Self {
            width: self.width,
            height: range.len,
            max_value: self.max_value,
            data,
        }
    }

    /// Copy of the interior rows `[start, start + len)` (1-based),
    /// border columns included, border rows excluded.
    pub fn rows(&self, start: usize, len: usize) -> Array2<i32> {
        self.data.slice(s![start..start + len, ..]).to_owned()
    }

    /// All interior rows, border columns included. Used to ship a
    /// finished chunk back to the parent.
    pub fn interior_rows(&self) -> Array2<i32> {
        self.rows(1, self.height)
    }

    /// Overwrite interior rows starting at 1-based `start` with rows
    /// received from a child. Incoming rows carry border columns but
    /// only their interior columns are trusted; border columns are
    /// copied through unchanged since they match by construction.
    pub fn write_rows(&mut self, start: usize, rows: &Array2<i32>) -> Result<()> {
        let (n, cols) = rows.dim();
        if cols != self.width + 2 || start == 0 || start + n > self.height + 1 {
            return Err(CanopyError::Protocol(format!(
                "row block {n}x{cols} at row {start} does not fit a {}x{} grid",
                self.width, self.height
            )));
        }
        self.data.slice_mut(s![start..start + n, ..]).assign(rows);
        Ok(())
    }
}
