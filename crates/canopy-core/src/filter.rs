use crate::grid::PixelGrid;

/// Largest value a filtered pixel may take.
pub const MAX_PIXEL_VALUE: i32 = 255;

/// The convolution filters a task can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    /// Horizontal edge detection, biased to mid-gray.
    Sobel,
    /// Smoothing kernel (zero-sum weights, identity on uniform input).
    Mean,
}

impl FilterKind {
    /// 3x3 weight matrix, row-major.
    pub fn kernel(self) -> [[i32; 3]; 3] {
        match self {
            FilterKind::Sobel => [[1, 0, -1], [2, 0, -2], [1, 0, -1]],
            FilterKind::Mean => [[-1, -1, -1], [-1, 9, -1], [-1, -1, -1]],
        }
    }

    /// Constant added to every weighted sum before clamping.
    pub fn offset(self) -> i32 {
        match self {
            FilterKind::Sobel => 127,
            FilterKind::Mean => 0,
        }
    }
}

/// Convolve the grid's interior with the 3x3 kernel for `kind`.
///
/// Every interior cell is replaced by the weighted sum of its 3x3
/// neighborhood read from a snapshot of the pre-filter grid, plus the
/// kernel offset, clamped to `[0, 255]`. Border cells are left
/// untouched; the caller never reads them after filtering.
pub fn apply_filter(grid: &mut PixelGrid, kind: FilterKind) {
    let kernel = kind.kernel();
    let offset = kind.offset();
    let (h, w) = (grid.height(), grid.width());
    let snapshot = grid.bordered().clone();

    for row in 1..=h {
        for col in 1..=w {
            let mut sum = offset;
            for (kr, weights) in kernel.iter().enumerate() {
                for (kc, &weight) in weights.iter().enumerate() {
                    sum += weight * snapshot[[row + kr - 1, col + kc - 1]];
                }
            }
            grid.set(row, col, sum.clamp(0, MAX_PIXEL_VALUE));
        }
    }
}
