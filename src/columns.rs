use ndarray::{s, Array2};

use crate::{LabelRaster, Selection, BACKGROUND};

/// Pixel range `start..end` along the x axis occupied by one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ColumnBounds {
    pub start: usize,
    pub end: usize,
}

impl ColumnBounds {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Foreground pixels to the right of the selection, column by column.
///
/// For every row of a column the last selected pixel is located, and every
/// foreground pixel after it up to the column end becomes a candidate. Rows
/// without a selected pixel in that column yield nothing. A selection at the
/// column's first pixel counts like any other.
pub fn select_right_candidates(
    selection: &Selection,
    labels: &LabelRaster,
    bounds: &[ColumnBounds],
) -> Array2<bool> {
    let (height, width) = labels.dim();
    let raster = selection.raster();
    let data = labels.view();
    let mut mask = Array2::from_elem((height, width), false);

    for bound in bounds {
        let end = bound.end.min(width);
        if bound.start >= end {
            continue;
        }
        for y in 0..height {
            let row = raster.slice(s![y, bound.start..end]);
            let Some(last) = row.iter().rposition(|&s| s > BACKGROUND) else {
                continue;
            };
            for x in bound.start + last + 1..end {
                mask[[y, x]] = data[[y, x]] > 0;
            }
        }
    }
    mask
}
