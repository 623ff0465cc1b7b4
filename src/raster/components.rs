use std::collections::{BTreeSet, VecDeque};

use itertools::iproduct;
use ndarray::{Array2, ArrayView2, Zip};

use crate::PixelRect;

/// Labels the 8-connected components of `mask`.
///
/// Ids start at 1 and are assigned in raster scan order of each component's
/// first pixel. Background stays 0. Returns the label raster and the number
/// of components found.
pub fn label_components(mask: ArrayView2<bool>) -> (Array2<u32>, u32) {
    let (height, width) = mask.dim();
    let mut labels = Array2::<u32>::zeros((height, width));
    let mut count = 0;
    let mut queue = VecDeque::new();

    for ((y, x), &foreground) in mask.indexed_iter() {
        if !foreground || labels[[y, x]] != 0 {
            continue;
        }
        count += 1;
        labels[[y, x]] = count;
        queue.push_back((y, x));

        while let Some((cy, cx)) = queue.pop_front() {
            for (ny, nx) in neighbours_8(cy, cx, height, width) {
                if mask[[ny, nx]] && labels[[ny, nx]] == 0 {
                    labels[[ny, nx]] = count;
                    queue.push_back((ny, nx));
                }
            }
        }
    }

    (labels, count)
}

/// Keeps only the 8-connected components of `mask` that have at least one
/// pixel inside `seed`.
pub fn components_touching(mask: ArrayView2<bool>, seed: &PixelRect) -> Array2<bool> {
    let (labels, _) = label_components(mask);
    let touched: BTreeSet<u32> = seed
        .window(labels.view())
        .iter()
        .copied()
        .filter(|&id| id > 0)
        .collect();

    let mut result = Array2::from_elem(mask.dim(), false);
    if touched.is_empty() {
        return result;
    }
    Zip::from(&mut result)
        .and(&labels)
        .for_each(|r, id| *r = touched.contains(id));
    result
}

fn neighbours_8(
    y: usize,
    x: usize,
    height: usize,
    width: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let rows = y.saturating_sub(1)..=(y + 1).min(height - 1);
    let cols = x.saturating_sub(1)..=(x + 1).min(width - 1);
    iproduct!(rows, cols).filter(move |&p| p != (y, x))
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn diagonal_pixels_are_connected() {
        let mask = array![
            [true, false, false],
            [false, true, false],
            [false, false, true]
        ];
        let (labels, count) = label_components(mask.view());
        assert_eq!(count, 1);
        assert_eq!(labels, array![[1u32, 0, 0], [0, 1, 0], [0, 0, 1]]);
    }

    #[test]
    fn ids_follow_scan_order() {
        let mask = array![
            [false, false, true],
            [true, false, false],
            [true, false, true]
        ];
        let (labels, count) = label_components(mask.view());
        assert_eq!(count, 3);
        assert_eq!(labels, array![[0u32, 0, 1], [2, 0, 0], [2, 0, 3]]);
    }

    #[test]
    fn empty_mask_has_no_components() {
        let mask = Array2::from_elem((4, 4), false);
        let (labels, count) = label_components(mask.view());
        assert_eq!(count, 0);
        assert!(labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn keep_components_under_seed() {
        let mask = array![
            [true, true, false, true],
            [false, false, false, true],
            [true, false, false, false]
        ];
        let seed = PixelRect {
            rows: 0..1,
            cols: 0..1,
        };
        let kept = components_touching(mask.view(), &seed);
        assert_eq!(
            kept,
            array![
                [true, true, false, false],
                [false, false, false, false],
                [false, false, false, false]
            ]
        );
    }
}
