use ndarray::{Array2, ArrayView2};

use crate::{LabelRaster, Selection};

/// Grow a selection raster to every component it touches.
pub fn expand_raster(raster: ArrayView2<i32>, labels: &LabelRaster) -> Array2<i32> {
    labels.rebuild(&labels.touched_ids(raster))
}

/// Grow `selection` to every component it touches. The touched components
/// become the selected-label set.
pub fn expand(selection: &Selection, labels: &LabelRaster) -> Selection {
    Selection::from_labels(labels, labels.touched_ids(selection.raster()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ndarray::array;

    use super::*;

    fn labels() -> LabelRaster {
        LabelRaster::new(array![[1, 1, 0, 2], [1, 0, 0, 2], [0, 3, 3, 0]])
    }

    #[test]
    fn partial_component_grows() {
        let labels = labels();
        let raster = array![[-1, 1, 0, -1], [-1, 0, 0, -1], [0, -1, 3, 0]];
        assert_eq!(
            expand_raster(raster.view(), &labels),
            array![[1, 1, 0, -1], [1, 0, 0, -1], [0, 3, 3, 0]]
        );
    }

    #[test]
    fn expand_is_idempotent() {
        let labels = labels();
        let raster = array![[-1, -1, 0, 2], [1, 0, 0, -1], [0, -1, -1, 0]];
        let once = expand_raster(raster.view(), &labels);
        let twice = expand_raster(once.view(), &labels);
        assert_eq!(once, twice);
    }

    #[test]
    fn expand_selection_sets_labels() {
        let labels = labels();
        let mut selection = Selection::none(&labels);
        let mask = array![
            [false, false, false, true],
            [false, false, false, false],
            [false, false, false, false]
        ];
        selection.select_pixels(&labels, mask.view());
        let expanded = expand(&selection, &labels);
        assert_eq!(expanded.labels(), &BTreeSet::from([2]));
        assert_eq!(expand(&expanded, &labels), expanded);
        assert!(expand(&Selection::none(&labels), &labels).is_empty());
    }
}
