use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView2, Zip};

use crate::{LabelRaster, BACKGROUND, UNSELECTED};

/// Pixel-level selection state of one selectable object.
///
/// `raster` uses the encoding of the selection raster: `-1` for unselected
/// pixels, `0` for background and the pixel's own label id for selected
/// pixels. `labels` holds the components that are selected as a whole and
/// is always a subset of the ids still present in `raster`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    raster: Array2<i32>,
    labels: BTreeSet<u32>,
}

impl Selection {
    pub fn none(labels: &LabelRaster) -> Self {
        Self {
            raster: labels.no_selection(),
            labels: BTreeSet::new(),
        }
    }

    pub fn all(labels: &LabelRaster) -> Self {
        Self {
            raster: labels.all_selected(),
            labels: labels.ids(),
        }
    }

    /// Selects exactly the components in `ids`. Unknown ids are dropped.
    pub fn from_labels(labels: &LabelRaster, ids: BTreeSet<u32>) -> Self {
        let present = labels.ids();
        Self {
            raster: labels.rebuild(&ids),
            labels: ids.intersection(&present).copied().collect(),
        }
    }

    pub fn raster(&self) -> ArrayView2<'_, i32> {
        self.raster.view()
    }

    pub fn labels(&self) -> &BTreeSet<u32> {
        &self.labels
    }

    pub fn dim(&self) -> (usize, usize) {
        self.raster.dim()
    }

    /// Mask of all selected pixels.
    pub fn selected_part(&self) -> Array2<bool> {
        self.raster.mapv(|s| s > BACKGROUND)
    }

    pub fn selected_count(&self) -> usize {
        self.raster.iter().filter(|&&s| s > BACKGROUND).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.raster.iter().any(|&s| s > BACKGROUND)
    }

    /// Select every foreground pixel under `mask`.
    pub(crate) fn select_pixels(&mut self, labels: &LabelRaster, mask: ArrayView2<bool>) {
        Zip::from(&mut self.raster)
            .and(labels.view())
            .and(mask)
            .for_each(|s, &l, &m| {
                if m && l > 0 {
                    *s = l as i32;
                }
            });
    }

    /// Unselect every foreground pixel under `mask`.
    pub(crate) fn unselect_pixels(&mut self, mask: ArrayView2<bool>) {
        Zip::from(&mut self.raster).and(mask).for_each(|s, &m| {
            if m && *s != BACKGROUND {
                *s = UNSELECTED;
            }
        });
    }

    /// Set the whole-component selection state of `ids`, leaving all other
    /// pixels untouched.
    pub(crate) fn set_components(
        &mut self,
        labels: &LabelRaster,
        ids: &BTreeSet<u32>,
        selected: bool,
    ) {
        Zip::from(&mut self.raster)
            .and(labels.view())
            .for_each(|s, &l| {
                if l > 0 && ids.contains(&l) {
                    *s = if selected { l as i32 } else { UNSELECTED };
                }
            });
        if selected {
            self.labels.extend(ids.iter().copied());
        } else {
            self.labels.retain(|l| !ids.contains(l));
        }
    }

    /// Drop every whole-component entry that is no longer fully selected.
    pub(crate) fn retain_complete_labels(&mut self, labels: &LabelRaster) {
        let complete = labels.complete_ids(self.raster.view());
        self.labels.retain(|l| complete.contains(l));
    }
}
