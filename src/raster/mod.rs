use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView2, Zip};

mod components;

pub use components::*;

/// Value of an unselected, selectable pixel in a selection raster.
pub const UNSELECTED: i32 = -1;
/// Value of a background pixel in a selection raster.
pub const BACKGROUND: i32 = 0;

/// Connected-component labeling of one selectable region.
///
/// `0` marks pixels that belong to no feature, every positive value is the
/// id of an 8-connected component. The raster is the ground truth for all
/// selection operations and is never modified by them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRaster {
    labels: Array2<u32>,
    max_label: u32,
}

impl LabelRaster {
    pub fn new(labels: Array2<u32>) -> Self {
        let max_label = labels.iter().copied().max().unwrap_or(0);
        Self { labels, max_label }
    }

    /// Label the 8-connected components of a foreground mask.
    pub fn from_foreground(mask: ArrayView2<bool>) -> Self {
        let (labels, max_label) = label_components(mask);
        Self { labels, max_label }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.labels.dim()
    }

    pub fn view(&self) -> ArrayView2<'_, u32> {
        self.labels.view()
    }

    pub fn max_label(&self) -> u32 {
        self.max_label
    }

    /// Distinct ids of all labeled components.
    pub fn ids(&self) -> BTreeSet<u32> {
        self.labels.iter().copied().filter(|&l| l > 0).collect()
    }

    pub fn foreground(&self) -> Array2<bool> {
        self.labels.mapv(|l| l > 0)
    }

    /// Mask of every pixel whose id is in `ids`.
    pub fn mask_of(&self, ids: &BTreeSet<u32>) -> Array2<bool> {
        self.labels.mapv(|l| l > 0 && ids.contains(&l))
    }

    /// Selection raster without any selected pixel.
    pub fn no_selection(&self) -> Array2<i32> {
        self.labels
            .mapv(|l| if l > 0 { UNSELECTED } else { BACKGROUND })
    }

    /// Selection raster with exactly the components in `ids` selected.
    pub fn rebuild(&self, ids: &BTreeSet<u32>) -> Array2<i32> {
        self.labels.mapv(|l| match l {
            0 => BACKGROUND,
            l if ids.contains(&l) => l as i32,
            _ => UNSELECTED,
        })
    }

    /// Selection raster with every component selected.
    pub fn all_selected(&self) -> Array2<i32> {
        self.labels.mapv(|l| l as i32)
    }

    /// Ids of the components with at least one selected pixel in `raster`.
    pub fn touched_ids(&self, raster: ArrayView2<i32>) -> BTreeSet<u32> {
        let mut ids = BTreeSet::new();
        Zip::from(&self.labels).and(raster).for_each(|&l, &s| {
            if l > 0 && s > BACKGROUND {
                ids.insert(l);
            }
        });
        ids
    }

    /// Ids of the components whose pixels are all selected in `raster`.
    pub fn complete_ids(&self, raster: ArrayView2<i32>) -> BTreeSet<u32> {
        let mut incomplete = BTreeSet::new();
        Zip::from(&self.labels).and(raster).for_each(|&l, &s| {
            if l > 0 && s <= BACKGROUND {
                incomplete.insert(l);
            }
        });
        self.touched_ids(raster)
            .difference(&incomplete)
            .copied()
            .collect()
    }
}
