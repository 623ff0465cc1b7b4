use std::collections::BTreeSet;

use log::debug;
use ndarray::ArrayView2;

use crate::{Candidate, LabelRaster, Selection};

/// How a candidate is merged into the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccumulationPolicy {
    /// Replace the current selection.
    #[default]
    New,
    /// Extend the current selection.
    Add,
    /// Subtract from the current selection.
    Remove,
}

impl AccumulationPolicy {
    pub fn merge(self, selection: &mut Selection, labels: &LabelRaster, candidate: &Candidate) {
        match candidate {
            Candidate::Pixels(mask) => self.merge_pixels(selection, labels, mask.view()),
            Candidate::Labels(ids) => self.merge_labels(selection, labels, ids),
        }
    }

    /// Pixel granularity: only the pixels under `mask` change.
    pub fn merge_pixels(self, selection: &mut Selection, labels: &LabelRaster, mask: ArrayView2<bool>) {
        debug!("Merge pixel candidate with {self:?}");
        match self {
            AccumulationPolicy::New => {
                *selection = Selection::none(labels);
                selection.select_pixels(labels, mask);
            }
            AccumulationPolicy::Add => selection.select_pixels(labels, mask),
            AccumulationPolicy::Remove => selection.unselect_pixels(mask),
        }
        selection.retain_complete_labels(labels);
    }

    /// Label granularity: the components in `ids` become exact copies of
    /// the label raster, either fully selected or fully unselected.
    pub fn merge_labels(self, selection: &mut Selection, labels: &LabelRaster, ids: &BTreeSet<u32>) {
        debug!("Merge labels {ids:?} with {self:?}");
        match self {
            AccumulationPolicy::New => *selection = Selection::from_labels(labels, ids.clone()),
            AccumulationPolicy::Add => selection.set_components(labels, ids, true),
            AccumulationPolicy::Remove => selection.set_components(labels, ids, false),
        }
    }
}
