use std::collections::BTreeSet;

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Zip};

use crate::{ColumnBounds, LabelRaster, Result, Selection, SelectionError};

/// An object whose labeled pixels can be selected.
pub trait Selectable {
    /// Ground truth labeling, never modified during a selection session.
    fn label_raster(&self) -> &LabelRaster;

    /// Committed selection, `None` if nothing was selected yet.
    fn selection(&self) -> Option<&Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);

    /// RGBA colors of shape `(height, width, 4)`.
    fn pixel_colors(&self) -> Option<ArrayView3<'_, u8>> {
        None
    }

    fn column_bounds(&self) -> Option<&[ColumnBounds]> {
        None
    }

    /// Data coordinates of pixel `(0, 0)`.
    fn origin(&self) -> [f64; 2] {
        [0.0, 0.0]
    }

    /// Remove the pixels under `mask` from the object.
    fn remove_selected(&mut self, mask: ArrayView2<bool>);

    fn selection_raster(&self) -> Option<ArrayView2<'_, i32>> {
        self.selection().map(Selection::raster)
    }

    fn selected_labels(&self) -> Option<&BTreeSet<u32>> {
        self.selection().map(Selection::labels)
    }
}

/// In-memory selectable object.
#[derive(Debug, Clone)]
pub struct LabeledImage {
    labels: LabelRaster,
    colors: Option<Array3<u8>>,
    selection: Option<Selection>,
    columns: Option<Vec<ColumnBounds>>,
    origin: [f64; 2],
}

impl LabeledImage {
    pub fn new(labels: LabelRaster) -> Self {
        Self {
            labels,
            colors: None,
            selection: None,
            columns: None,
            origin: [0.0, 0.0],
        }
    }

    pub fn from_foreground(mask: ArrayView2<bool>) -> Self {
        Self::new(LabelRaster::from_foreground(mask))
    }

    pub fn with_colors(mut self, colors: Array3<u8>) -> Result<Self> {
        let (height, width, _) = colors.dim();
        self.check_dim((height, width))?;
        self.colors = Some(colors);
        Ok(self)
    }

    pub fn with_selection(mut self, selection: Selection) -> Result<Self> {
        self.check_dim(selection.dim())?;
        self.selection = Some(selection);
        Ok(self)
    }

    pub fn with_columns(mut self, columns: Vec<ColumnBounds>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_origin(mut self, origin: [f64; 2]) -> Self {
        self.origin = origin;
        self
    }

    fn check_dim(&self, actual: (usize, usize)) -> Result<()> {
        let expected = self.labels.dim();
        if expected == actual {
            Ok(())
        } else {
            Err(SelectionError::ShapeMismatch { expected, actual })
        }
    }
}

impl Selectable for LabeledImage {
    fn label_raster(&self) -> &LabelRaster {
        &self.labels
    }

    fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    fn pixel_colors(&self) -> Option<ArrayView3<'_, u8>> {
        self.colors.as_ref().map(Array3::view)
    }

    fn column_bounds(&self) -> Option<&[ColumnBounds]> {
        self.columns.as_deref()
    }

    fn origin(&self) -> [f64; 2] {
        self.origin
    }

    /// Drops the masked pixels from the foreground and labels the remaining
    /// foreground again. The committed selection is reset.
    fn remove_selected(&mut self, mask: ArrayView2<bool>) {
        let mut foreground: Array2<bool> = self.labels.foreground();
        Zip::from(&mut foreground)
            .and(mask)
            .for_each(|f, &m| *f &= !m);
        self.labels = LabelRaster::from_foreground(foreground.view());
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn colors_must_match_labels() {
        let image = LabeledImage::new(LabelRaster::new(Array2::from_elem((2, 3), 1)));
        let err = image.with_colors(Array3::zeros((3, 2, 4))).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::ShapeMismatch {
                expected: (2, 3),
                actual: (3, 2)
            }
        ));
    }

    #[test]
    fn remove_selected_relabels() {
        let mut image = LabeledImage::from_foreground(array![[true, true, true]].view());
        image.remove_selected(array![[false, true, false]].view());
        assert_eq!(image.label_raster().view(), array![[1u32, 0, 2]]);
        assert!(image.selection().is_none());
    }

    #[test]
    fn accessors_follow_selection() {
        let labels = LabelRaster::new(array![[1, 0]]);
        let image = LabeledImage::new(labels.clone())
            .with_selection(Selection::all(&labels))
            .unwrap();
        assert_eq!(image.selected_labels(), Some(&BTreeSet::from([1])));
        assert_eq!(image.selection_raster().unwrap(), array![[1, 0]]);
        assert!(image.pixel_colors().is_none());
        assert!(image.column_bounds().is_none());
    }
}
