//! Candidate computation for the four region algorithms.
//!
//! Every algorithm maps user geometry to a candidate restricted to
//! foreground pixels. Nothing in here touches a selection raster.

use std::{collections::BTreeSet, ops::Range};

use log::{debug, warn};
use ndarray::{s, Array2, ArrayView2, ArrayView3, Zip};

use crate::{components_touching, ColorMatcher, LabelRaster, Selectable, SelectionSettings};

mod polygon;

pub use polygon::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionAlgorithm {
    #[default]
    Rectangle,
    Polygon,
    LabelWand,
    ColorWand,
}

/// User geometry in data coordinates.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// Rectangle spanned by the press and release positions. Both corners
    /// are equal for a click.
    Rect { start: [f64; 2], end: [f64; 2] },
    /// Closed lasso path.
    Polygon { points: Vec<[f64; 2]> },
}

impl Geometry {
    /// A polygon with fewer than 3 vertices, or any non-finite coordinate.
    pub fn is_degenerate(&self) -> bool {
        let finite = |p: &[f64; 2]| p.iter().all(|c| c.is_finite());
        match self {
            Geometry::Rect { start, end } => !finite(start) || !finite(end),
            Geometry::Polygon { points } => points.len() < 3 || !points.iter().all(finite),
        }
    }
}

/// End-exclusive pixel window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl PixelRect {
    /// Window covering every pixel touched by the rectangle between `a` and
    /// `b`, clipped to a raster of shape `dim`.
    pub fn from_corners(a: [f64; 2], b: [f64; 2], origin: [f64; 2], dim: (usize, usize)) -> Self {
        let (height, width) = dim;
        Self {
            rows: axis_range(a[1], b[1], origin[1], height),
            cols: axis_range(a[0], b[0], origin[0], width),
        }
    }

    pub fn point(p: [f64; 2], origin: [f64; 2], dim: (usize, usize)) -> Self {
        Self::from_corners(p, p, origin, dim)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    pub fn window<'a, A>(&self, raster: ArrayView2<'a, A>) -> ArrayView2<'a, A> {
        raster.slice_move(s![self.rows.clone(), self.cols.clone()])
    }
}

fn axis_range(a: f64, b: f64, origin: f64, len: usize) -> Range<usize> {
    let offset = origin.ceil();
    let lo = a.min(b).floor() - offset;
    let hi = a.max(b).floor() - offset + 1.0;
    if hi.is_nan() || hi <= 0.0 {
        return 0..0;
    }
    let start = (lo.max(0.0) as usize).min(len);
    let end = (hi as usize).min(len);
    start..end.max(start)
}

/// Result of one region algorithm run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Individual foreground pixels.
    Pixels(Array2<bool>),
    /// Whole components of the label raster.
    Labels(BTreeSet<u32>),
}

impl Candidate {
    pub fn is_empty(&self) -> bool {
        match self {
            Candidate::Pixels(mask) => !mask.iter().any(|&m| m),
            Candidate::Labels(ids) => ids.is_empty(),
        }
    }

    /// Pixel mask of this candidate.
    pub fn to_mask(&self, labels: &LabelRaster) -> Array2<bool> {
        match self {
            Candidate::Pixels(mask) => mask.clone(),
            Candidate::Labels(ids) => labels.mask_of(ids),
        }
    }
}

/// Foreground pixels inside `rect`.
pub fn rectangle(labels: &LabelRaster, rect: &PixelRect) -> Array2<bool> {
    let mut mask = Array2::from_elem(labels.dim(), false);
    if rect.is_empty() {
        return mask;
    }
    mask.slice_mut(s![rect.rows.clone(), rect.cols.clone()])
        .assign(&rect.window(labels.view()).mapv(|l| l > 0));
    mask
}

/// Ids of all components with a pixel inside `rect`.
pub fn label_wand(labels: &LabelRaster, rect: &PixelRect) -> BTreeSet<u32> {
    if rect.is_empty() {
        return BTreeSet::new();
    }
    rect.window(labels.view())
        .iter()
        .copied()
        .filter(|&l| l > 0)
        .collect()
}

/// Foreground pixels whose color matches any color found inside `seed`.
///
/// Unless `whole_figure` is set, only the 8-connected regions of the match
/// mask that touch `seed` are kept.
pub fn color_wand(
    labels: &LabelRaster,
    colors: ArrayView3<u8>,
    seed: &PixelRect,
    matcher: ColorMatcher,
    whole_figure: bool,
) -> Array2<bool> {
    if seed.is_empty() {
        return Array2::from_elem(labels.dim(), false);
    }
    let reference = matcher.reference_colors(colors, seed);
    let matched = matcher.matches(colors, &reference);
    let mut mask = if whole_figure {
        matched
    } else {
        components_touching(matched.view(), seed)
    };
    Zip::from(&mut mask)
        .and(labels.view())
        .for_each(|m, &l| *m &= l > 0);
    debug!(
        "Color wand with {} reference colors matched {} pixels",
        reference.len(),
        mask.iter().filter(|&&m| m).count()
    );
    mask
}

impl RegionAlgorithm {
    /// Run this algorithm for one geometry event.
    ///
    /// A polygon geometry always runs the polygon test. For a rectangle
    /// geometry the polygon algorithm degrades to the rectangle one and the
    /// color wand only samples the release point.
    pub fn candidate<T: Selectable + ?Sized>(
        self,
        target: &T,
        geometry: &Geometry,
        settings: &SelectionSettings,
    ) -> Candidate {
        let labels = target.label_raster();
        let origin = target.origin();
        let (start, end) = match geometry {
            Geometry::Polygon { points } => {
                return Candidate::Pixels(polygon_mask(labels, points, origin))
            }
            Geometry::Rect { start, end } => (*start, *end),
        };

        match self {
            RegionAlgorithm::Rectangle | RegionAlgorithm::Polygon => Candidate::Pixels(
                rectangle(labels, &PixelRect::from_corners(start, end, origin, labels.dim())),
            ),
            RegionAlgorithm::LabelWand => Candidate::Labels(label_wand(
                labels,
                &PixelRect::from_corners(start, end, origin, labels.dim()),
            )),
            RegionAlgorithm::ColorWand => match target.pixel_colors() {
                Some(colors) => Candidate::Pixels(color_wand(
                    labels,
                    colors,
                    &PixelRect::point(end, origin, labels.dim()),
                    settings.matcher(),
                    settings.whole_figure,
                )),
                None => {
                    warn!("No pixel colors available, using the label wand instead");
                    RegionAlgorithm::LabelWand.candidate(target, geometry, settings)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn five_by_five() -> LabelRaster {
        LabelRaster::new(array![
            [1, 1, 0, 0, 0],
            [1, 1, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 2, 2],
            [0, 0, 0, 2, 2]
        ])
    }

    #[test]
    fn degenerate_geometry() {
        let click = Geometry::Rect {
            start: [1.0, 1.0],
            end: [1.0, 1.0],
        };
        assert!(!click.is_degenerate());
        let nan = Geometry::Rect {
            start: [f64::NAN, 1.0],
            end: [2.0, 2.0],
        };
        assert!(nan.is_degenerate());
        let line = Geometry::Polygon {
            points: vec![[0.0, 0.0], [3.0, 3.0]],
        };
        assert!(line.is_degenerate());
        let triangle = Geometry::Polygon {
            points: vec![[0.0, 0.0], [3.0, 0.0], [0.0, 3.0]],
        };
        assert!(!triangle.is_degenerate());
    }

    #[test]
    fn corners_are_inclusive_and_sorted() {
        let rect = PixelRect::from_corners([3.7, 2.2], [1.1, 0.9], [0.0, 0.0], (5, 5));
        assert_eq!(rect.rows, 0..3);
        assert_eq!(rect.cols, 1..4);
    }

    #[test]
    fn corners_are_clipped() {
        let rect = PixelRect::from_corners([-3.0, -1.0], [10.0, 2.0], [0.0, 0.0], (5, 5));
        assert_eq!(rect.rows, 0..3);
        assert_eq!(rect.cols, 0..5);
    }

    #[test]
    fn rect_outside_raster_is_empty() {
        assert!(PixelRect::from_corners([-3.0, 0.0], [-2.0, 2.0], [0.0, 0.0], (5, 5)).is_empty());
        assert!(PixelRect::from_corners([6.0, 0.0], [8.0, 2.0], [0.0, 0.0], (5, 5)).is_empty());
    }

    #[test]
    fn origin_shifts_window() {
        let rect = PixelRect::from_corners([11.0, 21.0], [12.0, 21.0], [10.0, 20.0], (5, 5));
        assert_eq!(rect.rows, 1..2);
        assert_eq!(rect.cols, 1..3);
    }

    #[test]
    fn rectangle_skips_background() {
        let labels = five_by_five();
        let rect = PixelRect::from_corners([1.0, 1.0], [3.0, 3.0], [0.0, 0.0], (5, 5));
        let mask = rectangle(&labels, &rect);
        assert_eq!(
            mask,
            array![
                [false, false, false, false, false],
                [false, true, false, false, false],
                [false, false, false, false, false],
                [false, false, false, true, false],
                [false, false, false, false, false]
            ]
        );
    }

    #[test]
    fn label_wand_selects_touched_components() {
        let labels = five_by_five();
        let rect = PixelRect::from_corners([1.0, 1.0], [2.0, 2.0], [0.0, 0.0], (5, 5));
        assert_eq!(label_wand(&labels, &rect), BTreeSet::from([1]));
        let candidate = Candidate::Labels(label_wand(&labels, &rect));
        assert_eq!(candidate.to_mask(&labels).iter().filter(|&&m| m).count(), 4);
    }

    #[test]
    fn label_wand_on_background_is_empty() {
        let labels = five_by_five();
        let rect = PixelRect::from_corners([2.0, 2.0], [2.0, 2.0], [0.0, 0.0], (5, 5));
        assert!(Candidate::Labels(label_wand(&labels, &rect)).is_empty());
    }
}
