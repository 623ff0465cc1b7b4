//! Color similarity matching for the color wand.

use itertools::Itertools;
use ndarray::{Array2, ArrayView3, Axis};

use crate::PixelRect;

/// RGBA color of one pixel.
pub type Rgba = [u8; 4];

/// Matches pixels against a set of reference colors.
///
/// A pixel matches if, for any reference color, every compared channel
/// differs by at most `tolerance`. Alpha is only compared if `use_alpha`
/// is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMatcher {
    pub tolerance: u8,
    pub use_alpha: bool,
}

impl ColorMatcher {
    pub fn new(tolerance: u8, use_alpha: bool) -> Self {
        Self {
            tolerance,
            use_alpha,
        }
    }

    fn channels(&self) -> usize {
        if self.use_alpha {
            4
        } else {
            3
        }
    }

    /// Distinct colors below `region`, reduced to the compared channels.
    pub fn reference_colors(&self, colors: ArrayView3<u8>, region: &PixelRect) -> Vec<Rgba> {
        let window = colors.slice_move(ndarray::s![
            region.rows.clone(),
            region.cols.clone(),
            ..
        ]);
        window
            .lanes(Axis(2))
            .into_iter()
            .map(|px| self.pixel(px.iter().copied()))
            .unique()
            .collect()
    }

    /// Boolean mask of every pixel matching any of `reference`.
    pub fn matches(&self, colors: ArrayView3<u8>, reference: &[Rgba]) -> Array2<bool> {
        let (height, width, _) = colors.dim();
        let mut mask = Array2::from_elem((height, width), false);
        if reference.is_empty() {
            return mask;
        }

        let n = self.channels();
        let tolerance = self.tolerance as i16;
        for ((y, x), m) in mask.indexed_iter_mut() {
            let px = self.pixel(colors.slice(ndarray::s![y, x, ..]).iter().copied());
            *m = reference.iter().any(|c| {
                px[..n]
                    .iter()
                    .zip(&c[..n])
                    .all(|(&a, &b)| (a as i16 - b as i16).abs() <= tolerance)
            });
        }
        mask
    }

    fn pixel(&self, channels: impl Iterator<Item = u8>) -> Rgba {
        let mut px = [0, 0, 0, u8::MAX];
        for (dst, src) in px.iter_mut().zip(channels).take(self.channels()) {
            *dst = src;
        }
        px
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    fn image(pixels: &[Rgba], width: usize) -> Array3<u8> {
        let height = pixels.len() / width;
        Array3::from_shape_fn((height, width, 4), |(y, x, c)| pixels[y * width + x][c])
    }

    const RED: Rgba = [255, 0, 0, 255];
    const DARK_RED: Rgba = [235, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    #[test]
    fn exact_match_with_zero_tolerance() {
        let colors = image(&[RED, BLUE, DARK_RED, RED], 2);
        let mask = ColorMatcher::new(0, false).matches(colors.view(), &[RED]);
        assert_eq!(mask, ndarray::array![[true, false], [false, true]]);
    }

    #[test]
    fn tolerance_is_per_channel() {
        let colors = image(&[RED, BLUE, DARK_RED, RED], 2);
        let mask = ColorMatcher::new(20, false).matches(colors.view(), &[RED]);
        assert_eq!(mask, ndarray::array![[true, false], [true, true]]);
        let mask = ColorMatcher::new(19, false).matches(colors.view(), &[RED]);
        assert_eq!(mask, ndarray::array![[true, false], [false, true]]);
    }

    #[test]
    fn alpha_only_compared_on_request() {
        let transparent_red = [255, 0, 0, 0];
        let colors = image(&[RED, transparent_red], 2);
        let without = ColorMatcher::new(0, false);
        let reference = without.reference_colors(
            colors.view(),
            &PixelRect {
                rows: 0..1,
                cols: 0..1,
            },
        );
        assert_eq!(
            without.matches(colors.view(), &reference),
            ndarray::array![[true, true]]
        );

        let with = ColorMatcher::new(0, true);
        assert_eq!(
            with.matches(colors.view(), &[RED]),
            ndarray::array![[true, false]]
        );
    }

    #[test]
    fn reference_colors_are_distinct() {
        let colors = image(&[RED, RED, BLUE, RED], 2);
        let matcher = ColorMatcher::new(0, true);
        let reference = matcher.reference_colors(
            colors.view(),
            &PixelRect {
                rows: 0..2,
                cols: 0..2,
            },
        );
        assert_eq!(reference, vec![RED, BLUE]);
    }

    #[test]
    fn no_reference_matches_nothing() {
        let colors = image(&[RED, BLUE], 2);
        let mask = ColorMatcher::new(255, true).matches(colors.view(), &[]);
        assert!(mask.iter().all(|m| !m));
    }
}
