use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Primitive};
use ndarray::{Array2, Array3, ArrayView2};
use num_traits::Zero;

use crate::{LabelRaster, Result};

pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let bytes = std::fs::read(path)?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Non-zero pixels of a greyscale buffer.
pub fn foreground_mask<T: Primitive + Zero>(i: &ImageBuffer<Luma<T>, Vec<T>>) -> Array2<bool> {
    Array2::from_shape_fn((i.height() as usize, i.width() as usize), |(y, x)| {
        let Luma([p]) = i.get_pixel(x as u32, y as u32);
        !p.is_zero()
    })
}

/// RGBA raster of shape `(height, width, 4)`.
pub fn color_raster(image: &DynamicImage) -> Array3<u8> {
    let rgba = image.to_rgba8();
    Array3::from_shape_fn(
        (rgba.height() as usize, rgba.width() as usize, 4),
        |(y, x, c)| rgba.get_pixel(x as u32, y as u32)[c],
    )
}

/// 8-bit mask image, 255 where `mask` is set.
pub fn mask_image(mask: ArrayView2<bool>) -> GrayImage {
    let (height, width) = mask.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([if mask[[y as usize, x as usize]] { 255 } else { 0 }])
    })
}

impl LabelRaster {
    /// Label the non-zero pixels of an image. Colour images are compared
    /// by luma.
    pub fn from_image(image: &DynamicImage) -> Self {
        let mask = match image {
            DynamicImage::ImageLuma16(i) => foreground_mask(i),
            image => foreground_mask(&image.to_luma8()),
        };
        Self::from_foreground(mask.view())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn label_image_is_binarised() {
        let image = GrayImage::from_raw(3, 2, vec![0, 7, 0, 0, 0, 9]).unwrap();
        let labels = LabelRaster::from_image(&DynamicImage::ImageLuma8(image));
        assert_eq!(labels.view(), array![[0u32, 1, 0], [0, 0, 1]]);
    }

    #[test]
    fn sixteen_bit_labels() {
        let image: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(2, 1, vec![1000, 0]).unwrap();
        let labels = LabelRaster::from_image(&DynamicImage::ImageLuma16(image));
        assert_eq!(labels.view(), array![[1u32, 0]]);
    }

    #[test]
    fn colors_are_rgba() {
        let image = image::RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let colors = color_raster(&DynamicImage::ImageRgb8(image));
        assert_eq!(colors.dim(), (1, 2, 4));
        assert_eq!(colors.slice(ndarray::s![0, 1, ..]), array![4u8, 5, 6, 255]);
    }

    #[test]
    fn mask_to_image() {
        let image = mask_image(array![[true, false], [false, true]].view());
        assert_eq!(image.into_raw(), vec![255, 0, 0, 255]);
    }
}
