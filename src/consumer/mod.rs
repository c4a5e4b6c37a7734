//! Operations that consume a committed rectangle.

use clap::ValueEnum;
use image::{imageops, DynamicImage, GrayImage, Luma, RgbaImage};
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::ToolBounds;

pub type ConsumerResult<T> = std::result::Result<T, ConsumerError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsumerError {
    #[error("rectangle has no area: {width}x{height}")]
    EmptyRectangle { width: u32, height: u32 },
    #[error("rectangle {bounds:?} does not overlap the {image_width}x{image_height} image")]
    OutsideImage {
        bounds: ToolBounds,
        image_width: u32,
        image_height: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RectangleOperation {
    #[default]
    Crop,
    ResizeCanvas,
    Select,
}

impl RectangleOperation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::ResizeCanvas => "resize-canvas",
            Self::Select => "select",
        }
    }

    pub fn apply(self, image: &DynamicImage, bounds: ToolBounds) -> ConsumerResult<DynamicImage> {
        tracing::info!(operation = self.name(), ?bounds, "applying rectangle operation");
        match self {
            Self::Crop => crop(image, bounds),
            Self::ResizeCanvas => resize_canvas(image, bounds).map(DynamicImage::ImageRgba8),
            Self::Select => {
                selection_mask(image.width(), image.height(), bounds).map(DynamicImage::ImageLuma8)
            }
        }
    }
}

/// Part of `bounds` that lies inside an image of the given size, as
/// `(x, y, width, height)`.
fn visible_region(
    bounds: ToolBounds,
    image_width: u32,
    image_height: u32,
) -> ConsumerResult<(u32, u32, u32, u32)> {
    if bounds.is_empty() {
        return Err(ConsumerError::EmptyRectangle {
            width: bounds.width,
            height: bounds.height,
        });
    }
    let outside = || ConsumerError::OutsideImage {
        bounds,
        image_width,
        image_height,
    };
    let image_right = i64::from(image_width);
    let image_bottom = i64::from(image_height);
    let left = i64::from(bounds.x).clamp(0, image_right);
    let top = i64::from(bounds.y).clamp(0, image_bottom);
    let right = (i64::from(bounds.x) + i64::from(bounds.width)).clamp(0, image_right);
    let bottom = (i64::from(bounds.y) + i64::from(bounds.height)).clamp(0, image_bottom);
    if right <= left || bottom <= top {
        return Err(outside());
    }
    let to_u32 = |value: i64| u32::try_from(value).map_err(|_| outside());
    Ok((
        to_u32(left)?,
        to_u32(top)?,
        to_u32(right - left)?,
        to_u32(bottom - top)?,
    ))
}

/// Crops `image` to the part of `bounds` that overlaps it.
pub fn crop(image: &DynamicImage, bounds: ToolBounds) -> ConsumerResult<DynamicImage> {
    let (x, y, width, height) = visible_region(bounds, image.width(), image.height())?;
    Ok(image.crop_imm(x, y, width, height))
}

/// New canvas of the rectangle's size with the image placed at the matching
/// offset; uncovered pixels are transparent.
pub fn resize_canvas(image: &DynamicImage, bounds: ToolBounds) -> ConsumerResult<RgbaImage> {
    if bounds.is_empty() {
        return Err(ConsumerError::EmptyRectangle {
            width: bounds.width,
            height: bounds.height,
        });
    }
    let mut canvas = RgbaImage::new(bounds.width, bounds.height);
    imageops::overlay(
        &mut canvas,
        &image.to_rgba8(),
        -i64::from(bounds.x),
        -i64::from(bounds.y),
    );
    Ok(canvas)
}

/// 8-bit mask, 255 inside the rectangle and 0 elsewhere.
pub fn selection_mask(
    image_width: u32,
    image_height: u32,
    bounds: ToolBounds,
) -> ConsumerResult<GrayImage> {
    let (x, y, width, height) = visible_region(bounds, image_width, image_height)?;
    let mut mask = GrayImage::new(image_width, image_height);
    for row in y..y + height {
        for column in x..x + width {
            mask.put_pixel(column, row, Luma([255]));
        }
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }))
    }

    #[test]
    fn crop_returns_the_covered_pixels() {
        let image = gradient(20, 10);
        let cropped = crop(&image, ToolBounds::new(5, 2, 4, 3)).expect("crop should succeed");
        assert_eq!((cropped.width(), cropped.height()), (4, 3));
        assert_eq!(cropped.to_rgba8().get_pixel(0, 0), &Rgba([5, 2, 0, 255]));
    }

    #[test]
    fn crop_trims_to_image_edges() {
        let image = gradient(20, 10);
        let cropped = crop(&image, ToolBounds::new(-5, 8, 10, 10)).expect("crop should succeed");
        assert_eq!((cropped.width(), cropped.height()), (5, 2));
    }

    #[test]
    fn crop_rejects_empty_and_disjoint_rectangles() {
        let image = gradient(20, 10);
        assert_eq!(
            crop(&image, ToolBounds::new(1, 1, 0, 4)).unwrap_err(),
            ConsumerError::EmptyRectangle {
                width: 0,
                height: 4
            }
        );
        assert!(matches!(
            crop(&image, ToolBounds::new(30, 0, 5, 5)),
            Err(ConsumerError::OutsideImage { .. })
        ));
    }

    #[test]
    fn resize_canvas_pads_with_transparency() {
        let image = gradient(4, 4);
        let canvas =
            resize_canvas(&image, ToolBounds::new(-2, 0, 8, 4)).expect("resize should succeed");
        assert_eq!(canvas.dimensions(), (8, 4));
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(canvas.get_pixel(2, 1), &Rgba([0, 1, 0, 255]));
        assert_eq!(canvas.get_pixel(7, 3), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn selection_mask_marks_rectangle_interior() {
        let mask = selection_mask(10, 10, ToolBounds::new(2, 3, 4, 2)).expect("mask should build");
        assert_eq!(mask.get_pixel(2, 3), &Luma([255]));
        assert_eq!(mask.get_pixel(5, 4), &Luma([255]));
        assert_eq!(mask.get_pixel(6, 4), &Luma([0]));
        assert_eq!(mask.get_pixel(2, 5), &Luma([0]));
    }

    #[test]
    fn operation_names_parse() {
        assert_eq!(
            RectangleOperation::from_str("resize-canvas", false),
            Ok(RectangleOperation::ResizeCanvas)
        );
        assert!(RectangleOperation::from_str("rotate", false).is_err());
        for operation in RectangleOperation::value_variants() {
            assert_eq!(
                RectangleOperation::from_str(operation.name(), false),
                Ok(*operation)
            );
        }
        let parsed: RectangleOperation =
            serde_json::from_str(r#""resize-canvas""#).expect("operation should parse");
        assert_eq!(parsed, RectangleOperation::ResizeCanvas);
    }
}
