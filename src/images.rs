//! Extracted images and E Ink image preparation.
//!
//! E Ink panels are grayscale and refresh slowly, so photographic content is
//! converted to luminance grayscale or dithered 1-bit black/white before
//! placement. Dithering uses Floyd-Steinberg error diffusion, which holds up
//! well on electrophoretic displays.

use crate::config::ImagePolicy;
use crate::error::Result;
use image::{DynamicImage, GrayImage, Luma};

/// One image extracted from a source document.
///
/// `data` holds the encoded payload (PNG or JPEG); `width`/`height` are the
/// intrinsic pixel dimensions used by the flow engine for aspect-preserving
/// placement.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// 1-based page number the image was found on
    pub page_number: usize,
    /// Encoded pixel payload
    pub data: Vec<u8>,
    /// Intrinsic width in pixels
    pub width: u32,
    /// Intrinsic height in pixels
    pub height: u32,
    /// Resource name from the source document, if any
    pub name: Option<String>,
}

impl ExtractedImage {
    /// Aspect ratio (width over height). Returns 1.0 for degenerate images.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Apply the configured image policy to an extracted image.
///
/// Returns `None` when the policy is `Omit`. Decoding failures propagate:
/// the caller (the pipeline) treats them as per-page extraction failures
/// and degrades rather than aborting.
pub fn prepare_for_eink(
    img: &ExtractedImage,
    policy: ImagePolicy,
) -> Result<Option<ExtractedImage>> {
    match policy {
        ImagePolicy::Omit => Ok(None),
        ImagePolicy::Original => Ok(Some(img.clone())),
        ImagePolicy::Grayscale | ImagePolicy::BlackWhite => {
            let decoded = image::load_from_memory(&img.data)?;
            let mut gray = decoded.to_luma8();
            if policy == ImagePolicy::BlackWhite {
                floyd_steinberg_dither(&mut gray);
            }
            let mut out = Vec::new();
            DynamicImage::ImageLuma8(gray)
                .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)?;
            Ok(Some(ExtractedImage {
                page_number: img.page_number,
                data: out,
                width: img.width,
                height: img.height,
                name: img.name.clone(),
            }))
        },
    }
}

/// Floyd-Steinberg error-diffusion dithering to 1-bit, in place.
///
/// Error distribution to unprocessed neighbours:
///
/// ```text
///          *    7/16
///  3/16  5/16   1/16
/// ```
pub fn floyd_steinberg_dither(img: &mut GrayImage) {
    let (width, height) = img.dimensions();
    let mut levels: Vec<f32> = img.pixels().map(|p| p.0[0] as f32).collect();
    let w = width as usize;

    for y in 0..height as usize {
        for x in 0..w {
            let idx = y * w + x;
            let old = levels[idx];
            let new = if old > 128.0 { 255.0 } else { 0.0 };
            levels[idx] = new;
            let err = old - new;

            if x + 1 < w {
                levels[idx + 1] += err * 7.0 / 16.0;
            }
            if y + 1 < height as usize {
                if x > 0 {
                    levels[idx + w - 1] += err * 3.0 / 16.0;
                }
                levels[idx + w] += err * 5.0 / 16.0;
                if x + 1 < w {
                    levels[idx + w + 1] += err * 1.0 / 16.0;
                }
            }
        }
    }

    for (i, level) in levels.iter().enumerate() {
        let v = level.clamp(0.0, 255.0) as u8;
        let x = (i % w) as u32;
        let y = (i / w) as u32;
        img.put_pixel(x, y, Luma([v]));
    }
}
