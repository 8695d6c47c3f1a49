//! Slicing a tall raster into pages
//!
//! A page holds as many raster rows as fit the printable area at the
//! raster's width. A break that would cut through a keep-together region
//! moves up to the region's top, unless the region alone is taller than a
//! page, in which case it is split.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage};
use log::debug;
use std::ops::Range;

use crate::error::Result;
use crate::host::{PageImage, PageSetup, Raster};

/// Raster rows that fit on one page at `width_px`.
pub fn page_height_px(width_px: u32, setup: &PageSetup) -> u32 {
    let ratio = setup.content_height_mm() / setup.content_width_mm();
    ((width_px as f32 * ratio).floor() as u32).max(1)
}

/// Row ranges of each page.
pub fn page_breaks(height: u32, page_height: u32, keep_together: &[Range<u32>]) -> Vec<Range<u32>> {
    let mut pages = Vec::new();
    let mut start = 0;

    while start < height {
        let mut end = start.saturating_add(page_height).min(height);
        if end < height {
            // Pull the break above every region it would cut, as long as the
            // page keeps some content.
            while let Some(region) = keep_together
                .iter()
                .filter(|r| r.start < end && end < r.end && r.start > start)
                .min_by_key(|r| r.start)
            {
                end = region.start;
            }
        }
        pages.push(start..end);
        start = end;
    }

    pages
}

/// Slice a raster into JPEG pages for `setup`.
pub fn paginate(raster: &Raster, setup: &PageSetup, quality: u8) -> Result<Vec<PageImage>> {
    let width = raster.image.width();
    let height = raster.image.height();
    let breaks = page_breaks(height, page_height_px(width, setup), &raster.keep_together);
    debug!("Paginating {}x{} raster into {} pages", width, height, breaks.len());

    breaks
        .into_iter()
        .map(|rows| {
            let slice = imageops::crop_imm(&raster.image, 0, rows.start, width, rows.end - rows.start)
                .to_image();
            let rgb = DynamicImage::ImageRgba8(slice).to_rgb8();

            let mut jpeg = Vec::new();
            JpegEncoder::new_with_quality(&mut jpeg, quality).encode_image(&rgb)?;
            Ok(PageImage {
                jpeg,
                width_px: rgb.width(),
                height_px: rgb.height(),
            })
        })
        .collect()
}
