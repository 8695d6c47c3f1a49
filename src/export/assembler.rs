//! Page assembly with pdf-writer
//!
//! Each page image becomes a DCT-encoded image XObject drawn at the full
//! printable width, top-aligned inside the margins. Taller-than-page slices
//! never occur since `paginate` cuts at the printable height.

use log::debug;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

use super::ExportKind;
use crate::error::{Error, Result};
use crate::host::{PageAssembler, PageImage, PageSetup};

const PT_PER_MM: f32 = 72.0 / 25.4;
const IMAGE_NAME: Name<'static> = Name(b"Im0");

fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Assembles JPEG page slices into a PDF.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfWriterAssembler;

impl PdfWriterAssembler {
    pub fn new() -> Self {
        Self
    }
}

impl PageAssembler for PdfWriterAssembler {
    fn assemble(&self, pages: &[PageImage], setup: &PageSetup) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(Error::export(ExportKind::Pdf, "document has no pages"));
        }

        let page_width = mm_to_pt(setup.width_mm);
        let page_height = mm_to_pt(setup.height_mm);
        let margin = mm_to_pt(setup.margin_mm);
        let content_width = mm_to_pt(setup.content_width_mm());

        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let info_id = Ref::new(3);
        // page, content stream, image per page
        let ids: Vec<(Ref, Ref, Ref)> = (0..pages.len() as i32)
            .map(|i| {
                let base = 4 + i * 3;
                (Ref::new(base), Ref::new(base + 1), Ref::new(base + 2))
            })
            .collect();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(ids.iter().map(|(page_id, _, _)| *page_id))
            .count(pages.len() as i32);
        pdf.document_info(info_id).producer(TextStr("mdpad"));

        for (image, &(page_id, content_id, image_id)) in pages.iter().zip(&ids) {
            if image.width_px == 0 || image.height_px == 0 {
                return Err(Error::export(ExportKind::Pdf, "empty page image"));
            }

            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, page_width, page_height));
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources().x_objects().pair(IMAGE_NAME, image_id);
            page.finish();

            let mut xobject = pdf.image_xobject(image_id, &image.jpeg);
            xobject.filter(Filter::DctDecode);
            xobject.width(image.width_px as i32);
            xobject.height(image.height_px as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
            xobject.finish();

            let drawn_height = image.height_px as f32 * content_width / image.width_px as f32;
            let mut content = Content::new();
            content.save_state();
            content.transform([
                content_width,
                0.0,
                0.0,
                drawn_height,
                margin,
                page_height - margin - drawn_height,
            ]);
            content.x_object(IMAGE_NAME);
            content.restore_state();
            pdf.stream(content_id, &content.finish());
        }

        let bytes = pdf.finish();
        debug!("Assembled {} pages into {} bytes", pages.len(), bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::paginate;
    use crate::host::Raster;
    use image::{Rgba, RgbaImage};

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn pages(height: u32) -> Vec<PageImage> {
        let raster = Raster {
            image: RgbaImage::from_pixel(190, height, Rgba([250, 250, 250, 255])),
            keep_together: vec![],
        };
        paginate(&raster, &PageSetup::A4, 92).unwrap()
    }

    #[test]
    fn test_mm_to_pt() {
        assert!((mm_to_pt(210.0) - 595.28).abs() < 0.01);
        assert!((mm_to_pt(297.0) - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_assembles_one_page_per_image() {
        let bytes = PdfWriterAssembler::new()
            .assemble(&pages(600), &PageSetup::A4)
            .unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Count 3"));
        assert!(contains(&bytes, b"/DCTDecode"));
        assert!(contains(&bytes, b"/Producer (mdpad)"));
    }

    #[test]
    fn test_no_pages_is_an_error() {
        let err = PdfWriterAssembler::new()
            .assemble(&[], &PageSetup::A4)
            .unwrap_err();
        assert!(matches!(err, Error::Export { kind: ExportKind::Pdf, .. }));
    }
}
