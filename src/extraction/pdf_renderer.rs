//! Page-image access for the OCR fallback.
//!
//! Scanned PDFs carry each page as an image XObject (usually one JPEG per
//! page). Rather than rasterizing through a PDF renderer, pull the largest
//! image off the page and re-encode it as PNG for the OCR engine.

use image::ImageOutputFormat;
use lopdf::{Document, Object, ObjectId};

use super::types::PdfPageRenderer;
use super::ExtractionError;

pub struct PageImageExtractor;

impl PdfPageRenderer for PageImageExtractor {
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
    ) -> Result<Vec<u8>, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(format!("failed to parse PDF: {e}")))?;

        let page_ids: Vec<ObjectId> = doc.page_iter().collect();
        let &page_id = page_ids.get(page_number).ok_or_else(|| {
            ExtractionError::PdfParsing(format!(
                "page {page_number} not found (PDF has {} pages)",
                page_ids.len()
            ))
        })?;

        let raw = largest_page_image(&doc, page_id)?;

        // Validate and re-encode to PNG regardless of the source format.
        let img = image::load_from_memory(&raw).map_err(|e| {
            ExtractionError::ImageProcessing(format!("failed to decode page image: {e}"))
        })?;

        let mut png = std::io::Cursor::new(Vec::new());
        img.write_to(&mut png, ImageOutputFormat::Png)
            .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encode failed: {e}")))?;

        tracing::debug!(
            page = page_number,
            raw_size = raw.len(),
            png_size = png.get_ref().len(),
            "extracted page image"
        );

        Ok(png.into_inner())
    }

    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(format!("failed to parse PDF: {e}")))?;
        Ok(doc.page_iter().count())
    }
}

/// Find the largest image XObject on a page: page dict → /Resources →
/// /XObject → entries with /Subtype /Image. The largest stream is taken to
/// be the page scan.
fn largest_page_image(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, ExtractionError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| ExtractionError::PdfParsing(format!("page object error: {e}")))?;

    let resources = resolve_dict_entry(doc, page_dict, b"Resources")?;
    let xobjects = resolve_dict_entry(doc, resources, b"XObject")?;

    let mut largest: Option<Vec<u8>> = None;

    for (_name, obj) in xobjects.iter() {
        let stream = match resolve_object(doc, obj) {
            Object::Stream(ref s) => s,
            _ => continue,
        };
        if !is_image_subtype(&stream.dict) {
            continue;
        }

        let bytes = image_stream_bytes(doc, stream)?;
        if largest.as_ref().map_or(true, |prev| bytes.len() > prev.len()) {
            largest = Some(bytes);
        }
    }

    largest
        .ok_or_else(|| ExtractionError::PdfParsing("no image XObjects found on this page".into()))
}

fn is_image_subtype(dict: &lopdf::Dictionary) -> bool {
    dict.get(b"Subtype")
        .map(|obj| matches!(obj, Object::Name(ref n) if n == b"Image"))
        .unwrap_or(false)
}

/// Pull decodable image bytes out of a PDF image stream.
///
/// DCTDecode streams are JPEG files as-is. Other filters are decompressed
/// and either decoded directly (full TIFF/PNG payloads) or reconstructed
/// from raw pixel data using the stream dictionary.
fn image_stream_bytes(doc: &Document, stream: &lopdf::Stream) -> Result<Vec<u8>, ExtractionError> {
    let is_jpeg = stream
        .dict
        .get(b"Filter")
        .map(|f| match f {
            Object::Name(n) => n == b"DCTDecode",
            Object::Array(arr) => arr
                .iter()
                .any(|o| matches!(o, Object::Name(ref n) if n == b"DCTDecode")),
            _ => false,
        })
        .unwrap_or(false);

    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    if is_jpeg || image::load_from_memory(&content).is_ok() {
        return Ok(content);
    }

    reconstruct_raw_image(doc, &stream.dict, &content)
}

/// Rebuild an image from raw pixel data using /Width, /Height,
/// /BitsPerComponent and /ColorSpace.
fn reconstruct_raw_image(
    doc: &Document,
    dict: &lopdf::Dictionary,
    raw_pixels: &[u8],
) -> Result<Vec<u8>, ExtractionError> {
    let width = get_int(dict, b"Width")? as u32;
    let height = get_int(dict, b"Height")? as u32;
    let bpc = get_int(dict, b"BitsPerComponent").unwrap_or(8) as u32;
    let channels = color_channels(doc, dict);

    let expected = (width * height * channels * bpc / 8) as usize;
    if raw_pixels.len() < expected {
        return Err(ExtractionError::ImageProcessing(format!(
            "raw pixel buffer too small: {} bytes, expected {expected}",
            raw_pixels.len()
        )));
    }

    let img = match channels {
        1 => image::GrayImage::from_raw(width, height, raw_pixels.to_vec())
            .map(image::DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(width, height, raw_pixels.to_vec())
            .map(image::DynamicImage::ImageRgb8),
        // CMYK is treated as RGBA; OCR does not care about color accuracy.
        4 => image::RgbaImage::from_raw(width, height, raw_pixels.to_vec())
            .map(image::DynamicImage::ImageRgba8),
        other => {
            return Err(ExtractionError::ImageProcessing(format!(
                "unsupported channel count: {other}"
            )))
        }
    }
    .ok_or_else(|| ExtractionError::ImageProcessing("failed to build image buffer".into()))?;

    let mut png = std::io::Cursor::new(Vec::new());
    img.write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encode failed: {e}")))?;
    Ok(png.into_inner())
}

fn color_channels(doc: &Document, dict: &lopdf::Dictionary) -> u32 {
    match dict.get(b"ColorSpace").map(|obj| resolve_object(doc, obj)) {
        Ok(Object::Name(ref n)) => match n.as_slice() {
            b"DeviceGray" => 1,
            b"DeviceCMYK" => 4,
            _ => 3,
        },
        _ => 3,
    }
}

fn resolve_object<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn resolve_dict_entry<'a>(
    doc: &'a Document,
    dict: &'a lopdf::Dictionary,
    key: &[u8],
) -> Result<&'a lopdf::Dictionary, ExtractionError> {
    let obj = dict.get(key).map_err(|_| {
        ExtractionError::PdfParsing(format!("missing /{} in dictionary", String::from_utf8_lossy(key)))
    })?;
    resolve_object(doc, obj).as_dict().map_err(|_| {
        ExtractionError::PdfParsing(format!("/{} is not a dictionary", String::from_utf8_lossy(key)))
    })
}

fn get_int(dict: &lopdf::Dictionary, key: &[u8]) -> Result<i64, ExtractionError> {
    dict.get(key)
        .and_then(Object::as_i64)
        .map_err(|_| {
            ExtractionError::PdfParsing(format!(
                "missing or non-integer /{} in image dictionary",
                String::from_utf8_lossy(key)
            ))
        })
}
