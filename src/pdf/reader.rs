//! PDF reader wrapper for PDFium

use crate::error::{Error, Result};
use pdfium_render::prelude::*;
use std::path::Path;

/// Vertical tolerance (points) for grouping characters into the same line.
const Y_TOLERANCE: f32 = 5.0;

/// Horizontal gap (points) treated as a word boundary.
const SPACE_THRESHOLD: f32 = 10.0;

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to a local library or fall back to the system one
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// PDF reader using PDFium.
///
/// All page text is extracted upfront in page order; image-only or otherwise
/// text-free pages yield empty fragments rather than errors.
pub struct PdfReader {
    page_count: u32,
    page_texts: Vec<String>,
}

impl PdfReader {
    /// Open a PDF from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::PdfNotFound {
                path: path.display().to_string(),
            });
        }

        let data = std::fs::read(path)?;
        Self::open_bytes(&data)
    }

    /// Open a PDF from bytes
    pub fn open_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 4 || &data[0..4] != b"%PDF" {
            return Err(Error::InvalidPdf {
                reason: "Not a valid PDF file".to_string(),
            });
        }

        let pdfium = create_pdfium()?;

        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| Error::InvalidPdf {
                reason: e.to_string(),
            })?;

        let pages = document.pages();
        let page_count = pages.len() as u32;
        let mut page_texts = Vec::with_capacity(page_count as usize);

        for index in 0..pages.len() {
            let page = pages.get(index).map_err(|e| Error::Pdfium {
                reason: format!("Failed to get page {}: {}", index + 1, e),
            })?;
            page_texts.push(Self::page_text(&page));
        }

        Ok(Self {
            page_count,
            page_texts,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Per-page text fragments in page order
    pub fn page_texts(&self) -> &[String] {
        &self.page_texts
    }

    /// Extract text from a page in reading order.
    ///
    /// Characters are sorted top-to-bottom then left-to-right, grouped into
    /// lines by Y-coordinate proximity, with spaces inserted at horizontal
    /// gaps wider than a typical character.
    fn page_text(page: &PdfPage) -> String {
        let text_obj = match page.text() {
            Ok(t) => t,
            Err(_) => return String::new(),
        };

        let mut chars_with_pos: Vec<(char, f32, f32)> = Vec::new();
        for segment in text_obj.segments().iter() {
            if let Ok(chars) = segment.chars() {
                for ch in chars.iter() {
                    if let Some(c) = ch.unicode_char() {
                        if let Ok(bounds) = ch.loose_bounds() {
                            chars_with_pos.push((c, bounds.left().value, bounds.top().value));
                        }
                    }
                }
            }
        }

        if chars_with_pos.is_empty() {
            return String::new();
        }

        // Top to bottom in PDF coordinates (Y descending), then left to right
        chars_with_pos.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut lines: Vec<Vec<(char, f32)>> = Vec::new();
        let mut line_y: Option<f32> = None;
        for (c, x, y) in chars_with_pos {
            match (line_y, lines.last_mut()) {
                (Some(cur_y), Some(line)) if (cur_y - y).abs() <= Y_TOLERANCE => {
                    line.push((c, x));
                }
                _ => {
                    lines.push(vec![(c, x)]);
                    line_y = Some(y);
                }
            }
        }

        let mut result = String::new();
        for mut line in lines {
            line.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

            let mut prev_x: Option<f32> = None;
            for (c, x) in line {
                if let Some(px) = prev_x {
                    if x - px > SPACE_THRESHOLD && c != ' ' {
                        result.push(' ');
                    }
                }
                result.push(c);
                prev_x = Some(x);
            }
            result.push('\n');
        }

        result.trim_end().to_string()
    }
}
