//! PDF processing layer
//!
//! This module provides PDF processing functionality using PDFium and qpdf.

mod merger;
mod reader;

pub use merger::{merge_documents, page_count};
pub use reader::PdfReader;
