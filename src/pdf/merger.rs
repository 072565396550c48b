//! qpdf FFI wrapper for merging PDF documents

use crate::error::{Error, Result};
use qpdf::QPdf;

fn map_qpdf_error(e: qpdf::QPdfError) -> Error {
    Error::Qpdf {
        reason: e.to_string(),
    }
}

/// Merge PDFs by appending every input's pages, in listed order, to a fresh
/// accumulator document.
///
/// The accumulator and source handles are dropped on every exit path,
/// including errors.
pub fn merge_documents(inputs: &[Vec<u8>]) -> Result<Vec<u8>> {
    let merged = QPdf::empty();

    for (index, data) in inputs.iter().enumerate() {
        let source = QPdf::read_from_memory(data).map_err(|e| Error::Qpdf {
            reason: format!("Failed to read input PDF {}: {}", index + 1, e),
        })?;

        let pages = source.get_pages().map_err(|e| Error::Qpdf {
            reason: format!("Failed to get pages from input PDF {}: {}", index + 1, e),
        })?;

        for page in &pages {
            let copied = merged.copy_from_foreign(page);
            merged.add_page(&copied, false).map_err(map_qpdf_error)?;
        }
    }

    merged.writer().write_to_memory().map_err(map_qpdf_error)
}

/// Get the page count of a serialized PDF
pub fn page_count(data: &[u8]) -> Result<u32> {
    let qpdf = QPdf::read_from_memory(data).map_err(map_qpdf_error)?;
    qpdf.get_num_pages().map_err(map_qpdf_error)
}
