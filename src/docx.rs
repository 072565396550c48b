//! Word document output

use crate::error::{Error, Result};
use docx_rs::{Docx, Paragraph, Run};
use std::path::{Path, PathBuf};

/// Derive the `.docx` output path from an input path by replacing the extension
pub fn docx_output_path(input: &Path) -> PathBuf {
    input.with_extension("docx")
}

/// Write `text` to `path` as a single-paragraph Word document, overwriting any
/// existing file
pub fn write_docx(text: &str, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;

    Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
        .build()
        .pack(file)
        .map_err(|e| Error::DocxWrite {
            reason: e.to_string(),
        })?;

    Ok(())
}
