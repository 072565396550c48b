//! Error types for Paper Helper MCP Server

use thiserror::Error;

/// Result type alias for Paper Helper MCP Server
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Paper Helper MCP Server
#[derive(Error, Debug)]
pub enum Error {
    /// PDF file not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// Required tool argument absent or empty
    #[error("Missing required argument: {name}")]
    MissingArgument { name: String },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// qpdf error
    #[error("qpdf error: {reason}")]
    Qpdf { reason: String },

    /// Word document serialization failure
    #[error("Failed to write Word document: {reason}")]
    DocxWrite { reason: String },

    /// Path access denied (outside allowed resource directories)
    #[error("Path access denied: {path}")]
    PathAccessDenied { path: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Return a sanitized error message safe to send to clients.
    /// Internal details (paths, library errors) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::PdfNotFound { .. } => "PDF not found".to_string(),
            Error::InvalidPdf { .. } => "Invalid PDF file".to_string(),
            Error::MissingArgument { name } => format!("Missing required argument: {}", name),
            Error::Pdfium { .. } => "PDF processing error".to_string(),
            Error::Qpdf { .. } => "PDF processing error".to_string(),
            Error::DocxWrite { .. } => "Failed to write Word document".to_string(),
            Error::PathAccessDenied { .. } => "Access denied".to_string(),
            Error::Io(_) => "I/O error".to_string(),
        }
    }
}
