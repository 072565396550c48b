//! Paper Helper MCP Server Library
//!
//! This crate provides MCP tools and prompts for academic paper workflows:
//! - `convert_pdf_to_word`: Extract PDF text, strip the reference section, save as .docx
//! - `merge_pdfs`: Merge multiple PDFs into a single document
//! - `find_similar_papers_by_keyword`: Prompt for keyword-based paper search
//! - `recommend_related_papers`: Prompt for recommendations related to a paper

pub mod docx;
pub mod error;
pub mod pdf;
pub mod prompts;
pub mod server;
pub mod text;

pub use error::{Error, Result};
pub use server::{
    run_server, run_server_with_config, run_server_with_dirs, ConvertPdfToWordParams,
    MergePdfsParams, PaperServer, ServerConfig,
};
