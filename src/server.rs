//! MCP Server implementation using rmcp

use crate::docx;
use crate::error::Error;
use crate::pdf::{merge_documents, PdfReader};
use crate::prompts::{self, RelatedPaper};
use crate::text;
use anyhow::Result;
use rmcp::{
    handler::server::router::prompt::PromptRouter, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, prompt, prompt_handler, prompt_router,
    schemars::JsonSchema, service::RequestContext, tool, tool_handler, tool_router, RoleServer,
    ServerHandler, ServiceExt,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Security configuration for the Paper Helper MCP Server
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Directories tool file paths are restricted to; empty allows all paths
    pub resource_dirs: Vec<String>,
}

/// Paper Helper MCP Server
#[derive(Clone)]
pub struct PaperServer {
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
    config: Arc<ServerConfig>,
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConvertPdfToWordParams {
    /// Path of the PDF file to convert
    pub file_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MergePdfsParams {
    /// Paths of the PDF files to merge, in order
    #[serde(default)]
    pub pdf_files: Option<Vec<String>>,
    /// Path the merged PDF is written to
    #[serde(default)]
    pub output_path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindSimilarPapersArgs {
    /// Keyword or query to search papers for
    pub keyword: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecommendRelatedPapersArgs {
    /// Title of the paper to find related work for
    pub title: String,
    /// Already-known related papers, cited in order after the preamble
    #[serde(default)]
    pub related_papers: Vec<RelatedPaper>,
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl PaperServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new PaperServer with specified resource directories
    pub fn with_resource_dirs(dirs: Vec<String>) -> Self {
        Self::with_config(ServerConfig {
            resource_dirs: dirs,
        })
    }

    /// Create a new PaperServer with full configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
            config: Arc::new(config),
        }
    }

    /// Convert a PDF to a Word document
    #[tool(
        description = "Convert a PDF file to a Word document (.docx). Extracts the text, removes the reference/bibliography section, and writes the result next to the input file. Returns the output path."
    )]
    async fn convert_pdf_to_word(
        &self,
        Parameters(params): Parameters<ConvertPdfToWordParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        match self.process_convert_pdf_to_word(&params).await {
            Ok(output_path) => Ok(CallToolResult::success(vec![Content::text(output_path)])),
            Err(e) => {
                tracing::warn!(error = %e, "convert_pdf_to_word failed");
                Err(Self::to_rpc_error(&e))
            }
        }
    }

    /// Merge multiple PDFs into one
    #[tool(
        description = "Merge multiple PDF files into a single PDF document. Files are combined in the order given and written to output_path. Returns a success or error message."
    )]
    async fn merge_pdfs(
        &self,
        Parameters(params): Parameters<MergePdfsParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        match self.process_merge_pdfs(&params).await {
            Ok(message) => Ok(CallToolResult::success(vec![Content::text(message)])),
            Err(e) => {
                tracing::warn!(error = %e, "merge_pdfs failed");
                Err(Self::to_rpc_error(&e))
            }
        }
    }
}

// ============================================================================
// Prompt implementations
// ============================================================================

#[prompt_router]
impl PaperServer {
    /// Prompt for keyword-based paper search
    #[prompt(
        name = "find_similar_papers_by_keyword",
        description = "Searches for academic research papers based on a given keyword or query. Returns relevant and recent papers from trusted academic databases such as IEEE, ACM, Springer, Elsevier."
    )]
    async fn find_similar_papers_by_keyword(
        &self,
        Parameters(args): Parameters<FindSimilarPapersArgs>,
    ) -> std::result::Result<Vec<PromptMessage>, ErrorData> {
        Ok(prompts::find_similar_papers_by_keyword(&args.keyword))
    }

    /// Prompt for recommendations related to a known paper
    #[prompt(
        name = "recommend_related_papers",
        description = "Recommends academic research papers related to a given paper title. Suggestions are based on similar topics or research methods, and focus on papers published in the past 3 years. Results include metadata such as title, authors, publication year, journal/conference, and DOI or link."
    )]
    async fn recommend_related_papers(
        &self,
        Parameters(args): Parameters<RecommendRelatedPapersArgs>,
    ) -> std::result::Result<Vec<PromptMessage>, ErrorData> {
        Ok(prompts::recommend_related_papers(
            &args.title,
            &args.related_papers,
        ))
    }
}

impl PaperServer {
    fn to_rpc_error(e: &Error) -> ErrorData {
        match e {
            Error::MissingArgument { .. } => ErrorData::invalid_params(e.client_message(), None),
            _ => ErrorData::internal_error(e.client_message(), None),
        }
    }

    /// Validate that a path is within allowed resource directories.
    /// If no resource_dirs are configured, all paths are allowed.
    fn validate_path_access(&self, path: &str) -> crate::error::Result<()> {
        if self.config.resource_dirs.is_empty() {
            return Ok(());
        }

        let canonical =
            std::fs::canonicalize(path).map_err(|_| Error::PathAccessDenied {
                path: path.to_string(),
            })?;

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical.starts_with(&canonical_dir) {
                    return Ok(());
                }
            }
        }

        Err(Error::PathAccessDenied {
            path: path.to_string(),
        })
    }

    /// Validate that an output path is within allowed resource directories.
    /// Canonicalizes the parent directory since the output file may not exist yet.
    fn validate_output_path_access(&self, path: &str) -> crate::error::Result<()> {
        if self.config.resource_dirs.is_empty() {
            return Ok(());
        }

        let path_obj = Path::new(path);
        let parent = path_obj.parent().unwrap_or(Path::new("."));

        let canonical_parent =
            std::fs::canonicalize(parent).map_err(|_| Error::PathAccessDenied {
                path: path.to_string(),
            })?;

        let canonical_target = canonical_parent.join(
            path_obj
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("")),
        );

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical_target.starts_with(&canonical_dir) {
                    return Ok(());
                }
            }
        }

        Err(Error::PathAccessDenied {
            path: path.to_string(),
        })
    }

    /// Write output data to a file path, creating parent directories as needed
    fn write_output(&self, path_str: &str, data: &[u8]) -> crate::error::Result<()> {
        self.validate_output_path_access(path_str)?;

        let path = Path::new(path_str);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, data)?;
        Ok(())
    }

    /// Extract -> strip -> write pipeline. Any failure propagates to the
    /// caller; no intermediate file is cleaned up.
    async fn process_convert_pdf_to_word(
        &self,
        params: &ConvertPdfToWordParams,
    ) -> crate::error::Result<String> {
        if params.file_path.is_empty() {
            return Err(Error::MissingArgument {
                name: "file_path".to_string(),
            });
        }

        self.validate_path_access(&params.file_path)?;

        let input = params.file_path.clone();
        let output = docx::docx_output_path(Path::new(&params.file_path));
        self.validate_output_path_access(&output.to_string_lossy())?;

        // Move CPU-heavy PDF work to the blocking thread pool
        let output_for_task = output.clone();
        tokio::task::spawn_blocking(move || {
            let reader = PdfReader::open(&input)?;
            let extracted = text::join_page_texts(reader.page_texts().iter().map(String::as_str));
            let body = text::strip_reference_section(&extracted);
            docx::write_docx(body, &output_for_task)?;
            Ok::<_, Error>(())
        })
        .await
        .map_err(|e| Error::Pdfium {
            reason: format!("Task join error: {}", e),
        })??;

        Ok(output.to_string_lossy().into_owned())
    }

    /// Validate arguments, then merge. Missing arguments are raised; a missing
    /// input file and any merge or write failure are reported as a normal
    /// message so the caller always receives a response.
    pub async fn process_merge_pdfs(
        &self,
        params: &MergePdfsParams,
    ) -> crate::error::Result<String> {
        let files = match &params.pdf_files {
            Some(files) if !files.is_empty() => files,
            _ => {
                return Err(Error::MissingArgument {
                    name: "pdf_files".to_string(),
                })
            }
        };
        let output_path = match &params.output_path {
            Some(path) if !path.is_empty() => path,
            _ => {
                return Err(Error::MissingArgument {
                    name: "output_path".to_string(),
                })
            }
        };

        for file in files {
            if !Path::new(file).exists() {
                return Ok(format!("Error: File not found - {}", file));
            }
            self.validate_path_access(file)?;
        }

        match self.merge_files(files, output_path).await {
            Ok(()) => Ok(format!(
                "Successfully merged {} PDF files into '{}'.",
                files.len(),
                output_path
            )),
            Err(e) => {
                tracing::warn!(error = %e, "merging PDFs failed");
                Ok(format!("An error occurred while merging PDFs: {}", e))
            }
        }
    }

    async fn merge_files(&self, files: &[String], output_path: &str) -> crate::error::Result<()> {
        let mut inputs = Vec::with_capacity(files.len());
        for file in files {
            inputs.push(std::fs::read(file)?);
        }

        let merged = tokio::task::spawn_blocking(move || merge_documents(&inputs))
            .await
            .map_err(|e| Error::Qpdf {
                reason: format!("Task join error: {}", e),
            })??;

        self.write_output(output_path, &merged)
    }
}

impl Default for PaperServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for PaperServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Paper Helper MCP Server provides tools for converting PDFs to Word documents \
                 and merging PDFs, plus prompts for academic paper search and recommendation."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server without resource directories
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::default()).await
}

/// Run the MCP server with specified resource directories
pub async fn run_server_with_dirs(resource_dirs: Vec<String>) -> Result<()> {
    run_server_with_config(ServerConfig { resource_dirs }).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let server = PaperServer::with_config(config);

    tracing::info!("Paper Helper MCP Server ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn merge_without_file_list_raises_missing_argument() {
        let server = PaperServer::new();

        let params = MergePdfsParams {
            pdf_files: None,
            output_path: Some("out.pdf".to_string()),
        };
        let result = server.process_merge_pdfs(&params).await;
        assert!(matches!(result, Err(Error::MissingArgument { ref name }) if name == "pdf_files"));

        let params = MergePdfsParams {
            pdf_files: Some(vec![]),
            output_path: Some("out.pdf".to_string()),
        };
        let result = server.process_merge_pdfs(&params).await;
        assert!(matches!(result, Err(Error::MissingArgument { ref name }) if name == "pdf_files"));
    }

    #[tokio::test]
    async fn merge_without_output_path_raises_missing_argument() {
        let server = PaperServer::new();

        let params = MergePdfsParams {
            pdf_files: Some(vec!["a.pdf".to_string()]),
            output_path: None,
        };
        let result = server.process_merge_pdfs(&params).await;
        assert!(
            matches!(result, Err(Error::MissingArgument { ref name }) if name == "output_path")
        );

        let params = MergePdfsParams {
            pdf_files: Some(vec!["a.pdf".to_string()]),
            output_path: Some(String::new()),
        };
        let result = server.process_merge_pdfs(&params).await;
        assert!(
            matches!(result, Err(Error::MissingArgument { ref name }) if name == "output_path")
        );
    }

    #[tokio::test]
    async fn merge_with_missing_file_reports_instead_of_raising() {
        let server = PaperServer::new();

        let params = MergePdfsParams {
            pdf_files: Some(vec!["missing.pdf".to_string()]),
            output_path: Some("out.pdf".to_string()),
        };
        let message = server
            .process_merge_pdfs(&params)
            .await
            .expect("missing file is a reported outcome, not a raised one");
        assert_eq!(message, "Error: File not found - missing.pdf");
    }

    #[tokio::test]
    async fn merge_reports_first_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let existing = dir.path().join("a.pdf");
        std::fs::write(&existing, b"%PDF-1.4\n").expect("seed file");

        let server = PaperServer::new();
        let params = MergePdfsParams {
            pdf_files: Some(vec![
                existing.to_string_lossy().into_owned(),
                "gone-1.pdf".to_string(),
                "gone-2.pdf".to_string(),
            ]),
            output_path: Some(dir.path().join("out.pdf").to_string_lossy().into_owned()),
        };

        let message = server.process_merge_pdfs(&params).await.expect("reported");
        assert_eq!(message, "Error: File not found - gone-1.pdf");
    }

    #[tokio::test]
    async fn convert_with_empty_path_raises_missing_argument() {
        let server = PaperServer::new();

        let params = ConvertPdfToWordParams {
            file_path: String::new(),
        };
        let result = server.process_convert_pdf_to_word(&params).await;
        assert!(matches!(result, Err(Error::MissingArgument { .. })));
    }

    #[tokio::test]
    async fn convert_with_nonexistent_file_raises() {
        let server = PaperServer::new();

        let params = ConvertPdfToWordParams {
            file_path: "/nonexistent/paper.pdf".to_string(),
        };
        let result = server.process_convert_pdf_to_word(&params).await;
        assert!(matches!(result, Err(Error::PdfNotFound { .. })));
    }

    #[test]
    fn path_sandbox_denies_files_outside_resource_dirs() {
        let allowed = tempfile::tempdir().expect("tempdir");
        let outside = tempfile::tempdir().expect("tempdir");
        let outside_file = outside.path().join("a.pdf");
        std::fs::write(&outside_file, b"%PDF-1.4\n").expect("seed file");

        let server =
            PaperServer::with_resource_dirs(vec![allowed.path().to_string_lossy().into_owned()]);

        let result = server.validate_path_access(&outside_file.to_string_lossy());
        assert!(matches!(result, Err(Error::PathAccessDenied { .. })));
    }

    #[test]
    fn missing_argument_maps_to_invalid_params() {
        let error = Error::MissingArgument {
            name: "pdf_files".to_string(),
        };
        let rpc = PaperServer::to_rpc_error(&error);
        assert_eq!(rpc.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn other_errors_map_to_internal_error() {
        let error = Error::Qpdf {
            reason: "boom".to_string(),
        };
        let rpc = PaperServer::to_rpc_error(&error);
        assert_eq!(rpc.code, ErrorCode::INTERNAL_ERROR);
    }
}
