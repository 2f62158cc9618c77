//! MCP server implementation for gdpr-corpus.
//!
//! Exposes corpus lookups as MCP tools for AI editors. The corpus is loaded
//! once before the server starts and shared by every tool call.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, ServerCapabilities, ServerInfo,
    },
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::commands;
use crate::store::SnapshotStore;

/// Parameters for `get_recital_by_id` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecitalParams {
    #[schemars(description = "Recital ID (e.g., 'rec-1')")]
    pub recital_id: String,
}

/// Parameters for `get_chapter_by_id` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChapterParams {
    #[schemars(description = "Chapter ID (e.g., 'chap-1')")]
    pub chapter_id: String,
}

/// Parameters for `get_article_by_id` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ArticleParams {
    #[schemars(description = "Article ID (e.g., 'art-1')")]
    pub article_id: String,
}

/// Parameters for `get_article_paragraph` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParagraphParams {
    #[schemars(description = "Owning article ID (e.g., 'art-1')")]
    pub article_id: String,
    #[schemars(description = "Zero-based paragraph index within the article")]
    pub index: usize,
}

/// MCP server exposing GDPR corpus tools.
#[derive(Clone)]
pub struct CorpusServer {
    store: Arc<SnapshotStore>,
    name: String,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CorpusServer {
    #[must_use]
    pub fn new(store: Arc<SnapshotStore>, name: String) -> Self {
        Self {
            store,
            name,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get a single GDPR recital using its ID (rec-1, rec-2, ...)")]
    async fn get_recital_by_id(
        &self,
        Parameters(params): Parameters<RecitalParams>,
    ) -> Result<CallToolResult, McpError> {
        let started = start_call("get_recital_by_id", &params);
        let result = document_result(
            commands::recital(&*self.store, &params.recital_id),
            format!("No recital found with ID '{}'", params.recital_id),
        );
        finish_call("get_recital_by_id", started, &result);
        result
    }

    #[tool(description = "Get a single GDPR chapter using its ID (chap-1, chap-2, ...)")]
    async fn get_chapter_by_id(
        &self,
        Parameters(params): Parameters<ChapterParams>,
    ) -> Result<CallToolResult, McpError> {
        let started = start_call("get_chapter_by_id", &params);
        let result = document_result(
            commands::chapter(&*self.store, &params.chapter_id),
            format!("No chapter found with ID '{}'", params.chapter_id),
        );
        finish_call("get_chapter_by_id", started, &result);
        result
    }

    #[tool(description = "Get a single GDPR article using its ID (art-1, art-2, ...)")]
    async fn get_article_by_id(
        &self,
        Parameters(params): Parameters<ArticleParams>,
    ) -> Result<CallToolResult, McpError> {
        let started = start_call("get_article_by_id", &params);
        let result = document_result(
            commands::article(&*self.store, &params.article_id),
            format!("No article found with ID '{}'", params.article_id),
        );
        finish_call("get_article_by_id", started, &result);
        result
    }

    #[tool(
        description = "Get a paragraph of a GDPR article by article ID (art-1, art-2, ...) and zero-based index"
    )]
    async fn get_article_paragraph(
        &self,
        Parameters(params): Parameters<ParagraphParams>,
    ) -> Result<CallToolResult, McpError> {
        let started = start_call("get_article_paragraph", &params);
        let result = match commands::paragraph(&*self.store, &params.article_id, params.index) {
            Ok(paragraph) => document_result(
                paragraph,
                format!("No paragraphs found for article '{}'", params.article_id),
            ),
            Err(e) => Err(McpError {
                code: ErrorCode::INVALID_PARAMS,
                message: Cow::from(e.to_string()),
                data: None,
            }),
        };
        finish_call("get_article_paragraph", started, &result);
        result
    }
}

#[tool_handler]
impl ServerHandler for CorpusServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo {
            instructions: Some(
                "gdpr-corpus serves the text of the GDPR. \
                Use get_chapter_by_id to find which articles a chapter contains, \
                get_article_by_id for article metadata and paragraph count, \
                get_article_paragraph to read an article paragraph by paragraph, \
                and get_recital_by_id for recitals."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        };
        info.server_info.name.clone_from(&self.name);
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info
    }
}

fn start_call(tool: &'static str, params: &impl std::fmt::Debug) -> Instant {
    debug!(tool, ?params, "MCP tool call started");
    Instant::now()
}

fn finish_call(tool: &'static str, started: Instant, result: &Result<CallToolResult, McpError>) {
    let elapsed = started.elapsed();
    match result {
        Ok(_) => info!(tool, ?elapsed, "MCP tool call succeeded"),
        Err(e) => warn!(tool, ?elapsed, error = %e.message, "MCP tool call failed"),
    }
}

/// Render a found document as JSON, or `not_found` as plain text.
fn document_result<T: Serialize>(
    document: Option<T>,
    not_found: String,
) -> Result<CallToolResult, McpError> {
    let Some(document) = document else {
        return Ok(CallToolResult::success(vec![Content::text(not_found)]));
    };

    match commands::to_json(&document) {
        Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
        Err(e) => Err(McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::from(format!("Failed to serialize document: {e}")),
            data: None,
        }),
    }
}

/// Start the MCP server with stdio transport.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a fatal error.
pub async fn serve(store: SnapshotStore, name: String) -> anyhow::Result<()> {
    info!(%name, "Starting MCP server on stdio");
    let server = CorpusServer::new(Arc::new(store), name);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Recital;

    fn json_of(result: &CallToolResult) -> String {
        serde_json::to_string(result).unwrap()
    }

    #[test]
    fn found_document_is_rendered_as_json() {
        let result = document_result(
            Some(Recital {
                id: "rec-1".to_string(),
                number: 1,
                texts: vec!["Lorem".to_string()],
            }),
            "unused".to_string(),
        )
        .unwrap();

        let json = json_of(&result);
        assert!(json.contains("rec-1"));
        assert!(json.contains("Lorem"));
    }

    #[test]
    fn missing_document_is_a_successful_message() {
        let result =
            document_result::<Recital>(None, "No recital found with ID 'rec-9'".to_string())
                .unwrap();

        assert!(json_of(&result).contains("No recital found with ID 'rec-9'"));
        assert_ne!(result.is_error, Some(true));
    }

    #[test]
    fn server_info_uses_configured_name() {
        let server = CorpusServer::new(Arc::new(SnapshotStore::new()), "gdpr".to_string());
        let info = server.get_info();
        assert_eq!(info.server_info.name, "gdpr");
        assert!(info.capabilities.tools.is_some());
    }
}
