//! MCP (Model Context Protocol) server for instacheck.
//!
//! Exposes the export analysis pipeline as MCP tools so that AI assistants
//! (Claude Desktop, Cursor, etc.) can invoke them over stdio JSON-RPC.
//!
//! Start with: `instacheck --mcp`

use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRouter},
    handler::server::wrapper::Parameters,
    model::*,
    service::RequestContext,
    tool, tool_router, ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::ops;

// ── Parameter structs ───────────────────────────────────────────────────────
// Each struct maps 1:1 with a CLI subcommand. `JsonSchema` is required by
// rmcp so that the tool's input schema is auto-generated for the AI client.

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalyzeExportParams {
    /// Paths to an export archive (.zip) or loose JSON files.
    pub paths: Vec<String>,
    /// Return a single list: "not-following-back", "not-followed-back",
    /// "mutuals", "followers", "following". Omit for the full report.
    pub view: Option<String>,
    /// Sort for `view`: "asc", "desc", "len", "len-desc" (default: "asc").
    #[serde(default = "default_sort")]
    pub sort: String,
    /// Keep handles containing this text (with `view`).
    pub filter: Option<String>,
    /// Path to a classification rules JSON file.
    pub rules: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalyzeJsonParams {
    /// Object mapping file paths (e.g. "followers_1.json") to their parsed JSON.
    pub entries: serde_json::Value,
    /// Path to a classification rules JSON file.
    pub rules: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CanonicalizeParams {
    /// Usernames, @mentions, or profile URLs.
    pub handles: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportParams {
    /// Handles to render.
    pub handles: Vec<String>,
    /// Output format: "csv" or "mentions" (default: "csv").
    #[serde(default = "default_format")]
    pub format: String,
}

// ── Default helpers ─────────────────────────────────────────────────────────

fn default_sort() -> String {
    "asc".into()
}
fn default_format() -> String {
    "csv".into()
}

// ── Shared helpers ──────────────────────────────────────────────────────────

fn json_text(v: &serde_json::Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

// ── MCP Server ──────────────────────────────────────────────────────────────

/// The MCP server struct. Holds only the auto-generated tool router.
#[derive(Clone)]
pub struct InstacheckMcp {
    #[allow(dead_code)] // accessed at runtime by the #[tool_router] macro
    tool_router: ToolRouter<Self>,
}

impl Default for InstacheckMcp {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl InstacheckMcp {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    // ── analyze_export ──────────────────────────────────────────────────

    #[tool(
        name = "analyze_export",
        description = "Analyze an Instagram data export on disk (a .zip archive or loose JSON files). Returns sorted followers, following, not_following_back, not_followed_back and mutuals lists plus counts, or a single list when `view` is given."
    )]
    async fn analyze_export(
        &self,
        params: Parameters<AnalyzeExportParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let result = tokio::task::spawn_blocking(move || do_analyze_export(&p))
            .await
            .map_err(|e| McpError::internal_error(format!("task join error: {e}"), None))?
            .map_err(|e| McpError::invalid_params(e, None))?;
        Ok(CallToolResult::success(vec![Content::text(json_text(
            &result,
        ))]))
    }

    // ── analyze_json ────────────────────────────────────────────────────

    #[tool(
        name = "analyze_json",
        description = "Analyze already-parsed export JSON passed inline as an object of {path: payload}. Files are routed by name (followers*, following*), with a fallback to top-level `followers` / `following` arrays."
    )]
    async fn analyze_json(
        &self,
        params: Parameters<AnalyzeJsonParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let result = tokio::task::spawn_blocking(move || {
            let config = ops::load_config(p.rules.as_deref())?;
            ops::op_analyze_entries(&p.entries, &config)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("task join error: {e}"), None))?
        .map_err(|e| McpError::invalid_params(e, None))?;
        Ok(CallToolResult::success(vec![Content::text(json_text(
            &result,
        ))]))
    }

    // ── canonicalize_handle ─────────────────────────────────────────────

    #[tool(
        name = "canonicalize_handle",
        description = "Canonicalize Instagram usernames, @mentions, or profile URLs into comparable handles (lowercase, [a-z0-9._], no prefix or query). Rejected inputs get a null handle."
    )]
    async fn canonicalize_handle(
        &self,
        params: Parameters<CanonicalizeParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = ops::op_canonicalize(&params.0.handles);
        Ok(CallToolResult::success(vec![Content::text(json_text(
            &result,
        ))]))
    }

    // ── export_list ─────────────────────────────────────────────────────

    #[tool(
        name = "export_list",
        description = "Render handles as CSV (`username,profile_url`) or as a newline-separated @mention list."
    )]
    async fn export_list(
        &self,
        params: Parameters<ExportParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let text =
            ops::op_export(&p.handles, &p.format).map_err(|e| McpError::invalid_params(e, None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

// ── ServerHandler glue ──────────────────────────────────────────────────────

impl ServerHandler for InstacheckMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Instagram follower analysis. Tools: analyze_export, analyze_json, \
                 canonicalize_handle, export_list. Pass file paths for exports on disk \
                 or inline JSON for already-parsed files."
                    .into(),
            ),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: None }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "instacheck".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Instacheck".into()),
                description: Some(
                    "Followers, following, and mutuals from Instagram data exports".into(),
                ),
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: Default::default(),
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let tool_context = ToolCallContext::new(self, request, context);
        async move { self.tool_router.call(tool_context).await }
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tool_router.get(name).cloned()
    }
}

// ── Entry point ─────────────────────────────────────────────────────────────

/// Start the MCP server on stdio. Called from `cli.rs` when `--mcp` is passed.
pub async fn serve_stdio() -> Result<(), Box<dyn std::error::Error>> {
    let server = InstacheckMcp::new();
    let transport = rmcp::transport::io::stdio();
    let service = server.serve(transport).await.inspect_err(|e| {
        log::error!("MCP serve error: {e}");
    })?;
    service.waiting().await?;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
//  Blocking wrappers (no async, no rmcp types)
// ═══════════════════════════════════════════════════════════════════════════

fn do_analyze_export(p: &AnalyzeExportParams) -> Result<serde_json::Value, String> {
    let config = ops::load_config(p.rules.as_deref())?;
    let analysis = ops::op_analyze_files(&p.paths, &config)?;
    match p.view.as_deref() {
        Some(view) => {
            let handles = ops::op_view(&analysis, view, &p.sort, p.filter.as_deref())?;
            Ok(serde_json::json!(handles))
        }
        None => Ok(ops::analysis_to_json(&analysis)),
    }
}
