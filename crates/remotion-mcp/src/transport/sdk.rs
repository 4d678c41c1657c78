//! Model Context Protocol framing via rmcp.
//!
//! Tool metadata comes from `#[tool_router]`. `call_tool` is overridden so an
//! unknown tool name or undecodable arguments produce an error tool result
//! instead of a JSON-RPC error.

use std::future::Future;

use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::{
        CallToolRequestParam, CallToolResult, Content, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_router, ErrorData, RoleServer, ServerHandler, ServiceExt,
};
use tracing::{debug, info, warn};

use crate::dispatch::{Dispatcher, ToolName, ToolResponse};
use crate::tools::{ListCompositionsParams, RenderRemotionParams};

/// rmcp server handler backed by a [`Dispatcher`].
#[derive(Clone)]
pub struct RemotionMcp {
    dispatcher: Dispatcher,
    tool_router: ToolRouter<Self>,
}

impl RemotionMcp {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            tool_router: Self::tool_router(),
        }
    }

    /// Access the tool router for testing/introspection.
    pub fn router(&self) -> &ToolRouter<Self> {
        &self.tool_router
    }
}

#[tool_router]
impl RemotionMcp {
    #[tool(
        description = "Render a Remotion composition to a media file using `npx remotion render`."
    )]
    async fn render_remotion(
        &self,
        Parameters(params): Parameters<RenderRemotionParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(to_call_result(self.dispatcher.render(params).await))
    }

    #[tool(
        description = "List the compositions exposed by a Remotion entry point using `npx remotion compositions`."
    )]
    async fn list_compositions(
        &self,
        Parameters(params): Parameters<ListCompositionsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(to_call_result(self.dispatcher.list_compositions(params).await))
    }
}

impl ServerHandler for RemotionMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Remotion rendering tools. Use list_compositions to discover composition IDs \
                 in an entry point and render_remotion to render one to a media file."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        debug!("Calling tool: {}", request.name);
        async move {
            if let Err(message) = request.name.parse::<ToolName>() {
                warn!(tool = %request.name, "unknown tool");
                return Ok(to_call_result(ToolResponse::failure(message)));
            }

            let tool_name = request.name.to_string();
            let tool_context = ToolCallContext::new(self, request, context);
            match self.tool_router.call(tool_context).await {
                Ok(result) => Ok(result),
                Err(e) => {
                    warn!(tool = %tool_name, error = %e.message, "invalid tool arguments");
                    Ok(to_call_result(ToolResponse::failure(format!(
                        "Invalid arguments for {tool_name}: {}",
                        e.message
                    ))))
                }
            }
        }
    }
}

/// Wraps a dispatcher envelope as a text tool result.
fn to_call_result(response: ToolResponse) -> CallToolResult {
    let text = serde_json::to_string(&response).unwrap_or_default();
    if response.ok {
        CallToolResult::success(vec![Content::text(text)])
    } else {
        CallToolResult::error(vec![Content::text(text)])
    }
}

/// Serves MCP on the process's stdin/stdout until the client disconnects.
pub async fn serve_stdio(dispatcher: Dispatcher) -> anyhow::Result<()> {
    let service = RemotionMcp::new(dispatcher)
        .serve(rmcp::transport::stdio())
        .await?;
    info!("MCP server ready");
    service.waiting().await?;
    Ok(())
}
