//! Tool dispatch shared by both transports.
//!
//! The dispatcher never fails: unknown tools, bad arguments and renderer
//! errors all come back as a [`ToolResponse`] with `ok: false`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use remotion_render::{RenderError, Renderer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

use crate::tools::{self, ListCompositionsParams, RenderRemotionParams};

/// Tools this server knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    RenderRemotion,
    ListCompositions,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::RenderRemotion, ToolName::ListCompositions];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::RenderRemotion => "render_remotion",
            ToolName::ListCompositions => "list_compositions",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::RenderRemotion => tools::render::DESCRIPTION,
            ToolName::ListCompositions => tools::compositions::DESCRIPTION,
        }
    }

    fn input_schema(&self) -> Value {
        let schema = match self {
            ToolName::RenderRemotion => schemars::schema_for!(RenderRemotionParams),
            ToolName::ListCompositions => schemars::schema_for!(ListCompositionsParams),
        };
        let mut value = serde_json::to_value(&schema).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.remove("$schema");
        }
        value
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| format!("Unknown tool: {s}"))
    }
}

/// Tool description as advertised by `list_tools`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub message: String,
}

/// Result envelope for one tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl ToolResponse {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ToolError {
                message: message.into(),
            }),
        }
    }

    /// Failure message, if any.
    pub fn message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

/// Routes tool calls to the renderer.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    renderer: Arc<Renderer>,
    limiter: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer: Arc::new(renderer),
            limiter: None,
        }
    }

    /// Caps the number of renderer processes running at once.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(max.max(1))));
        self
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Descriptions of every registered tool.
    pub fn tools() -> Vec<ToolSpec> {
        ToolName::ALL
            .into_iter()
            .map(|tool| ToolSpec {
                name: tool.as_str(),
                description: tool.description(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Dispatches a call by tool name with raw JSON arguments.
    pub async fn dispatch(&self, name: &str, args: Value) -> ToolResponse {
        let tool = match name.parse::<ToolName>() {
            Ok(tool) => tool,
            Err(message) => {
                warn!(tool = name, "unknown tool");
                return ToolResponse::failure(message);
            }
        };
        debug!(tool = name, "dispatching tool call");

        let args = if args.is_null() { json!({}) } else { args };
        match tool {
            ToolName::RenderRemotion => match serde_json::from_value(args) {
                Ok(params) => self.render(params).await,
                Err(e) => invalid_arguments(tool, e),
            },
            ToolName::ListCompositions => match serde_json::from_value(args) {
                Ok(params) => self.list_compositions(params).await,
                Err(e) => invalid_arguments(tool, e),
            },
        }
    }

    pub async fn render(&self, params: RenderRemotionParams) -> ToolResponse {
        let request = params.into_request(&self.renderer.default_entry_point());
        let _permit = self.acquire().await;
        match self.renderer.render(&request).await {
            Ok(outcome) => ToolResponse::success(json!({
                "ok": true,
                "outputPath": outcome.output_path,
                "stdout": outcome.stdout,
            })),
            Err(e) => failed(ToolName::RenderRemotion, e),
        }
    }

    pub async fn list_compositions(&self, params: ListCompositionsParams) -> ToolResponse {
        let request = params.into_request(&self.renderer.default_entry_point());
        let _permit = self.acquire().await;
        match self.renderer.list_compositions(&request).await {
            Ok(outcome) => ToolResponse::success(json!({
                "ok": true,
                "entryPoint": outcome.entry_point,
                "compositions": outcome.compositions,
                "stdout": outcome.stdout,
            })),
            Err(e) => failed(ToolName::ListCompositions, e),
        }
    }

    async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        match self.limiter {
            Some(ref limiter) => limiter.clone().acquire_owned().await.ok(),
            None => None,
        }
    }
}

fn invalid_arguments(tool: ToolName, e: serde_json::Error) -> ToolResponse {
    warn!(%tool, error = %e, "invalid tool arguments");
    ToolResponse::failure(format!("Invalid arguments for {tool}: {e}"))
}

fn failed(tool: ToolName, e: RenderError) -> ToolResponse {
    warn!(%tool, code = e.code(), error = %e, "tool call failed");
    ToolResponse::failure(e.to_string())
}
