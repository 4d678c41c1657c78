use remotion_render::RenderRequest;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

pub const DESCRIPTION: &str =
    "Render a Remotion composition to a media file using `npx remotion render`.";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderRemotionParams {
    /// Path to Remotion entry point or project root. Defaults to the bundled template entry point.
    #[serde(default)]
    pub project_path: Option<String>,
    /// Composition ID to render.
    pub composition_id: String,
    /// Output file path (e.g. /tmp/out.mp4).
    pub output_path: String,
    /// Input props: either a JSON object, a JSON string, or a path to a JSON file.
    #[serde(default)]
    pub props: Option<Value>,
    /// Additional args to pass to Remotion CLI (e.g. ["--codec=h264"]).
    #[serde(default)]
    pub extra_args: Option<Vec<String>>,
}

impl RenderRemotionParams {
    /// Builds the render request, substituting `default_entry` for a missing project path.
    pub fn into_request(self, default_entry: &str) -> RenderRequest {
        let entry = self.project_path.unwrap_or_else(|| default_entry.to_string());
        RenderRequest::new(entry, self.composition_id, self.output_path)
            .with_props(super::props_from(self.props))
            .with_extra_args(self.extra_args.unwrap_or_default())
    }
}
