use remotion_render::ListCompositionsRequest;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

pub const DESCRIPTION: &str =
    "List the compositions exposed by a Remotion entry point using `npx remotion compositions`.";

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListCompositionsParams {
    /// Path to Remotion entry point or project root. Defaults to the bundled template entry point.
    #[serde(default)]
    pub project_path: Option<String>,
    /// Input props used while evaluating compositions: a JSON object, a JSON string, or a path to a JSON file.
    #[serde(default)]
    pub props: Option<Value>,
    /// Additional args to pass to Remotion CLI.
    #[serde(default)]
    pub extra_args: Option<Vec<String>>,
}

impl ListCompositionsParams {
    pub fn into_request(self, default_entry: &str) -> ListCompositionsRequest {
        let entry = self.project_path.unwrap_or_else(|| default_entry.to_string());
        ListCompositionsRequest::new(entry)
            .with_props(super::props_from(self.props))
            .with_extra_args(self.extra_args.unwrap_or_default())
    }
}
