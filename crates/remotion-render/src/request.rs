//! Render and listing requests.

use serde_json::Value;

use crate::error::{RenderError, RenderResult};

/// Input props for a composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Props {
    /// JSON text or a path to a JSON file, forwarded verbatim.
    Literal(String),
    /// Structured props, serialized to JSON for the renderer.
    Inline(Value),
}

impl Props {
    /// Maps a JSON value onto props. `null` means "no props".
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Props::Literal(s)),
            other => Some(Props::Inline(other)),
        }
    }
}

impl From<&str> for Props {
    fn from(s: &str) -> Self {
        Props::Literal(s.to_string())
    }
}

impl From<String> for Props {
    fn from(s: String) -> Self {
        Props::Literal(s)
    }
}

/// A request to render one composition to a file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Entry point or project root the renderer loads.
    pub entry_point: String,
    /// Composition to render.
    pub composition_id: String,
    /// Destination file.
    pub output_path: String,
    pub props: Option<Props>,
    /// Flags appended after everything else, unmodified.
    pub extra_args: Vec<String>,
}

impl RenderRequest {
    pub fn new(
        entry_point: impl Into<String>,
        composition_id: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            entry_point: entry_point.into(),
            composition_id: composition_id.into(),
            output_path: output_path.into(),
            props: None,
            extra_args: Vec::new(),
        }
    }

    pub fn with_props(mut self, props: impl Into<Option<Props>>) -> Self {
        self.props = props.into();
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Checks that the entry point, composition and output are present.
    pub fn validate(&self) -> RenderResult<()> {
        require_non_empty("projectPath", &self.entry_point)?;
        require_non_empty("compositionId", &self.composition_id)?;
        require_non_empty("outputPath", &self.output_path)?;
        Ok(())
    }
}

/// A request to list the compositions exposed by an entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct ListCompositionsRequest {
    pub entry_point: String,
    pub props: Option<Props>,
    pub extra_args: Vec<String>,
}

impl ListCompositionsRequest {
    pub fn new(entry_point: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
            props: None,
            extra_args: Vec::new(),
        }
    }

    pub fn with_props(mut self, props: impl Into<Option<Props>>) -> Self {
        self.props = props.into();
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> RenderResult<()> {
        require_non_empty("projectPath", &self.entry_point)
    }
}

fn require_non_empty(field: &'static str, value: &str) -> RenderResult<()> {
    if value.trim().is_empty() {
        return Err(RenderError::invalid_request(
            field,
            "must be a non-empty string",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_props_from_value() {
        assert_eq!(Props::from_value(Value::Null), None);
        assert_eq!(
            Props::from_value(json!("/tmp/p.json")),
            Some(Props::Literal("/tmp/p.json".into()))
        );
        assert_eq!(
            Props::from_value(json!({"title": "Hello"})),
            Some(Props::Inline(json!({"title": "Hello"})))
        );
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let ok = RenderRequest::new("src/index.ts", "SimplePromo", "/tmp/out.mp4");
        assert!(ok.validate().is_ok());

        let err = RenderRequest::new("src/index.ts", "", "/tmp/out.mp4")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("compositionId"));

        let err = RenderRequest::new("src/index.ts", "SimplePromo", "  ")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("outputPath"));

        let err = ListCompositionsRequest::new("").validate().unwrap_err();
        assert!(err.to_string().contains("projectPath"));
    }

    #[test]
    fn test_builders() {
        let req = RenderRequest::new("src/index.ts", "CaptionedClip", "/tmp/c.mp4")
            .with_props(Props::from("{\"caption\":\"hi\"}"))
            .with_extra_args(["--codec=h264"]);
        assert_eq!(req.extra_args, vec!["--codec=h264".to_string()]);
        assert!(matches!(req.props, Some(Props::Literal(_))));
    }
}
