//! Command-line arguments for `remotion-render-demo`.

use clap::Parser;
use remotion_render::{Props, RenderRequest};

/// Output path used when none is given.
pub const DEFAULT_OUTPUT: &str = "/tmp/remotion-demo.mp4";

/// Props passed when `--props` is not given.
pub const DEFAULT_PROPS: &str = r#"{"title":"Hello"}"#;

/// Render a Remotion composition directly through the Remotion CLI
#[derive(Debug, Parser)]
#[command(name = "remotion-render-demo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Remotion entry point or project root
    pub project_path: String,

    /// Composition ID to render
    pub composition_id: String,

    /// Output file path
    #[arg(default_value = DEFAULT_OUTPUT)]
    pub output_path: String,

    /// Input props as JSON text or a path to a JSON file
    #[arg(long, default_value = DEFAULT_PROPS)]
    pub props: String,

    /// Additional args passed to the Remotion CLI (after `--`)
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}

impl Cli {
    pub fn into_request(self) -> RenderRequest {
        RenderRequest::new(self.project_path, self.composition_id, self.output_path)
            .with_props(Props::Literal(self.props))
            .with_extra_args(self.extra_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["remotion-render-demo", "src/index.ts", "SimplePromo"])
            .unwrap();
        let req = cli.into_request();
        assert_eq!(req.entry_point, "src/index.ts");
        assert_eq!(req.composition_id, "SimplePromo");
        assert_eq!(req.output_path, DEFAULT_OUTPUT);
        assert_eq!(req.props, Some(Props::Literal(DEFAULT_PROPS.to_string())));
        assert!(req.extra_args.is_empty());
    }

    #[test]
    fn test_output_props_and_extra_args() {
        let cli = Cli::try_parse_from([
            "remotion-render-demo",
            "src/index.ts",
            "CaptionedClip",
            "/tmp/c.mp4",
            "--props",
            "/tmp/props.json",
            "--",
            "--codec=h264",
            "--crf=18",
        ])
        .unwrap();
        let req = cli.into_request();
        assert_eq!(req.output_path, "/tmp/c.mp4");
        assert_eq!(req.props, Some(Props::Literal("/tmp/props.json".into())));
        assert_eq!(req.extra_args, vec!["--codec=h264", "--crf=18"]);
    }

    #[test]
    fn test_missing_composition_is_usage_error() {
        let err = Cli::try_parse_from(["remotion-render-demo", "src/index.ts"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
