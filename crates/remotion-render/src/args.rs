//! Renderer command-line construction.
//!
//! Both builders produce the argument vector handed to the package runner:
//!
//! ```text
//! -y <package> render <entry> <compositionId> <outputPath> [--props=...] [extra...]
//! -y <package> compositions <entry> [--props=...] [extra...]
//! ```
//!
//! Extra args are appended in order and are not escaped or checked.

use crate::error::{RenderError, RenderResult};
use crate::request::{ListCompositionsRequest, Props, RenderRequest};

/// Auto-confirm flag for the package runner.
pub const AUTO_CONFIRM: &str = "-y";

/// Arguments for `<package> render`.
pub fn render_args(package: &str, request: &RenderRequest) -> RenderResult<Vec<String>> {
    let mut args = vec![
        AUTO_CONFIRM.to_string(),
        package.to_string(),
        "render".to_string(),
        request.entry_point.clone(),
        request.composition_id.clone(),
        request.output_path.clone(),
    ];
    push_tail(&mut args, request.props.as_ref(), &request.extra_args)?;
    Ok(args)
}

/// Arguments for `<package> compositions`.
pub fn compositions_args(
    package: &str,
    request: &ListCompositionsRequest,
) -> RenderResult<Vec<String>> {
    let mut args = vec![
        AUTO_CONFIRM.to_string(),
        package.to_string(),
        "compositions".to_string(),
        request.entry_point.clone(),
    ];
    push_tail(&mut args, request.props.as_ref(), &request.extra_args)?;
    Ok(args)
}

/// Formats the `--props=` flag. String props are passed through untouched.
pub fn props_flag(props: &Props) -> RenderResult<String> {
    match props {
        Props::Literal(s) => Ok(format!("--props={s}")),
        Props::Inline(value) => {
            let json = serde_json::to_string(value).map_err(RenderError::SerializeProps)?;
            Ok(format!("--props={json}"))
        }
    }
}

fn push_tail(
    args: &mut Vec<String>,
    props: Option<&Props>,
    extra_args: &[String],
) -> RenderResult<()> {
    if let Some(props) = props {
        args.push(props_flag(props)?);
    }
    args.extend(extra_args.iter().cloned());
    Ok(())
}
