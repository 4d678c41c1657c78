pub mod compositions;
pub mod render;

pub use compositions::ListCompositionsParams;
pub use render::RenderRemotionParams;

use remotion_render::Props;
use serde_json::Value;

fn props_from(value: Option<Value>) -> Option<Props> {
    value.and_then(Props::from_value)
}
