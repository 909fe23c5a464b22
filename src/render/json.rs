//! JSON handler: structured dump of the whole tree for tooling integration.

use crate::error::{RenderError, Result};
use crate::model::Tree;
use crate::render::{Artifact, Handler, RenderContext};

pub struct JsonHandler;

impl Handler for JsonHandler {
    fn name(&self) -> &str {
        "json"
    }

    fn handle(&self, tree: &Tree, ctx: &RenderContext) -> Result<Vec<Artifact>> {
        let mut content =
            serde_json::to_string_pretty(tree).map_err(|error| RenderError::Serialize {
                what: "document tree",
                error,
            })?;
        content.push('\n');
        Ok(vec![Artifact {
            name: format!("{}.json", ctx.id),
            content,
        }])
    }
}
