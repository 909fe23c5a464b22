//! Render pipeline with trait-based handler dispatch.
//!
//! Every handler walks the finished tree on its own and returns in-memory
//! artifacts; the pipeline writes them and reports per handler.

pub mod asciidoc;
pub mod html;
pub mod json;
pub mod markdown;
pub mod markup;
pub mod paginate;
pub mod postman;
pub mod writer;

use crate::error::{PipelineError, RenderError, Result};
use crate::model::Tree;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Handlers used when none are configured.
pub const DEFAULT_HANDLERS: &[&str] = &["asciidoc", "html"];

/// A named output buffer, e.g. `users.adoc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub content: String,
}

/// Settings shared by every handler in one pass.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Stem of the index artifact.
    pub id: String,
    pub toc_title: String,
    /// Stylesheet reference for dialects that support one.
    pub stylesheet: Option<String>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            id: "index".to_string(),
            toc_title: "Contents".to_string(),
            stylesheet: None,
        }
    }
}

/// Trait for rendering a Tree into one output format.
///
/// Implementations must not keep state between calls.
pub trait Handler: Send + Sync {
    fn name(&self) -> &str;
    fn handle(&self, tree: &Tree, ctx: &RenderContext) -> Result<Vec<Artifact>>;
}

/// Create a handler for the given format name.
pub fn create_handler(name: &str) -> std::result::Result<Box<dyn Handler>, PipelineError> {
    match name {
        "asciidoc" | "adoc" => Ok(Box::new(asciidoc::AsciidocHandler)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownHandler)),
        "html" => Ok(Box::new(html::HtmlHandler)),
        "json" => Ok(Box::new(json::JsonHandler)),
        "postman" => Ok(Box::new(postman::PostmanHandler)),
        _ => Err(PipelineError::UnknownHandler(name.to_string())),
    }
}

#[derive(Debug)]
pub enum Outcome {
    Written(Vec<PathBuf>),
    Failed(RenderError),
    /// Not started because the run was cancelled.
    Cancelled,
}

#[derive(Debug)]
pub struct HandlerReport {
    pub handler: String,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    pub handlers: Vec<HandlerReport>,
}

impl PipelineReport {
    pub fn failed(&self) -> usize {
        self.handlers
            .iter()
            .filter(|h| matches!(h.outcome, Outcome::Failed(_)))
            .count()
    }

    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.handlers.iter().flat_map(|h| match &h.outcome {
            Outcome::Written(paths) => paths.as_slice(),
            _ => &[],
        })
    }
}

/// Ordered, caller-supplied list of handlers.
pub struct Pipeline {
    handlers: Vec<Box<dyn Handler>>,
    parallel: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl Pipeline {
    pub fn new(handlers: Vec<Box<dyn Handler>>) -> Self {
        Self {
            handlers,
            parallel: false,
            cancel: None,
        }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> std::result::Result<Self, PipelineError> {
        let handlers = names
            .iter()
            .map(|n| create_handler(n.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(handlers))
    }

    /// Run handlers concurrently, one task per handler.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Handlers not yet started when `flag` is set are skipped.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Render and write every handler's artifacts into `out_dir`.
    ///
    /// # Errors
    ///
    /// Fails only when every handler failed; the report is carried in the
    /// error.
    pub fn run(
        &self,
        tree: &Tree,
        ctx: &RenderContext,
        out_dir: &Path,
    ) -> std::result::Result<PipelineReport, PipelineError> {
        let run_one =
            |handler: &Box<dyn Handler>| self.run_one(handler.as_ref(), tree, ctx, out_dir);
        let handlers: Vec<HandlerReport> = if self.parallel {
            self.handlers.par_iter().map(run_one).collect()
        } else {
            self.handlers.iter().map(run_one).collect()
        };
        let report = PipelineReport { handlers };

        if !report.handlers.is_empty() && report.failed() == report.handlers.len() {
            return Err(PipelineError::AllHandlersFailed { report });
        }
        Ok(report)
    }

    fn run_one(
        &self,
        handler: &dyn Handler,
        tree: &Tree,
        ctx: &RenderContext,
        out_dir: &Path,
    ) -> HandlerReport {
        let name = handler.name().to_string();
        if self.cancel.as_ref().is_some_and(|c| c.load(Ordering::Relaxed)) {
            return HandlerReport {
                handler: name,
                outcome: Outcome::Cancelled,
            };
        }

        let result = handler
            .handle(tree, ctx)
            .and_then(|artifacts| writer::write_artifacts(out_dir, &artifacts));
        let outcome = match result {
            Ok(paths) => {
                info!(handler = %name, artifacts = paths.len(), "handler finished");
                Outcome::Written(paths)
            }
            Err(e) => {
                error!(handler = %name, error = %e, "handler failed");
                Outcome::Failed(e)
            }
        };
        HandlerReport {
            handler: name,
            outcome,
        }
    }
}
