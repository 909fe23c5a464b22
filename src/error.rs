use std::path::PathBuf;

use thiserror::Error;

use crate::render::PipelineReport;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Why a descriptor was left out of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("missing HTTP method")]
    MissingMethod,

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("no request URI")]
    NoUris,
}

/// Errors raised by a single handler.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing an artifact to disk failed.
    #[error("failed to write artifact '{path}': {error}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Serializing structured output failed.
    #[error("failed to serialize {what}: {error}")]
    Serialize {
        what: &'static str,
        #[source]
        error: serde_json::Error,
    },
}

/// Errors for a whole pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every handler failed; per-handler errors are in the report.
    #[error("all {} handlers failed", .report.handlers.len())]
    AllHandlersFailed { report: PipelineReport },

    #[error("unknown handler: {0}. Use asciidoc, markdown, html, json, or postman")]
    UnknownHandler(String),
}

/// Errors loading `apidoc.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("invalid config '{path}': {error}")]
    Parse {
        path: PathBuf,
        #[source]
        error: toml::de::Error,
    },

    #[error("unknown classification strategy: {0}. Use controller, package, or tag")]
    UnknownStrategy(String),
}
