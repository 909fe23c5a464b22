//! `apidoc.toml` configuration.
//!
//! Every key is optional. Command-line flags override file values, and
//! metadata found in the descriptor document overrides both.

use crate::builder::{BuildOptions, Strategy};
use crate::descriptor::ApiSource;
use crate::error::ConfigError;
use crate::model::Tree;
use crate::render::{RenderContext, DEFAULT_HANDLERS};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "apidoc.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Stem of the index artifact.
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub readme: Option<String>,
    /// Base for a relative `out`.
    pub project: PathBuf,
    pub out: PathBuf,
    /// Folder wrapping the generated files inside `out`.
    pub production: PathBuf,
    pub handlers: Vec<String>,
    pub classify: Strategy,
    /// Type names left out of parameter tables.
    pub ignore: Vec<String>,
    pub css: Option<String>,
    pub parallel: bool,
    pub toc_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id: "index".to_string(),
            title: None,
            description: None,
            version: None,
            readme: None,
            project: PathBuf::from("."),
            out: PathBuf::from("build"),
            production: PathBuf::from("apidoc"),
            handlers: DEFAULT_HANDLERS.iter().map(|h| h.to_string()).collect(),
            classify: Strategy::default(),
            ignore: Vec::new(),
            css: None,
            parallel: false,
            toc_title: "Contents".to_string(),
        }
    }
}

impl Config {
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::parse(&text).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Directory the artifacts are written to.
    pub fn out_path(&self) -> PathBuf {
        if self.out.is_absolute() {
            self.out.join(&self.production)
        } else {
            self.project.join(&self.out).join(&self.production)
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::ignoring(self.ignore.iter().cloned())
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            id: self.id.clone(),
            toc_title: self.toc_title.clone(),
            stylesheet: self.css.clone(),
        }
    }

    /// Empty tree carrying the document metadata. Values from the
    /// descriptor document win over configured ones.
    pub fn tree_for(&self, source: &ApiSource) -> Tree {
        let mut tree = Tree::new(
            source
                .title
                .clone()
                .or_else(|| self.title.clone())
                .unwrap_or_else(|| self.id.clone()),
        );
        tree.description = source.description.clone().or_else(|| self.description.clone());
        tree.version = source.version.clone().or_else(|| self.version.clone());
        tree.readme = source.readme.clone().or_else(|| self.readme.clone());
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.id, "index");
        assert_eq!(config.handlers, vec!["asciidoc", "html"]);
        assert_eq!(config.classify, Strategy::Controller);
        assert_eq!(config.out_path(), PathBuf::from("./build/apidoc"));
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
            id = "shop"
            title = "Shop API"
            out = "/tmp/docs"
            production = "v1"
            handlers = ["markdown", "postman"]
            classify = "package"
            ignore = ["ResponseEntity"]
            css = "theme.css"
            parallel = true
            "#,
        )
        .unwrap();
        assert_eq!(config.id, "shop");
        assert_eq!(config.classify, Strategy::Package);
        assert_eq!(config.out_path(), PathBuf::from("/tmp/docs/v1"));
        assert!(config.parallel);
        assert!(config.build_options().ignored_types.contains("ResponseEntity"));
        assert_eq!(config.render_context().stylesheet.as_deref(), Some("theme.css"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::parse("colour = \"red\"").is_err());
        assert!(Config::parse("classify = \"module\"").is_err());
    }

    #[test]
    fn source_metadata_wins() {
        let config = Config {
            title: Some("Configured".into()),
            version: Some("1.0".into()),
            ..Default::default()
        };
        let source = ApiSource {
            title: Some("From source".into()),
            readme: Some("All calls use HTTPS".into()),
            ..Default::default()
        };
        let tree = config.tree_for(&source);
        assert_eq!(tree.name, "From source");
        assert_eq!(tree.version.as_deref(), Some("1.0"));
        assert_eq!(tree.readme.as_deref(), Some("All calls use HTTPS"));
    }

    #[test]
    fn tree_name_falls_back_to_id() {
        let tree = Config::default().tree_for(&ApiSource::default());
        assert_eq!(tree.name, "index");
    }

    #[test]
    fn load_reports_path() {
        let err = Config::load(Path::new("/nonexistent/apidoc.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/apidoc.toml"));
    }
}
