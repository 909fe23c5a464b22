//! Tree builder: classify descriptors into buckets and groups.
//!
//! Buckets, groups and nodes keep the order in which they were first seen.
//! Malformed descriptors are skipped and reported as diagnostics; a single
//! bad descriptor never stops the build.

use crate::descriptor::{AppendixDescriptor, EndpointDescriptor};
use crate::error::{ConfigError, DescriptorError};
use crate::message::{HttpRequest, HttpResponse, DEFAULT_VERSION};
use crate::model::{Appendix, Node, Tree};
use crate::table::ParameterCell;
use crate::toc;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Group name for endpoints without a controller.
pub const DEFAULT_GROUP: &str = "Default";

static RE_GENERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w.$]+)\s*<(.+)>\s*$").unwrap());

/// Where a descriptor lands in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// `None` selects the default bucket.
    pub bucket: Option<String>,
    pub group: String,
    pub group_id: String,
    pub description: Option<String>,
}

/// Classification strategy.
pub trait Classifier: Send + Sync {
    fn classify(&self, descriptor: &EndpointDescriptor) -> Placement;
}

impl<F> Classifier for F
where
    F: Fn(&EndpointDescriptor) -> Placement + Send + Sync,
{
    fn classify(&self, descriptor: &EndpointDescriptor) -> Placement {
        self(descriptor)
    }
}

/// One group per controller, no buckets.
pub struct ByController;

/// Bucket per controller package, one group per controller.
pub struct ByPackage;

/// Bucket per first endpoint tag, one group per controller.
pub struct ByTag;

impl Classifier for ByController {
    fn classify(&self, descriptor: &EndpointDescriptor) -> Placement {
        controller_placement(descriptor, None)
    }
}

impl Classifier for ByPackage {
    fn classify(&self, descriptor: &EndpointDescriptor) -> Placement {
        let package = descriptor
            .controller
            .as_ref()
            .and_then(|c| c.package.clone())
            .filter(|p| !p.is_empty());
        controller_placement(descriptor, package)
    }
}

impl Classifier for ByTag {
    fn classify(&self, descriptor: &EndpointDescriptor) -> Placement {
        let tag = descriptor.tags.iter().find(|t| !t.is_empty()).cloned();
        controller_placement(descriptor, tag)
    }
}

fn controller_placement(descriptor: &EndpointDescriptor, bucket: Option<String>) -> Placement {
    match &descriptor.controller {
        Some(c) if !c.name.is_empty() => Placement {
            bucket,
            group: c.name.clone(),
            group_id: c
                .id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| toc::file_stem(&c.name)),
            description: c.description.clone(),
        },
        _ => Placement {
            bucket,
            group: DEFAULT_GROUP.to_string(),
            group_id: toc::file_stem(DEFAULT_GROUP),
            description: None,
        },
    }
}

/// Named classification strategies selectable from configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Controller,
    Package,
    Tag,
}

impl Strategy {
    pub fn classifier(self) -> Box<dyn Classifier> {
        match self {
            Strategy::Controller => Box::new(ByController),
            Strategy::Package => Box::new(ByPackage),
            Strategy::Tag => Box::new(ByTag),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "controller" => Ok(Strategy::Controller),
            "package" => Ok(Strategy::Package),
            "tag" => Ok(Strategy::Tag),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Caller-scoped build settings.
#[derive(Debug, Default, Clone)]
pub struct BuildOptions {
    /// Type names to drop from parameter tables. A generic wrapper whose
    /// name is listed is unwrapped instead (`ResponseEntity<User>` → `User`).
    pub ignored_types: BTreeSet<String>,
}

impl BuildOptions {
    pub fn ignoring<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_types: names.into_iter().map(Into::into).collect(),
        }
    }

    fn is_ignored(&self, type_name: &str) -> bool {
        let simple = type_name.rsplit('.').next().unwrap_or(type_name);
        self.ignored_types.contains(type_name) || self.ignored_types.contains(simple)
    }

    /// Resolve a cell type; `None` means the cell is dropped.
    pub fn resolve_type(&self, type_name: &str) -> Option<String> {
        let type_name = type_name.trim();
        if let Some(caps) = RE_GENERIC.captures(type_name) {
            if self.is_ignored(&caps[1]) {
                return self.resolve_type(&caps[2]);
            }
            return Some(type_name.to_string());
        }
        if !type_name.is_empty() && self.is_ignored(type_name) {
            return None;
        }
        Some(type_name.to_string())
    }

    fn filter_cells(&self, cells: &[ParameterCell]) -> Vec<ParameterCell> {
        cells
            .iter()
            .filter_map(|cell| {
                let type_name = self.resolve_type(&cell.type_name)?;
                Some(ParameterCell {
                    type_name,
                    ..cell.clone()
                })
            })
            .collect()
    }
}

/// A descriptor that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Position in the descriptor stream.
    pub index: usize,
    pub endpoint: String,
    pub error: DescriptorError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.index, self.endpoint, self.error)
    }
}

/// Result of a build pass.
#[derive(Debug)]
pub struct BuildOutput {
    pub tree: Tree,
    pub diagnostics: Vec<Diagnostic>,
    /// Descriptors seen, including skipped ones.
    pub discovered: usize,
}

/// Incremental tree builder.
pub struct TreeBuilder<'a> {
    classifier: &'a dyn Classifier,
    options: &'a BuildOptions,
    tree: Tree,
    diagnostics: Vec<Diagnostic>,
    discovered: usize,
}

impl<'a> TreeBuilder<'a> {
    /// Start from `tree`, which normally carries only metadata.
    pub fn new(tree: Tree, classifier: &'a dyn Classifier, options: &'a BuildOptions) -> Self {
        Self {
            classifier,
            options,
            tree,
            diagnostics: Vec::new(),
            discovered: 0,
        }
    }

    pub fn add(&mut self, descriptor: &EndpointDescriptor) {
        let index = self.discovered;
        self.discovered += 1;

        let method = match descriptor.validate() {
            Ok(method) => method,
            Err(error) => {
                warn!(
                    endpoint = descriptor.display_name(),
                    %error,
                    "skipping malformed descriptor"
                );
                self.diagnostics.push(Diagnostic {
                    index,
                    endpoint: descriptor.display_name().to_string(),
                    error,
                });
                return;
            }
        };

        let placement = self.classifier.classify(descriptor);
        debug!(
            endpoint = descriptor.display_name(),
            bucket = placement.bucket.as_deref().unwrap_or(""),
            group = %placement.group,
            "classified"
        );
        let node = self.node(descriptor, method);
        self.tree
            .bucket_mut(placement.bucket.as_deref())
            .group_mut(&placement.group, &placement.group_id, placement.description.as_deref())
            .nodes
            .push(node);
    }

    pub fn add_appendix(&mut self, appendix: &AppendixDescriptor) {
        self.tree.appendices.push(Appendix {
            name: appendix.name.clone(),
            cells: appendix.cells.clone(),
        });
    }

    pub fn finish(self) -> BuildOutput {
        BuildOutput {
            tree: self.tree,
            diagnostics: self.diagnostics,
            discovered: self.discovered,
        }
    }

    fn node(&self, d: &EndpointDescriptor, method: http::Method) -> Node {
        let req = &d.request;
        let request = HttpRequest {
            method: method.as_str().to_string(),
            uris: req
                .uris
                .iter()
                .filter(|u| !u.trim().is_empty())
                .cloned()
                .collect(),
            query: req.query.clone(),
            headers: req.headers.clone(),
            body: req.body.clone(),
            cells: self.options.filter_cells(&req.cells),
        };
        let response = d
            .response
            .as_ref()
            .map(|r| HttpResponse {
                status: r.status,
                headers: r.headers.clone(),
                body: r.body.clone(),
                cells: self.options.filter_cells(&r.cells),
            })
            .unwrap_or_default();
        Node {
            name: d.display_name().to_string(),
            description: d.description.clone(),
            version: d
                .version
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            request,
            response,
        }
    }
}

/// Build an unnamed tree from a descriptor stream.
pub fn build<'d, I>(
    descriptors: I,
    classifier: &dyn Classifier,
    options: &BuildOptions,
) -> BuildOutput
where
    I: IntoIterator<Item = &'d EndpointDescriptor>,
{
    let mut builder = TreeBuilder::new(Tree::default(), classifier, options);
    for d in descriptors {
        builder.add(d);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ControllerInfo, RequestDescriptor};

    fn endpoint(name: &str, controller: Option<&str>, method: Option<&str>) -> EndpointDescriptor {
        EndpointDescriptor {
            name: name.to_string(),
            controller: controller.map(|c| ControllerInfo {
                name: c.to_string(),
                package: Some(format!("com.example.{}", c.to_lowercase())),
                ..Default::default()
            }),
            request: RequestDescriptor {
                method: method.map(str::to_string),
                uris: vec![format!("/{}", name)],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn group_names(tree: &Tree) -> Vec<&str> {
        tree.groups().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn counts_exclude_malformed() {
        let ds = vec![
            endpoint("a", Some("Users"), Some("GET")),
            endpoint("b", Some("Users"), None),
            endpoint("c", Some("Orders"), Some("POST")),
            endpoint("d", None, Some("GET")),
        ];
        let out = build(&ds, &ByController, &BuildOptions::default());
        assert_eq!(out.discovered, 4);
        assert_eq!(out.tree.node_count(), 3);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].index, 1);
        assert_eq!(out.diagnostics[0].error, DescriptorError::MissingMethod);
        assert_eq!(out.diagnostics[0].to_string(), "#1 b: missing HTTP method");
    }

    #[test]
    fn preserves_first_seen_order_and_duplicates() {
        let ds = vec![
            endpoint("a", Some("Users"), Some("GET")),
            endpoint("b", Some("Orders"), Some("GET")),
            endpoint("a", Some("Users"), Some("GET")),
        ];
        let out = build(&ds, &ByController, &BuildOptions::default());
        assert_eq!(group_names(&out.tree), vec!["Users", "Orders"]);
        let users = &out.tree.default_bucket.groups[0];
        assert_eq!(users.nodes.len(), 2);
        assert_eq!(users.id, "users");
        assert!(out.tree.buckets.is_empty());
    }

    #[test]
    fn unclassified_goes_to_default_group() {
        let ds = vec![endpoint("ping", None, Some("GET"))];
        let out = build(&ds, &ByController, &BuildOptions::default());
        assert_eq!(group_names(&out.tree), vec![DEFAULT_GROUP]);
        assert_eq!(out.tree.default_bucket.groups[0].id, "default");
    }

    #[test]
    fn package_strategy_creates_buckets() {
        let ds = vec![
            endpoint("a", Some("Users"), Some("GET")),
            endpoint("b", None, Some("GET")),
            endpoint("c", Some("Orders"), Some("GET")),
        ];
        let out = build(&ds, &ByPackage, &BuildOptions::default());
        let buckets: Vec<&str> = out.tree.buckets.keys().map(String::as_str).collect();
        assert_eq!(buckets, vec!["com.example.users", "com.example.orders"]);
        assert_eq!(out.tree.default_bucket.groups.len(), 1);
    }

    #[test]
    fn tag_strategy_uses_first_tag() {
        let mut d = endpoint("a", Some("Users"), Some("GET"));
        d.tags = vec!["admin".into(), "internal".into()];
        let out = build([&d], &ByTag, &BuildOptions::default());
        assert!(out.tree.buckets.contains_key("admin"));
    }

    #[test]
    fn closure_classifier() {
        let ds = vec![endpoint("a", Some("Users"), Some("GET"))];
        let classify = |d: &EndpointDescriptor| Placement {
            bucket: Some("v1".into()),
            group: d.name.to_uppercase(),
            group_id: "custom".into(),
            description: None,
        };
        let out = build(&ds, &classify, &BuildOptions::default());
        assert_eq!(out.tree.buckets["v1"].groups[0].name, "A");
    }

    #[test]
    fn first_write_wins_for_group_identity() {
        let mut first = endpoint("a", Some("Users"), Some("GET"));
        first.controller.as_mut().unwrap().description = Some("User API".into());
        let mut second = endpoint("b", Some("Users"), Some("GET"));
        second.controller.as_mut().unwrap().id = Some("people".into());
        let out = build([&first, &second], &ByController, &BuildOptions::default());
        let group = &out.tree.default_bucket.groups[0];
        assert_eq!(group.id, "users");
        assert_eq!(group.description.as_deref(), Some("User API"));
        assert_eq!(group.nodes.len(), 2);
    }

    #[test]
    fn defaults_protocol_version_and_method_case() {
        let ds = vec![endpoint("a", Some("Users"), Some("post"))];
        let out = build(&ds, &ByController, &BuildOptions::default());
        let node = &out.tree.default_bucket.groups[0].nodes[0];
        assert_eq!(node.version, "HTTP/1.1");
        assert_eq!(node.request.method, "POST");
        assert!(node.response.is_empty());
    }

    #[test]
    fn ignored_types_drop_and_unwrap() {
        let opts = BuildOptions::ignoring(["HttpServletRequest", "ResponseEntity"]);
        assert_eq!(opts.resolve_type("HttpServletRequest"), None);
        assert_eq!(
            opts.resolve_type("javax.servlet.http.HttpServletRequest"),
            None
        );
        assert_eq!(
            opts.resolve_type("ResponseEntity<User>"),
            Some("User".to_string())
        );
        assert_eq!(
            opts.resolve_type("ResponseEntity<List<User>>"),
            Some("List<User>".to_string())
        );
        assert_eq!(opts.resolve_type("long"), Some("long".to_string()));
        assert_eq!(opts.resolve_type(""), Some(String::new()));
    }

    #[test]
    fn ignored_types_apply_to_cells() {
        let mut d = endpoint("a", Some("Users"), Some("GET"));
        d.request.cells = vec![
            ParameterCell::new("req", "HttpServletRequest", "", "", ""),
            ParameterCell::new("id", "long", "true", "", "user id"),
        ];
        let opts = BuildOptions::ignoring(["HttpServletRequest"]);
        let out = build([&d], &ByController, &opts);
        let cells = &out.tree.default_bucket.groups[0].nodes[0].request.cells;
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].name, "id");
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!("tag".parse::<Strategy>().unwrap(), Strategy::Tag);
        assert!("module".parse::<Strategy>().is_err());
    }
}
