//! Format-agnostic document tree.
//!
//! Tree → Bucket (chapter) → Group (section, usually one controller) →
//! Node (one operation). Appendices hang off the tree directly.

use crate::message::{HttpRequest, HttpResponse};
use crate::table::ParameterCell;
use indexmap::IndexMap;
use serde::Serialize;

/// The whole document.
#[derive(Debug, Default, Serialize)]
pub struct Tree {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    /// Holds every group that was not classified into a named bucket.
    pub default_bucket: Bucket,
    /// Named buckets, in first-seen order.
    pub buckets: IndexMap<String, Bucket>,
    pub appendices: Vec<Appendix>,
}

impl Tree {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Bucket for `name`, created on first use. `None` is the default bucket.
    pub fn bucket_mut(&mut self, name: Option<&str>) -> &mut Bucket {
        match name {
            None => &mut self.default_bucket,
            Some(name) => self
                .buckets
                .entry(name.to_string())
                .or_insert_with(|| Bucket::new(name)),
        }
    }

    /// Default bucket first, then named buckets in order.
    pub fn all_buckets(&self) -> impl Iterator<Item = &Bucket> {
        std::iter::once(&self.default_bucket).chain(self.buckets.values())
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.all_buckets().flat_map(|b| b.groups.iter())
    }

    pub fn node_count(&self) -> usize {
        self.groups().map(|g| g.nodes.len()).sum()
    }

    pub fn has_appendix_content(&self) -> bool {
        self.appendices.iter().any(|a| !a.is_empty())
    }
}

/// Top-level chapter.
#[derive(Debug, Default, Serialize)]
pub struct Bucket {
    pub name: String,
    pub groups: Vec<Group>,
}

impl Bucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Group::is_empty)
    }

    /// Group named `name`, created on first use.
    ///
    /// An existing group keeps the id and description it was created with.
    pub fn group_mut(&mut self, name: &str, id: &str, description: Option<&str>) -> &mut Group {
        let pos = match self.groups.iter().position(|g| g.name == name) {
            Some(pos) => pos,
            None => {
                let mut group = Group::new(id, name);
                group.description = description.map(str::to_string);
                self.groups.push(group);
                self.groups.len() - 1
            }
        };
        &mut self.groups[pos]
    }
}

/// One documented unit, flushed to its own artifact.
#[derive(Debug, Default, Serialize)]
pub struct Group {
    /// File-name key of the group's artifact.
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<Node>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            nodes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One documented request/response pair.
#[derive(Debug, Default, Serialize)]
pub struct Node {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Protocol version, e.g. `HTTP/1.1`.
    pub version: String,
    pub request: HttpRequest,
    pub response: HttpResponse,
}

#[derive(Debug, Default, Serialize)]
pub struct Appendix {
    pub name: String,
    pub cells: Vec<ParameterCell>,
}

impl Appendix {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_mut_reuses_by_name() {
        let mut tree = Tree::new("api");
        tree.bucket_mut(Some("users"));
        tree.bucket_mut(Some("orders"));
        tree.bucket_mut(Some("users"));
        let names: Vec<&str> = tree.buckets.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["users", "orders"]);
    }

    #[test]
    fn group_mut_first_write_wins() {
        let mut bucket = Bucket::default();
        bucket.group_mut("Users", "users", Some("first"));
        let group = bucket.group_mut("Users", "other-id", Some("second"));
        assert_eq!(group.id, "users");
        assert_eq!(group.description.as_deref(), Some("first"));
        assert_eq!(bucket.groups.len(), 1);
    }

    #[test]
    fn bucket_empty_when_all_groups_empty() {
        let mut bucket = Bucket::new("b");
        assert!(bucket.is_empty());
        bucket.group_mut("g", "g", None);
        assert!(bucket.is_empty());
        bucket.group_mut("g", "g", None).nodes.push(Node::default());
        assert!(!bucket.is_empty());
    }

    #[test]
    fn node_count_spans_buckets() {
        let mut tree = Tree::new("api");
        tree.bucket_mut(None)
            .group_mut("a", "a", None)
            .nodes
            .push(Node::default());
        tree.bucket_mut(Some("x"))
            .group_mut("b", "b", None)
            .nodes
            .extend([Node::default(), Node::default()]);
        assert_eq!(tree.node_count(), 3);
    }
}
