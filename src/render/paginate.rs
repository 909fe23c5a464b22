//! Shared pagination and numbering walk over the document tree.
//!
//! Every non-empty group is flushed to its own artifact named by the group
//! id; a fresh buffer seeded with the same header is started after each
//! flush. Section levels come only from nesting depth, so skipped groups never
//! shift the numbering of later ones. Without named buckets the groups are
//! top-level sections; otherwise every non-empty bucket, the default one
//! included, is a chapter holding its groups. The index artifact carries the header,
//! preamble and a table of contents linking every flushed artifact.

use crate::model::{Appendix, Bucket, Group, Node, Tree};
use crate::render::markup::{Attribute, Markup};
use crate::render::{Artifact, RenderContext};
use crate::table::{self, ParameterCell, ALL_COLUMNS, SUMMARY_COLUMNS};
use crate::toc::{self, TocEntry};
use std::collections::HashSet;
use tracing::debug;

/// Stem of the artifact holding the appendix chapter.
pub const APPENDIX_STEM: &str = "appendix";

const APPENDIX_TITLE: &str = "Appendix";
/// Chapter title of the default bucket when named buckets exist.
const DEFAULT_CHAPTER: &str = "Default";
const README_TITLE: &str = "Overview";

/// Render `tree` into paginated artifacts: index first, then one per
/// non-empty group in document order, then the appendix if any.
pub fn paginate<M: Markup>(tree: &Tree, ctx: &RenderContext) -> Vec<Artifact> {
    let mut pages = Paginator::<M>::new(tree, ctx);
    pages.walk();
    pages.finish()
}

struct Paginator<'a, M: Markup> {
    tree: &'a Tree,
    ctx: &'a RenderContext,
    attrs: Vec<Attribute>,
    current: M,
    pages: Vec<Artifact>,
    toc: Vec<TocEntry>,
    used: HashSet<String>,
}

impl<'a, M: Markup> Paginator<'a, M> {
    fn new(tree: &'a Tree, ctx: &'a RenderContext) -> Self {
        let attrs = attributes(ctx);
        let mut used = HashSet::new();
        used.insert(ctx.id.clone());
        let current = fresh::<M>(&tree.name, &attrs);
        Self {
            tree,
            ctx,
            attrs,
            current,
            pages: Vec::new(),
            toc: Vec::new(),
            used,
        }
    }

    fn walk(&mut self) {
        let tree = self.tree;
        if tree.buckets.values().all(Bucket::is_empty) {
            for group in &tree.default_bucket.groups {
                self.group(group, 1);
            }
        } else {
            // With named chapters present the default bucket gets one too.
            self.bucket(DEFAULT_CHAPTER, &tree.default_bucket);
            for bucket in tree.buckets.values() {
                self.bucket(&bucket.name, bucket);
            }
        }

        if tree.has_appendix_content() {
            self.appendices(&tree.appendices);
        }
    }

    fn bucket(&mut self, title: &str, bucket: &Bucket) {
        if bucket.is_empty() {
            return;
        }
        self.current.title(1, title);
        self.toc.push(TocEntry {
            level: 1,
            title: title.to_string(),
            target: None,
        });
        for group in &bucket.groups {
            self.group(group, 2);
        }
    }

    fn group(&mut self, group: &Group, level: usize) {
        if group.is_empty() {
            return;
        }
        self.current.title(level, &group.name);
        if let Some(ref desc) = group.description {
            self.current.paragraph(desc);
        }
        for node in &group.nodes {
            render_node(&mut self.current, node, level + 1);
        }

        let file = self.flush(&group.id);
        self.toc.push(TocEntry {
            level,
            title: group.name.clone(),
            target: Some(file),
        });
    }

    fn appendices(&mut self, appendices: &[Appendix]) {
        self.current.title(1, APPENDIX_TITLE);
        for appendix in appendices.iter().filter(|a| !a.is_empty()) {
            self.current.title(2, &appendix.name);
            self.current
                .table(None, &table::project(&appendix.cells, ALL_COLUMNS));
        }
        let file = self.flush(APPENDIX_STEM);
        self.toc.push(TocEntry {
            level: 1,
            title: APPENDIX_TITLE.to_string(),
            target: Some(file),
        });
    }

    /// Move the current buffer into an artifact and start a fresh one.
    ///
    /// The stem is reduced to a plain file stem so that an id never names a
    /// path outside the output directory.
    fn flush(&mut self, stem: &str) -> String {
        let stem = toc::file_stem(stem);
        let name = format!("{}.{}", self.unique_stem(&stem), M::EXTENSION);
        let buffer = std::mem::replace(&mut self.current, fresh::<M>(&self.tree.name, &self.attrs));
        debug!(artifact = %name, "flushed");
        self.pages.push(Artifact {
            name: name.clone(),
            content: buffer.finish(),
        });
        name
    }

    fn unique_stem(&mut self, stem: &str) -> String {
        let mut candidate = stem.to_string();
        let mut n = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{}-{}", stem, n);
            n += 1;
        }
        candidate
    }

    fn finish(self) -> Vec<Artifact> {
        let tree = self.tree;
        let mut index = fresh::<M>(&tree.name, &self.attrs);
        if let Some(ref version) = tree.version {
            index.paragraph(&format!("Version: {}", version));
        }
        if let Some(ref desc) = tree.description {
            index.paragraph(desc);
        }
        if let Some(readme) = tree.readme.as_deref().filter(|r| !r.is_empty()) {
            index.title(1, README_TITLE);
            index.paragraph(readme);
        }
        if !self.toc.is_empty() {
            index.title(1, &self.ctx.toc_title);
            for entry in &self.toc {
                index.list_item(entry.level, &entry.title, entry.target.as_deref());
            }
        }

        let mut artifacts = Vec::with_capacity(self.pages.len() + 1);
        artifacts.push(Artifact {
            name: format!("{}.{}", self.ctx.id, M::EXTENSION),
            content: index.finish(),
        });
        artifacts.extend(self.pages);
        artifacts
    }
}

fn attributes(ctx: &RenderContext) -> Vec<Attribute> {
    let mut attrs: Vec<Attribute> = vec![
        ("doctype", "book".to_string()),
        ("toc", "left".to_string()),
        ("toclevels", "3".to_string()),
        ("toc-title", ctx.toc_title.clone()),
        ("source-highlighter", "highlightjs".to_string()),
    ];
    if let Some(ref css) = ctx.stylesheet {
        attrs.push(("stylesheet", css.clone()));
    }
    attrs
}

fn fresh<M: Markup>(title: &str, attrs: &[Attribute]) -> M {
    let mut m = M::default();
    m.header(title, attrs);
    m
}

/// Render one endpoint: title, description, request block and table, then
/// the response block and table when the response carries anything.
pub fn render_node<M: Markup>(out: &mut M, node: &Node, level: usize) {
    out.title(level, &node.name);
    if let Some(ref desc) = node.description {
        out.paragraph(desc);
    }

    let request = &node.request;
    let query = request.query_string();
    let mut lines: Vec<String> = request
        .uris
        .iter()
        .map(|uri| format!("{} {}{} {}", request.method, uri, query, node.version))
        .collect();
    lines.extend(
        request
            .effective_headers()
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v)),
    );
    if let Some(body) = request.body.as_deref().filter(|_| request.has_body()) {
        lines.push(String::new());
        lines.push(body.to_string());
    }
    out.text_line("Request");
    out.listing("http", &lines);
    parameter_table(out, &request.cells);

    let response = &node.response;
    if response.is_empty() {
        return;
    }
    let mut lines = vec![format!("{} {}", node.version, response.status_text())];
    lines.extend(
        response
            .effective_headers()
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v)),
    );
    if let Some(body) = response.body.as_deref().filter(|_| response.has_body()) {
        lines.push(String::new());
        lines.push(body.to_string());
    }
    out.text_line("Response");
    out.listing("http", &lines);
    parameter_table(out, &response.cells);
}

fn parameter_table<M: Markup>(out: &mut M, cells: &[ParameterCell]) {
    if cells.is_empty() {
        return;
    }
    let header = table::header_row(SUMMARY_COLUMNS);
    out.table(Some(&header), &table::project(cells, SUMMARY_COLUMNS));
}
