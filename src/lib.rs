//! apidoc: generate paginated API documentation from endpoint descriptors.
//!
//! The source-analysis front-end emits a JSON descriptor document. This crate
//! turns it into a document tree and renders the tree through a list of
//! independent handlers:
//!
//! 1. **Build**: [`builder::TreeBuilder`] classifies descriptors into
//!    buckets and groups, skipping malformed ones with diagnostics
//! 2. **Render**: [`render::Pipeline`] runs every handler over the finished
//!    tree; markup handlers share the pagination walk in
//!    [`render::paginate`], flushing one artifact per group
//! 3. **Write**: each handler's artifacts land under the output directory
//!
//! ```no_run
//! use apidoc::builder::{ByController, BuildOptions, TreeBuilder};
//! use apidoc::descriptor::ApiSource;
//! use apidoc::model::Tree;
//! use apidoc::render::{Pipeline, RenderContext};
//! use std::path::Path;
//!
//! let source = ApiSource::from_json(&std::fs::read_to_string("api.json").unwrap()).unwrap();
//! let options = BuildOptions::default();
//! let mut builder = TreeBuilder::new(Tree::new("Shop API"), &ByController, &options);
//! for endpoint in &source.endpoints {
//!     builder.add(endpoint);
//! }
//! let output = builder.finish();
//! let report = Pipeline::from_names(&["asciidoc", "html"])
//!     .unwrap()
//!     .run(&output.tree, &RenderContext::default(), Path::new("build/apidoc"))
//!     .unwrap();
//! println!("{} files", report.written().count());
//! ```

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod logger;
pub mod message;
pub mod model;
pub mod render;
pub mod table;
pub mod toc;

use builder::{BuildOutput, Classifier, TreeBuilder};
use config::Config;
use descriptor::ApiSource;

/// Build the tree for `source` with the configured metadata and options.
pub fn build_tree(source: &ApiSource, config: &Config, classifier: &dyn Classifier) -> BuildOutput {
    let options = config.build_options();
    let mut builder = TreeBuilder::new(config.tree_for(source), classifier, &options);
    for endpoint in &source.endpoints {
        builder.add(endpoint);
    }
    for appendix in &source.appendices {
        builder.add_appendix(appendix);
    }
    builder.finish()
}
