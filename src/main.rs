//! apidoc: render endpoint descriptor documents into paginated API docs.
//!
//! - **stdin mode**: `apidoc < api.json`
//! - **file mode**: `apidoc -o docs -f asciidoc -f markdown target/api/*.json`

use anyhow::{Context, Result};
use apidoc::builder::Strategy;
use apidoc::config::{Config, CONFIG_FILE};
use apidoc::descriptor::ApiSource;
use apidoc::error::PipelineError;
use apidoc::render::{Outcome, Pipeline, PipelineReport};
use apidoc::{build_tree, logger};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "apidoc",
    version,
    about = "Generate paginated API documentation from endpoint descriptors"
)]
struct Cli {
    /// Descriptor documents (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Configuration file [default: ./apidoc.toml when present]
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output directory, replacing <out>/<production> from the configuration
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: asciidoc, markdown, html, json, postman.
    /// Can be specified multiple times.
    #[arg(short = 'f', long = "format")]
    formats: Vec<String>,

    /// Stem of the index artifact
    #[arg(long)]
    id: Option<String>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Document description
    #[arg(long)]
    description: Option<String>,

    /// API version shown in the index
    #[arg(long = "api-version")]
    api_version: Option<String>,

    /// Overview text or file rendered in the index
    #[arg(long)]
    readme: Option<String>,

    /// Grouping strategy: controller, package, tag
    #[arg(long)]
    classify: Option<Strategy>,

    /// Type name to leave out of parameter tables.
    /// Can be specified multiple times.
    #[arg(long)]
    ignore: Vec<String>,

    /// Stylesheet linked from HTML output
    #[arg(long)]
    css: Option<String>,

    /// Run handlers concurrently
    #[arg(long)]
    parallel: bool,

    /// Debug logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    let config = load_config(&cli)?;
    let pipeline = Pipeline::from_names(config.handlers.as_slice())?.parallel(config.parallel);
    let out_dir = cli.output.clone().unwrap_or_else(|| config.out_path());

    let source = if cli.files.is_empty() {
        read_stdin()?
    } else {
        read_files(&expand_globs(&cli.files)?)?
    };

    let classifier = config.classify.classifier();
    let output = build_tree(&source, &config, classifier.as_ref());
    println!(
        "{} endpoints discovered, {} documented, {} skipped",
        output.discovered,
        output.tree.node_count(),
        output.diagnostics.len()
    );
    for diagnostic in &output.diagnostics {
        println!("  skipped {}", diagnostic);
    }

    match pipeline.run(&output.tree, &config.render_context(), &out_dir) {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(PipelineError::AllHandlersFailed { report }) => {
            print_report(&report);
            anyhow::bail!("all {} handlers failed", report.handlers.len())
        }
        Err(e) => Err(e.into()),
    }
}

/// Configuration file overlaid with command-line flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let default = Path::new(CONFIG_FILE);
            if default.is_file() {
                Config::load(default)?
            } else {
                Config::default()
            }
        }
    };

    if !cli.formats.is_empty() {
        config.handlers = cli.formats.clone();
    }
    if let Some(id) = &cli.id {
        config.id = id.clone();
    }
    config.title = cli.title.clone().or(config.title);
    config.description = cli.description.clone().or(config.description);
    config.version = cli.api_version.clone().or(config.version);
    if let Some(readme) = &cli.readme {
        config.readme = Some(resolve_readme(readme)?);
    }
    if let Some(strategy) = cli.classify {
        config.classify = strategy;
    }
    config.ignore.extend(cli.ignore.iter().cloned());
    config.css = cli.css.clone().or(config.css);
    config.parallel |= cli.parallel;
    Ok(config)
}

/// `--readme` names a file when one exists at that path, otherwise it is
/// the text itself.
fn resolve_readme(arg: &str) -> Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read readme: {}", path.display()))
    } else {
        Ok(arg.to_string())
    }
}

fn read_stdin() -> Result<ApiSource> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    ApiSource::from_json(&input).context("failed to parse descriptor document from stdin")
}

fn read_files(paths: &[PathBuf]) -> Result<ApiSource> {
    let mut source = ApiSource::default();
    for path in paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let doc = ApiSource::from_json(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        source.merge(doc);
    }
    Ok(source)
}

/// File extensions recognized as descriptor documents.
const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for descriptor documents.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively.
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

fn print_report(report: &PipelineReport) {
    for handler in &report.handlers {
        match &handler.outcome {
            Outcome::Written(paths) => {
                println!("{}: {} artifacts written", handler.handler, paths.len());
            }
            Outcome::Failed(e) => println!("{}: failed: {}", handler.handler, e),
            Outcome::Cancelled => println!("{}: cancelled", handler.handler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("apidoc").chain(args.iter().copied()))
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(load_config(&cli(&["--config", "/nonexistent/apidoc.toml"])).is_err());
    }

    #[test]
    fn flags_override_config() {
        let config = load_config(&cli(&[
            "-f",
            "json",
            "-f",
            "postman",
            "--id",
            "api",
            "--classify",
            "tag",
            "--ignore",
            "Principal",
            "--parallel",
        ]))
        .unwrap();
        assert_eq!(config.handlers, vec!["json", "postman"]);
        assert_eq!(config.id, "api");
        assert_eq!(config.classify, Strategy::Tag);
        assert_eq!(config.ignore, vec!["Principal"]);
        assert!(config.parallel);
    }

    #[test]
    fn readme_text_when_no_file() {
        assert_eq!(resolve_readme("Just text").unwrap(), "Just text");
    }

    #[test]
    fn json_extension_only() {
        assert!(has_supported_extension(Path::new("a/api.json")));
        assert!(!has_supported_extension(Path::new("a/api.yaml")));
        assert!(!has_supported_extension(Path::new("Makefile")));
    }
}
