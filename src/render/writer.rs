//! Write a handler's artifacts to the output directory.
//!
//! A handler's artifacts land together or not at all: when one write fails,
//! files already written for that handler in this call are removed.

use crate::error::{RenderError, Result};
use crate::render::Artifact;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    if artifacts.is_empty() {
        return Ok(Vec::new());
    }
    fs::create_dir_all(dir).map_err(|error| RenderError::ArtifactWrite {
        path: dir.to_path_buf(),
        error,
    })?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.name);
        if let Err(error) = write_file(&path, &artifact.content) {
            for done in written.iter().chain(path.is_file().then_some(&path)) {
                if let Err(e) = fs::remove_file(done) {
                    warn!(path = %done.display(), error = %e, "failed to remove partial artifact");
                }
            }
            return Err(RenderError::ArtifactWrite { path, error });
        }
        info!(path = %path.display(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(content.as_bytes())?;
    out.flush()
}
