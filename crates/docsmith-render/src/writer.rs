//! Writes a rendered site to disk

use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::renderer::RenderError;
use crate::site::Site;

/// Writes every page of a [`Site`] below an output root
pub struct DocumentWriter {
    root: PathBuf,
}

impl DocumentWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write all pages, creating directories as needed; returns the number written
    pub fn write(&self, site: &Site) -> Result<usize, RenderError> {
        let mut written = 0;

        for document in site.documents() {
            let path = self.root.join(&document.path);

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            fs::write(&path, &document.contents).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;

            debug!(unique_id = %document.unique_id, path = %path.display(), "Wrote page");
            written += 1;
        }

        Ok(written)
    }
}
