use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    catalog::Catalog,
    expander::{expand_sections, render_sections, MacroListing, Section},
    splice::{splice, Boundary},
    RexgenError, Result,
};

// ============================================================================
// OUTCOMES
// ============================================================================

/// What a regeneration run did to the target document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Unchanged,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Updated => "updated",
            Outcome::Unchanged => "unchanged",
        }
    }
}

/// A spliced document, computed but not yet written.
#[derive(Debug, Clone)]
pub struct Regeneration {
    pub path: PathBuf,
    pub original: String,
    pub updated: String,
}

impl Regeneration {
    pub fn is_stale(&self) -> bool {
        self.original != self.updated
    }
}

// ============================================================================
// GENERATION PIPELINE
// ============================================================================

/// Catalog → expansion → splice → write-back.
#[derive(Debug, Clone)]
pub struct GenerationPipeline {
    pub catalog: Catalog,
    pub boundary: Boundary,
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new(Catalog::builtin(), Boundary::default())
    }
}

impl GenerationPipeline {
    pub fn new(catalog: Catalog, boundary: Boundary) -> Self {
        Self { catalog, boundary }
    }

    pub fn sections(&self) -> Result<Vec<Section>> {
        expand_sections(&self.catalog)
    }

    /// Text of the whole generated region.
    pub fn generate(&self) -> Result<String> {
        let sections = self.sections()?;
        Ok(render_sections(&sections))
    }

    /// Every generated macro name, in emission order.
    pub fn listing(&self) -> Result<Vec<MacroListing>> {
        Ok(self.sections()?.iter().flat_map(Section::listing).collect())
    }

    /// Splices freshly generated text into `document`.
    pub fn splice_source(&self, document: &str) -> Result<String> {
        let generated = self.generate()?;
        splice(document, &self.boundary, &generated)
    }

    /// Computes the regenerated contents of `path` without touching it.
    pub fn check(&self, path: &Path) -> Result<Regeneration> {
        let original = fs::read_to_string(path).map_err(|e| RexgenError::io(path, e))?;
        let updated = self.splice_source(&original)?;
        Ok(Regeneration {
            path: path.to_path_buf(),
            original,
            updated,
        })
    }

    /// Regenerates `path` in place. Nothing is written unless the whole document was rebuilt,
    /// and nothing at all when it is already current.
    pub fn regenerate(&self, path: &Path) -> Result<Outcome> {
        let regeneration = self.check(path)?;
        if !regeneration.is_stale() {
            info!(path = %path.display(), "generated region already up to date");
            return Ok(Outcome::Unchanged);
        }
        write_atomically(path, &regeneration.updated)?;
        info!(path = %path.display(), bytes = regeneration.updated.len(), "regenerated");
        Ok(Outcome::Updated)
    }
}

/// Persists `contents` over `path` through a sibling temporary file, so a failure at any
/// point leaves the original untouched.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RexgenError::io(dir, e))?;
    debug!(tmp = %tmp.path().display(), "writing temporary document");
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| RexgenError::io(tmp.path(), e))?;
    if let Ok(meta) = fs::metadata(path) {
        // Keep the permissions of the document being replaced.
        fs::set_permissions(tmp.path(), meta.permissions())
            .map_err(|e| RexgenError::io(tmp.path(), e))?;
    }
    tmp.persist(path)
        .map_err(|e| RexgenError::io(path, e.error))?;
    Ok(())
}
