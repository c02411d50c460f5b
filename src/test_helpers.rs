//! Shared test utilities for the simple-folio test suite.
//!
//! Provides fixture setup, lookup helpers and bulk extractors over
//! scan-phase data structures (`Manifest`, `Section`, `Asset`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let projects = find_section(&manifest, "projects");
//! assert_eq!(projects.title, "Selected Projects");
//! assert_eq!(nav_titles(&manifest), vec!["projects", "writing"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Asset, Manifest, Section};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Scan a fresh fixture copy. The temp dir is returned to keep it alive.
pub fn scanned_fixtures() -> (TempDir, Manifest) {
    let tmp = setup_fixtures();
    let manifest = crate::scan::scan(tmp.path()).unwrap();
    (tmp, manifest)
}

// =========================================================================
// Manifest lookups, panicking with a clear message on miss
// =========================================================================

/// Find a section by anchor id. Panics if not found.
pub fn find_section<'a>(manifest: &'a Manifest, id: &str) -> &'a Section {
    manifest
        .sections
        .iter()
        .find(|s| s.id == id)
        .unwrap_or_else(|| {
            let ids = section_ids(manifest);
            panic!("section '{id}' not found. Available: {ids:?}")
        })
}

/// Find an asset by output path. Panics if not found.
pub fn find_asset<'a>(manifest: &'a Manifest, output_path: &str) -> &'a Asset {
    manifest
        .assets
        .iter()
        .find(|a| a.output_path == output_path)
        .unwrap_or_else(|| {
            let paths = asset_outputs(manifest);
            panic!("asset '{output_path}' not found. Available: {paths:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All section ids in page order.
pub fn section_ids(manifest: &Manifest) -> Vec<&str> {
    manifest.sections.iter().map(|s| s.id.as_str()).collect()
}

/// Nav labels in order (numbered sections only).
pub fn nav_titles(manifest: &Manifest) -> Vec<&str> {
    manifest
        .nav_sections()
        .map(|s| s.nav_title.as_str())
        .collect()
}

/// All asset output paths in scan order.
pub fn asset_outputs(manifest: &Manifest) -> Vec<&str> {
    manifest
        .assets
        .iter()
        .map(|a| a.output_path.as_str())
        .collect()
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
