//! Asset copy cache for incremental builds.
//!
//! Every build copies `content/assets/` into the output root. Portfolio
//! assets are few but heavy (a looping video, a PDF résumé, full-bleed
//! images), so this module lets the asset stage skip files whose content has
//! not changed since the last build.
//!
//! ## Cache keys
//!
//! Entries are keyed by **output path** and record the SHA-256 of the
//! source file plus the number of bytes written. Content-based rather than
//! mtime-based so it survives `git checkout` (which resets modification
//! times).
//!
//! A cache hit requires:
//! 1. An entry for the output path with a matching `source_hash`
//! 2. The previously-written file still exists with the recorded size
//!
//! Anything else (new asset, edited asset, deleted or truncated output) is a
//! miss and the file is copied again.
//!
//! ## Storage
//!
//! The cache manifest is a JSON file at `<output_dir>/.cache-manifest.json`.
//! It lives alongside the copied files so it travels with the output
//! directory when cached in CI (e.g. `actions/cache` on `dist/`).
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to the `build` or `assets` command to force a full
//! copy. This loads an empty manifest, so every file is written again.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Lives in the output root next to the copied assets.
pub const MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Manifests written with any other version are ignored.
const MANIFEST_VERSION: u32 = 1;

/// A single cached output file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub size: u64,
}

/// On-disk cache manifest mapping output paths to their cache entries.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
}

impl CacheManifest {
    /// A cold cache: first build, or `--no-cache`.
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Read the manifest left by the previous build.
    ///
    /// A missing, unreadable or outdated manifest means a cold cache.
    pub fn load(output_dir: &Path) -> Self {
        std::fs::read_to_string(manifest_path(output_dir))
            .ok()
            .and_then(|content| serde_json::from_str::<Self>(&content).ok())
            .filter(|manifest| manifest.version == MANIFEST_VERSION)
            .unwrap_or_else(Self::empty)
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(output_dir), json)
    }

    /// Whether `output_path` already holds a copy of content `source_hash`.
    ///
    /// Checks the entry and that the file on disk still has the recorded
    /// size, so a deleted or truncated output is copied again.
    pub fn is_fresh(&self, output_path: &str, source_hash: &str, output_dir: &Path) -> bool {
        let Some(entry) = self.entries.get(output_path) else {
            return false;
        };
        if entry.source_hash != source_hash {
            return false;
        }
        std::fs::metadata(output_dir.join(output_path))
            .map(|m| m.is_file() && m.len() == entry.size)
            .unwrap_or(false)
    }

    /// Remember that `output_path` now holds `size` bytes of `source_hash`.
    pub fn insert(&mut self, output_path: String, source_hash: String, size: u64) {
        self.entries
            .insert(output_path, CacheEntry { source_hash, size });
    }

    /// Drop entries for outputs that are no longer produced.
    ///
    /// The files themselves are left alone; only the bookkeeping goes.
    pub fn retain_outputs(&mut self, live: &HashSet<&str>) {
        self.entries.retain(|path, _| live.contains(path.as_str()));
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} copied ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} copied", self.misses)
        }
    }
}

/// Resolve the cache manifest path for an output directory.
pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILENAME)
}
