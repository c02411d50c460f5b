//! Static asset copying.
//!
//! Stage 2 of the build pipeline. Takes the manifest from the scan stage and
//! copies every file listed under `assets` from the content root to the
//! output root, preserving relative paths:
//!
//! ```text
//! content/assets/profile.jpg      →  dist/profile.jpg
//! content/assets/about/wide.png   →  dist/about/wide.png
//! content/assets/cv.pdf           →  dist/cv.pdf
//! ```
//!
//! Files are copied in parallel using [rayon](https://docs.rs/rayon). Unchanged
//! files are skipped via the [`cache`](crate::cache) manifest. Progress is
//! reported per file over an optional channel so the CLI can print while the
//! pool works.

use crate::cache::{self, CacheManifest, CacheStats};
use crate::types::{Asset, Manifest};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset not found: {0}")]
    SourceNotFound(PathBuf),
}

/// What happened to one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// Output already up to date.
    Cached,
    /// Written from the source.
    Copied,
}

/// Progress reported while copying.
#[derive(Debug, Clone)]
pub enum AssetEvent {
    Started {
        count: usize,
    },
    Finished {
        output_path: String,
        size: u64,
        status: CopyStatus,
    },
}

#[derive(Debug)]
pub struct AssetResult {
    pub cache_stats: CacheStats,
    /// Bytes actually written (cache hits excluded).
    pub bytes_copied: u64,
}

struct Outcome {
    source_hash: String,
    size: u64,
    status: CopyStatus,
}

/// Copy the assets listed in the scan manifest at `manifest_path`.
pub fn copy_assets(
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
    use_cache: bool,
    progress: Option<Sender<AssetEvent>>,
) -> Result<AssetResult, AssetError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    copy_asset_list(&manifest.assets, source_root, output_dir, use_cache, progress)
}

/// Copy `assets` from `source_root` into `output_dir`.
///
/// The cache manifest is only read while the pool runs; entries are
/// recorded afterwards in asset order.
pub fn copy_asset_list(
    assets: &[Asset],
    source_root: &Path,
    output_dir: &Path,
    use_cache: bool,
    progress: Option<Sender<AssetEvent>>,
) -> Result<AssetResult, AssetError> {
    fs::create_dir_all(output_dir)?;

    let mut cache_manifest = if use_cache {
        CacheManifest::load(output_dir)
    } else {
        CacheManifest::empty()
    };

    if let Some(tx) = &progress {
        tx.send(AssetEvent::Started {
            count: assets.len(),
        })
        .ok();
    }

    let outcomes: Vec<Outcome> = assets
        .par_iter()
        .map(|asset| {
            let outcome = copy_one(asset, source_root, output_dir, &cache_manifest)?;
            if let Some(tx) = &progress {
                tx.send(AssetEvent::Finished {
                    output_path: asset.output_path.clone(),
                    size: outcome.size,
                    status: outcome.status,
                })
                .ok();
            }
            Ok(outcome)
        })
        .collect::<Result<_, AssetError>>()?;

    let mut cache_stats = CacheStats::default();
    let mut bytes_copied = 0;
    for (asset, outcome) in assets.iter().zip(outcomes) {
        match outcome.status {
            CopyStatus::Cached => cache_stats.hit(),
            CopyStatus::Copied => {
                cache_stats.miss();
                bytes_copied += outcome.size;
            }
        }
        cache_manifest.insert(asset.output_path.clone(), outcome.source_hash, outcome.size);
    }

    let live: HashSet<&str> = assets.iter().map(|a| a.output_path.as_str()).collect();
    cache_manifest.retain_outputs(&live);
    cache_manifest.save(output_dir)?;

    Ok(AssetResult {
        cache_stats,
        bytes_copied,
    })
}

fn copy_one(
    asset: &Asset,
    source_root: &Path,
    output_dir: &Path,
    cache_manifest: &CacheManifest,
) -> Result<Outcome, AssetError> {
    let source = source_root.join(&asset.source_path);
    if !source.is_file() {
        return Err(AssetError::SourceNotFound(source));
    }
    let source_hash = cache::hash_file(&source)?;

    if cache_manifest.is_fresh(&asset.output_path, &source_hash, output_dir) {
        let size = fs::metadata(output_dir.join(&asset.output_path))?.len();
        return Ok(Outcome {
            source_hash,
            size,
            status: CopyStatus::Cached,
        });
    }

    let dest = output_dir.join(&asset.output_path);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let size = fs::copy(&source, &dest)?;
    Ok(Outcome {
        source_hash,
        size,
        status: CopyStatus::Copied,
    })
}
