//! Content directory scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the content directory and produces a
//! [`Manifest`] that the asset and generate stages consume.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── profile.toml                 # Hero and about copy (required)
//! ├── 030-projects.md              # Section (numbered = appears in nav)
//! ├── 040-writing.md
//! ├── notes.md                     # Unnumbered = rendered, hidden from nav
//! └── assets/                      # Copied verbatim to the output root
//!     ├── profile.jpg
//!     ├── about/wide.png
//!     └── cv.pdf
//! ```
//!
//! ## Section Files
//!
//! The first `# heading` is the section title. A `> quote` line directly
//! after it (blank lines allowed) becomes the subtitle. Both are removed from
//! the body; the rest is rendered as markdown.
//!
//! ## Validation
//!
//! - `profile.toml` must exist and only use known keys
//! - Local media references (paths starting with `/`) must exist under `assets/`
//! - Two section files may not produce the same anchor id
//! - No asset may land on a file the pipeline writes itself (`index.html`)

use crate::cache;
use crate::config::{self, SiteConfig};
use crate::generate::PAGE_FILE;
use crate::naming::parse_section_name;
use crate::types::{Asset, Manifest, Profile, Section};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directory under the content root whose files are copied to the output root.
pub const ASSETS_DIR: &str = "assets";
pub const PROFILE_FILE: &str = "profile.toml";

/// Anchor ids the page itself uses.
const RESERVED_IDS: &[&str] = &["top", "hero", "about", "content"];

/// Output paths written by the pipeline itself.
const RESERVED_OUTPUTS: &[&str] = &[PAGE_FILE, cache::MANIFEST_FILENAME];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Profile not found: {0}")]
    MissingProfile(PathBuf),
    #[error("Invalid profile.toml: {0}")]
    Profile(#[from] toml::de::Error),
    #[error("{field} refers to {path}, which is not in assets/")]
    MissingAsset { field: String, path: String },
    #[error("Section id '{id}' is used by both {first} and {second}")]
    DuplicateSection {
        id: String,
        first: String,
        second: String,
    },
    #[error("assets/{0} would overwrite a generated file")]
    ReservedAsset(String),
    #[error("Failed to walk assets: {0}")]
    Walk(#[from] walkdir::Error),
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;
    let profile = load_profile(root)?;
    let sections = parse_sections(root)?;
    let assets = collect_assets(root)?;

    check_media(&profile, &config, &assets)?;

    Ok(Manifest {
        profile,
        sections,
        assets,
        config,
    })
}

/// Read and parse `profile.toml` from the content root.
pub fn load_profile(root: &Path) -> Result<Profile, ScanError> {
    let path = root.join(PROFILE_FILE);
    if !path.is_file() {
        return Err(ScanError::MissingProfile(path));
    }
    let content = fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
}

/// Parse all markdown files in the root directory into sections.
fn parse_sections(root: &Path) -> Result<Vec<Section>, ScanError> {
    let mut md_files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();

    md_files.sort();

    let mut sections: Vec<Section> = Vec::new();
    for md_path in &md_files {
        let file_name = md_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let content = fs::read_to_string(md_path)?;
        let mut section = parse_section(&file_name, &content);
        if RESERVED_IDS.contains(&section.id.as_str()) {
            section.id = format!("section-{}", section.id);
        }

        if let Some(existing) = sections.iter().find(|s| s.id == section.id) {
            return Err(ScanError::DuplicateSection {
                id: section.id,
                first: existing.source.clone(),
                second: file_name,
            });
        }
        sections.push(section);
    }

    sections.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.source.cmp(&b.source)));
    Ok(sections)
}

/// Build a section from a filename and its markdown content.
pub fn parse_section(file_name: &str, content: &str) -> Section {
    let name = parse_section_name(file_name);
    let nav_title = if name.display_title.is_empty() {
        name.slug.clone()
    } else {
        name.display_title.clone()
    };

    let lines: Vec<&str> = content.lines().collect();
    let heading = lines.iter().position(|line| line.starts_with("# "));

    let subtitle_line = heading.and_then(|h| {
        lines
            .iter()
            .enumerate()
            .skip(h + 1)
            .find(|(_, line)| !line.trim().is_empty())
            .filter(|(_, line)| line.trim_start().starts_with('>'))
            .map(|(i, _)| i)
    });

    let title = heading
        .map(|h| lines[h].trim_start_matches("# ").trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| nav_title.clone());

    let subtitle = subtitle_line
        .map(|i| lines[i].trim_start().trim_start_matches('>').trim().to_string())
        .filter(|s| !s.is_empty());

    let body = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != heading && Some(*i) != subtitle_line)
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    Section {
        id: name.slug,
        title,
        nav_title,
        subtitle,
        body,
        in_nav: name.number.is_some(),
        sort_key: name.number.unwrap_or(u32::MAX),
        source: file_name.to_string(),
    }
}

/// Every regular, non-hidden file under `assets/`, sorted by path.
fn collect_assets(root: &Path) -> Result<Vec<Asset>, ScanError> {
    let assets_root = root.join(ASSETS_DIR);
    if !assets_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut assets = Vec::new();
    let walker = WalkDir::new(&assets_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&assets_root) else {
            continue;
        };
        let output_path = slash_path(relative);
        if RESERVED_OUTPUTS
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(&output_path))
        {
            return Err(ScanError::ReservedAsset(output_path));
        }
        assets.push(Asset {
            source_path: format!("{ASSETS_DIR}/{output_path}"),
            output_path,
            size: entry.metadata()?.len(),
        });
    }
    Ok(assets)
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A reference is local when it is a root-relative path (not `//host`).
pub fn is_local_reference(reference: &str) -> bool {
    reference.starts_with('/') && !reference.starts_with("//")
}

/// Check that every local media reference resolves to a scanned asset.
fn check_media(profile: &Profile, config: &SiteConfig, assets: &[Asset]) -> Result<(), ScanError> {
    let known: HashSet<&str> = assets.iter().map(|a| a.output_path.as_str()).collect();

    let mut references: Vec<(&str, &str)> = Vec::new();
    if let Some(portrait) = &profile.portrait {
        references.push(("portrait.src", portrait.src.as_str()));
    }
    if let Some(cv) = &profile.cv {
        references.push(("cv.href", cv.href.as_str()));
    }
    if let Some(about) = &profile.about {
        if let Some(video) = &about.video {
            references.push(("about.video.src", video.src.as_str()));
        }
        if let Some(image) = &about.image {
            references.push(("about.image.src", image.src.as_str()));
        }
    }
    references.push(("site.og_image", config.site.og_image.as_str()));
    references.push(("site.favicon", config.site.favicon.as_str()));

    for (field, reference) in references {
        if !is_local_reference(reference) {
            continue;
        }
        let path = reference
            .trim_start_matches('/')
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        if !known.contains(path) {
            return Err(ScanError::MissingAsset {
                field: field.to_string(),
                path: reference.to_string(),
            });
        }
    }
    Ok(())
}
