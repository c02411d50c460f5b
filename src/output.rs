//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (section,
//! asset, cue) leads with what it is on the page, with filesystem paths shown
//! as indented `Source:` context lines. The output reads as an inventory of
//! the portfolio while still letting users trace data back to files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Profile
//!     Ada Lovelace
//!         Source: profile.toml
//!         3 headline lines, 3 greetings, 2 stats, 3 links
//!     About (2 paragraphs)
//!
//! Sections
//! 001 Selected Projects #projects
//!     Source: 030-projects.md
//!     Colophon #colophon (hidden from nav)
//!         Source: notes.md
//!
//! Assets (5 files, 3.1 KB)
//!     about/loop.mp4
//!
//! Config
//!     config.toml
//!     assets/
//! ```
//!
//! ## Assets
//!
//! ```text
//! Assets (5 files)
//!     profile.svg (512 B): copied
//!     cv.pdf (1.2 KB): cached
//! ```
//!
//! ## Generate
//!
//! ```text
//! Page → index.html (48.2 KB)
//!     Hero #top (14 cues)
//!     About #about (6 cues)
//!     001 Selected Projects #projects (4 cues)
//!
//! Generated 1 page, 5 sections, 28 cues
//! ```
//!
//! ## Timeline
//!
//! ```text
//! Timeline (full motion, 10.00s)
//!   0.00s  top: availability started
//!   0.60s  top: availability settled
//!   2.80s  greeting → Hi, I'm (2)
//! Settled at 7.34s
//! Entrances played: 28 of 28
//! Unmounted: 0 tasks, 0 listeners
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::assets::{AssetEvent, AssetResult, CopyStatus};
use crate::generate::GenerateResult;
use crate::sections::Cue;
use crate::timeline::{TimelineEvent, TimelineReport};
use crate::types::{Manifest, Profile, Section};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 thing` / `2 things`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Human-readable byte size: `512 B`, `1.2 KB`, `3.4 MB`.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = bytes as f64;
    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Format a section header: nav position + title + anchor.
///
/// Sections outside the nav have no position and are marked as hidden.
///
/// ```text
/// 001 Selected Projects #projects
/// Colophon #colophon (hidden from nav)
/// ```
fn section_header(position: Option<usize>, section: &Section) -> String {
    match position {
        Some(pos) => format!("{} {} #{}", format_index(pos), section.title, section.id),
        None => format!("{} #{} (hidden from nav)", section.title, section.id),
    }
}

/// Seconds with two decimals, right-aligned for event columns.
fn format_seconds(seconds: f64) -> String {
    format!("{:>6.2}s", seconds)
}

fn count_cues(cues: &[Cue], section: &str) -> usize {
    cues.iter().filter(|c| c.section == section).count()
}

/// Pair each section with its position in the nav, if it has one.
fn with_nav_positions(sections: &[Section]) -> Vec<(Option<usize>, &Section)> {
    let mut position = 0;
    sections
        .iter()
        .map(|section| {
            if section.in_nav {
                position += 1;
                (Some(position), section)
            } else {
                (None, section)
            }
        })
        .collect()
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

fn profile_summary(profile: &Profile) -> String {
    let mut parts = vec![
        plural(profile.headline.len(), "headline line", "headline lines"),
        plural(profile.greetings.len(), "greeting", "greetings"),
    ];
    if !profile.stats.is_empty() {
        parts.push(plural(profile.stats.len(), "stat", "stats"));
    }
    if !profile.social.is_empty() {
        parts.push(plural(profile.social.len(), "link", "links"));
    }
    if profile.cv.is_some() {
        parts.push("CV".to_string());
    }
    parts.join(", ")
}

/// Format scan stage output showing the discovered page structure.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let profile = &manifest.profile;

    lines.push("Profile".to_string());
    lines.push(format!("{}{}", indent(1), profile.name));
    lines.push(format!("{}Source: {}", indent(2), crate::scan::PROFILE_FILE));
    lines.push(format!("{}{}", indent(2), profile_summary(profile)));
    if let Some(about) = &profile.about {
        lines.push(format!(
            "{}{} ({})",
            indent(1),
            about.title,
            plural(about.paragraphs.len(), "paragraph", "paragraphs")
        ));
    }

    if !manifest.sections.is_empty() {
        lines.push(String::new());
        lines.push("Sections".to_string());
        for (position, section) in with_nav_positions(&manifest.sections) {
            let depth = if position.is_some() { 0 } else { 1 };
            lines.push(format!("{}{}", indent(depth), section_header(position, section)));
            lines.push(format!("{}Source: {}", indent(depth + 1), section.source));
        }
    }

    if !manifest.assets.is_empty() {
        let total: u64 = manifest.assets.iter().map(|a| a.size).sum();
        lines.push(String::new());
        lines.push(format!(
            "Assets ({}, {})",
            plural(manifest.assets.len(), "file", "files"),
            format_size(total)
        ));
        for asset in &manifest.assets {
            lines.push(format!("{}{}", indent(1), asset.output_path));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if source_root.join(crate::scan::ASSETS_DIR).is_dir() {
        lines.push(format!("{}{}/", indent(1), crate::scan::ASSETS_DIR));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Asset output
// ============================================================================

/// Format a single asset progress event as display lines.
pub fn format_asset_event(event: &AssetEvent) -> Vec<String> {
    match event {
        AssetEvent::Started { count } => {
            vec![format!("Assets ({})", plural(*count, "file", "files"))]
        }
        AssetEvent::Finished {
            output_path,
            size,
            status,
        } => {
            let status = match status {
                CopyStatus::Cached => "cached",
                CopyStatus::Copied => "copied",
            };
            vec![format!(
                "{}{} ({}): {}",
                indent(1),
                output_path,
                format_size(*size),
                status
            )]
        }
    }
}

/// Summary line after the asset stage: cache stats and bytes written.
pub fn format_asset_summary(result: &AssetResult) -> Vec<String> {
    vec![format!(
        "Cache: {}, {} written",
        result.cache_stats,
        format_size(result.bytes_copied)
    )]
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format generate stage output: every section of the page with its cue count.
pub fn format_generate_output(result: &GenerateResult) -> Vec<String> {
    let manifest = &result.manifest;
    let cues = &result.page.cues;
    let mut lines = Vec::new();

    lines.push(format!("Page \u{2192} index.html ({})", format_size(result.bytes as u64)));
    lines.push(format!(
        "{}Hero #top ({})",
        indent(1),
        plural(count_cues(cues, "top"), "cue", "cues")
    ));
    let mut section_count = 1;
    if let Some(about) = &manifest.profile.about {
        section_count += 1;
        lines.push(format!(
            "{}{} #{} ({})",
            indent(1),
            about.title,
            crate::sections::about::SECTION_ID,
            plural(count_cues(cues, crate::sections::about::SECTION_ID), "cue", "cues")
        ));
    }
    for (position, section) in with_nav_positions(&manifest.sections) {
        section_count += 1;
        lines.push(format!(
            "{}{} ({})",
            indent(1),
            section_header(position, section),
            plural(count_cues(cues, &section.id), "cue", "cues")
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated 1 page, {}, {}",
        plural(section_count, "section", "sections"),
        plural(cues.len(), "cue", "cues")
    ));
    lines
}

pub fn print_generate_output(result: &GenerateResult) {
    for line in format_generate_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format motion config warnings found by `check`.
pub fn format_check_warnings(warnings: &[String]) -> Vec<String> {
    if warnings.is_empty() {
        return vec!["Motion config OK".to_string()];
    }
    let mut lines = vec![format!(
        "Motion config ({})",
        plural(warnings.len(), "warning", "warnings")
    )];
    lines.extend(warnings.iter().map(|w| format!("{}{}", indent(1), w)));
    lines
}

// ============================================================================
// Timeline output
// ============================================================================

fn format_timeline_event(event: &TimelineEvent) -> String {
    let body = match event {
        TimelineEvent::SectionInView { section, .. } => format!("#{section} in view"),
        TimelineEvent::CueStarted { section, label, .. } => format!("{section}: {label} started"),
        TimelineEvent::CueSettled { section, label, .. } => format!("{section}: {label} settled"),
        TimelineEvent::Greeting { index, text, .. } => {
            format!("greeting \u{2192} {} ({})", text, index + 1)
        }
        TimelineEvent::PreferenceChanged { preference, .. } => {
            format!("preference \u{2192} {preference}")
        }
        TimelineEvent::ShownAtRest { count, .. } => format!(
            "{} shown at rest",
            plural(*count, "pending entrance", "pending entrances")
        ),
    };
    format!("{}  {}", format_seconds(event.at()), body)
}

/// Format a timeline preview run.
pub fn format_timeline_report(report: &TimelineReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Timeline ({} motion, {:.2}s)",
        report.initial, report.duration
    )];
    lines.extend(report.events.iter().map(format_timeline_event));
    lines.push(match report.settled_at() {
        Some(at) => format!("Settled at {:.2}s", at),
        None => format!(
            "Still animating at {:.2}s ({} total)",
            report.duration,
            plural(report.cues.len(), "cue", "cues")
        ),
    });
    lines.push(format!(
        "Entrances played: {} of {}",
        report.entrances_played,
        report.cues.len()
    ));
    lines.push(format!(
        "Unmounted: {}, {}",
        plural(report.leaked_tasks, "task", "tasks"),
        plural(report.leaked_listeners, "listener", "listeners")
    ));
    lines
}

pub fn print_timeline_report(report: &TimelineReport) {
    for line in format_timeline_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
