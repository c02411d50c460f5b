//! Filename parsing for markdown sections and in-page anchors.
//!
//! Section files follow the `NNN-name.md` convention: an optional numeric
//! prefix decides nav order, the rest becomes the anchor slug and the fallback
//! title.
//!
//! - `030-projects.md` → number 30, slug `projects`, title "projects"
//! - `040-Open-Source.md` → number 40, slug `open-source`, title "Open Source"
//! - `notes.md` → unnumbered (rendered, hidden from nav), slug `notes`

/// Parsed section filename.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionName {
    /// Prefix number, if any. Numbered sections appear in nav.
    pub number: Option<u32>,
    /// Anchor id, see [`anchor_id`].
    pub slug: String,
    /// Name part with dashes turned into spaces.
    pub display_title: String,
}

/// Parse a section filename. A trailing `.md` (any case) is ignored.
pub fn parse_section_name(file_name: &str) -> SectionName {
    let stem = strip_md(file_name);
    let (number, name) = match stem.split_once('-') {
        Some((prefix, rest)) if is_number(prefix) => (prefix.parse().ok(), rest),
        _ if is_number(stem) => (stem.parse().ok(), ""),
        _ => (None, stem),
    };
    SectionName {
        number,
        slug: anchor_id(name),
        display_title: name.replace('-', " ").trim().to_string(),
    }
}

fn strip_md(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("md") => stem,
        _ => file_name,
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Turn arbitrary text into a lowercase `a-z0-9-` anchor id.
///
/// Runs of other characters collapse to a single dash. Text with nothing
/// usable yields `"section"`.
pub fn anchor_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if id.is_empty() {
        "section".to_string()
    } else {
        id
    }
}
