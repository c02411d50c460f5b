//! Shared types passed between pipeline stages.
//!
//! The scan stage produces a [`Manifest`]; it is written to
//! `<temp>/manifest.json` and read back by the generate stage, so every type
//! here round-trips through JSON. The profile types are also the schema of
//! `content/profile.toml` and reject unknown keys.

use crate::config::SiteConfig;
use serde::{Deserialize, Serialize};

/// Everything the generator needs to render the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub profile: Profile,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    pub config: SiteConfig,
}

impl Manifest {
    /// Numbered sections in nav order.
    pub fn nav_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.in_nav)
    }
}

/// Hero and about copy from `profile.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub role: String,
    /// Badge text such as "Available for work". Rendered with an animated ellipsis.
    #[serde(default)]
    pub availability: Option<String>,
    /// Rotating greetings above the headline.
    #[serde(default)]
    pub greetings: Vec<String>,
    /// Headline lines, revealed one after another.
    #[serde(default)]
    pub headline: Vec<String>,
    #[serde(default)]
    pub subheading: String,
    #[serde(default)]
    pub portrait: Option<Image>,
    #[serde(default)]
    pub cv: Option<Cv>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub social: Vec<SocialLink>,
    #[serde(default)]
    pub about: Option<About>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Video {
    pub src: String,
    #[serde(default = "default_video_mime")]
    pub mime: String,
}

fn default_video_mime() -> String {
    "video/mp4".to_string()
}

/// Downloadable résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cv {
    pub href: String,
    #[serde(default = "default_cv_label")]
    pub label: String,
}

fn default_cv_label() -> String {
    "Download CV".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatVariant {
    #[default]
    Primary,
    Secondary,
}

impl StatVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            StatVariant::Primary => "primary",
            StatVariant::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub variant: StatVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct About {
    #[serde(default = "default_about_title")]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Opening sentence, revealed word by word.
    #[serde(default)]
    pub lead: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    /// Closing sentence, revealed word by word.
    #[serde(default)]
    pub closing: String,
    #[serde(default)]
    pub video: Option<Video>,
    /// Wide image below the text.
    #[serde(default)]
    pub image: Option<Image>,
}

fn default_about_title() -> String {
    "About".to_string()
}

/// A section rendered from a markdown file in the content root.
///
/// - Numbered files (`NNN-name.md`) appear in nav, sorted by number
/// - Unnumbered files are rendered but hidden from nav
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Anchor id on the page.
    pub id: String,
    /// Title from the first `# heading`, or the filename as fallback.
    pub title: String,
    /// Nav label (filename with number stripped and dashes → spaces).
    pub nav_title: String,
    /// From a `> quote` line right after the heading.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Markdown with the heading and subtitle removed.
    pub body: String,
    pub in_nav: bool,
    pub sort_key: u32,
    /// Source filename relative to the content root.
    pub source: String,
}

/// A static file copied verbatim from `content/assets/` to the output root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Path relative to the content root, `/`-separated.
    pub source_path: String,
    /// Path relative to the output root, `/`-separated.
    pub output_path: String,
    pub size: u64,
}
