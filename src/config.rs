//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file is sparse:
//! stock defaults are the base layer and the user's file is merged on top, so
//! it only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml      # Site config (optional)
//! ├── profile.toml
//! └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! description = ""
//! url = ""                  # Canonical URL, used for og:url
//! locale = "en_US"
//! author = ""
//! keywords = []
//! twitter = ""              # Handle for twitter:creator, e.g. "@someone"
//! og_image = ""             # Path or URL of the social preview image
//! favicon = ""
//!
//! [theme]
//! default = "system"        # system | light | dark
//! max_width = "72rem"
//! section_spacing = "clamp(4rem, 10vw, 8rem)"
//!
//! [colors.light]
//! background = "#fafafa"
//! surface = "#ffffff"
//! text = "#111111"
//! text_muted = "#5c5c5c"
//! border = "#e2e2e2"
//! accent = "#111111"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! surface = "#141414"
//! text = "#f2f2f2"
//! text_muted = "#a0a0a0"
//! border = "#262626"
//! accent = "#ffffff"
//!
//! [motion]
//! preference = "system"     # system | full | reduced
//! ease = [0.25, 0.1, 0.25, 1.0]
//! reveal_duration = 0.8     # Seconds
//! reveal_distance = 20.0    # CSS pixels
//! line_stagger = 0.1        # Between headline lines
//! word_stagger = 0.05       # Between words of a word reveal
//! card_stagger = 0.1        # Between stat cards and markdown blocks
//!
//! [motion.carousel]
//! interval = 2.8            # Seconds each greeting stays visible
//! crossfade = 0.4           # Seconds of the exit/entrance crossfade
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::motion::{
    CubicBezier, Direction, MotionContext, MotionPreference, RevealSpec, StaggerSpec, css_number,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Document metadata: title, description, social cards.
    pub site: SiteMeta,
    /// Layout and default color mode.
    pub theme: ThemeConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Entrance timing and reduced-motion handling.
    pub motion: MotionConfig,
}

impl SiteConfig {
    /// Reject values that would produce a broken page.
    ///
    /// Odd-but-usable motion numbers are not errors; they are clamped when
    /// used and reported by [`SiteConfig::motion_warnings`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        let [x1, y1, x2, y2] = self.motion.ease;
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Validation(
                "motion.ease values must be finite numbers".into(),
            ));
        }
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(ConfigError::Validation(
                "motion.ease x-coordinates (1st and 3rd values) must be within 0-1".into(),
            ));
        }
        Ok(())
    }

    /// Human-readable notes about motion values that will be adjusted.
    pub fn motion_warnings(&self) -> Vec<String> {
        let motion = &self.motion;
        let mut warnings = Vec::new();

        if !(motion.reveal_duration.is_finite() && motion.reveal_duration > 0.0) {
            warnings.push(format!(
                "motion.reveal_duration = {} is not positive; using {}s",
                motion.reveal_duration,
                css_number(crate::motion::reveal::DEFAULT_DURATION)
            ));
        }
        for (key, value) in [
            ("motion.reveal_distance", motion.reveal_distance),
            ("motion.line_stagger", motion.line_stagger),
            ("motion.word_stagger", motion.word_stagger),
            ("motion.card_stagger", motion.card_stagger),
            ("motion.carousel.crossfade", motion.carousel.crossfade),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                warnings.push(format!("{key} = {value} is negative; clamped to 0"));
            }
        }
        if !(motion.carousel.interval.is_finite() && motion.carousel.interval > 0.0) {
            warnings.push(format!(
                "motion.carousel.interval = {} is not positive; using {}s",
                motion.carousel.interval,
                css_number(crate::motion::carousel::DEFAULT_INTERVAL)
            ));
        } else if motion.carousel.crossfade > motion.carousel.interval {
            warnings.push(format!(
                "motion.carousel.crossfade ({}s) is longer than the interval ({}s); greetings will overlap",
                motion.carousel.crossfade, motion.carousel.interval
            ));
        }
        warnings
    }
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    /// Canonical URL of the deployed site.
    pub url: String,
    pub locale: String,
    pub author: String,
    pub keywords: Vec<String>,
    /// Twitter/X handle for `twitter:creator`.
    pub twitter: String,
    /// Social preview image for OpenGraph and Twitter cards.
    pub og_image: String,
    pub favicon: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            url: String::new(),
            locale: "en_US".to_string(),
            author: String::new(),
            keywords: Vec::new(),
            twitter: String::new(),
            og_image: String::new(),
            favicon: String::new(),
        }
    }
}

impl SiteMeta {
    /// Language tag for `<html lang>`, derived from the locale (`en_US` → `en`).
    pub fn lang(&self) -> &str {
        self.locale
            .split(['_', '-'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("en")
    }
}

/// Which color scheme a first-time visitor sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow `prefers-color-scheme`.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Theme/layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Initial color mode before the visitor picks one.
    pub default: ThemeMode,
    /// Maximum content width (CSS value).
    pub max_width: String,
    /// Vertical space between sections (CSS value).
    pub section_spacing: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: ThemeMode::System,
            max_width: "72rem".to_string(),
            section_spacing: "clamp(4rem, 10vw, 8rem)".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Cards, buttons and the header backdrop.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Secondary copy: subheadings, labels, nav.
    pub text_muted: String,
    pub border: String,
    /// Highlights such as the availability dot and focus rings.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fafafa".to_string(),
            surface: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#5c5c5c".to_string(),
            border: "#e2e2e2".to_string(),
            accent: "#111111".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#141414".to_string(),
            text: "#f2f2f2".to_string(),
            text_muted: "#a0a0a0".to_string(),
            border: "#262626".to_string(),
            accent: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// How the build decides between full and reduced motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionSetting {
    /// Render full motion and let the visitor's `prefers-reduced-motion`
    /// setting (or the in-page toggle) reduce it at runtime.
    #[default]
    System,
    /// Always animate, whatever the environment says.
    Full,
    /// Never animate; every reveal is rendered at rest.
    Reduced,
}

impl MotionSetting {
    /// The preference this setting forces, if any.
    pub fn forced(self) -> Option<MotionPreference> {
        match self {
            MotionSetting::System => None,
            MotionSetting::Full => Some(MotionPreference::Full),
            MotionSetting::Reduced => Some(MotionPreference::Reduced),
        }
    }

    /// Build-time motion context for this setting.
    ///
    /// The build has no environment preference to read, so the system value
    /// is absent and forced settings become an override.
    pub fn context(self) -> MotionContext {
        let context = MotionContext::new(None);
        context.set_override(self.forced());
        context
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MotionSetting::System => "system",
            MotionSetting::Full => "full",
            MotionSetting::Reduced => "reduced",
        }
    }
}

/// Entrance timing shared by every section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    pub preference: MotionSetting,
    /// Default easing as cubic-bezier control points `[x1, y1, x2, y2]`.
    pub ease: [f64; 4],
    /// Seconds a standard entrance takes.
    pub reveal_duration: f64,
    /// CSS pixels a standard entrance travels.
    pub reveal_distance: f64,
    /// Seconds between headline lines.
    pub line_stagger: f64,
    /// Seconds between words in a word reveal.
    pub word_stagger: f64,
    /// Seconds between cards and markdown blocks.
    pub card_stagger: f64,
    pub carousel: CarouselConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            preference: MotionSetting::System,
            ease: [0.25, 0.1, 0.25, 1.0],
            reveal_duration: 0.8,
            reveal_distance: 20.0,
            line_stagger: 0.1,
            word_stagger: 0.05,
            card_stagger: 0.1,
            carousel: CarouselConfig::default(),
        }
    }
}

impl MotionConfig {
    pub fn ease_curve(&self) -> CubicBezier {
        CubicBezier::from_array(self.ease)
    }

    /// A view-triggered entrance with the configured duration, distance and ease.
    pub fn reveal(&self, direction: Direction) -> RevealSpec {
        RevealSpec::new(direction)
            .with_duration(self.reveal_duration)
            .with_distance(self.reveal_distance)
            .with_ease(self.ease_curve())
    }

    pub fn lines(&self) -> StaggerSpec {
        StaggerSpec::new(self.line_stagger)
    }

    pub fn words(&self) -> StaggerSpec {
        StaggerSpec::new(self.word_stagger)
    }

    pub fn cards(&self) -> StaggerSpec {
        StaggerSpec::new(self.card_stagger)
    }
}

/// Greeting carousel timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Seconds each item stays visible.
    pub interval: f64,
    /// Seconds of the crossfade between items.
    pub crossfade: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval: 2.8,
            crossfade: 0.4,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Folio Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at content/config.toml. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Document metadata
# ---------------------------------------------------------------------------
[site]
# Page <title>, also used for OpenGraph and Twitter cards.
title = "Portfolio"
description = ""

# Canonical URL of the deployed site (og:url, <link rel="canonical">).
url = ""

# Locale for og:locale. The part before "_" becomes <html lang>.
locale = "en_US"
author = ""
keywords = []

# Twitter/X handle for twitter:creator, e.g. "@someone".
twitter = ""

# Social preview image and favicon, relative to content/assets/ or absolute URLs.
og_image = ""
favicon = ""

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
# Color mode for first-time visitors: "system", "light" or "dark".
# The header toggle overrides it and the choice is remembered.
default = "system"

# Maximum content width (CSS value).
max_width = "72rem"

# Vertical space between sections (CSS value).
section_spacing = "clamp(4rem, 10vw, 8rem)"

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#fafafa"
surface = "#ffffff"       # Cards, buttons, header
text = "#111111"
text_muted = "#5c5c5c"    # Subheadings, labels, nav
border = "#e2e2e2"
accent = "#111111"

# ---------------------------------------------------------------------------
# Colors - Dark mode
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
surface = "#141414"
text = "#f2f2f2"
text_muted = "#a0a0a0"
border = "#262626"
accent = "#ffffff"

# ---------------------------------------------------------------------------
# Motion
# ---------------------------------------------------------------------------
[motion]
# "system" follows the visitor's reduced-motion setting at runtime.
# "full" always animates; "reduced" renders every element at rest.
preference = "system"

# Default easing as cubic-bezier [x1, y1, x2, y2]. x values must be within 0-1.
ease = [0.25, 0.1, 0.25, 1.0]

# Seconds and pixels for a standard entrance.
reveal_duration = 0.8
reveal_distance = 20.0

# Seconds between headline lines, words, and cards/blocks.
line_stagger = 0.1
word_stagger = 0.05
card_stagger = 0.1

# Rotating greeting in the hero.
[motion.carousel]
interval = 2.8
crossfade = 0.4
"##
}

/// Generate CSS custom properties from color config.
///
/// An explicit `data-theme` on the root element wins over the media query.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root:not([data-theme="light"]) {{
{dark_nested}
    }}
}}

:root[data-theme="dark"] {{
{dark}
}}"#,
        light = color_declarations(&colors.light, "    "),
        dark_nested = color_declarations(&colors.dark, "        "),
        dark = color_declarations(&colors.dark, "    "),
    )
}

fn color_declarations(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-surface", &scheme.surface),
        ("--color-fg", &scheme.text),
        ("--color-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-accent", &scheme.accent),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --max-width: {max_width};
    --section-spacing: {section_spacing};
}}"#,
        max_width = theme.max_width,
        section_spacing = theme.section_spacing,
    )
}

/// Generate CSS custom properties from motion config.
pub fn generate_motion_css(motion: &MotionConfig) -> String {
    let crossfade = if motion.carousel.crossfade.is_finite() {
        motion.carousel.crossfade.max(0.0)
    } else {
        0.0
    };
    format!(
        r#":root {{
    --ease-editorial: {ease};
    --ease-expo-out: {expo};
    --carousel-crossfade: {crossfade}s;
}}"#,
        ease = motion.ease_curve().to_css(),
        expo = CubicBezier::EXPO_OUT.to_css(),
        crossfade = css_number(crossfade),
    )
}
