//! HTML site generation.
//!
//! Stage 3 of the build pipeline. Reads the scan manifest and renders the
//! whole portfolio as a single `index.html`.
//!
//! ## Page layout
//!
//! ```text
//! <head>    metadata, OpenGraph/Twitter cards, pre-paint theme script, inline CSS
//! header    name, section nav, theme toggle, motion toggle
//! #top      hero (mount-triggered)
//! #about    about section (view-triggered), when profile.toml has [about]
//! #<slug>   one section per markdown file, in sort order
//! footer
//! <script>  motion runtime
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static files are embedded at compile time and inlined into the page:
//! - `static/style.css`: layout, reveal states, hover effects
//! - `static/theme.js`: applies the stored theme before first paint
//! - `static/motion.js`: reveals, carousels, reduced-motion handling
//!
//! Color, theme and motion custom properties are generated from
//! `config.toml` and prepended to the stylesheet.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Section markup comes from [`crate::sections`], which records a cue for
//! every entrance while rendering.

use crate::config::{self, MotionSetting, SiteConfig, ThemeMode};
use crate::motion::MotionContext;
use crate::scan::is_local_reference;
use crate::sections::{Cue, Stage, about, hero, markdown};
use crate::types::Manifest;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The generated page, written to the output root.
pub const PAGE_FILE: &str = "index.html";

const CSS_STATIC: &str = include_str!("../static/style.css");
const THEME_JS: &str = include_str!("../static/theme.js");
const MOTION_JS: &str = include_str!("../static/motion.js");

/// Reveals stay visible when scripts never run.
const NOSCRIPT_CSS: &str =
    ".reveal{opacity:1!important;transform:none!important;transition:none!important}";

/// A rendered page and the choreography it plays.
#[derive(Debug)]
pub struct Page {
    pub html: String,
    pub cues: Vec<Cue>,
}

/// What [`generate`] wrote.
#[derive(Debug)]
pub struct GenerateResult {
    pub manifest: Manifest,
    pub page: Page,
    pub bytes: usize,
}

pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<GenerateResult, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;

    let page = render_page(&manifest);
    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join(PAGE_FILE), &page.html)?;

    Ok(GenerateResult {
        bytes: page.html.len(),
        manifest,
        page,
    })
}

/// Render the page with the build-time motion context from the config.
pub fn render_page(manifest: &Manifest) -> Page {
    let motion = manifest.config.motion.preference.context();
    render_page_with(manifest, &motion)
}

pub fn render_page_with(manifest: &Manifest, motion: &MotionContext) -> Page {
    let css = stylesheet(&manifest.config);
    let (content, cues) = render_site(manifest, motion);
    let html = base_document(&manifest.config, &css, content).into_string();
    Page { html, cues }
}

/// Render the header, every section and the footer, collecting cues.
pub fn render_site(manifest: &Manifest, motion: &MotionContext) -> (Markup, Vec<Cue>) {
    let stage = Stage::new(motion, &manifest.config.motion);
    let profile = &manifest.profile;

    let hero = hero::hero(&stage, profile);
    let about = profile.about.as_ref().map(|a| about::about(&stage, a));
    let sections: Vec<Markup> = manifest
        .sections
        .iter()
        .map(|section| markdown::markdown_section(&stage, section))
        .collect();

    let content = html! {
        (site_header(manifest))
        main #content {
            (hero)
            @if let Some(about) = about {
                (about)
            }
            @for section in &sections {
                (section)
            }
        }
        (site_footer(manifest))
    };
    (content, stage.into_cues())
}

fn stylesheet(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme),
        config::generate_motion_css(&config.motion),
        CSS_STATIC
    )
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(config: &SiteConfig, css: &str, content: Markup) -> Markup {
    let site = &config.site;
    let theme = match config.theme.default {
        ThemeMode::System => None,
        mode => Some(mode.as_str()),
    };
    let forced_motion = config.motion.preference.forced().map(|p| p.as_str());

    html! {
        (DOCTYPE)
        html lang=(site.lang())
            data-theme-default=(config.theme.default.as_str())
            data-theme=[theme]
            data-motion=[forced_motion]
            data-motion-forced=[forced_motion]
        {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (site.title) }
                (social_meta(config))
                script { (PreEscaped(THEME_JS)) }
                style { (PreEscaped(css)) }
                noscript { style { (PreEscaped(NOSCRIPT_CSS)) } }
            }
            body {
                a.skip-link href="#content" { "Skip to content" }
                (content)
                script { (PreEscaped(MOTION_JS)) }
            }
        }
    }
}

/// Description, canonical link, OpenGraph and Twitter card tags, favicon.
fn social_meta(config: &SiteConfig) -> Markup {
    let site = &config.site;
    let present = |s: &str| (!s.is_empty()).then(|| s.to_string());
    let keywords = present(&site.keywords.join(", "));
    let canonical = present(&site.url).map(|url| absolute_url(&url, "/"));
    let image = present(&site.og_image).map(|img| absolute_url(&site.url, &img));
    let card = if image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };

    html! {
        @if let Some(description) = present(&site.description) {
            meta name="description" content=(description);
        }
        @if let Some(keywords) = keywords {
            meta name="keywords" content=(keywords);
        }
        @if let Some(author) = present(&site.author) {
            meta name="author" content=(author);
        }
        @if let Some(canonical) = &canonical {
            link rel="canonical" href=(canonical);
        }
        meta property="og:type" content="website";
        meta property="og:title" content=(site.title);
        @if let Some(description) = present(&site.description) {
            meta property="og:description" content=(description);
        }
        @if let Some(canonical) = &canonical {
            meta property="og:url" content=(canonical);
        }
        meta property="og:locale" content=(site.locale);
        @if let Some(image) = &image {
            meta property="og:image" content=(image);
        }
        meta name="twitter:card" content=(card);
        @if let Some(handle) = present(&site.twitter) {
            meta name="twitter:creator" content=(handle);
        }
        meta name="twitter:title" content=(site.title);
        @if let Some(description) = present(&site.description) {
            meta name="twitter:description" content=(description);
        }
        @if let Some(image) = &image {
            meta name="twitter:image" content=(image);
        }
        @if let Some(favicon) = present(&site.favicon) {
            link rel="icon" href=(favicon) type=[icon_type(&favicon)];
        }
    }
}

/// Resolve a site-local reference against the site URL. Returns `reference`
/// unchanged when it is not local or no URL is configured.
fn absolute_url(base: &str, reference: &str) -> String {
    if base.is_empty() || !is_local_reference(reference) {
        return reference.to_string();
    }
    format!("{}{}", base.trim_end_matches('/'), reference)
}

fn icon_type(path: &str) -> Option<&'static str> {
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "svg" => Some("image/svg+xml"),
        "png" => Some("image/png"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}

/// Renders the sticky header with name, section nav and toggles
fn site_header(manifest: &Manifest) -> Markup {
    let about_title = manifest.profile.about.as_ref().map(|a| a.title.as_str());
    let motion_toggle = manifest.config.motion.preference == MotionSetting::System;

    html! {
        header.site-header {
            div.container.header-inner {
                a.brand href="#top" { (manifest.profile.name) }
                nav.site-nav aria-label="Sections" {
                    ul {
                        @if let Some(title) = about_title {
                            li { a href={ "#" (about::SECTION_ID) } { (title) } }
                        }
                        @for section in manifest.nav_sections() {
                            li { a href={ "#" (section.id) } { (section.nav_title) } }
                        }
                    }
                }
                div.header-controls {
                    button.theme-toggle #theme-toggle type="button" aria-label="Toggle color theme" {
                        span.theme-icon aria-hidden="true" {}
                    }
                    @if motion_toggle {
                        button.motion-toggle #motion-toggle type="button" aria-pressed="false" {
                            "Reduce motion"
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(manifest: &Manifest) -> Markup {
    html! {
        footer.site-footer {
            div.container {
                p { (manifest.profile.name) }
            }
        }
    }
}
