//! # Simple Folio
//!
//! A static site generator for single-page personal portfolios with scroll
//! and load choreography. A `profile.toml` and a few markdown files become
//! one `index.html` with a hero, an about section and content sections that
//! reveal themselves as they enter the viewport.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (filesystem → structured data)
//! 2. Assets    manifest  →  dist/            (content/assets/ copied, cached)
//! 3. Generate  manifest  →  dist/index.html  (final page)
//! ```
//!
//! Each stage reads the JSON manifest written by the scan, so stages can be
//! run and inspected on their own.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads config, profile, sections and assets into a [`types::Manifest`] |
//! | [`assets`] | Stage 2: parallel, cached copy of `content/assets/` to the output root |
//! | [`generate`] | Stage 3: renders the page with Maud and inlines CSS and scripts |
//! | [`motion`] | Reveal, word, stagger and carousel primitives plus the motion context |
//! | [`sections`] | Hero, about and markdown sections built from the motion primitives |
//! | [`timeline`] | Plays the page choreography on a virtual clock |
//! | [`config`] | `config.toml` loading, validation, merging and CSS generation |
//! | [`cache`] | Content-hash cache manifest for the asset stage |
//! | [`types`] | Types serialized between stages |
//! | [`naming`] | `NNN-name` filename convention parser |
//! | [`output`] | CLI output formatting for every stage |
//!
//! # Design Decisions
//!
//! ## Motion is resolved at build time
//!
//! Every entrance is described as an immutable value and resolved against an
//! explicit [`motion::MotionContext`]. The starting pose, delay, duration and
//! easing are written into the markup as CSS custom properties; the browser
//! runtime only adds a class when the trigger fires. Reduced motion is the
//! same page at rest, never a page with content left hidden.
//!
//! ## One rendering pass, two products
//!
//! Sections render through a [`sections::Stage`] that records a cue for each
//! entrance. The same pass yields the HTML and the choreography, which the
//! `timeline` command replays without a browser.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed HTML is a build error, template variables are Rust
//! expressions, and all interpolation is auto-escaped.
//!
//! ## NNN-Prefix Ordering
//!
//! Section files use a numeric prefix (`030-`, `040-`) for explicit ordering,
//! parsed by [`naming::parse_section_name`]. Files without a prefix are
//! rendered but hidden from the nav.

pub mod assets;
pub mod cache;
pub mod config;
pub mod generate;
pub mod motion;
pub mod naming;
pub mod output;
pub mod scan;
pub mod sections;
pub mod timeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
