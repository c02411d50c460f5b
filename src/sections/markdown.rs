//! Markdown sections.
//!
//! A section body is split into its top-level blocks (paragraphs, lists,
//! headings, code blocks, tables…) and each block becomes one item of a
//! stagger group, so a section fills in from top to bottom as it scrolls
//! into view.

use super::{Stage, shell};
use crate::motion::{Direction, StaggerContainer};
use crate::types::Section;
use maud::{Markup, PreEscaped};
use pulldown_cmark::{Event, Options, Parser, html as md_html};

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES
}

/// Separates top-level blocks in the rendered stream. The parser replaces
/// NUL in the source with U+FFFD, so content can never contain it.
const BLOCK_BREAK: char = '\0';

/// Render markdown to one HTML string per top-level block.
///
/// The whole document goes through a single HTML writer so cross-block
/// state such as footnote numbering stays consistent.
pub fn render_blocks(markdown: &str) -> Vec<String> {
    let mut depth = 0usize;
    let events = Parser::new_ext(markdown, options()).flat_map(|event| {
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        let boundary = (depth == 0).then(|| Event::Html(BLOCK_BREAK.to_string().into()));
        std::iter::once(event).chain(boundary)
    });

    let mut html = String::new();
    md_html::push_html(&mut html, events);
    html.split(BLOCK_BREAK)
        .filter(|block| !block.trim().is_empty())
        .map(|block| block.trim_start_matches('\n').to_string())
        .collect()
}

pub fn markdown_section(stage: &Stage, section: &Section) -> Markup {
    stage.enter(&section.id);
    let config = stage.config();
    let blocks = StaggerContainer::new(
        config.cards(),
        config.reveal(Direction::Up),
        render_blocks(&section.body),
    );
    let body = stage.stagger("block", &blocks, "prose", |block| PreEscaped(block.clone()));
    shell::section(&section.id, &section.title, section.subtitle.as_deref(), body)
}
