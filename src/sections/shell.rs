//! Section wrapper with a consistent heading, subtitle and spacing.

use maud::{Markup, html};

/// Wrap `body` in `<section id=…>` with an `h2` title and optional subtitle.
///
/// The shell itself never animates; its children carry the reveals.
pub fn section(id: &str, title: &str, subtitle: Option<&str>, body: Markup) -> Markup {
    let title_id = format!("{id}-title");
    html! {
        section.section id=(id) aria-labelledby=(title_id) {
            div.container {
                header.section-header {
                    h2.section-title id=(title_id) { (title) }
                    @if let Some(subtitle) = subtitle.filter(|s| !s.is_empty()) {
                        p.section-subtitle { (subtitle) }
                    }
                }
                div.section-body {
                    (body)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_heading_and_subtitle() {
        let html = section("about", "About", Some("Background & approach"), html! { p { "x" } })
            .into_string();
        assert!(html.starts_with("<section"));
        assert!(html.contains(r#"id="about""#));
        assert!(html.contains(r#"aria-labelledby="about-title""#));
        assert!(html.contains(r#"id="about-title""#));
        assert!(html.contains(">About</h2>"));
        assert!(html.contains("Background &amp; approach"));
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn empty_subtitle_is_omitted() {
        let html = section("notes", "Notes", Some(""), html! {}).into_string();
        assert!(!html.contains("section-subtitle"));
        let html = section("notes", "Notes", None, html! {}).into_string();
        assert!(!html.contains("section-subtitle"));
    }

    #[test]
    fn shell_is_not_animated() {
        let html = section("notes", "Notes", None, html! {}).into_string();
        assert!(!html.contains("data-reveal"));
    }
}
