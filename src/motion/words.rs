//! Word-by-word reveal.
//!
//! Text is split on whitespace into words, each keeping the whitespace that
//! follows it, plus whatever whitespace precedes the first word. Joining the
//! pieces back together gives the original string exactly, so spacing,
//! tabs and line breaks all survive.

use super::reveal::{self, RevealSpec, Wrapper};
use super::stagger::StaggerSpec;
use super::MotionContext;
use maud::{Markup, html};

/// One word and the whitespace that follows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Word<'a> {
    pub index: usize,
    pub text: &'a str,
    pub gap: &'a str,
    pub delay: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordReveal<'a> {
    leading: &'a str,
    words: Vec<Word<'a>>,
}

impl<'a> WordReveal<'a> {
    /// Split `text` and assign word `i` the delay `stagger.delay_for(i)`.
    pub fn new(text: &'a str, stagger: StaggerSpec) -> Self {
        let body_start = text
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(text.len());
        let (leading, mut rest) = text.split_at(body_start);

        let mut words = Vec::new();
        while !rest.is_empty() {
            let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let (word, after) = rest.split_at(word_end);
            let gap_end = after
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(after.len());
            let (gap, next) = after.split_at(gap_end);
            let index = words.len();
            words.push(Word {
                index,
                text: word,
                gap,
                delay: stagger.delay_for(index),
            });
            rest = next;
        }

        Self { leading, words }
    }

    pub fn leading(&self) -> &'a str {
        self.leading
    }

    pub fn words(&self) -> &[Word<'a>] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn delays(&self) -> Vec<f64> {
        self.words.iter().map(|w| w.delay).collect()
    }

    /// Reassemble the original text.
    pub fn text(&self) -> String {
        let mut out = String::from(self.leading);
        for word in &self.words {
            out.push_str(word.text);
            out.push_str(word.gap);
        }
        out
    }

    /// Render each word in its own inline reveal.
    ///
    /// `template` supplies everything but the delay. Whitespace is emitted
    /// as plain text between the word wrappers.
    pub fn render(&self, template: &RevealSpec, motion: &MotionContext) -> Markup {
        if self.words.is_empty() {
            return html! { (self.leading) };
        }
        html! {
            span.word-reveal {
                (self.leading)
                @for word in &self.words {
                    (reveal::render(
                        &template.with_delay(word.delay).resolve(motion),
                        Wrapper::Inline,
                        "reveal-word",
                        html! { (word.text) },
                    ))
                    (word.gap)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Direction;

    fn texts<'a>(reveal: &WordReveal<'a>) -> Vec<&'a str> {
        reveal.words().iter().map(|w| w.text).collect()
    }

    #[test]
    fn sentence_gets_staggered_delays() {
        let reveal = WordReveal::new("I build systems.", StaggerSpec::new(0.05));
        assert_eq!(texts(&reveal), vec!["I", "build", "systems."]);
        let delays = reveal.delays();
        assert!((delays[0] - 0.00).abs() < 1e-9);
        assert!((delays[1] - 0.05).abs() < 1e-9);
        assert!((delays[2] - 0.10).abs() < 1e-9);
    }

    #[test]
    fn round_trips_arbitrary_spacing() {
        let samples = [
            "",
            " ",
            "word",
            "  leading",
            "trailing  ",
            "a\tb\nc",
            "  many   spaces\t\there  ",
            "unicode\u{2003}em space",
            "안녕하세요, 저는 Kevin입니다",
            "\n\nI build systems where structure matters.\n",
        ];
        for sample in samples {
            let reveal = WordReveal::new(sample, StaggerSpec::new(0.05));
            assert_eq!(reveal.text(), sample, "round trip failed for {sample:?}");
        }
    }

    #[test]
    fn empty_string_renders_nothing() {
        let reveal = WordReveal::new("", StaggerSpec::new(0.05));
        assert!(reveal.is_empty());
        let html = reveal
            .render(&RevealSpec::new(Direction::Up), &MotionContext::full())
            .into_string();
        assert!(html.is_empty());
    }

    #[test]
    fn single_word_uses_base_delay() {
        let reveal = WordReveal::new("Curiosity", StaggerSpec::new(0.05).with_base(0.4));
        assert_eq!(reveal.words().len(), 1);
        assert!((reveal.words()[0].delay - 0.4).abs() < 1e-9);
        assert_eq!(reveal.words()[0].gap, "");
    }

    #[test]
    fn gaps_stay_attached_to_preceding_word() {
        let reveal = WordReveal::new(" a  b", StaggerSpec::new(0.1));
        assert_eq!(reveal.leading(), " ");
        assert_eq!(reveal.words()[0].gap, "  ");
        assert_eq!(reveal.words()[1].gap, "");
    }

    #[test]
    fn render_wraps_each_word_and_keeps_spacing() {
        let reveal = WordReveal::new("Hello  world", StaggerSpec::new(0.05));
        let html = reveal
            .render(&RevealSpec::new(Direction::Up), &MotionContext::full())
            .into_string();
        assert_eq!(html.matches("reveal-word").count(), 2);
        assert!(html.contains("Hello</span>  <span"));
        assert!(html.contains("--reveal-delay: 0.05s"));
    }

    #[test]
    fn render_escapes_word_text() {
        let reveal = WordReveal::new("<b>bold</b>", StaggerSpec::new(0.05));
        let html = reveal
            .render(&RevealSpec::fade(), &MotionContext::full())
            .into_string();
        assert!(html.contains("&lt;b&gt;"));
    }
}
