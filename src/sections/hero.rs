//! Above-the-fold hero.
//!
//! Everything here is mount-triggered and timed from page load:
//!
//! ```text
//! 0.00  availability badge fades in
//! 0.20  portrait fades in (0.8s)
//! 0.30  headline line 1, then one line every `line_stagger`
//! end   = 0.30 + lines × line_stagger
//! +0.15 subheading
//! +0.30 stats (staggered by `card_stagger`), social links, CV
//! ```
//!
//! The greeting above the headline is a carousel: the first greeting is
//! visible immediately and the runtime rotates through the rest.

use super::Stage;
use crate::motion::{
    Carousel, CubicBezier, Direction, RevealSpec, StaggerContainer, Wrapper, css_number,
};
use crate::types::{Profile, Stat};
use maud::{Markup, PreEscaped, html};

pub const HEADLINE_START: f64 = 0.3;
const HEADLINE_DISTANCE: f64 = 14.0;
const HEADLINE_DURATION: f64 = 0.75;
const FADE_DISTANCE: f64 = 8.0;
const FADE_DURATION: f64 = 0.6;
const PORTRAIT_DELAY: f64 = 0.2;
const PORTRAIT_DURATION: f64 = 0.8;
const SUBHEADING_GAP: f64 = 0.15;
const SECONDARY_GAP: f64 = 0.3;

const DOWNLOAD_ICON: &str = r#"<svg class="icon" aria-hidden="true" width="20" height="20" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 16v1a3 3 0 003 3h10a3 3 0 003-3v-1m-4-4l-4 4m0 0l-4-4m4 4V4"/></svg>"#;

/// Delays derived from the line stagger and headline length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroTiming {
    line_stagger: f64,
    lines: usize,
}

impl HeroTiming {
    pub fn new(line_stagger: f64, lines: usize) -> Self {
        let line_stagger = if line_stagger.is_finite() && line_stagger > 0.0 {
            line_stagger
        } else {
            0.0
        };
        Self {
            line_stagger,
            lines,
        }
    }

    pub fn line_delay(&self, index: usize) -> f64 {
        HEADLINE_START + index as f64 * self.line_stagger
    }

    /// When the last line has started plus one stagger step.
    pub fn headline_end(&self) -> f64 {
        self.line_delay(self.lines)
    }

    pub fn subheading_delay(&self) -> f64 {
        self.headline_end() + SUBHEADING_GAP
    }

    pub fn secondary_delay(&self) -> f64 {
        self.headline_end() + SECONDARY_GAP
    }

    pub fn portrait_delay(&self) -> f64 {
        PORTRAIT_DELAY
    }
}

pub fn hero(stage: &Stage, profile: &Profile) -> Markup {
    stage.enter("top");
    let config = stage.config();
    let ease = config.ease_curve();
    let timing = HeroTiming::new(config.line_stagger, profile.headline.len());

    let fade = |delay: f64| {
        RevealSpec::new(Direction::Up)
            .with_distance(FADE_DISTANCE)
            .with_duration(FADE_DURATION)
            .with_delay(delay)
            .with_ease(ease)
            .on_mount()
    };

    let badge = profile.availability.as_deref().filter(|s| !s.is_empty());
    let carousel = Carousel::new(profile.greetings.iter().cloned(), config.carousel.interval);

    html! {
        section.hero id="top" {
            div.container.hero-inner {
                @if let Some(text) = badge {
                    (stage.reveal("availability", &fade(0.0), Wrapper::Block, "hero-badge", availability(text)))
                }
                (greeting(&carousel))
                div.hero-grid {
                    div.hero-text {
                        @if !profile.headline.is_empty() {
                            h1.headline {
                                @for (i, line) in profile.headline.iter().enumerate() {
                                    span.headline-mask {
                                        (stage.reveal(
                                            &format!("headline line {}", i + 1),
                                            &headline_line(timing.line_delay(i), ease),
                                            Wrapper::Inline,
                                            "headline-line",
                                            html! { (line) },
                                        ))
                                    }
                                }
                            }
                        } @else {
                            h1.headline { (profile.name) }
                        }
                        @if !profile.subheading.is_empty() {
                            (stage.reveal(
                                "subheading",
                                &fade(timing.subheading_delay()),
                                Wrapper::Block,
                                "",
                                html! { p.subheading { (profile.subheading) } },
                            ))
                        }
                    }
                    @if let Some(portrait) = &profile.portrait {
                        (stage.reveal(
                            "portrait",
                            &RevealSpec::fade()
                                .with_delay(timing.portrait_delay())
                                .with_duration(PORTRAIT_DURATION)
                                .with_ease(ease)
                                .on_mount(),
                            Wrapper::Block,
                            "portrait",
                            html! {
                                img src=(portrait.src) alt=(portrait.alt) fetchpriority="high";
                            },
                        ))
                    }
                }
                (secondary(stage, profile, timing.secondary_delay(), &fade))
            }
        }
    }
}

fn headline_line(delay: f64, ease: CubicBezier) -> RevealSpec {
    RevealSpec::new(Direction::Up)
        .with_distance(HEADLINE_DISTANCE)
        .with_duration(HEADLINE_DURATION)
        .with_delay(delay)
        .with_ease(ease)
        .on_mount()
}

fn availability(text: &str) -> Markup {
    html! {
        p.badge {
            span.badge-dot aria-hidden="true" {}
            span.badge-text {
                (text)
                span.ellipsis aria-hidden="true" {
                    span.ellipsis-dot { "." }
                    span.ellipsis-dot { "." }
                    span.ellipsis-dot { "." }
                }
            }
        }
    }
}

/// Greeting carousel markup.
///
/// All greetings are in the document; the first carries `is-current`. The
/// runtime rotates only when `data-carousel` is present, which requires at
/// least two greetings. No greetings render nothing.
pub fn greeting(carousel: &Carousel<String>) -> Markup {
    if carousel.is_empty() {
        return html! {};
    }
    let current = carousel.current_index();
    html! {
        p.greeting data-carousel[carousel.cycles()] data-interval=(css_number(carousel.interval())) aria-live="polite" {
            @for (i, text) in carousel.items().iter().enumerate() {
                span.greeting-item.is-current[i == current]
                    data-index=(i)
                    aria-hidden=[(i != current).then_some("true")] {
                    (text)
                }
            }
        }
    }
}

fn secondary(
    stage: &Stage,
    profile: &Profile,
    delay: f64,
    fade: &dyn Fn(f64) -> RevealSpec,
) -> Markup {
    if profile.stats.is_empty() && profile.social.is_empty() && profile.cv.is_none() {
        return html! {};
    }
    let stats = StaggerContainer::new(
        stage.config().cards().with_base(delay),
        fade(0.0),
        profile.stats.iter(),
    );

    html! {
        div.hero-secondary {
            (stage.stagger("stat", &stats, "stats", |stat| stat_card(stat)))
            (stage.reveal("links", &fade(delay), Wrapper::Block, "hero-links", html! {
                @if !profile.social.is_empty() {
                    ul.social {
                        @for link in &profile.social {
                            li {
                                a.social-link href=(link.href) target="_blank" rel="noopener noreferrer" {
                                    (link.label)
                                }
                            }
                        }
                    }
                }
                @if let Some(cv) = &profile.cv {
                    a.cv-button href=(cv.href) target="_blank" rel="noopener noreferrer" {
                        span { (cv.label) }
                        (PreEscaped(DOWNLOAD_ICON))
                    }
                }
            }))
        }
    }
}

/// Stat card with a light sweep on hover (CSS only).
pub fn stat_card(stat: &Stat) -> Markup {
    html! {
        div class={ "stat-card stat-" (stat.variant.as_str()) } {
            span.stat-sweep aria-hidden="true" {}
            span.stat-value { (stat.value) }
            span.stat-label { (stat.label) }
        }
    }
}
