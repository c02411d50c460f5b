//! The about section.
//!
//! View-triggered and played once. The lead and closing sentences reveal
//! word by word; paragraphs follow the lead as a stagger group and the
//! closing takes the next slot after the last paragraph. Media use a longer
//! travel with an expo-out curve.

use super::{Stage, shell};
use crate::motion::{CubicBezier, Direction, RevealSpec, StaggerContainer, Wrapper};
use crate::types::About;
use maud::{Markup, html};

pub const SECTION_ID: &str = "about";

const LEAD_DELAY: f64 = 0.2;
const PARAGRAPH_DELAY: f64 = 0.3;
const VIDEO_DELAY: f64 = 0.3;
const IMAGE_DELAY: f64 = 0.2;
const MEDIA_DISTANCE: f64 = 30.0;
const MEDIA_DURATION: f64 = 0.7;

pub fn about(stage: &Stage, about: &About) -> Markup {
    stage.enter(SECTION_ID);
    let config = stage.config();
    let entrance = config.reveal(Direction::Up);
    let paragraph_stagger = config.lines().with_base(PARAGRAPH_DELAY);
    let paragraphs = StaggerContainer::new(paragraph_stagger, entrance, about.paragraphs.iter());
    let closing_delay = paragraph_stagger.delay_for(about.paragraphs.len());

    let media = |delay: f64| {
        RevealSpec::new(Direction::Up)
            .with_distance(MEDIA_DISTANCE)
            .with_duration(MEDIA_DURATION)
            .with_delay(delay)
            .with_ease(CubicBezier::EXPO_OUT)
    };

    let body = html! {
        div.about-grid {
            div.about-text {
                @if !about.lead.is_empty() {
                    p.about-lead {
                        (stage.words("lead", &about.lead, config.words().with_base(LEAD_DELAY), &entrance))
                    }
                }
                (stage.stagger("paragraph", &paragraphs, "about-paragraphs", |text| html! { p { (text) } }))
                @if !about.closing.is_empty() {
                    p.about-closing {
                        (stage.words("closing", &about.closing, config.words().with_base(closing_delay), &entrance))
                    }
                }
            }
            @if let Some(video) = &about.video {
                (stage.reveal("video", &media(VIDEO_DELAY), Wrapper::Block, "about-video", html! {
                    video autoplay loop muted playsinline preload="metadata" {
                        source src=(video.src) type=(video.mime);
                    }
                }))
            }
        }
        @if let Some(image) = &about.image {
            (stage.reveal("image", &media(IMAGE_DELAY), Wrapper::Block, "about-image", html! {
                img src=(image.src) alt=(image.alt) loading="lazy";
            }))
        }
    };

    shell::section(SECTION_ID, &about.title, Some(&about.subtitle), body)
}
