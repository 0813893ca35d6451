//! Ready-made configurations.
//!
//! Presets are plain [`SanitizeConfig`] values; use [`Preset::builder`] to
//! attach observers or field rules on top of one.

use crate::config::{ArrayStrategy, SanitizeConfig, SanitizeConfigBuilder};
use crate::mode::{AllowList, Mode};
use std::fmt;
use std::str::FromStr;

const RICH_TEXT_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i",
    "li", "ol", "p", "pre", "s", "span", "strong", "u", "ul",
];

const MARKDOWN_TAGS: &[&str] = &[
    "a", "blockquote", "br", "code", "em", "li", "ol", "p", "pre", "strong", "ul",
];

const COMMENT_TAGS: &[&str] = &["b", "em", "i", "strong"];

/// Named configuration bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Strip every tag and attribute.
    StripAll,
    /// Common rich-text formatting, links with `href`/`title`.
    RichText,
    /// The small tag set produced by markdown renderers.
    Markdown,
    /// Very strict settings for short user comments.
    Comments,
}

impl Preset {
    /// All presets.
    pub const ALL: [Preset; 4] = [
        Preset::StripAll,
        Preset::RichText,
        Preset::Markdown,
        Preset::Comments,
    ];

    /// Preset name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StripAll => "strip_all",
            Self::RichText => "rich_text",
            Self::Markdown => "markdown",
            Self::Comments => "comments",
        }
    }

    /// The configuration this preset stands for.
    pub fn config(&self) -> SanitizeConfig {
        match self {
            Self::StripAll => SanitizeConfig::default(),
            Self::RichText => SanitizeConfig {
                mode: Mode::AllowList,
                allow_list: Some(
                    AllowList::tags(RICH_TEXT_TAGS.iter().copied())
                        .with_tag_attribute("a", "href")
                        .with_tag_attribute("a", "title")
                        .with_url_schemes(["http", "https", "mailto"]),
                ),
                ..SanitizeConfig::default()
            },
            Self::Markdown => SanitizeConfig {
                mode: Mode::AllowList,
                allow_list: Some(
                    AllowList::tags(MARKDOWN_TAGS.iter().copied())
                        .with_tag_attribute("a", "href")
                        .with_url_schemes(["http", "https"]),
                ),
                ..SanitizeConfig::default()
            },
            Self::Comments => SanitizeConfig {
                mode: Mode::AllowList,
                allow_list: Some(
                    AllowList::tags(COMMENT_TAGS.iter().copied()).with_strip_comments(true),
                ),
                max_depth: 3,
                array_strategy: ArrayStrategy::Join,
                ..SanitizeConfig::default()
            },
        }
    }

    /// Builder seeded with this preset.
    pub fn builder(&self) -> SanitizeConfigBuilder {
        self.config().into_builder()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset `{0}`")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
