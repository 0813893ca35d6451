//! The markup-sanitizing capability.
//!
//! The walker never inspects HTML itself; it hands string leaves to a
//! [`MarkupSanitizer`] together with the [`AllowList`] that applies at that
//! field. The default implementation is backed by [`ammonia`], which removes
//! `<script>`/`<style>` elements together with their content and keeps the
//! text of every other disallowed tag.
//!
//! Any `Fn(&str, &AllowList) -> String + Send + Sync` can be used instead:
//!
//! ```rust,ignore
//! use xss_shield::{Markup, SanitizeConfig};
//!
//! let config = SanitizeConfig::builder()
//!     .markup(Markup::new(|input: &str, _: &xss_shield::AllowList| input.replace('<', "&lt;")))
//!     .build()?;
//! ```

use crate::mode::AllowList;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Elements whose content ammonia discards by default.
const DEFAULT_CLEAN_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Pure, deterministic `(raw, settings) -> safe` string transformation.
pub trait MarkupSanitizer: Send + Sync {
    /// Sanitize `input` according to `settings`.
    fn clean(&self, input: &str, settings: &AllowList) -> String;
}

impl<F> MarkupSanitizer for F
where
    F: Fn(&str, &AllowList) -> String + Send + Sync,
{
    fn clean(&self, input: &str, settings: &AllowList) -> String {
        self(input, settings)
    }
}

/// [`MarkupSanitizer`] backed by the `ammonia` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmmoniaSanitizer;

impl MarkupSanitizer for AmmoniaSanitizer {
    fn clean(&self, input: &str, settings: &AllowList) -> String {
        let mut builder = ammonia::Builder::default();

        if let Some(tags) = &settings.tags {
            builder.tags(tags.iter().map(String::as_str).collect());
        }
        if let Some(attributes) = &settings.generic_attributes {
            builder.generic_attributes(attributes.iter().map(String::as_str).collect());
        }
        if let Some(per_tag) = &settings.tag_attributes {
            builder.tag_attributes(
                per_tag
                    .iter()
                    .map(|(tag, attributes)| {
                        (tag.as_str(), attributes.iter().map(String::as_str).collect())
                    })
                    .collect(),
            );
        }
        if let Some(schemes) = &settings.url_schemes {
            builder.url_schemes(schemes.iter().map(String::as_str).collect());
        }
        if let Some(strip) = settings.strip_comments {
            builder.strip_comments(strip);
        }

        // ammonia panics when a tag is both allowed and content-cleaned
        let allowed = builder.clone_tags();
        let clean_content: HashSet<&str> = match &settings.clean_content_tags {
            Some(tags) => tags.iter().map(String::as_str).collect(),
            None => DEFAULT_CLEAN_CONTENT_TAGS.iter().copied().collect(),
        };
        builder.clean_content_tags(clean_content.difference(&allowed).copied().collect());

        // ...and when `rel` is allowed while it also manages `rel` itself
        if allows_rel(settings) {
            builder.link_rel(None);
        }

        builder.clean(input).to_string()
    }
}

fn allows_rel(settings: &AllowList) -> bool {
    let generic = settings
        .generic_attributes
        .as_ref()
        .is_some_and(|attributes| attributes.contains("rel"));
    let on_anchor = settings
        .tag_attributes
        .as_ref()
        .and_then(|per_tag| per_tag.get("a"))
        .is_some_and(|attributes| attributes.contains("rel"));
    generic || on_anchor
}

fn strip_all_settings() -> &'static AllowList {
    static SETTINGS: OnceLock<AllowList> = OnceLock::new();
    SETTINGS.get_or_init(AllowList::none)
}

/// Shared handle to the configured [`MarkupSanitizer`].
///
/// Defaults to [`AmmoniaSanitizer`].
#[derive(Clone)]
pub struct Markup(Arc<dyn MarkupSanitizer>);

impl Markup {
    /// Use a custom markup capability.
    pub fn new(sanitizer: impl MarkupSanitizer + 'static) -> Self {
        Self(Arc::new(sanitizer))
    }

    /// Sanitize `input` with an explicit allow-list.
    pub fn clean(&self, input: &str, settings: &AllowList) -> String {
        self.0.clean(input, settings)
    }

    /// Remove every tag and attribute, keeping text content.
    pub fn strip_all(&self, input: &str) -> String {
        self.0.clean(input, strip_all_settings())
    }
}

impl Default for Markup {
    fn default() -> Self {
        Self::new(AmmoniaSanitizer)
    }
}

impl fmt::Debug for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Markup(..)")
    }
}
