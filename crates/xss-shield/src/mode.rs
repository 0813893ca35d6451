//! Sanitization modes and their settings.

use crate::error::BoxError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Strategy applied to a scalar value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Remove every tag and attribute, keeping text content.
    #[default]
    StripAll,
    /// Keep only the tags and attributes of an [`AllowList`].
    AllowList,
    /// Leave the value untouched.
    Skip,
    /// Hand the raw value to a field-level [`CustomSanitizer`].
    Custom,
}

impl Mode {
    /// Name as used in serialized configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StripAll => "strip_all",
            Self::AllowList => "allow_list",
            Self::Skip => "skip",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag and attribute allow-list handed to the markup capability.
///
/// Every field is optional; `None` means "use the capability's own default".
/// `AllowList::default()` is therefore a legal and distinct setting from
/// [`AllowList::none`], which permits nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowList {
    /// Tags that are kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    /// Attributes allowed on every kept tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_attributes: Option<BTreeSet<String>>,
    /// Attributes allowed per tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_attributes: Option<BTreeMap<String, BTreeSet<String>>>,
    /// URL schemes permitted in URL attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_schemes: Option<BTreeSet<String>>,
    /// Tags removed together with their content (e.g. `script`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_content_tags: Option<BTreeSet<String>>,
    /// Whether HTML comments are removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_comments: Option<bool>,
}

impl AllowList {
    /// Allow-list that permits no tags and no attributes.
    pub fn none() -> Self {
        Self {
            tags: Some(BTreeSet::new()),
            generic_attributes: Some(BTreeSet::new()),
            tag_attributes: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    /// Allow-list with exactly the given tags and no attributes.
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: Some(tags.into_iter().map(Into::into).collect()),
            generic_attributes: Some(BTreeSet::new()),
            tag_attributes: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    /// Allow an attribute on a specific tag.
    pub fn with_tag_attribute(mut self, tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.tag_attributes
            .get_or_insert_with(BTreeMap::new)
            .entry(tag.into())
            .or_default()
            .insert(attribute.into());
        self
    }

    /// Allow an attribute on every kept tag.
    pub fn with_generic_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.generic_attributes
            .get_or_insert_with(BTreeSet::new)
            .insert(attribute.into());
        self
    }

    /// Restrict URL attributes to the given schemes.
    pub fn with_url_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url_schemes = Some(schemes.into_iter().map(Into::into).collect());
        self
    }

    /// Set whether comments are stripped.
    pub fn with_strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = Some(strip);
        self
    }
}

type CustomFn = dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync;

/// Caller-supplied field transformation.
///
/// The function receives the raw value at the field (any JSON type) and its
/// result is used verbatim, whatever its type. Returning an error raises a
/// [`SanitizeError::Custom`](crate::SanitizeError::Custom) for the field.
#[derive(Clone)]
pub struct CustomSanitizer(Arc<CustomFn>);

impl CustomSanitizer {
    /// Wrap a fallible function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a function that cannot fail.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(move |value| Ok(f(value))))
    }

    /// Invoke the function.
    pub fn call(&self, value: &Value) -> Result<Value, BoxError> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomSanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomSanitizer(..)")
    }
}
