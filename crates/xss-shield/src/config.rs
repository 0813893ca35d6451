//! Sanitization configuration.
//!
//! A [`SanitizeConfig`] is an immutable value read by every step of a
//! traversal. Data fields can be deserialized from JSON; observers, custom
//! field functions and the markup capability are attached in code.
//!
//! # Example
//!
//! ```rust,ignore
//! use xss_shield::{AllowList, ArrayStrategy, FieldRule, SanitizeConfig};
//!
//! let config = SanitizeConfig::builder()
//!     .blacklist(["password"])
//!     .field("post.body", FieldRule::allow_list(AllowList::tags(["p", "b", "i"])))
//!     .field("user.name", FieldRule::custom_fn(|v| v.clone()))
//!     .array_strategy(ArrayStrategy::Join)
//!     .on_error(|err, path| eprintln!("{path}: {err}"))
//!     .build()?;
//! ```

use crate::error::{BoxError, ConfigError, SanitizeError};
use crate::markup::{Markup, MarkupSanitizer};
use crate::mode::{AllowList, CustomSanitizer, Mode};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default bound on nested-object recursion.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Observer invoked when a value was transformed: `(path, original, result)`.
pub type OnSanitize = Arc<dyn Fn(&str, &Value, &Value) + Send + Sync>;
/// Observer invoked when a value was skipped: `(path, value)`.
pub type OnSkip = Arc<dyn Fn(&str, &Value) + Send + Sync>;
/// Observer invoked when a failure was contained: `(error, path)`.
pub type OnError = Arc<dyn Fn(&SanitizeError, &str) + Send + Sync>;

/// How array values are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayStrategy {
    /// Return the array untouched.
    Skip,
    /// Sanitize every element on its own, under the path `<array>.<index>`.
    #[default]
    Each,
    /// Join all elements with a space and sanitize the result as one string.
    Join,
}

/// Field-level override, keyed by field-path in [`SanitizeConfig::fields`].
///
/// A rule also applies to every descendant of its path that has no rule of
/// its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldRule {
    /// Mode for this field.
    pub mode: Mode,
    /// Allow-list used when `mode` is [`Mode::AllowList`].
    pub allow_list: Option<AllowList>,
    /// Function used when `mode` is [`Mode::Custom`].
    #[serde(skip)]
    pub custom: Option<CustomSanitizer>,
}

impl FieldRule {
    /// Strip all markup at this field.
    pub fn strip_all() -> Self {
        Self {
            mode: Mode::StripAll,
            ..Self::default()
        }
    }

    /// Keep only the given allow-list at this field.
    pub fn allow_list(settings: AllowList) -> Self {
        Self {
            mode: Mode::AllowList,
            allow_list: Some(settings),
            custom: None,
        }
    }

    /// Leave this field untouched.
    pub fn skip() -> Self {
        Self {
            mode: Mode::Skip,
            ..Self::default()
        }
    }

    /// Transform this field with a custom function.
    pub fn custom(sanitizer: CustomSanitizer) -> Self {
        Self {
            mode: Mode::Custom,
            allow_list: None,
            custom: Some(sanitizer),
        }
    }

    /// Transform this field with an infallible closure.
    pub fn custom_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::custom(CustomSanitizer::from_fn(f))
    }

    /// Transform this field with a fallible closure.
    pub fn try_custom_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self::custom(CustomSanitizer::new(f))
    }
}

/// Configuration for a sanitization run.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Mode used when no field rule matches.
    pub mode: Mode,
    /// Allow-list used for [`Mode::AllowList`] when the field rule has none.
    pub allow_list: Option<AllowList>,
    /// If non-empty, only these paths (and their descendants) are sanitized.
    pub whitelist: Vec<String>,
    /// Paths (and their descendants) never sanitized. Ignored when a whitelist is set.
    pub blacklist: Vec<String>,
    /// Field-level overrides keyed by dotted field-path.
    pub fields: BTreeMap<String, FieldRule>,
    /// Recurse into nested objects.
    pub deep: bool,
    /// Maximum number of nested objects entered below a target root.
    pub max_depth: usize,
    /// How arrays are handled.
    pub array_strategy: ArrayStrategy,
    /// Return failures to the caller instead of reporting them to `on_error`.
    pub throw_on_error: bool,
    /// Called after a value was transformed.
    #[serde(skip)]
    pub on_sanitize: Option<OnSanitize>,
    /// Called when a value was left untouched on purpose.
    #[serde(skip)]
    pub on_skip: Option<OnSkip>,
    /// Called when a failure was contained.
    #[serde(skip)]
    pub on_error: Option<OnError>,
    /// The markup capability used for `strip_all` and `allow_list`.
    #[serde(skip)]
    pub markup: Markup,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            mode: Mode::StripAll,
            allow_list: None,
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            fields: BTreeMap::new(),
            deep: true,
            max_depth: DEFAULT_MAX_DEPTH,
            array_strategy: ArrayStrategy::Each,
            throw_on_error: false,
            on_sanitize: None,
            on_skip: None,
            on_error: None,
            markup: Markup::default(),
        }
    }
}

impl SanitizeConfig {
    /// Create a new builder for SanitizeConfig.
    pub fn builder() -> SanitizeConfigBuilder {
        SanitizeConfigBuilder::default()
    }

    /// Check the configuration for rules that can never be applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == Mode::Custom {
            return Err(ConfigError::CustomDefaultMode);
        }
        for (path, rule) in &self.fields {
            if rule.mode == Mode::Custom && rule.custom.is_none() {
                return Err(ConfigError::MissingCustomFunction { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Turn this configuration back into a builder.
    pub fn into_builder(self) -> SanitizeConfigBuilder {
        SanitizeConfigBuilder { config: self }
    }
}

impl fmt::Debug for SanitizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizeConfig")
            .field("mode", &self.mode)
            .field("allow_list", &self.allow_list)
            .field("whitelist", &self.whitelist)
            .field("blacklist", &self.blacklist)
            .field("fields", &self.fields)
            .field("deep", &self.deep)
            .field("max_depth", &self.max_depth)
            .field("array_strategy", &self.array_strategy)
            .field("throw_on_error", &self.throw_on_error)
            .field("has_on_sanitize", &self.on_sanitize.is_some())
            .field("has_on_skip", &self.on_skip.is_some())
            .field("has_on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Builder for SanitizeConfig
#[derive(Debug, Clone, Default)]
pub struct SanitizeConfigBuilder {
    config: SanitizeConfig,
}

impl SanitizeConfigBuilder {
    /// Set the default mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the global allow-list and switch the default mode to `allow_list`.
    pub fn allow_list(mut self, settings: AllowList) -> Self {
        self.config.mode = Mode::AllowList;
        self.config.allow_list = Some(settings);
        self
    }

    /// Only sanitize these paths and their descendants.
    pub fn whitelist<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.whitelist.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Never sanitize these paths and their descendants.
    pub fn blacklist<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.blacklist.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add a field-level override.
    pub fn field(mut self, path: impl Into<String>, rule: FieldRule) -> Self {
        self.config.fields.insert(path.into(), rule);
        self
    }

    /// Enable or disable recursion into nested objects.
    pub fn deep(mut self, deep: bool) -> Self {
        self.config.deep = deep;
        self
    }

    /// Set the maximum object nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Set the array strategy.
    pub fn array_strategy(mut self, strategy: ArrayStrategy) -> Self {
        self.config.array_strategy = strategy;
        self
    }

    /// Propagate failures instead of containing them.
    pub fn throw_on_error(mut self, throw: bool) -> Self {
        self.config.throw_on_error = throw;
        self
    }

    /// Observe transformed values.
    pub fn on_sanitize<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.config.on_sanitize = Some(Arc::new(f));
        self
    }

    /// Observe skipped values.
    pub fn on_skip<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        self.config.on_skip = Some(Arc::new(f));
        self
    }

    /// Observe contained failures.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&SanitizeError, &str) + Send + Sync + 'static,
    {
        self.config.on_error = Some(Arc::new(f));
        self
    }

    /// Replace the markup capability.
    pub fn markup(mut self, markup: Markup) -> Self {
        self.config.markup = markup;
        self
    }

    /// Replace the markup capability with any [`MarkupSanitizer`].
    pub fn markup_sanitizer(self, sanitizer: impl MarkupSanitizer + 'static) -> Self {
        self.markup(Markup::new(sanitizer))
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<SanitizeConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let config = SanitizeConfig::default();
        assert_eq!(config.mode, Mode::StripAll);
        assert!(config.deep);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.array_strategy, ArrayStrategy::Each);
        assert!(!config.throw_on_error);
        assert!(config.whitelist.is_empty());
        assert!(config.fields.is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let config = SanitizeConfig::builder()
            .whitelist(["body"])
            .blacklist(["secret"])
            .field("bio", FieldRule::skip())
            .deep(false)
            .max_depth(3)
            .array_strategy(ArrayStrategy::Join)
            .throw_on_error(true)
            .on_skip(|_, _| {})
            .build()
            .unwrap();

        assert_eq!(config.whitelist, vec!["body"]);
        assert_eq!(config.blacklist, vec!["secret"]);
        assert_eq!(config.fields["bio"].mode, Mode::Skip);
        assert!(!config.deep);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.array_strategy, ArrayStrategy::Join);
        assert!(config.throw_on_error);
        assert!(config.on_skip.is_some());
    }

    #[test]
    fn builder_allow_list_switches_mode() {
        let config = SanitizeConfig::builder()
            .allow_list(AllowList::tags(["b"]))
            .build()
            .unwrap();
        assert_eq!(config.mode, Mode::AllowList);
        assert!(config.allow_list.is_some());
    }

    #[test]
    fn custom_default_mode_is_rejected() {
        let err = SanitizeConfig::builder()
            .mode(Mode::Custom)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::CustomDefaultMode);
    }

    #[test]
    fn custom_rule_without_function_is_rejected() {
        let rule = FieldRule {
            mode: Mode::Custom,
            ..FieldRule::default()
        };
        let err = SanitizeConfig::builder()
            .field("pwd", rule)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCustomFunction {
                path: "pwd".to_string()
            }
        );
    }

    #[test]
    fn deserializes_data_fields() {
        let config: SanitizeConfig = serde_json::from_value(json!({
            "mode": "allow_list",
            "allow_list": { "tags": ["p"] },
            "blacklist": ["token"],
            "fields": {
                "user.bio": { "mode": "skip" }
            },
            "max_depth": 4,
            "array_strategy": "join"
        }))
        .unwrap();

        assert_eq!(config.mode, Mode::AllowList);
        assert_eq!(config.blacklist, vec!["token"]);
        assert_eq!(config.fields["user.bio"].mode, Mode::Skip);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.array_strategy, ArrayStrategy::Join);
        assert!(config.deep);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn into_builder_round_trips() {
        let config = SanitizeConfig::builder().max_depth(2).build().unwrap();
        let rebuilt = config.into_builder().deep(false).build().unwrap();
        assert_eq!(rebuilt.max_depth, 2);
        assert!(!rebuilt.deep);
    }
}
