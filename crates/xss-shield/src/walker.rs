//! The recursive tree walker.
//!
//! A [`TraversalContext`] is created for every top-level call and discarded
//! when it returns. It holds the current depth and the path segments from the
//! target root to the node being visited; nothing is shared between calls, so
//! independent targets can be walked concurrently.
//!
//! Per node the walker resolves the field policy, then
//!
//! 1. skips out-of-scope nodes (`on_skip`),
//! 2. applies a field-level custom function and stops,
//! 3. skips `skip`-mode nodes (`on_skip`),
//! 4. transforms strings, dispatches arrays to the array strategy and
//!    recurses into objects (bounded by `max_depth`),
//! 5. passes every other value through unchanged.
//!
//! Failures are contained in [`TraversalContext::visit`], the single-value
//! entry point used for every object entry and array element.

use crate::config::SanitizeConfig;
use crate::error::{Result, SanitizeError};
use crate::notify::Channel;
use crate::policy::{self, Action, Resolution};
use crate::transform;
use serde_json::{Map, Value};

pub(crate) struct TraversalContext<'a> {
    pub(crate) config: &'a SanitizeConfig,
    pub(crate) depth: usize,
    pub(crate) path: Vec<String>,
}

impl<'a> TraversalContext<'a> {
    pub(crate) fn new(config: &'a SanitizeConfig) -> Self {
        Self {
            config,
            depth: 0,
            path: Vec::new(),
        }
    }

    pub(crate) fn channel(&self) -> Channel<'a> {
        Channel::new(self.config)
    }

    fn current_path(&self) -> String {
        self.path.join(".")
    }

    /// Sanitize one value, containing any failure raised for it.
    pub(crate) fn visit(&mut self, value: &Value) -> Result<Value> {
        let path = self.current_path();
        match self.sanitize_value(value, &path) {
            Ok(sanitized) => Ok(sanitized),
            Err(err) => {
                self.channel().contain(err, &path)?;
                Ok(value.clone())
            }
        }
    }

    /// Sanitize every entry of `map` into a new map.
    pub(crate) fn sanitize_entries(&mut self, map: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut sanitized = Map::new();
        for (key, value) in map {
            self.path.push(key.clone());
            let result = self.visit(value);
            self.path.pop();
            sanitized.insert(key.clone(), result?);
        }
        Ok(sanitized)
    }

    fn sanitize_value(&mut self, value: &Value, path: &str) -> Result<Value> {
        let config = self.config;
        let channel = self.channel();

        let action = match policy::resolve(path, config) {
            Resolution::OutOfScope => {
                channel.skipped(path, value);
                return Ok(value.clone());
            }
            Resolution::Apply(action) => action,
        };

        match action {
            Action::Custom(custom) => return transform::apply_custom(value, path, custom, channel),
            Action::Skip => {
                channel.skipped(path, value);
                return Ok(value.clone());
            }
            Action::StripAll | Action::AllowList(_) => {}
        }

        match value {
            Value::String(input) => Ok(transform::transform_string(
                value,
                input,
                path,
                action,
                &config.markup,
                channel,
            )),
            Value::Array(items) => self.handle_array(value, items, path, action),
            Value::Object(map) if config.deep => self.descend(map, path),
            Value::Object(_) | Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
        }
    }

    fn descend(&mut self, map: &Map<String, Value>, path: &str) -> Result<Value> {
        if self.depth >= self.config.max_depth {
            return Err(SanitizeError::DepthExceeded {
                path: path.to_string(),
                max_depth: self.config.max_depth,
            });
        }

        self.depth += 1;
        let result = self.sanitize_entries(map);
        self.depth -= 1;
        result.map(Value::Object)
    }
}

/// Sanitize one target mapping.
///
/// The input is not modified; a new map of the same shape is returned (except
/// where the `join` array strategy collapses arrays into strings). With
/// `throw_on_error` set, the first failure aborts the walk and is returned.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
/// use xss_shield::{sanitize_target, SanitizeConfig};
///
/// let body = json!({ "message": "<script>alert(1)</script>Hello" });
/// let clean = sanitize_target(body.as_object().unwrap(), &SanitizeConfig::default())?;
/// assert_eq!(clean["message"], "Hello");
/// ```
pub fn sanitize_target(target: &Map<String, Value>, config: &SanitizeConfig) -> Result<Map<String, Value>> {
    TraversalContext::new(config)
        .sanitize_entries(target)
        .inspect_err(|err| {
            tracing::debug!(path = err.path(), error = %err, "sanitization aborted");
        })
}

/// Sanitize a target given as an arbitrary JSON value.
///
/// Returns `Ok(None)` when the value is not an object; malformed targets
/// produce no sanitized result rather than an error.
pub fn sanitize_json(value: &Value, config: &SanitizeConfig) -> Result<Option<Map<String, Value>>> {
    match value {
        Value::Object(map) => sanitize_target(map, config).map(Some),
        _ => {
            tracing::debug!("target is not an object; skipping");
            Ok(None)
        }
    }
}
