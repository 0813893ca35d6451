//! Scalar transformation for a single resolved action.

use crate::error::{Result, SanitizeError};
use crate::markup::Markup;
use crate::mode::CustomSanitizer;
use crate::notify::Channel;
use crate::policy::Action;
use serde_json::Value;

/// Run the markup capability for `action`. `Skip` and `Custom` leave the
/// string as is; custom functions are applied by [`apply_custom`].
pub(crate) fn clean(input: &str, action: Action<'_>, markup: &Markup) -> String {
    match action {
        Action::StripAll => markup.strip_all(input),
        Action::AllowList(settings) => markup.clean(input, settings),
        Action::Skip | Action::Custom(_) => input.to_string(),
    }
}

/// Transform the string leaf `original` at `path`.
///
/// `on_sanitize` fires only when the cleaned string differs from the input.
pub(crate) fn transform_string(
    original: &Value,
    input: &str,
    path: &str,
    action: Action<'_>,
    markup: &Markup,
    channel: Channel<'_>,
) -> Value {
    let cleaned = clean(input, action, markup);
    if cleaned == input {
        return original.clone();
    }

    let result = Value::String(cleaned);
    channel.sanitized(path, original, &result);
    result
}

/// Apply a field-level custom function to the raw value.
///
/// The returned value is used verbatim, and `on_sanitize` always fires.
pub(crate) fn apply_custom(
    value: &Value,
    path: &str,
    custom: &CustomSanitizer,
    channel: Channel<'_>,
) -> Result<Value> {
    let result = custom.call(value).map_err(|source| SanitizeError::Custom {
        path: path.to_string(),
        source,
    })?;
    channel.sanitized(path, value, &result);
    Ok(result)
}
