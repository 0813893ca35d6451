//! Array strategies: skip, sanitize each element, or join into one string.

use crate::config::ArrayStrategy;
use crate::error::Result;
use crate::policy::Action;
use crate::transform;
use crate::walker::TraversalContext;
use serde_json::Value;

impl TraversalContext<'_> {
    /// Apply the configured [`ArrayStrategy`] to the array `original` at `path`.
    pub(crate) fn handle_array(
        &mut self,
        original: &Value,
        items: &[Value],
        path: &str,
        action: Action<'_>,
    ) -> Result<Value> {
        match self.config.array_strategy {
            ArrayStrategy::Skip => {
                self.channel().skipped(path, original);
                Ok(original.clone())
            }
            ArrayStrategy::Join => {
                let joined = join_elements(items);
                let result = Value::String(transform::clean(&joined, action, &self.config.markup));
                self.channel().sanitized(path, original, &result);
                Ok(result)
            }
            ArrayStrategy::Each => {
                let mut sanitized = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.path.push(index.to_string());
                    let result = self.visit(item);
                    self.path.pop();
                    sanitized.push(result?);
                }
                Ok(Value::Array(sanitized))
            }
        }
    }
}

/// Join array elements with a single space.
///
/// Strings are used verbatim, numbers and booleans as their JSON text, `null`
/// as the empty string, nested arrays as their coerced elements joined with
/// `,`, and objects as compact JSON.
pub(crate) fn join_elements(items: &[Value]) -> String {
    let mut joined = String::new();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            joined.push(' ');
        }
        coerce_into(item, &mut joined);
    }
    joined
}

fn coerce_into(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::String(text) => out.push_str(text),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                coerce_into(item, out);
            }
        }
        Value::Object(_) => out.push_str(&value.to_string()),
    }
}
