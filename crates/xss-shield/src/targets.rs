//! Request-level sanitization across several targets.
//!
//! A request carries up to four already-decoded targets (body, query
//! parameters, path parameters, headers). [`Sanitizer`] walks every requested
//! target in its own isolated traversal and collects the results into
//! [`SanitizedTargets`], where a missing entry means "not sanitized" and is
//! distinct from an empty map.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use xss_shield::{RequestTargets, SanitizeConfig, Sanitizer, Target};
//!
//! let sanitizer = Sanitizer::new(SanitizeConfig::default());
//! let request = RequestTargets::new()
//!     .with_body(json!({ "comment": "<img src=x onerror=alert(1)>nice" }))
//!     .with_query([("q", "<b>rust</b>")]);
//!
//! let clean = sanitizer.sanitize(&request).await?;
//! assert_eq!(clean.get(Target::Body).unwrap()["comment"], "nice");
//! assert!(clean.get(Target::Headers).is_none());
//! ```

use crate::config::SanitizeConfig;
use crate::error::Result;
use crate::walker::sanitize_json;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Top-level part of a request that can be sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Request body fields.
    Body,
    /// Query string parameters.
    Query,
    /// Path parameters.
    Params,
    /// Header name/value pairs.
    Headers,
}

impl Target {
    /// All targets.
    pub const ALL: [Target; 4] = [Target::Body, Target::Query, Target::Params, Target::Headers];

    /// Targets sanitized when none are configured explicitly.
    pub const DEFAULT: [Target; 3] = [Target::Body, Target::Query, Target::Params];

    /// Target name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Query => "query",
            Self::Params => "params",
            Self::Headers => "headers",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown target name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sanitization target `{0}`")]
pub struct UnknownTarget(pub String);

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|target| target.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTarget(s.to_string()))
    }
}

/// Already-decoded request parts, keyed by target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestTargets {
    values: BTreeMap<Target, Value>,
}

impl RequestTargets {
    /// Create an empty set of targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a target to an arbitrary value.
    pub fn insert(&mut self, target: Target, value: Value) -> Option<Value> {
        self.values.insert(target, value)
    }

    /// Value for a target, if present.
    pub fn get(&self, target: Target) -> Option<&Value> {
        self.values.get(&target)
    }

    /// Set the decoded request body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.insert(Target::Body, body);
        self
    }

    /// Set the query parameters from name/value pairs.
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(Target::Query, pairs_to_object(pairs));
        self
    }

    /// Set the path parameters from name/value pairs.
    pub fn with_params<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(Target::Params, pairs_to_object(pairs));
        self
    }

    /// Set the headers from name/value pairs.
    pub fn with_headers<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(Target::Headers, pairs_to_object(pairs));
        self
    }
}

fn pairs_to_object<I, K, V>(pairs: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    Value::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key.into(), Value::String(value.into())))
            .collect(),
    )
}

/// Sanitized maps, keyed by target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizedTargets {
    results: BTreeMap<Target, Map<String, Value>>,
}

impl SanitizedTargets {
    /// Sanitized map for a target, or `None` if it was not sanitized.
    pub fn get(&self, target: Target) -> Option<&Map<String, Value>> {
        self.results.get(&target)
    }

    /// Whether a sanitized result exists for the target.
    pub fn contains(&self, target: Target) -> bool {
        self.results.contains_key(&target)
    }

    /// Remove and return the sanitized map for a target.
    pub fn take(&mut self, target: Target) -> Option<Map<String, Value>> {
        self.results.remove(&target)
    }

    /// Number of sanitized targets.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// `true` if no target was sanitized.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over sanitized targets in target order.
    pub fn iter(&self) -> impl Iterator<Item = (Target, &Map<String, Value>)> {
        self.results.iter().map(|(target, map)| (*target, map))
    }
}

/// Sanitizes the configured targets of a request.
///
/// Cloning is cheap; the configuration is shared.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    config: Arc<SanitizeConfig>,
    targets: Vec<Target>,
}

impl Sanitizer {
    /// Create a sanitizer for the default targets (body, query, params).
    pub fn new(config: SanitizeConfig) -> Self {
        Self::from_shared(Arc::new(config))
    }

    /// Create a sanitizer from an already shared configuration.
    pub fn from_shared(config: Arc<SanitizeConfig>) -> Self {
        Self {
            config,
            targets: Target::DEFAULT.to_vec(),
        }
    }

    /// Replace the set of targets to sanitize.
    pub fn targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.targets = Vec::new();
        for target in targets {
            if !self.targets.contains(&target) {
                self.targets.push(target);
            }
        }
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &SanitizeConfig {
        &self.config
    }

    /// Targets that will be sanitized.
    pub fn configured_targets(&self) -> &[Target] {
        &self.targets
    }

    /// Sanitize every configured target, each in its own isolated traversal.
    ///
    /// The walks never suspend, so they complete one after another on the
    /// calling task. Independent requests may share one [`Sanitizer`] across
    /// tasks.
    ///
    /// Targets that are absent or not objects are left out of the result.
    /// With `throw_on_error`, the first failing target aborts the call.
    pub async fn sanitize(&self, request: &RequestTargets) -> Result<SanitizedTargets> {
        let config = self.config.as_ref();
        let walks = self
            .targets
            .iter()
            .map(|&target| async move { sanitize_one(target, request.get(target), config) });

        let results = try_join_all(walks).await?;
        Ok(collect(results))
    }

    /// Blocking variant of [`Sanitizer::sanitize`].
    pub fn sanitize_blocking(&self, request: &RequestTargets) -> Result<SanitizedTargets> {
        let results = self
            .targets
            .iter()
            .map(|&target| sanitize_one(target, request.get(target), &self.config))
            .collect::<Result<Vec<_>>>()?;
        Ok(collect(results))
    }
}

fn sanitize_one(
    target: Target,
    value: Option<&Value>,
    config: &SanitizeConfig,
) -> Result<Option<(Target, Map<String, Value>)>> {
    let Some(value) = value else {
        tracing::trace!(%target, "target absent; skipping");
        return Ok(None);
    };

    let span = tracing::debug_span!("sanitize_target", %target);
    let _guard = span.enter();
    let sanitized = sanitize_json(value, config).inspect_err(|err| {
        tracing::debug!(%target, path = err.path(), "target sanitization failed");
    })?;
    Ok(sanitized.map(|map| (target, map)))
}

fn collect(results: Vec<Option<(Target, Map<String, Value>)>>) -> SanitizedTargets {
    SanitizedTargets {
        results: results.into_iter().flatten().collect(),
    }
}
