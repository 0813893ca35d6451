//! # xss-shield
//!
//! Policy-driven markup sanitization for JSON request data.
//!
//! The engine walks a decoded target (request body, query parameters, path
//! parameters, headers) and rewrites every string leaf according to the
//! policy that applies at its field-path. It returns a new tree of the same
//! shape; the input is never modified.
//!
//! ## Modes
//!
//! - `strip_all` - remove every tag and attribute, keep text (default)
//! - `allow_list` - keep only the tags/attributes of an [`AllowList`]
//! - `skip` - leave the value untouched
//! - `custom` - run a field-level [`CustomSanitizer`]
//!
//! ## Field-paths
//!
//! Paths are object keys and array indices joined with `.`, e.g.
//! `user.profile.bio` or `tags.0`. A field rule applies to its own path and
//! to every descendant that has no rule of its own; a whitelist or blacklist
//! entry covers its path and all descendants.
//!
//! ## Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use xss_shield::prelude::*;
//!
//! let config = SanitizeConfig::builder()
//!     .field("post.body", FieldRule::allow_list(AllowList::tags(["p", "b"])))
//!     .blacklist(["password"])
//!     .on_sanitize(|path, before, after| tracing::info!(path, %before, %after, "sanitized"))
//!     .build()?;
//!
//! let body = json!({
//!     "title": "<script>alert(1)</script>Hello",
//!     "post": { "body": "<p><b>hi</b><img src=x onerror=alert(1)></p>" },
//!     "password": "<keep-as-is>"
//! });
//!
//! let clean = sanitize_target(body.as_object().unwrap(), &config)?;
//! assert_eq!(clean["title"], "Hello");
//! assert_eq!(clean["post"]["body"], "<p><b>hi</b></p>");
//! assert_eq!(clean["password"], "<keep-as-is>");
//! ```
//!
//! ## Errors
//!
//! Exceeding `max_depth` and failing custom functions raise a
//! [`SanitizeError`]. By default the error is passed to `on_error`, logged,
//! and the failing node is kept unchanged. With `throw_on_error` the error
//! aborts the walk and is returned to the caller.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod array;
mod config;
mod error;
mod markup;
mod mode;
mod notify;
mod policy;
mod presets;
mod targets;
mod transform;
mod walker;

pub use config::{
    ArrayStrategy, FieldRule, OnError, OnSanitize, OnSkip, SanitizeConfig, SanitizeConfigBuilder,
    DEFAULT_MAX_DEPTH,
};
pub use error::{BoxError, ConfigError, ErrorReport, Result, SanitizeError};
pub use markup::{AmmoniaSanitizer, Markup, MarkupSanitizer};
pub use mode::{AllowList, CustomSanitizer, Mode};
pub use presets::{Preset, UnknownPreset};
pub use targets::{RequestTargets, SanitizedTargets, Sanitizer, Target, UnknownTarget};
pub use walker::{sanitize_json, sanitize_target};

/// Prelude module for sanitization
pub mod prelude {
    pub use crate::config::{ArrayStrategy, FieldRule, SanitizeConfig};
    pub use crate::error::{ConfigError, SanitizeError};
    pub use crate::mode::{AllowList, CustomSanitizer, Mode};
    pub use crate::presets::Preset;
    pub use crate::targets::{RequestTargets, SanitizedTargets, Sanitizer, Target};
    pub use crate::walker::{sanitize_json, sanitize_target};
}
