//! Field-path policy resolution.
//!
//! Given a dotted field-path, decide whether the field is in scope and which
//! mode applies. Field rules are looked up by exact path first, then by the
//! nearest ancestor path, then the configuration default is used.

use crate::config::{FieldRule, SanitizeConfig};
use crate::mode::{AllowList, CustomSanitizer, Mode};

/// Resolved action for one node.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Action<'a> {
    Skip,
    StripAll,
    AllowList(&'a AllowList),
    Custom(&'a CustomSanitizer),
}

/// Outcome of policy resolution for one field-path.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Resolution<'a> {
    /// Excluded by the whitelist or the blacklist.
    OutOfScope,
    Apply(Action<'a>),
}

/// `true` if `path` equals `entry` or lies below it.
pub(crate) fn matches_prefix(path: &str, entry: &str) -> bool {
    path.strip_prefix(entry)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

pub(crate) fn in_scope(path: &str, config: &SanitizeConfig) -> bool {
    if !config.whitelist.is_empty() {
        return config
            .whitelist
            .iter()
            .any(|entry| matches_prefix(path, entry));
    }
    if !config.blacklist.is_empty() {
        return !config
            .blacklist
            .iter()
            .any(|entry| matches_prefix(path, entry));
    }
    true
}

/// Find the rule for `path`: exact match, else the deepest ancestor with a rule.
pub(crate) fn find_rule<'a>(path: &str, config: &'a SanitizeConfig) -> Option<&'a FieldRule> {
    if let Some(rule) = config.fields.get(path) {
        return Some(rule);
    }
    let mut ancestor = path;
    while let Some((parent, _)) = ancestor.rsplit_once('.') {
        if let Some(rule) = config.fields.get(parent) {
            return Some(rule);
        }
        ancestor = parent;
    }
    None
}

pub(crate) fn resolve<'a>(path: &str, config: &'a SanitizeConfig) -> Resolution<'a> {
    if !in_scope(path, config) {
        return Resolution::OutOfScope;
    }

    let action = match find_rule(path, config) {
        Some(rule) => rule_action(path, rule, config),
        None => default_action(config),
    };
    Resolution::Apply(action)
}

fn rule_action<'a>(path: &str, rule: &'a FieldRule, config: &'a SanitizeConfig) -> Action<'a> {
    match rule.mode {
        Mode::StripAll => Action::StripAll,
        Mode::Skip => Action::Skip,
        Mode::AllowList => Action::AllowList(
            rule.allow_list
                .as_ref()
                .or(config.allow_list.as_ref())
                .unwrap_or(default_allow_list()),
        ),
        Mode::Custom => match &rule.custom {
            Some(custom) => Action::Custom(custom),
            None => {
                tracing::warn!(path, "custom field rule has no sanitizer; skipping field");
                Action::Skip
            }
        },
    }
}

fn default_action(config: &SanitizeConfig) -> Action<'_> {
    match config.mode {
        Mode::StripAll => Action::StripAll,
        Mode::AllowList => {
            Action::AllowList(config.allow_list.as_ref().unwrap_or(default_allow_list()))
        }
        Mode::Skip => Action::Skip,
        Mode::Custom => {
            tracing::warn!("custom is not a valid default mode; skipping field");
            Action::Skip
        }
    }
}

fn default_allow_list() -> &'static AllowList {
    static DEFAULT: AllowList = AllowList {
        tags: None,
        generic_attributes: None,
        tag_attributes: None,
        url_schemes: None,
        clean_content_tags: None,
        strip_comments: None,
    };
    &DEFAULT
}
