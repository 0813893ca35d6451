//! Observer notifications and failure containment.
//!
//! All sanitize/skip events and every failure raised during a walk pass
//! through a [`Channel`]. Failures are either reported to `on_error` and
//! swallowed, or handed back for propagation when `throw_on_error` is set.

use crate::config::SanitizeConfig;
use crate::error::SanitizeError;
use serde_json::Value;

/// Borrowed view of the observers of one configuration.
#[derive(Clone, Copy)]
pub(crate) struct Channel<'a> {
    config: &'a SanitizeConfig,
}

impl<'a> Channel<'a> {
    pub(crate) fn new(config: &'a SanitizeConfig) -> Self {
        Self { config }
    }

    pub(crate) fn sanitized(&self, path: &str, original: &Value, result: &Value) {
        tracing::trace!(path, "value sanitized");
        if let Some(on_sanitize) = &self.config.on_sanitize {
            on_sanitize(path, original, result);
        }
    }

    pub(crate) fn skipped(&self, path: &str, value: &Value) {
        tracing::trace!(path, "value skipped");
        if let Some(on_skip) = &self.config.on_skip {
            on_skip(path, value);
        }
    }

    /// Contain `error` raised at or below `path`.
    ///
    /// Returns `Ok(())` when the failure was reported and traversal should
    /// continue with the node's original value, or the error itself when it
    /// must propagate. A propagating error passes through here once per
    /// ancestor on its way up.
    pub(crate) fn contain(&self, error: SanitizeError, path: &str) -> Result<(), SanitizeError> {
        if self.config.throw_on_error {
            return Err(error);
        }

        tracing::warn!(path, code = error.code(), error = %error, "sanitization failure contained");
        if let Some(on_error) = &self.config.on_error {
            on_error(&error, path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    fn depth_error(path: &str) -> SanitizeError {
        SanitizeError::DepthExceeded {
            path: path.to_string(),
            max_depth: 1,
        }
    }

    #[test]
    fn contain_reports_and_swallows_by_default() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let config = SanitizeConfig::builder()
            .on_error(move |err, path| {
                sink.lock().unwrap().push((err.code(), path.to_string()));
            })
            .build()
            .unwrap();

        let channel = Channel::new(&config);
        assert!(channel.contain(depth_error("a.b"), "a.b").is_ok());
        assert_eq!(*seen.lock().unwrap(), vec![("depth_exceeded", "a.b".to_string())]);
    }

    #[test]
    fn contain_propagates_in_strict_mode() {
        let called = Arc::new(Mutex::new(false));
        let flag = called.clone();
        let config = SanitizeConfig::builder()
            .throw_on_error(true)
            .on_error(move |_, _| *flag.lock().unwrap() = true)
            .build()
            .unwrap();

        let err = Channel::new(&config)
            .contain(depth_error("x"), "x")
            .unwrap_err();
        assert_eq!(err.path(), "x");
        assert!(!*called.lock().unwrap());
    }

    #[test]
    fn observers_are_optional() {
        let config = SanitizeConfig::default();
        let channel = Channel::new(&config);
        channel.sanitized("a", &json!("<b>x</b>"), &json!("x"));
        channel.skipped("a", &json!(1));
        assert!(channel.contain(depth_error("a"), "a").is_ok());
    }

    #[test]
    fn observers_receive_arguments() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let on_sanitize = events.clone();
        let on_skip = events.clone();
        let config = SanitizeConfig::builder()
            .on_sanitize(move |path, original, result| {
                on_sanitize
                    .lock()
                    .unwrap()
                    .push(format!("sanitize {path} {original} {result}"));
            })
            .on_skip(move |path, value| {
                on_skip.lock().unwrap().push(format!("skip {path} {value}"));
            })
            .build()
            .unwrap();

        let channel = Channel::new(&config);
        channel.skipped("a", &json!(1));
        channel.sanitized("b", &json!("<i>x</i>"), &json!("x"));

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "skip a 1".to_string(),
                r#"sanitize b "<i>x</i>" "x""#.to_string(),
            ]
        );
    }

    /// Event captured by [`EventCapture`].
    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level: tracing::Level,
        fields: HashMap<String, String>,
    }

    /// Layer that records every event emitted while it is installed.
    #[derive(Clone, Default)]
    struct EventCapture {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    impl EventCapture {
        fn at(&self, level: tracing::Level) -> Vec<CapturedEvent> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|event| event.level == level)
                .cloned()
                .collect()
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut fields = HashMap::new();
            event.record(&mut FieldVisitor { fields: &mut fields });
            self.events.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                fields,
            });
        }
    }

    struct FieldVisitor<'a> {
        fields: &'a mut HashMap<String, String>,
    }

    impl tracing::field::Visit for FieldVisitor<'_> {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.fields.insert(field.name().to_string(), format!("{value:?}"));
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    #[test]
    fn contained_failure_is_logged_as_warning() {
        let capture = EventCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let config = SanitizeConfig::default();
        assert!(Channel::new(&config)
            .contain(depth_error("a.b"), "a.b")
            .is_ok());

        let warnings = capture.at(tracing::Level::WARN);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].fields["path"], "a.b");
        assert_eq!(warnings[0].fields["code"], "depth_exceeded");
        assert_eq!(
            warnings[0].fields["message"],
            "sanitization failure contained"
        );
    }

    #[test]
    fn propagated_failure_is_not_logged_as_warning() {
        let capture = EventCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let config = SanitizeConfig::builder()
            .throw_on_error(true)
            .build()
            .unwrap();
        assert!(Channel::new(&config)
            .contain(depth_error("x"), "x")
            .is_err());

        assert!(capture.at(tracing::Level::WARN).is_empty());
    }
}
