//! Key-checked translation lookups with a fallback chain.
//!
//! A [`Translator<R>`] owns the resource for the active locale and,
//! optionally, a fallback resource (usually the base locale). Lookups take
//! a [`KeyPath<R>`], so only keys declared for shape `R` compile.
//!
//! # Failure Modes
//!
//! A key can still miss at run time when a locale file has drifted from
//! the declared shape. [`Translator::try_translate`] surfaces that as
//! [`KeyNotFound`]. [`Translator::translate`] never fails: it tries the
//! fallback resource, then renders according to the configured
//! [`MissingKeyPolicy`], and logs each miss at `warn`.

use std::borrow::Cow;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::config::{MissingKeyPolicy, TranslatorConfig};
use crate::conformance::{ConformanceReport, conformance};
use crate::error::KeyNotFound;
use crate::interpolate::interpolate;
use crate::keys::{KeyPath, ResourceShape};
use crate::resource::NestedResource;

/// Resolves typed keys against a locale's resource.
#[derive(Debug, Clone)]
pub struct Translator<R> {
    locale: String,
    resource: NestedResource,
    fallback: Option<(String, NestedResource)>,
    config: TranslatorConfig,
    shape: PhantomData<fn() -> R>,
}

impl<R: ResourceShape> Translator<R> {
    /// Create a translator for `locale` with the default configuration.
    pub fn new(locale: impl Into<String>, resource: NestedResource) -> Self {
        Self {
            locale: locale.into(),
            resource,
            fallback: None,
            config: TranslatorConfig::default(),
            shape: PhantomData,
        }
    }

    /// Consult `resource` (for `locale`) when the active resource misses.
    #[must_use]
    pub fn with_fallback(mut self, locale: impl Into<String>, resource: NestedResource) -> Self {
        self.fallback = Some((locale.into(), resource));
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: TranslatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Active locale tag.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// The active resource.
    #[must_use]
    pub fn resource(&self) -> &NestedResource {
        &self.resource
    }

    /// Look `key` up in the active resource only.
    pub fn try_translate(&self, key: KeyPath<R>) -> Result<&str, KeyNotFound> {
        self.resource.resolve(key.as_str())
    }

    /// Look `key` up, falling back instead of failing.
    pub fn translate(&self, key: KeyPath<R>) -> Cow<'_, str> {
        self.lookup(key.as_str())
    }

    /// Look `key` up and substitute `{name}` placeholders from `args`.
    pub fn translate_with(&self, key: KeyPath<R>, args: &[(&str, &str)]) -> String {
        let template = self.translate(key);
        interpolate(&template, args).into_owned()
    }

    /// Look up a path only known at run time.
    ///
    /// Undeclared paths are treated like misses; this is the escape hatch
    /// for keys built from data, and it is logged when it fails.
    pub fn translate_dynamic(&self, path: &str) -> Cow<'_, str> {
        if !R::contains(path) {
            debug!(locale = %self.locale, key = path, "dynamic key not declared by shape");
        }
        self.lookup(path)
    }

    /// Compare the active resource against the declared shape.
    #[must_use]
    pub fn validate(&self) -> ConformanceReport {
        conformance::<R>(&self.resource)
    }

    fn lookup(&self, path: &str) -> Cow<'_, str> {
        let miss = match self.resource.resolve(path) {
            Ok(text) => return Cow::Borrowed(text),
            Err(miss) => miss,
        };

        if self.config.use_fallback
            && let Some((fallback_locale, fallback)) = &self.fallback
            && let Ok(text) = fallback.resolve(path)
        {
            if self.config.log_missing_keys {
                warn!(
                    locale = %self.locale,
                    fallback_locale = %fallback_locale,
                    key = path,
                    "translation missing; using fallback locale"
                );
            }
            return Cow::Borrowed(text);
        }

        if self.config.log_missing_keys {
            warn!(
                locale = %self.locale,
                key = path,
                error = %miss,
                "translation missing; applying missing-key policy"
            );
        }
        match &self.config.missing_key_policy {
            MissingKeyPolicy::ShowPath => Cow::Owned(miss.path),
            MissingKeyPolicy::Placeholder { text } => Cow::Borrowed(text.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    crate::key_paths! {
        Ui in ui {
            auth: { sign_in, sign_out },
            greeting,
            farewell,
        }
    }

    fn english() -> NestedResource {
        NestedResource::from_json_str(
            r#"{"auth": {"sign_in": "Sign in", "sign_out": "Sign out"},
                "greeting": "Hello, {name}!", "farewell": "Bye"}"#,
        )
        .unwrap()
    }

    fn german_partial() -> NestedResource {
        NestedResource::from_json_str(r#"{"auth": {"sign_in": "Anmelden"}, "greeting": "Hallo, {name}!"}"#)
            .unwrap()
    }

    #[derive(Default)]
    struct MessageVisitor {
        message: Option<String>,
        key: Option<String>,
    }

    impl Visit for MessageVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "key" {
                self.key = Some(value.to_string());
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.message = Some(format!("{value:?}"));
            }
        }
    }

    #[derive(Clone, Default)]
    struct WarnCapture {
        events: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl<S: tracing::Subscriber> Layer<S> for WarnCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() != tracing::Level::WARN {
                return;
            }
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            self.events.lock().expect("capture lock").push((
                visitor.key.unwrap_or_default(),
                visitor.message.unwrap_or_default(),
            ));
        }
    }

    fn capture_warnings(run: impl FnOnce()) -> Vec<(String, String)> {
        let capture = WarnCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        tracing::subscriber::with_default(subscriber, run);
        let events = capture.events.lock().expect("capture lock").clone();
        events
    }

    #[test]
    fn translates_declared_keys() {
        let t = Translator::<Ui>::new("en", english());
        assert_eq!(t.translate(ui::auth::sign_in), "Sign in");
        assert_eq!(t.try_translate(ui::farewell), Ok("Bye"));
        assert_eq!(t.locale(), "en");
    }

    #[test]
    fn try_translate_surfaces_drift() {
        let t = Translator::<Ui>::new("de", german_partial());
        assert_eq!(
            t.try_translate(ui::farewell),
            Err(KeyNotFound::new("farewell"))
        );
    }

    #[test]
    fn falls_back_to_base_locale() {
        let t = Translator::<Ui>::new("de", german_partial()).with_fallback("en", english());
        assert_eq!(t.translate(ui::auth::sign_in), "Anmelden");
        assert_eq!(t.translate(ui::auth::sign_out), "Sign out");
    }

    #[test]
    fn shows_path_when_nothing_resolves() {
        let t = Translator::<Ui>::new("de", german_partial());
        assert_eq!(t.translate(ui::farewell), "farewell");
    }

    #[test]
    fn placeholder_policy() {
        let config = TranslatorConfig::default()
            .missing_key_policy(MissingKeyPolicy::Placeholder { text: "??".into() });
        let t = Translator::<Ui>::new("de", german_partial()).with_config(config);
        assert_eq!(t.translate(ui::auth::sign_out), "??");
    }

    #[test]
    fn fallback_can_be_disabled() {
        let t = Translator::<Ui>::new("de", german_partial())
            .with_fallback("en", english())
            .with_config(TranslatorConfig::default().use_fallback(false));
        assert_eq!(t.translate(ui::auth::sign_out), "auth.sign_out");
    }

    #[test]
    fn interpolates_arguments() {
        let t = Translator::<Ui>::new("en", english());
        assert_eq!(t.translate_with(ui::greeting, &[("name", "Ada")]), "Hello, Ada!");
    }

    #[test]
    fn dynamic_lookup_uses_same_policy() {
        let t = Translator::<Ui>::new("en", english());
        assert_eq!(t.translate_dynamic("auth.sign_out"), "Sign out");
        assert_eq!(t.translate_dynamic("auth"), "auth");
        assert_eq!(t.translate_dynamic("nope.nothing"), "nope.nothing");
    }

    #[test]
    fn miss_is_logged() {
        let t = Translator::<Ui>::new("de", german_partial());
        let warnings = capture_warnings(|| {
            t.translate(ui::farewell);
        });
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].0, "farewell");
        assert!(warnings[0].1.contains("missing-key policy"));
    }

    #[test]
    fn fallback_hit_is_logged() {
        let t = Translator::<Ui>::new("de", german_partial()).with_fallback("en", english());
        let warnings = capture_warnings(|| {
            t.translate(ui::farewell);
        });
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].1.contains("fallback locale"));
    }

    #[test]
    fn logging_can_be_disabled() {
        let t = Translator::<Ui>::new("de", german_partial())
            .with_config(TranslatorConfig::default().log_missing_keys(false));
        let warnings = capture_warnings(|| {
            t.translate(ui::farewell);
        });
        assert!(warnings.is_empty());
    }

    #[test]
    fn hit_is_not_logged() {
        let t = Translator::<Ui>::new("en", english());
        let warnings = capture_warnings(|| {
            t.translate(ui::greeting);
        });
        assert!(warnings.is_empty());
    }

    #[test]
    fn validate_reports_drift() {
        let report = Translator::<Ui>::new("de", german_partial()).validate();
        assert_eq!(report.missing, vec!["auth.sign_out", "farewell"]);
        assert!(Translator::<Ui>::new("en", english()).validate().is_conforming());
    }
}
