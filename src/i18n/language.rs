//! Request-scoped language state.
//!
//! `ActiveLanguage` carries everything the resolver decided for one request:
//! the language code, the code for the message-translation subsystem, the
//! locale to format with, and the request path before and after the language
//! segment was stripped. It is threaded through the request (in axum, as a
//! request extension) instead of living in process-wide globals, so concurrent
//! requests never see each other's language.

use crate::i18n::{LanguageEntry, LanguageRegistry, Locale};

/// The language chosen for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveLanguage {
    code: Option<String>,
    i18n_code: Option<String>,
    locale: Option<Locale>,
    uri: String,
    original_uri: String,
}

impl ActiveLanguage {
    /// State for a request whose language has not been resolved yet.
    pub fn for_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self {
            original_uri: uri.clone(),
            uri,
            ..Self::default()
        }
    }

    /// The resolved code, or `None` before resolution.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The resolved code, falling back to the registry default.
    pub fn code_or_default<'a>(&'a self, registry: &'a LanguageRegistry) -> &'a str {
        self.code().unwrap_or_else(|| registry.default_language())
    }

    /// Code for message-translation lookups (may differ from the URI code).
    pub fn i18n_code(&self) -> Option<&str> {
        self.i18n_code.as_deref()
    }

    /// Locale identifier(s) the caller should format with.
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Request path with the language segment removed.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Request path exactly as received.
    pub fn original_uri(&self) -> &str {
        &self.original_uri
    }

    pub(crate) fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }

    pub(crate) fn apply(&mut self, entry: &LanguageEntry) {
        self.code = Some(entry.code.clone());
        self.i18n_code = Some(entry.i18n_code.clone());
        self.locale = Some(entry.locale.clone());
    }

    /// Take over the language of the top-level request `parent`.
    pub(crate) fn inherit(&mut self, parent: &ActiveLanguage) {
        self.code = parent.code.clone();
        self.i18n_code = parent.i18n_code.clone();
        self.locale = parent.locale.clone();
    }

    pub fn is_resolved(&self) -> bool {
        self.code.is_some()
    }
}
