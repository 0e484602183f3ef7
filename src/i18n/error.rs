//! Error type shared by the language registry, resolver and translation map.

use thiserror::Error;

/// Errors raised by the i18n layer.
///
/// None of these are retried: they are configuration or programming errors
/// and are surfaced to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LangError {
    /// Required language configuration is missing or inconsistent.
    #[error("invalid language configuration: {0}")]
    Configuration(String),

    /// The language code is not one of the configured languages.
    #[error("the specified language is not available: '{0}'")]
    UnavailableLanguage(String),

    /// A translation slot was assigned something other than a string.
    #[error("a translation should be a string, got {0}")]
    NotAString(String),

    /// Serialized translations could not be parsed at all.
    #[error("invalid translations JSON: {0}")]
    InvalidJson(String),

    /// A translation slot was removed. Slots can only be overwritten.
    #[error("cannot unset the '{0}' translation")]
    ImmutableKey(String),
}

pub type LangResult<T> = std::result::Result<T, LangError>;
