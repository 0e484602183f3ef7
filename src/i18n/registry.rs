//! Language registry: the configured set of languages a site is served in.
//!
//! The registry is built once at startup from the language configuration
//! (`default`, `cookie` and `langs`) and is read-only afterwards. It is shared
//! between requests through an `Arc` instead of a process-wide singleton.

use crate::i18n::{LangError, LangResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Locale identifier(s) applied when a language becomes active.
///
/// Configuration may give either a single name (`"fr_FR.utf-8"`) or an
/// ordered list of candidates to try in turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locale {
    One(String),
    Many(Vec<String>),
}

impl Locale {
    /// All identifiers in preference order.
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            Locale::One(name) => vec![name.as_str()],
            Locale::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// The most preferred identifier, if any.
    pub fn primary(&self) -> Option<&str> {
        self.identifiers().into_iter().next()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Many(Vec::new())
    }
}

/// A configured language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    /// Code used in URIs, cookies and headers (e.g., "en", "fr")
    pub code: String,

    /// Display name (e.g., "English", "Français")
    pub name: String,

    /// Code handed to the message-translation subsystem
    pub i18n_code: String,

    /// Locale identifier(s) for locale-aware formatting
    pub locale: Locale,
}

/// Raw language configuration as found in the config file.
///
/// Every field is optional here so that a missing key can be reported by
/// name instead of as a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LangSettings {
    pub default: Option<String>,
    pub cookie: Option<String>,
    pub langs: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct EntrySettings {
    name: String,
    #[serde(default)]
    i18n_code: Option<String>,
    #[serde(default)]
    locale: Locale,
}

/// The set of available languages plus the default and the cookie key.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    default_code: String,
    cookie_key: String,
    entries: Vec<LanguageEntry>,
}

impl LanguageRegistry {
    /// Build a registry from a JSON configuration value.
    ///
    /// # Errors
    /// `LangError::Configuration` if `langs`, `default` or `cookie` is
    /// missing, if `langs` is empty or malformed, or if the default language
    /// is not one of `langs`.
    pub fn load(config: &Value) -> LangResult<Self> {
        let settings: LangSettings = serde_json::from_value(config.clone())
            .map_err(|e| LangError::Configuration(e.to_string()))?;
        Self::from_settings(settings)
    }

    /// Read a JSON configuration file and build a registry from it.
    pub fn from_file(path: impl AsRef<Path>) -> LangResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LangError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            LangError::Configuration(format!("cannot parse {}: {}", path.display(), e))
        })?;
        Self::load(&value)
    }

    /// Build a registry from already-deserialized settings.
    pub fn from_settings(settings: LangSettings) -> LangResult<Self> {
        let langs = settings.langs.ok_or_else(|| {
            LangError::Configuration(
                "missing 'langs': configure the list of available languages".into(),
            )
        })?;
        let default = settings.default.ok_or_else(|| {
            LangError::Configuration("missing 'default': configure a default language".into())
        })?;
        let cookie = settings.cookie.ok_or_else(|| {
            LangError::Configuration("missing 'cookie': configure the cookie key".into())
        })?;

        if langs.is_empty() {
            return Err(LangError::Configuration(
                "'langs' must list at least one language".into(),
            ));
        }

        let mut entries: Vec<LanguageEntry> = Vec::with_capacity(langs.len());
        for (key, raw) in langs {
            let code = key.trim().to_lowercase();
            if code.is_empty() {
                return Err(LangError::Configuration("empty language code in 'langs'".into()));
            }
            if entries.iter().any(|e| e.code == code) {
                return Err(LangError::Configuration(format!(
                    "language '{}' is configured more than once",
                    code
                )));
            }
            let entry: EntrySettings = serde_json::from_value(raw).map_err(|e| {
                LangError::Configuration(format!("language '{}': {}", code, e))
            })?;
            entries.push(LanguageEntry {
                i18n_code: entry.i18n_code.unwrap_or_else(|| code.clone()),
                name: entry.name,
                locale: entry.locale,
                code,
            });
        }

        let default_code = default.trim().to_lowercase();
        if !entries.iter().any(|e| e.code == default_code) {
            return Err(LangError::Configuration(format!(
                "default language '{}' is not in 'langs'",
                default
            )));
        }

        debug!(
            "Loaded {} languages (default: {}, cookie: {})",
            entries.len(),
            default_code,
            cookie
        );

        Ok(Self {
            default_code,
            cookie_key: cookie,
            entries,
        })
    }

    /// Get a language entry by its code.
    pub fn get(&self, code: &str) -> Option<&LanguageEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Check if a language code is configured.
    pub fn is_available(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// All configured languages, in configuration order.
    pub fn list_languages(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// `(code, name)` pairs, in configuration order.
    pub fn list_language_names(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.code.as_str(), entry.name.as_str()))
            .collect()
    }

    /// Display name of a configured language.
    ///
    /// # Errors
    /// `LangError::UnavailableLanguage` if the code is not configured.
    pub fn language_name(&self, code: &str) -> LangResult<&str> {
        self.get(code)
            .map(|entry| entry.name.as_str())
            .ok_or_else(|| LangError::UnavailableLanguage(code.to_string()))
    }

    /// Iterate over the configured codes in configuration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.code.as_str())
    }

    pub fn default_language(&self) -> &str {
        &self.default_code
    }

    /// Name of the cookie that remembers the chosen language.
    pub fn cookie_key(&self) -> &str {
        &self.cookie_key
    }

    /// Number of configured languages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a successfully loaded registry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
