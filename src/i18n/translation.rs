//! Per-language translations of a single piece of content.
//!
//! A `TranslationMap` always holds exactly one slot per configured language.
//! Slots start out untranslated (`None`) and can be overwritten but never
//! removed, so code iterating a map can rely on every language being present.

use crate::i18n::{LangError, LangResult, LanguageRegistry};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationMap {
    slots: Vec<(String, Option<String>)>,
}

impl TranslationMap {
    /// An untranslated map with one slot per registry language.
    pub fn new(registry: &LanguageRegistry) -> Self {
        Self {
            slots: registry.codes().map(|code| (code.to_string(), None)).collect(),
        }
    }

    /// A map pre-filled from `values`.
    ///
    /// Entries for languages the registry does not know are dropped.
    pub fn with_values<K, V, I>(registry: &LanguageRegistry, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::new(registry);
        for (code, value) in values {
            let code = code.as_ref();
            if let Some(slot) = map.slot_mut(code) {
                *slot = Some(value.into());
            } else {
                warn!("Dropping translation for unavailable language '{}'", code);
            }
        }
        map
    }

    /// Like `with_values`, but unknown languages are an error.
    pub fn try_with_values<K, V, I>(registry: &LanguageRegistry, values: I) -> LangResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::new(registry);
        for (code, value) in values {
            map.set(code.as_ref(), value)?;
        }
        Ok(map)
    }

    /// Rebuild a map from its JSON object encoding.
    ///
    /// Values must be strings or null. Unknown languages are dropped.
    ///
    /// # Errors
    /// `LangError::InvalidJson` if `json` does not parse, and
    /// `LangError::NotAString` if it is not an object of strings and nulls.
    pub fn from_json(registry: &LanguageRegistry, json: &str) -> LangResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| LangError::InvalidJson(e.to_string()))?;
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(LangError::NotAString(format!(
                    "{} instead of an object of translations",
                    json_kind(&other)
                )))
            }
        };

        let mut map = Self::new(registry);
        for (code, value) in &object {
            if !map.contains(code) {
                warn!("Dropping translation for unavailable language '{}'", code);
                continue;
            }
            match value {
                Value::Null => map.clear(code)?,
                other => map.set_value(code, other)?,
            }
        }
        Ok(map)
    }

    fn slot(&self, code: &str) -> LangResult<&Option<String>> {
        self.slots
            .iter()
            .find(|(key, _)| key == code)
            .map(|(_, value)| value)
            .ok_or_else(|| LangError::UnavailableLanguage(code.to_string()))
    }

    fn slot_mut(&mut self, code: &str) -> Option<&mut Option<String>> {
        self.slots
            .iter_mut()
            .find(|(key, _)| key == code)
            .map(|(_, value)| value)
    }

    /// The translation for `code`; `None` when untranslated.
    ///
    /// # Errors
    /// `LangError::UnavailableLanguage` for unknown languages.
    pub fn get(&self, code: &str) -> LangResult<Option<&str>> {
        self.slot(code).map(|value| value.as_deref())
    }

    /// Whether `code` has a slot in this map.
    pub fn contains(&self, code: &str) -> bool {
        self.slots.iter().any(|(key, _)| key == code)
    }

    /// Whether `code` has a non-null translation.
    pub fn is_translated(&self, code: &str) -> bool {
        matches!(self.get(code), Ok(Some(_)))
    }

    /// Overwrite the translation for `code`.
    pub fn set(&mut self, code: &str, value: impl Into<String>) -> LangResult<()> {
        let slot = self
            .slot_mut(code)
            .ok_or_else(|| LangError::UnavailableLanguage(code.to_string()))?;
        *slot = Some(value.into());
        Ok(())
    }

    /// Overwrite the translation for `code` from a dynamically typed value.
    ///
    /// # Errors
    /// `LangError::UnavailableLanguage` for unknown languages and
    /// `LangError::NotAString` for anything but a JSON string.
    pub fn set_value(&mut self, code: &str, value: &Value) -> LangResult<()> {
        if !self.contains(code) {
            return Err(LangError::UnavailableLanguage(code.to_string()));
        }
        match value {
            Value::String(text) => self.set(code, text.as_str()),
            other => Err(LangError::NotAString(json_kind(other).to_string())),
        }
    }

    /// Reset `code` to untranslated.
    pub fn clear(&mut self, code: &str) -> LangResult<()> {
        let slot = self
            .slot_mut(code)
            .ok_or_else(|| LangError::UnavailableLanguage(code.to_string()))?;
        *slot = None;
        Ok(())
    }

    /// Slots cannot be removed; this always fails.
    pub fn unset(&mut self, code: &str) -> LangResult<()> {
        Err(LangError::ImmutableKey(code.to_string()))
    }

    /// Number of slots, i.e. the number of configured languages.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `(code, translation)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.slots
            .iter()
            .map(|(code, value)| (code.as_str(), value.as_deref()))
    }

    /// JSON object with every slot, nulls included.
    pub fn to_json(&self) -> String {
        // Keys are strings and values strings or null: encoding cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for TranslationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (code, value) in &self.slots {
            map.serialize_entry(code, value)?;
        }
        map.end()
    }
}

impl fmt::Display for TranslationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl<'a> IntoIterator for &'a TranslationMap {
    type Item = (&'a str, Option<&'a str>);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, Option<&'a str>)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
