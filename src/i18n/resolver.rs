//! Language resolution for incoming requests.
//!
//! The language of a request is taken from, in order:
//!
//! 1. the first URI segment (`/fr/about`), which is then stripped from the URI
//! 2. the language cookie
//! 3. the `Accept-Language` header
//! 4. the registry default
//!
//! Whatever wins is stored in the request's `ActiveLanguage` and remembered
//! in the cookie.

use crate::i18n::{negotiate, ActiveLanguage, LangError, LangResult, LanguageRegistry};
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// The parts of an HTTP request the resolver needs.
pub trait LangRequest {
    /// Request path, with or without a leading `/`.
    fn uri(&self) -> &str;

    /// Replace the request path seen by routing.
    fn set_uri(&mut self, uri: &str);

    /// Raw `Accept-Language` header, if sent.
    fn accept_language(&self) -> Option<&str>;

    /// False for internal sub-requests, which never re-run resolution.
    fn is_initial_request(&self) -> bool {
        true
    }

    /// Client's best-weighted choice among `candidates`.
    fn preferred_language<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        self.accept_language()
            .and_then(|header| negotiate::preferred_language(header, candidates))
    }
}

/// Cookie storage scoped to a single request/response pair.
pub trait CookieStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Where a request's language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSource {
    Uri,
    Cookie,
    Header,
    Default,
}

impl LanguageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageSource::Uri => "uri",
            LanguageSource::Cookie => "cookie",
            LanguageSource::Header => "header",
            LanguageSource::Default => "default",
        }
    }
}

/// Decides the language of each request against a shared registry.
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    registry: Arc<LanguageRegistry>,
    segment: Regex,
}

impl LanguageResolver {
    /// Build a resolver for the languages in `registry`.
    ///
    /// # Errors
    /// `LangError::Configuration` if the URI pattern cannot be compiled.
    pub fn new(registry: Arc<LanguageRegistry>) -> LangResult<Self> {
        let alternation = registry
            .codes()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        let segment = Regex::new(&format!("(?i)^({})(?:/|$)", alternation))
            .map_err(|e| LangError::Configuration(format!("language URI pattern: {}", e)))?;

        Ok(Self { registry, segment })
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Split a path into `(code, remainder)` if it starts with a language
    /// segment. The code is lower-cased; one `/` after it is dropped.
    pub fn split_language_segment<'p>(&self, path: &'p str) -> Option<(String, &'p str)> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let captures = self.segment.captures(path)?;
        let code = captures.get(1)?;
        let rest = &path[code.end()..];
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        Some((code.as_str().to_lowercase(), rest))
    }

    /// Pick the candidate language for a request without applying it.
    ///
    /// Rewrites the request URI when the language came from it.
    pub fn detect<R, C>(&self, request: &mut R, cookies: &C) -> (String, LanguageSource)
    where
        R: LangRequest + ?Sized,
        C: CookieStore + ?Sized,
    {
        if let Some((code, rest)) = self.split_language_segment(request.uri()) {
            let rest = rest.to_string();
            request.set_uri(&rest);
            return (code, LanguageSource::Uri);
        }

        if let Some(code) = cookies
            .get(self.registry.cookie_key())
            .map(|value| value.to_lowercase())
            .filter(|value| self.registry.is_available(value))
        {
            return (code, LanguageSource::Cookie);
        }

        let codes: Vec<&str> = self.registry.codes().collect();
        if let Some(code) = request.preferred_language(&codes) {
            return (code.to_string(), LanguageSource::Header);
        }

        (
            self.registry.default_language().to_string(),
            LanguageSource::Default,
        )
    }

    /// Resolve the language of an initial request and apply it.
    ///
    /// Runs the full precedence chain, strips the language segment from the
    /// request URI and persists the choice in the cookie. Shorthand for
    /// `process_within(request, cookies, None)`.
    pub fn process<R, C>(&self, request: &mut R, cookies: &mut C) -> LangResult<ActiveLanguage>
    where
        R: LangRequest + ?Sized,
        C: CookieStore + ?Sized,
    {
        self.process_within(request, cookies, None)
    }

    /// Resolve the language of a request that may belong to `parent`.
    ///
    /// Sub-requests (`is_initial_request() == false`) are left alone: they
    /// take over the language of the top-level request they run under, or
    /// the default when there is none. Initial requests behave as `process`.
    pub fn process_within<R, C>(
        &self,
        request: &mut R,
        cookies: &mut C,
        parent: Option<&ActiveLanguage>,
    ) -> LangResult<ActiveLanguage>
    where
        R: LangRequest + ?Sized,
        C: CookieStore + ?Sized,
    {
        let original = request.uri().trim_start_matches('/').to_string();
        let mut active = ActiveLanguage::for_uri(original.as_str());

        if !request.is_initial_request() {
            match parent.filter(|parent| parent.is_resolved()) {
                Some(parent) => active.inherit(parent),
                None => {
                    if let Some(entry) = self.registry.get(self.registry.default_language()) {
                        active.apply(entry);
                    }
                }
            }
            return Ok(active);
        }

        let (code, source) = self.detect(request, cookies);
        active.set_uri(request.uri().trim_start_matches('/'));
        debug!(
            "Resolved language '{}' from {} for /{}",
            code,
            source.as_str(),
            original
        );

        self.resolve(&mut active, cookies, Some(&code))?;
        Ok(active)
    }

    /// Get or set the active language.
    ///
    /// With `None` this is a getter returning the active code, or the default
    /// when nothing is set yet. With `Some(code)` the language is applied to
    /// `active` and remembered in the cookie if it changed.
    ///
    /// # Errors
    /// `LangError::UnavailableLanguage` if `code` is not configured. Nothing
    /// is modified in that case.
    pub fn resolve<C>(
        &self,
        active: &mut ActiveLanguage,
        cookies: &mut C,
        code: Option<&str>,
    ) -> LangResult<String>
    where
        C: CookieStore + ?Sized,
    {
        let Some(code) = code else {
            return Ok(self.current(active).to_string());
        };

        let entry = self
            .registry
            .get(code)
            .ok_or_else(|| LangError::UnavailableLanguage(code.to_string()))?;

        active.apply(entry);

        let cookie_key = self.registry.cookie_key();
        if cookies.get(cookie_key).as_deref() != Some(code) {
            cookies.set(cookie_key, code);
        }

        Ok(entry.code.clone())
    }

    /// Active code, or the default when unresolved.
    pub fn current<'a>(&'a self, active: &'a ActiveLanguage) -> &'a str {
        active.code_or_default(&self.registry)
    }

    /// Display name of `code`, or of the active language when `None`.
    pub fn language_name(&self, active: &ActiveLanguage, code: Option<&str>) -> LangResult<&str> {
        let code = code.unwrap_or_else(|| self.current(active));
        self.registry.language_name(code)
    }
}
