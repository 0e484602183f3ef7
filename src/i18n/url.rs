//! Outbound URL generation with a language segment.
//!
//! The inverse of the resolver's URI stripping: given a site path, prepend
//! the active (or an explicit) language code so that following the link
//! resolves to that language again.

use crate::i18n::{ActiveLanguage, LangError, LangResult, LanguageRegistry};
use std::sync::Arc;

/// Which language segment to put in front of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LangTarget {
    /// The request's active language
    Current,
    /// A specific configured language
    Code(String),
    /// No language segment
    None,
}

impl From<&str> for LangTarget {
    fn from(code: &str) -> Self {
        LangTarget::Code(code.to_string())
    }
}

/// Turns a site path into a full URL.
pub trait UrlBuilder {
    /// `protocol` of `None` yields a relative URL. Implementations without
    /// a known host also return a relative URL and ignore `protocol`.
    fn site(&self, path: &str, protocol: Option<&str>, include_index: bool) -> String;
}

/// Builds URLs below a base path, optionally with an index file and host.
///
/// Absolute URLs need both a protocol and `host`; without a host the
/// protocol is ignored.
#[derive(Debug, Clone)]
pub struct SiteUrl {
    pub base_url: String,
    pub index_file: String,
    pub host: Option<String>,
}

impl SiteUrl {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            index_file: String::new(),
            host: None,
        }
    }

    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

impl UrlBuilder for SiteUrl {
    fn site(&self, path: &str, protocol: Option<&str>, include_index: bool) -> String {
        let mut url = String::new();

        if let (Some(protocol), Some(host)) = (protocol, self.host.as_deref()) {
            url.push_str(protocol);
            url.push_str("://");
            url.push_str(host.trim_end_matches('/'));
        }

        url.push('/');
        let base = self.base_url.trim_matches('/');
        if !base.is_empty() {
            url.push_str(base);
            url.push('/');
        }

        if include_index && !self.index_file.is_empty() {
            url.push_str(self.index_file.trim_matches('/'));
            url.push('/');
        }

        url.push_str(path.trim_start_matches('/'));
        url
    }
}

/// Prepends language segments to site paths.
#[derive(Debug, Clone)]
pub struct UrlLanguagePrefixer<B> {
    registry: Arc<LanguageRegistry>,
    builder: B,
}

impl<B: UrlBuilder> UrlLanguagePrefixer<B> {
    pub fn new(registry: Arc<LanguageRegistry>, builder: B) -> Self {
        Self { registry, builder }
    }

    /// The site path with the requested language segment, before the URL
    /// builder sees it.
    ///
    /// An empty `path` stands for the current request's path (language
    /// segment already stripped), which makes `prefix_path(active, "",
    /// "fr".into())` a link to the same page in French.
    ///
    /// # Errors
    /// `LangError::UnavailableLanguage` if `target` names an unknown code.
    pub fn prefix_path(
        &self,
        active: &ActiveLanguage,
        path: &str,
        target: &LangTarget,
    ) -> LangResult<String> {
        let path = if path.is_empty() { active.uri() } else { path };
        let path = path.trim_start_matches('/');

        let code = match target {
            LangTarget::Current => active.code_or_default(&self.registry),
            LangTarget::Code(code) => {
                if !self.registry.is_available(code) {
                    return Err(LangError::UnavailableLanguage(code.clone()));
                }
                code.as_str()
            }
            LangTarget::None => return Ok(path.to_string()),
        };

        Ok(format!("{}/{}", code, path))
    }

    /// Full URL for `path` in the requested language.
    pub fn build_url(
        &self,
        active: &ActiveLanguage,
        path: &str,
        target: &LangTarget,
        protocol: Option<&str>,
        include_index: bool,
    ) -> LangResult<String> {
        let prefixed = self.prefix_path(active, path, target)?;
        Ok(self.builder.site(&prefixed, protocol, include_index))
    }

    /// `(code, name, url)` for every configured language, pointing at the
    /// current page.
    pub fn language_links(&self, active: &ActiveLanguage) -> LangResult<Vec<(String, String, String)>> {
        self.registry
            .list_languages()
            .iter()
            .map(|entry| {
                let url = self.build_url(
                    active,
                    "",
                    &LangTarget::Code(entry.code.clone()),
                    None,
                    true,
                )?;
                Ok((entry.code.clone(), entry.name.clone(), url))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::registry::tests::sample_registry;
    use crate::i18n::resolver::tests::{FakeCookies, FakeRequest};
    use crate::i18n::LanguageResolver;
    use proptest::prelude::*;

    fn prefixer() -> UrlLanguagePrefixer<SiteUrl> {
        UrlLanguagePrefixer::new(Arc::new(sample_registry()), SiteUrl::new("/"))
    }

    fn active_in(code: &str, uri: &str) -> ActiveLanguage {
        let resolver = LanguageResolver::new(Arc::new(sample_registry())).unwrap();
        let mut request = FakeRequest::new(&format!("{}/{}", code, uri));
        resolver
            .process(&mut request, &mut FakeCookies::default())
            .unwrap()
    }

    // ==================== prefix_path Tests ====================

    #[test]
    fn test_empty_path_uses_current_uri_and_language() {
        let active = active_in("fr", "foo");
        assert_eq!(
            prefixer().prefix_path(&active, "", &LangTarget::Current).unwrap(),
            "fr/foo"
        );
    }

    #[test]
    fn test_no_language_segment() {
        let active = active_in("fr", "foo");
        assert_eq!(
            prefixer().prefix_path(&active, "foo", &LangTarget::None).unwrap(),
            "foo"
        );
        assert_eq!(
            prefixer().prefix_path(&active, "/foo", &LangTarget::None).unwrap(),
            "foo"
        );
    }

    #[test]
    fn test_explicit_language() {
        let active = active_in("fr", "foo");
        assert_eq!(
            prefixer()
                .prefix_path(&active, "//bar/baz", &"de".into())
                .unwrap(),
            "de/bar/baz"
        );
    }

    #[test]
    fn test_explicit_unavailable_language() {
        let active = active_in("fr", "foo");
        assert_eq!(
            prefixer().prefix_path(&active, "bar", &"xx".into()),
            Err(LangError::UnavailableLanguage("xx".into()))
        );
    }

    #[test]
    fn test_current_before_resolution_uses_default() {
        let active = ActiveLanguage::for_uri("about");
        assert_eq!(
            prefixer().prefix_path(&active, "", &LangTarget::Current).unwrap(),
            "en/about"
        );
    }

    // ==================== build_url Tests ====================

    #[test]
    fn test_build_url_relative() {
        let active = active_in("de", "");
        let url = prefixer()
            .build_url(&active, "contact", &LangTarget::Current, None, true)
            .unwrap();
        assert_eq!(url, "/de/contact");
    }

    #[test]
    fn test_build_url_absolute_with_index() {
        let builder = SiteUrl::new("/app/")
            .with_index_file("index.php")
            .with_host("example.com");
        let prefixer = UrlLanguagePrefixer::new(Arc::new(sample_registry()), builder);
        let active = active_in("fr", "");

        assert_eq!(
            prefixer
                .build_url(&active, "news", &LangTarget::Current, Some("https"), true)
                .unwrap(),
            "https://example.com/app/index.php/fr/news"
        );
        assert_eq!(
            prefixer
                .build_url(&active, "news", &LangTarget::None, None, false)
                .unwrap(),
            "/app/news"
        );
    }

    #[test]
    fn test_language_links() {
        let active = active_in("fr", "about");
        let links = prefixer().language_links(&active).unwrap();
        assert_eq!(
            links,
            vec![
                ("en".to_string(), "English".to_string(), "/en/about".to_string()),
                ("fr".to_string(), "Français".to_string(), "/fr/about".to_string()),
                ("de".to_string(), "Deutsch".to_string(), "/de/about".to_string()),
            ]
        );
    }

    // ==================== Round trip ====================

    proptest! {
        #[test]
        fn prop_prefix_then_resolve_recovers_language_and_path(
            lang in prop::sample::select(vec!["en", "fr", "de"]),
            path in "[a-z0-9_]{1,8}(/[a-z0-9_]{1,8}){0,3}",
        ) {
            let prefixer = prefixer();
            let resolver = LanguageResolver::new(Arc::new(sample_registry())).unwrap();

            let prefixed = prefixer
                .prefix_path(&ActiveLanguage::default(), &path, &lang.into())
                .unwrap();
            let mut request = FakeRequest::new(&prefixed).with_header("de");
            let active = resolver
                .process(&mut request, &mut FakeCookies::with("lang", "fr"))
                .unwrap();

            prop_assert_eq!(active.code(), Some(lang));
            prop_assert_eq!(active.uri(), path.as_str());
        }
    }
}
