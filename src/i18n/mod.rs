//! Internationalization (i18n) layer: language negotiation and localized content.
//!
//! # Architecture
//!
//! - `registry`: Configured languages, default language and cookie key
//! - `negotiate`: `Accept-Language` parsing and best-match selection
//! - `resolver`: Per-request language resolution and URI stripping
//! - `language`: Request-scoped `ActiveLanguage` state
//! - `url`: Outbound URLs with a language segment
//! - `view`: Language-specific view overrides
//! - `translation`: Fixed-key per-language translation container
//!
//! # Example
//!
//! ```rust,ignore
//! use site_lang::i18n::{LangTarget, LanguageRegistry, LanguageResolver};
//!
//! let registry = Arc::new(LanguageRegistry::from_file("config/lang.json")?);
//! let resolver = LanguageResolver::new(Arc::clone(&registry))?;
//!
//! // Strips "/fr" from the request and remembers the choice in the cookie
//! let active = resolver.process(&mut request, &mut cookies)?;
//!
//! // "/fr/contact"
//! let link = prefixer.build_url(&active, "contact", &LangTarget::Current, None, true)?;
//! ```

mod error;
mod language;
pub mod negotiate;
mod registry;
mod resolver;
mod translation;
mod url;
mod view;

pub use error::{LangError, LangResult};
pub use language::ActiveLanguage;
pub use registry::{LangSettings, LanguageEntry, LanguageRegistry, Locale};
pub use resolver::{CookieStore, LangRequest, LanguageResolver, LanguageSource};
pub use translation::TranslationMap;
pub use url::{LangTarget, SiteUrl, UrlBuilder, UrlLanguagePrefixer};
pub use view::{with_extension, FsViewLookup, LocalizedViewResolver, ViewLookup};
