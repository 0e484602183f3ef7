//! Language-specific view overrides.
//!
//! A view `pages/about` can be overridden per language by a file at
//! `i18n/<lang>/pages/about`. Lookups fall back to the shared view when no
//! override exists.

use crate::i18n::{ActiveLanguage, LangError, LangResult, LanguageRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Answers whether a logical view path exists.
pub trait ViewLookup {
    fn exists(&self, logical_path: &str) -> bool;
}

/// Looks views up below a directory on disk.
#[derive(Debug, Clone)]
pub struct FsViewLookup {
    root: PathBuf,
    extension: Option<String>,
}

impl FsViewLookup {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: None,
        }
    }

    /// Append `.ext` to logical paths when probing.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into().trim_start_matches('.').to_string());
        self
    }

    fn path_for(&self, logical_path: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in logical_path.split('/').filter(|part| !part.is_empty()) {
            path.push(part);
        }
        match &self.extension {
            Some(extension) => with_extension(path, extension),
            None => path,
        }
    }
}

/// `path` with `.extension` appended.
///
/// Dots already in the file name are kept, so `v1.2` becomes `v1.2.html`.
pub fn with_extension(path: PathBuf, extension: &str) -> PathBuf {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        return path;
    }
    let mut path = path.into_os_string();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

impl ViewLookup for FsViewLookup {
    fn exists(&self, logical_path: &str) -> bool {
        // Refuse to probe outside the view root
        if logical_path.split('/').any(|part| part == "..") {
            return false;
        }
        self.path_for(logical_path).is_file()
    }
}

/// Chooses between a view and its language override.
#[derive(Debug, Clone)]
pub struct LocalizedViewResolver<L> {
    registry: Arc<LanguageRegistry>,
    lookup: L,
}

impl<L: ViewLookup> LocalizedViewResolver<L> {
    pub fn new(registry: Arc<LanguageRegistry>, lookup: L) -> Self {
        Self { registry, lookup }
    }

    /// The view file to render for `name`.
    ///
    /// `language` defaults to the request's active language.
    ///
    /// # Errors
    /// `LangError::UnavailableLanguage` if an explicit `language` is not
    /// configured.
    pub fn resolve_view_file(
        &self,
        active: &ActiveLanguage,
        name: &str,
        language: Option<&str>,
    ) -> LangResult<String> {
        let language = match language {
            Some(code) if !self.registry.is_available(code) => {
                return Err(LangError::UnavailableLanguage(code.to_string()));
            }
            Some(code) => code,
            None => active.code_or_default(&self.registry),
        };

        let candidate = format!("i18n/{}/{}", language, name.trim_start_matches('/'));
        if self.lookup.exists(&candidate) {
            debug!("Using {} override for view {}", language, name);
            Ok(candidate)
        } else {
            Ok(name.to_string())
        }
    }
}
