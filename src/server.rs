//! Demo site: renders localized views and language-switch links.

use crate::config::Config;
use crate::i18n::{
    with_extension, ActiveLanguage, FsViewLookup, LangError, LangTarget, LanguageRegistry,
    LanguageResolver, LocalizedViewResolver, SiteUrl, UrlLanguagePrefixer,
};
use crate::middleware::{with_language, LangState};
use anyhow::Result;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub struct AppState {
    pub registry: Arc<LanguageRegistry>,
    pub urls: UrlLanguagePrefixer<SiteUrl>,
    pub views: LocalizedViewResolver<FsViewLookup>,
    pub views_dir: PathBuf,
    pub view_extension: String,
}

impl AppState {
    pub fn new(config: &Config, registry: Arc<LanguageRegistry>) -> Self {
        let mut site =
            SiteUrl::new(config.base_url.as_str()).with_index_file(config.index_file.as_str());
        if let Some(host) = &config.host {
            site = site.with_host(host.as_str());
        }
        let lookup =
            FsViewLookup::new(&config.views_dir).with_extension(config.view_extension.as_str());

        Self {
            urls: UrlLanguagePrefixer::new(Arc::clone(&registry), site),
            views: LocalizedViewResolver::new(Arc::clone(&registry), lookup),
            views_dir: PathBuf::from(&config.views_dir),
            view_extension: config.view_extension.clone(),
            registry,
        }
    }

    fn view_path(&self, view: &str) -> PathBuf {
        with_extension(self.views_dir.join(view), &self.view_extension)
    }
}

/// Build the full application router, language middleware included.
pub fn build_app(config: &Config, registry: Arc<LanguageRegistry>) -> Result<Router> {
    let resolver = LanguageResolver::new(Arc::clone(&registry))?;
    let state = Arc::new(AppState::new(config, registry));

    let routes = Router::new()
        .route("/", get(page))
        .route("/*path", get(page))
        .with_state(state);

    Ok(with_language(routes, LangState::new(resolver)).layer(TraceLayer::new_for_http()))
}

fn error_response(e: LangError) -> Response {
    let status = match e {
        LangError::UnavailableLanguage(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string()).into_response()
}

/// Render the view named by the path, or `home` for `/`.
async fn page(
    State(app): State<Arc<AppState>>,
    Extension(active): Extension<ActiveLanguage>,
    uri: Uri,
) -> Response {
    let view = match uri.path().trim_matches('/') {
        "" => "home",
        other => other,
    };
    if view.split('/').any(|part| part == ".." || part.is_empty()) {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }

    let file = match app.views.resolve_view_file(&active, view, None) {
        Ok(file) => file,
        Err(e) => return error_response(e),
    };
    let body = match tokio::fs::read_to_string(app.view_path(&file)).await {
        Ok(body) => body,
        Err(e) => {
            warn!("View {} not readable: {}", file, e);
            return (StatusCode::NOT_FOUND, format!("no view named {}", view)).into_response();
        }
    };

    let links = match app.urls.language_links(&active) {
        Ok(links) => links,
        Err(e) => return error_response(e),
    };
    let nav = links
        .iter()
        .map(|(code, name, url)| format!(r#"<a href="{}" hreflang="{}">{}</a>"#, url, code, name))
        .collect::<Vec<_>>()
        .join(" | ");

    let code = active.code_or_default(&app.registry);
    let home = app
        .urls
        .build_url(&active, "/", &LangTarget::Current, None, true)
        .unwrap_or_else(|_| "/".to_string());

    Html(format!(
        "<!doctype html>\n<html lang=\"{}\">\n<body>\n<nav><a href=\"{}\">home</a> {}</nav>\n{}</body>\n</html>\n",
        code, home, nav, body
    ))
    .into_response()
}
