//! axum integration: resolve the language before routing.
//!
//! The middleware strips the language segment from the request path, stores
//! the resulting `ActiveLanguage` in the request extensions for handlers to
//! pick up with `Extension<ActiveLanguage>`, and sends the language cookie
//! back when it changed.

use crate::i18n::{ActiveLanguage, CookieStore, LangRequest, LanguageResolver};
use axum::{
    extract::{Request, State},
    http::{header, uri::PathAndQuery, HeaderMap, HeaderValue, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared state for the language middleware.
#[derive(Clone)]
pub struct LangState {
    pub resolver: Arc<LanguageResolver>,
}

impl LangState {
    pub fn new(resolver: LanguageResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

/// `LangRequest` view of an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpLangRequest {
    path: String,
    accept_language: Option<String>,
}

impl HttpLangRequest {
    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            path: uri.path().to_string(),
            accept_language: headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }

    /// The path after resolution, always with a leading `/`.
    pub fn path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

impl LangRequest for HttpLangRequest {
    fn uri(&self) -> &str {
        &self.path
    }

    fn set_uri(&mut self, uri: &str) {
        self.path = uri.to_string();
    }

    fn accept_language(&self) -> Option<&str> {
        self.accept_language.as_deref()
    }
}

/// Cookies sent with a request, plus the ones to send back.
#[derive(Debug, Clone, Default)]
pub struct RequestCookies {
    values: Vec<(String, String)>,
    changed: Vec<(String, String)>,
}

impl RequestCookies {
    /// Parse every `Cookie` header of a request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let values = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                let value = value.trim().trim_matches('"');
                Some((name.trim().to_string(), value.to_string()))
            })
            .collect();

        Self {
            values,
            changed: Vec::new(),
        }
    }

    /// `Set-Cookie` header values for every cookie set on this store.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.changed
            .iter()
            .map(|(name, value)| format!("{}={}; Path=/; SameSite=Lax", name, value))
            .collect()
    }
}

impl CookieStore for RequestCookies {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.retain(|(name, _)| name != key);
        self.values.push((key.to_string(), value.to_string()));
        self.changed.retain(|(name, _)| name != key);
        self.changed.push((key.to_string(), value.to_string()));
    }
}

/// Replace the path of `uri`, keeping its query string.
fn with_path(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>()?);
    Ok(Uri::from_parts(parts)?)
}

/// Resolve the request language, then hand the stripped request on.
///
/// Requests that already carry an `ActiveLanguage` were resolved further
/// out and pass through untouched.
pub async fn lang_middleware(
    State(state): State<LangState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<ActiveLanguage>().is_some() {
        return next.run(request).await;
    }

    let mut cookies = RequestCookies::from_headers(request.headers());
    let mut lang_request = HttpLangRequest::from_parts(request.uri(), request.headers());

    let active = match state.resolver.process(&mut lang_request, &mut cookies) {
        Ok(active) => active,
        Err(e) => {
            warn!("Language resolution failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match with_path(request.uri(), &lang_request.path()) {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => {
            warn!("Cannot rewrite {}: {}", request.uri(), e);
            return (StatusCode::BAD_REQUEST, "invalid request path").into_response();
        }
    }

    debug!(
        "Dispatching {} as {} in {}",
        active.original_uri(),
        request.uri().path(),
        active.code().unwrap_or_default()
    );
    request.extensions_mut().insert(active);

    let mut response = next.run(request).await;
    for cookie in cookies.set_cookie_headers() {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Skipping invalid Set-Cookie header: {}", e),
        }
    }
    response
}

/// Wrap `router` so that language resolution runs before its routing.
pub fn with_language(router: Router, state: LangState) -> Router {
    Router::new()
        .fallback_service(router)
        .layer(middleware::from_fn_with_state(state, lang_middleware))
}
