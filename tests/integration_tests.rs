//! Integration tests for the language middleware and demo site.
//!
//! These tests run the full axum app on a local port and talk to it over
//! HTTP, so the URI rewriting happens exactly as it would in production.

use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE};
use site_lang::{config::Config, i18n::LanguageRegistry, server::build_app};
use std::sync::Arc;
use tempfile::TempDir;

// ==================== Test Helpers ====================

const LANG_CONFIG: &str = r#"{
    "default": "en",
    "cookie": "lang",
    "langs": {
        "en": { "name": "English", "i18n_code": "en", "locale": ["en_US.utf-8"] },
        "fr": { "name": "Français", "i18n_code": "fr", "locale": ["fr_FR.utf-8"] },
        "de": { "name": "Deutsch", "i18n_code": "de", "locale": "de_DE.utf-8" }
    }
}"#;

/// Write the language config and a few views into a temp dir
fn create_site(temp_dir: &TempDir) -> Config {
    let root = temp_dir.path();
    let views = root.join("views");
    std::fs::create_dir_all(views.join("i18n/fr")).expect("Failed to create views");
    std::fs::write(views.join("home.html"), "<h1>Welcome</h1>").unwrap();
    std::fs::write(views.join("about.html"), "<h1>About us</h1>").unwrap();
    std::fs::write(views.join("i18n/fr/about.html"), "<h1>À propos</h1>").unwrap();
    std::fs::write(views.join("v1.2.html"), "<h1>Release 1.2</h1>").unwrap();

    let lang_config = root.join("lang.json");
    std::fs::write(&lang_config, LANG_CONFIG).unwrap();

    Config {
        lang_config: lang_config.to_str().unwrap().to_string(),
        views_dir: views.to_str().unwrap().to_string(),
        view_extension: "html".to_string(),
        base_url: "/".to_string(),
        index_file: String::new(),
        host: None,
        port: 0,
    }
}

/// Start the app on an ephemeral port and return its base URL
async fn spawn_site(temp_dir: &TempDir) -> String {
    let config = create_site(temp_dir);
    let registry = Arc::new(LanguageRegistry::from_file(&config.lang_config).unwrap());
    let app = build_app(&config, registry).expect("Failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

// ==================== URI Prefix Tests ====================

#[tokio::test]
async fn test_uri_prefix_selects_language_and_override_view() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    let response = reqwest::get(format!("{}/fr/about", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(set_cookies(&response), vec!["lang=fr; Path=/; SameSite=Lax"]);

    let body = response.text().await.unwrap();
    assert!(body.contains(r#"<html lang="fr">"#));
    assert!(body.contains("À propos"));
    assert!(body.contains(r#"<a href="/de/about" hreflang="de">Deutsch</a>"#));
    assert!(body.contains(r#"<a href="/fr/">home</a>"#));
}

#[tokio::test]
async fn test_uri_prefix_is_case_insensitive() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    let response = reqwest::get(format!("{}/DE/about", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(set_cookies(&response), vec!["lang=de; Path=/; SameSite=Lax"]);
    let body = response.text().await.unwrap();
    assert!(body.contains("About us"));
}

#[tokio::test]
async fn test_language_root() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    let response = reqwest::get(format!("{}/fr", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Welcome"));
    assert!(body.contains(r#"<html lang="fr">"#));
}

#[tokio::test]
async fn test_longer_segment_is_not_a_language() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    // "eng" is not "en": nothing stripped, so there is no such view
    let response = reqwest::get(format!("{}/eng/about", base)).await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(set_cookies(&response), vec!["lang=en; Path=/; SameSite=Lax"]);
}

// ==================== Cookie / Header Tests ====================

#[tokio::test]
async fn test_cookie_selects_language_without_resending() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    let response = reqwest::Client::new()
        .get(format!("{}/about", base))
        .header(COOKIE, "lang=de")
        .header(ACCEPT_LANGUAGE, "fr")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(set_cookies(&response).is_empty());

    let body = response.text().await.unwrap();
    assert!(body.contains(r#"<html lang="de">"#));
    assert!(body.contains("About us"));
}

#[tokio::test]
async fn test_accept_language_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    let response = reqwest::Client::new()
        .get(format!("{}/about", base))
        .header(COOKIE, "lang=xx")
        .header(ACCEPT_LANGUAGE, "fr;q=0.9, en;q=0.5")
        .send()
        .await
        .unwrap();
    assert_eq!(set_cookies(&response), vec!["lang=fr; Path=/; SameSite=Lax"]);
    let body = response.text().await.unwrap();
    assert!(body.contains("À propos"));
}

#[tokio::test]
async fn test_default_language() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    let response = reqwest::Client::new()
        .get(format!("{}/", base))
        .header(ACCEPT_LANGUAGE, "ja")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"<html lang="en">"#));
    assert!(body.contains(r#"<a href="/fr/" hreflang="fr">Français</a>"#));
}

#[tokio::test]
async fn test_unknown_view_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    let response = reqwest::get(format!("{}/fr/missing", base)).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_dotted_view_name() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_site(&temp_dir).await;

    let response = reqwest::get(format!("{}/de/v1.2", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Release 1.2"));
}
