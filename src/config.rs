use crate::i18n::LanguageRegistry;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Languages
    pub lang_config: String,

    // Views
    pub views_dir: String,
    pub view_extension: String,

    // URLs
    pub base_url: String,
    pub index_file: String,
    pub host: Option<String>,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            lang_config: std::env::var("LANG_CONFIG")
                .unwrap_or_else(|_| "config/lang.json".to_string()),

            views_dir: std::env::var("VIEWS_DIR").unwrap_or_else(|_| "views".to_string()),
            view_extension: std::env::var("VIEW_EXTENSION")
                .unwrap_or_else(|_| "html".to_string()),

            base_url: std::env::var("BASE_URL").unwrap_or_else(|_| "/".to_string()),
            index_file: std::env::var("INDEX_FILE").unwrap_or_default(),
            host: std::env::var("HOST").ok().filter(|host| !host.is_empty()),

            port: match std::env::var("PORT") {
                Ok(v) => v.parse().context("PORT must be a port number")?,
                Err(_) => 8080,
            },
        })
    }

    /// Load the language registry named by `lang_config`.
    pub fn load_registry(&self) -> Result<LanguageRegistry> {
        LanguageRegistry::from_file(&self.lang_config)
            .with_context(|| format!("Failed to load language config {}", self.lang_config))
    }
}
