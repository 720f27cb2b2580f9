use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
    /// Optional palette file with dark/light variants (see utils::theme_loader).
    /// When unset the built-in palettes are used.
    pub theme_file: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL of the sentiment inference service.
    #[serde(default = "default_analyze_base_url")]
    pub analyze_base_url: String,
    /// Article-search endpoint.
    #[serde(default = "default_news_base_url")]
    pub news_base_url: String,
    /// Provisioned credential for the article-search endpoint.
    #[serde(default)]
    pub news_api_key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Per-module overrides appended to the EnvFilter, e.g. ("tui_mood_app::api", "debug").
    #[serde(default)]
    pub module_levels: Vec<(String, String)>,
    #[serde(default)]
    pub log_directory: Option<String>,
}

fn default_analyze_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2/everything".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            analyze_base_url: default_analyze_base_url(),
            news_base_url: default_news_base_url(),
            news_api_key: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            module_levels: Vec::new(),
            log_directory: None,
        }
    }
}

impl AppConfig {
    /// Load `config.ron` from the working directory, then from next to the
    /// executable. A missing or unparsable file falls back to defaults.
    pub fn load() -> Self {
        let mut candidates = Vec::new();
        candidates.push(PathBuf::from("config.ron"));
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match ron::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    pub fn save(&self) {
        self.save_to(PathBuf::from("config.ron"));
    }

    /// Write the config back without losing the comments of an existing
    /// file: known keys are replaced in place; a fresh file is serialized
    /// from scratch.
    pub fn save_to(&self, path: PathBuf) {
        let existing_content = fs::read_to_string(&path).unwrap_or_default();

        if existing_content.is_empty() {
            let pretty = ron::ser::PrettyConfig::default()
                .depth_limit(2)
                .separate_tuple_members(true)
                .enumerate_arrays(true);

            match ron::ser::to_string_pretty(self, pretty) {
                Ok(content) => {
                    if let Err(e) = fs::write(&path, content) {
                        tracing::error!("Failed to write config to {}: {}", path.display(), e);
                    } else {
                        tracing::info!("Saved config to {}", path.display());
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize config: {}", e);
                }
            }
            return;
        }

        // Replace `key: "value"` entries in place so comments survive.
        let mut new_content = existing_content.clone();

        let replace_str = |content: &mut String, key: &str, value: &str| {
            let re = RegexBuilder::new(&format!(r#"(\s*{}\s*:\s*)"[^"]*""#, regex::escape(key)))
                .build()
                .unwrap();
            *content = re
                .replace_all(content, format!(r#"${{1}}"{}""#, value))
                .to_string();
        };

        replace_str(
            &mut new_content,
            "analyze_base_url",
            &self.network.analyze_base_url,
        );
        replace_str(&mut new_content, "news_base_url", &self.network.news_base_url);
        replace_str(&mut new_content, "news_api_key", &self.network.news_api_key);
        replace_str(&mut new_content, "level", &self.logging.level);

        if let Err(e) = fs::write(&path, new_content) {
            tracing::error!("Failed to update config at {}: {}", path.display(), e);
        } else {
            tracing::info!("Updated config at {} (preserving comments)", path.display());
        }
    }
}
