use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// The persisted dark/light preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Dark,
    #[default]
    Light,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemePreference::Dark => write!(f, "dark"),
            ThemePreference::Light => write!(f, "light"),
        }
    }
}

/// Owner of the persisted theme preference.
///
/// The on-disk format is a single-key JSON object, `{"theme": "dark"}` or
/// `{"theme": "light"}`. A missing, unreadable or unrecognized file loads
/// as [`ThemePreference::Light`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeStore {
    theme: ThemePreference,
    #[serde(skip)]
    file_path: Option<PathBuf>,
}

impl ThemeStore {
    /// An in-memory store with the light default and no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_or_create() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("tui-mood-app");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
        }

        let file_path = config_dir.join("theme.json");
        info!(theme_file = %file_path.display(), "Resolved theme preference file path");
        Ok(Self::load_from(file_path))
    }

    fn load_from(file_path: PathBuf) -> Self {
        let fallback = |file_path: PathBuf| Self {
            theme: ThemePreference::Light,
            file_path: Some(file_path),
        };

        if !file_path.exists() {
            return fallback(file_path);
        }

        match fs::read_to_string(&file_path) {
            Ok(content) => match serde_json::from_str::<ThemeStore>(&content) {
                Ok(mut store) => {
                    store.file_path = Some(file_path);
                    store
                }
                Err(e) => {
                    tracing::error!("Failed to parse theme preference file: {e}");
                    fallback(file_path)
                }
            },
            Err(e) => {
                tracing::error!("Failed to read theme preference file: {e}");
                fallback(file_path)
            }
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.theme
    }

    /// Apply a preference value and persist it. Re-applying the value that is
    /// already current is a no-op: no write, no drift.
    pub fn set(&mut self, preference: ThemePreference) -> Result<()> {
        if self.theme == preference {
            return Ok(());
        }
        self.theme = preference;
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        match &self.file_path {
            Some(path) => {
                let content = serde_json::to_string_pretty(self)
                    .context("Failed to serialize theme preference")?;
                fs::write(path, content).context("Failed to write theme preference file")?;
                info!(theme = %self.theme, "Saved theme preference");
            }
            None => {
                info!("ThemeStore.save() called but no file_path is set; skipping write");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tui_mood_app_theme_{name}.json"))
    }

    #[test]
    fn test_missing_file_defaults_to_light() {
        let path = temp_store_path("missing");
        let _ = fs::remove_file(&path);

        let store = ThemeStore::load_from(path);
        assert_eq!(store.preference(), ThemePreference::Light);
    }

    #[test]
    fn test_toggle_persists_and_reloads() {
        let path = temp_store_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut store = ThemeStore::load_from(path.clone());
        store.set(store.preference().toggled()).unwrap();
        assert_eq!(store.preference(), ThemePreference::Dark);

        // The persisted entry is the single "theme" key.
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"theme\": \"dark\""));

        // Re-initializing loads the persisted value, not the default.
        let reloaded = ThemeStore::load_from(path.clone());
        assert_eq!(reloaded.preference(), ThemePreference::Dark);

        let mut store = reloaded;
        store.set(store.preference().toggled()).unwrap();
        assert_eq!(store.preference(), ThemePreference::Light);
        let reloaded = ThemeStore::load_from(path.clone());
        assert_eq!(reloaded.preference(), ThemePreference::Light);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_reapplying_current_value_is_a_noop() {
        let path = temp_store_path("idempotent");
        let _ = fs::remove_file(&path);

        let mut store = ThemeStore::load_from(path.clone());
        store.set(ThemePreference::Dark).unwrap();
        assert!(path.exists());

        // Remove the file behind the store's back; an unchanged set() must
        // not write it again.
        fs::remove_file(&path).unwrap();
        store.set(ThemePreference::Dark).unwrap();
        assert!(!path.exists());

        store.set(ThemePreference::Light).unwrap();
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unrecognized_value_defaults_to_light() {
        let path = temp_store_path("unrecognized");
        fs::write(&path, r#"{"theme":"purple"}"#).unwrap();

        let store = ThemeStore::load_from(path.clone());
        assert_eq!(store.preference(), ThemePreference::Light);

        let _ = fs::remove_file(&path);
    }
}
