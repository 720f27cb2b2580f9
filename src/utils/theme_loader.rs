use crate::internal::preference::ThemePreference;
use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeFile {
    #[allow(dead_code)]
    pub name: String,
    pub themes: Vec<ThemeVariant>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeVariant {
    #[allow(dead_code)]
    pub name: String,
    pub mode: String, // "light" or "dark"
    pub colors: HashMap<String, String>,
}

/// The palette applied to every widget, switched as a whole when the
/// theme preference changes.
#[derive(Debug, Clone)]
pub struct TuiTheme {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub neutral: Color,
    pub border: Color,
    pub muted: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl TuiTheme {
    pub fn light() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Black,
            accent: Color::Blue,
            positive: Color::Green,
            negative: Color::Red,
            neutral: Color::DarkGray,
            border: Color::DarkGray,
            muted: Color::Gray,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            accent: Color::LightBlue,
            positive: Color::LightGreen,
            negative: Color::LightRed,
            neutral: Color::Gray,
            border: Color::Gray,
            muted: Color::DarkGray,
            selection_bg: Color::LightBlue,
            selection_fg: Color::Black,
        }
    }

    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Dark => Self::dark(),
            ThemePreference::Light => Self::light(),
        }
    }
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Load the variant matching the given preference from a palette file,
/// falling back to the file's first variant when no mode matches.
pub fn load_theme(path: &Path, preference: ThemePreference) -> Result<TuiTheme> {
    let content = fs::read_to_string(path).context("Failed to read theme file")?;
    let theme_file: ThemeFile =
        serde_json::from_str(&content).context("Failed to parse theme JSON")?;

    let mode = preference.to_string();
    let variant = theme_file
        .themes
        .iter()
        .find(|t| t.mode == mode)
        .or_else(|| theme_file.themes.first())
        .context("No matching theme variant found")?;

    let fallback = TuiTheme::for_preference(preference);
    let color_or = |key: &str, fallback: Color| {
        variant
            .colors
            .get(key)
            .map(|hex| parse_color(hex))
            .unwrap_or(fallback)
    };

    Ok(TuiTheme {
        background: color_or("background", fallback.background),
        foreground: color_or("foreground", fallback.foreground),
        accent: color_or("accent", fallback.accent),
        positive: color_or("positive", fallback.positive),
        negative: color_or("negative", fallback.negative),
        neutral: color_or("neutral", fallback.neutral),
        border: color_or("border", fallback.border),
        muted: color_or("muted", fallback.muted),
        selection_bg: color_or("selection.background", fallback.selection_bg),
        selection_fg: color_or("selection.foreground", fallback.selection_fg),
    })
}

fn parse_color(hex: &str) -> Color {
    if let Ok(c) = hex.parse::<Color>() {
        return c;
    }

    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 | 8 => {
            // For 8-char hex (with alpha), ignore the alpha and use the RGB components.
            let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
            let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
            let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
            Color::Rgb(r, g, b)
        }
        _ => Color::Reset,
    }
}
