//! Color tokens for the control panel, with optional overrides from `config.json`.

use serde::{Deserialize, Serialize};

use crate::ui::style::{StyleTokens, LAYOUT_TOKENS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTokens {
    pub window_background: String,
    pub panel_background: String,
    pub border_color: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub focus_ring_color: String,
    pub accent_background: String,
    pub accent_text_color: String,
    pub stage_background: String,
}

/// Per-mode color overrides; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOverrides {
    pub window_background: Option<String>,
    pub panel_background: Option<String>,
    pub border_color: Option<String>,
    pub text_color: Option<String>,
    pub muted_text_color: Option<String>,
    pub focus_ring_color: Option<String>,
    pub accent_background: Option<String>,
    pub accent_text_color: Option<String>,
    pub stage_background: Option<String>,
}

/// Shared overrides plus per-mode overrides applied on top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    #[serde(default)]
    pub common: ColorOverrides,
    #[serde(default)]
    pub dark: ColorOverrides,
    #[serde(default)]
    pub light: ColorOverrides,
}

pub fn default_color_tokens(mode: ThemeMode) -> ColorTokens {
    let tokens = match mode {
        ThemeMode::Light => [
            "#fafafa", "#ffffff", "#e4e4e7", "#18181b", "#71717a", "#6366f1", "#18181b",
            "#ffffff", "#f4f4f5",
        ],
        ThemeMode::Dark | ThemeMode::System => [
            "#09090b", "#18181b", "#27272a", "#f4f4f5", "#a1a1aa", "#818cf8", "#ffffff",
            "#09090b", "#0c0c0e",
        ],
    };
    let [window_background, panel_background, border_color, text_color, muted_text_color, focus_ring_color, accent_background, accent_text_color, stage_background] =
        tokens.map(str::to_string);
    ColorTokens {
        window_background,
        panel_background,
        border_color,
        text_color,
        muted_text_color,
        focus_ring_color,
        accent_background,
        accent_text_color,
        stage_background,
    }
}

/// Default tokens for `mode` with `overrides` applied, common first.
pub fn resolve_color_tokens(mode: ThemeMode, overrides: Option<&ThemeColors>) -> ColorTokens {
    let mut tokens = default_color_tokens(mode);

    if let Some(colors) = overrides {
        apply_overrides(&mut tokens, &colors.common);
        let mode_overrides = match mode {
            ThemeMode::Dark | ThemeMode::System => &colors.dark,
            ThemeMode::Light => &colors.light,
        };
        apply_overrides(&mut tokens, mode_overrides);
    }

    tokens
}

pub fn tokens_for(mode: ThemeMode, overrides: Option<&ThemeColors>) -> (StyleTokens, ColorTokens) {
    (LAYOUT_TOKENS, resolve_color_tokens(mode, overrides))
}

fn apply_overrides(tokens: &mut ColorTokens, overrides: &ColorOverrides) {
    let pairs = [
        (&mut tokens.window_background, &overrides.window_background),
        (&mut tokens.panel_background, &overrides.panel_background),
        (&mut tokens.border_color, &overrides.border_color),
        (&mut tokens.text_color, &overrides.text_color),
        (&mut tokens.muted_text_color, &overrides.muted_text_color),
        (&mut tokens.focus_ring_color, &overrides.focus_ring_color),
        (&mut tokens.accent_background, &overrides.accent_background),
        (&mut tokens.accent_text_color, &overrides.accent_text_color),
        (&mut tokens.stage_background, &overrides.stage_background),
    ];
    for (slot, value) in pairs {
        if let Some(value) = value {
            slot.clone_from(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_color_tokens_without_overrides_returns_defaults() {
        assert_eq!(
            resolve_color_tokens(ThemeMode::Light, None),
            default_color_tokens(ThemeMode::Light)
        );
    }

    #[test]
    fn system_mode_uses_dark_defaults() {
        assert_eq!(
            default_color_tokens(ThemeMode::System),
            default_color_tokens(ThemeMode::Dark)
        );
    }

    #[test]
    fn resolve_color_tokens_applies_common_then_mode_overrides() {
        let colors = ThemeColors {
            common: ColorOverrides {
                text_color: Some("#111111".to_string()),
                border_color: Some("#222222".to_string()),
                ..ColorOverrides::default()
            },
            dark: ColorOverrides {
                border_color: Some("#333333".to_string()),
                ..ColorOverrides::default()
            },
            light: ColorOverrides {
                border_color: Some("#444444".to_string()),
                ..ColorOverrides::default()
            },
        };

        let dark = resolve_color_tokens(ThemeMode::Dark, Some(&colors));
        assert_eq!(dark.text_color, "#111111");
        assert_eq!(dark.border_color, "#333333");

        let light = resolve_color_tokens(ThemeMode::Light, Some(&colors));
        assert_eq!(light.border_color, "#444444");
        assert_eq!(
            light.panel_background,
            default_color_tokens(ThemeMode::Light).panel_background
        );
    }

    #[test]
    fn theme_colors_parse_from_json() {
        let colors: ThemeColors = serde_json::from_str(
            r##"{ "dark": { "accent_background": "#ff00aa" } }"##,
        )
        .expect("colors should parse");
        assert_eq!(colors.dark.accent_background.as_deref(), Some("#ff00aa"));
        assert_eq!(colors.common, ColorOverrides::default());
    }
}
