use crate::config::{load_app_config, AppConfig};
use crate::storage::StorageService;
use crate::theme::ThemeMode;
use crate::ui::{tokens_for, ColorTokens, StyleTokens};
use gtk4::prelude::ObjectExt;

pub(super) struct AppBootstrap {
    pub(super) app_config: AppConfig,
}

pub(super) struct ResolvedThemeRuntime {
    pub(super) style_tokens: StyleTokens,
    pub(super) color_tokens: ColorTokens,
}

pub(super) fn bootstrap_app_runtime() -> AppBootstrap {
    let app_config = load_app_config();
    tracing::info!(
        mode = ?app_config.theme,
        export_dir = ?app_config.export_dir,
        "app runtime bootstrapped"
    );

    AppBootstrap { app_config }
}

pub(super) fn initialize_storage_service(app_config: &AppConfig) -> Option<StorageService> {
    match StorageService::with_default_paths(app_config) {
        Ok(service) => {
            tracing::info!(export_dir = %service.export_dir().display(), "export directory ready");
            Some(service)
        }
        Err(err) => {
            tracing::warn!(?err, "export directory unavailable; exports are disabled");
            None
        }
    }
}

/// Only `argv[0]` reaches GTK; the app takes no command-line arguments.
pub(super) fn gtk_launch_args() -> Vec<String> {
    std::env::args().take(1).collect()
}

pub(super) fn resolve_runtime_theme_mode(
    mode: ThemeMode,
    settings: Option<&gtk4::Settings>,
) -> ThemeMode {
    match mode {
        ThemeMode::Light => ThemeMode::Light,
        ThemeMode::Dark => ThemeMode::Dark,
        ThemeMode::System => settings
            .and_then(system_theme_mode_from_settings)
            .unwrap_or(ThemeMode::Dark),
    }
}

fn system_theme_mode_from_settings(settings: &gtk4::Settings) -> Option<ThemeMode> {
    if settings
        .list_properties()
        .iter()
        .any(|prop| prop.name() == "gtk-interface-color-scheme")
    {
        let color_scheme = settings.property_value("gtk-interface-color-scheme");
        if let Ok(raw_scheme) = color_scheme.get::<i32>() {
            return match raw_scheme {
                // GTK_INTERFACE_COLOR_SCHEME_FORCE_LIGHT
                3 => Some(ThemeMode::Light),
                // GTK_INTERFACE_COLOR_SCHEME_FORCE_DARK
                2 => Some(ThemeMode::Dark),
                _ => None,
            };
        }
    }

    settings
        .gtk_theme_name()
        .and_then(|theme_name| mode_from_theme_name(theme_name.as_str()))
}

fn mode_from_theme_name(theme_name: &str) -> Option<ThemeMode> {
    let normalized = theme_name.trim().to_ascii_lowercase();
    if normalized.contains("dark") {
        return Some(ThemeMode::Dark);
    }
    if normalized.contains("light") {
        return Some(ThemeMode::Light);
    }
    None
}

pub(super) fn resolve_theme_runtime(app_config: &AppConfig, mode: ThemeMode) -> ResolvedThemeRuntime {
    let (style_tokens, color_tokens) = tokens_for(mode, app_config.colors.as_ref());
    ResolvedThemeRuntime {
        style_tokens,
        color_tokens,
    }
}
