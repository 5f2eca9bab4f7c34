//! Editor configuration record and the enums it is built from.

mod patch;
mod presets;

pub use patch::ConfigPatch;
pub use presets::{PRESET_GRADIENTS, PRESET_SOLIDS};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WindowTheme {
    #[serde(rename = "macOS-dark")]
    #[default]
    MacOsDark,
    #[serde(rename = "macOS-light")]
    MacOsLight,
    #[serde(rename = "windows")]
    Windows,
    #[serde(rename = "iphone")]
    IPhone,
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "none")]
    None,
}

impl WindowTheme {
    /// Display order used by the mockup selector.
    pub const ALL: [WindowTheme; 6] = [
        WindowTheme::MacOsDark,
        WindowTheme::MacOsLight,
        WindowTheme::Windows,
        WindowTheme::Code,
        WindowTheme::IPhone,
        WindowTheme::None,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MacOsDark => "macOS-dark",
            Self::MacOsLight => "macOS-light",
            Self::Windows => "windows",
            Self::IPhone => "iphone",
            Self::Code => "code",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    Solid,
    #[default]
    Gradient,
    Image,
}

impl BackgroundType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Gradient => "gradient",
            Self::Image => "image",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[serde(rename = "auto")]
    #[default]
    Auto,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "twitter")]
    Twitter,
    #[serde(rename = "instagram")]
    Instagram,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 6] = [
        AspectRatio::Auto,
        AspectRatio::Widescreen,
        AspectRatio::Standard,
        AspectRatio::Square,
        AspectRatio::Twitter,
        AspectRatio::Instagram,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Widescreen => "16:9",
            Self::Standard => "4:3",
            Self::Square => "1:1",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
        }
    }

    /// Width:height pair forced on the canvas, `None` for `auto`.
    pub const fn ratio(self) -> Option<(u32, u32)> {
        match self {
            Self::Auto => None,
            Self::Widescreen | Self::Twitter => Some((16, 9)),
            Self::Standard => Some((4, 3)),
            Self::Square => Some((1, 1)),
            Self::Instagram => Some((4, 5)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    pub padding: f64,
    pub inset: f64,
    pub shadow: f64,
    pub border_radius: f64,
    pub window_theme: WindowTheme,
    pub background_type: BackgroundType,
    pub background_value: String,
    pub aspect_ratio: AspectRatio,
    pub scale: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
    /// Carried in the record; no control or layer reads it.
    pub rotate_z: f64,
    pub show_watermark: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            padding: 64.0,
            inset: 0.0,
            shadow: 20.0,
            border_radius: 12.0,
            window_theme: WindowTheme::MacOsDark,
            background_type: BackgroundType::Gradient,
            background_value: PRESET_GRADIENTS[0].to_string(),
            aspect_ratio: AspectRatio::Auto,
            scale: 1.0,
            rotate_x: 0.0,
            rotate_y: 0.0,
            rotate_z: 0.0,
            show_watermark: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_configuration() {
        let config = EditorConfig::default();
        assert_eq!(config.padding, 64.0);
        assert_eq!(config.inset, 0.0);
        assert_eq!(config.shadow, 20.0);
        assert_eq!(config.border_radius, 12.0);
        assert_eq!(config.window_theme, WindowTheme::MacOsDark);
        assert_eq!(config.background_type, BackgroundType::Gradient);
        assert_eq!(config.background_value, PRESET_GRADIENTS[0]);
        assert_eq!(config.aspect_ratio, AspectRatio::Auto);
        assert_eq!(config.scale, 1.0);
        assert_eq!(
            (config.rotate_x, config.rotate_y, config.rotate_z),
            (0.0, 0.0, 0.0)
        );
        assert!(config.show_watermark);
    }

    #[test]
    fn aspect_ratio_maps_social_presets_to_fixed_ratios() {
        assert_eq!(AspectRatio::Auto.ratio(), None);
        assert_eq!(AspectRatio::Twitter.ratio(), Some((16, 9)));
        assert_eq!(AspectRatio::Instagram.ratio(), Some((4, 5)));
        assert_eq!(AspectRatio::Standard.ratio(), Some((4, 3)));
        assert_eq!(AspectRatio::Square.ratio(), Some((1, 1)));
    }

    #[test]
    fn enum_names_match_serialized_values() {
        for theme in WindowTheme::ALL {
            let encoded = serde_json::to_string(&theme).expect("theme should serialize");
            assert_eq!(encoded, format!("\"{}\"", theme.as_str()));
        }
        for ratio in AspectRatio::ALL {
            let encoded = serde_json::to_string(&ratio).expect("ratio should serialize");
            assert_eq!(encoded, format!("\"{}\"", ratio.as_str()));
        }
        let encoded = serde_json::to_string(&BackgroundType::Image).expect("type should serialize");
        assert_eq!(encoded, "\"image\"");
    }

    #[test]
    fn config_serializes_with_camel_case_field_names() {
        let value = serde_json::to_value(EditorConfig::default()).expect("config should serialize");
        assert_eq!(value["borderRadius"], 12.0);
        assert_eq!(value["windowTheme"], "macOS-dark");
        assert_eq!(value["showWatermark"], true);
    }
}
