//! Control surface semantics, independent of the widget toolkit.
//!
//! Every control maps a user gesture to exactly one [`ConfigPatch`]; widgets
//! only render what these helpers describe.

use crate::model::{
    AspectRatio, BackgroundType, ConfigPatch, EditorConfig, WindowTheme, PRESET_GRADIENTS,
    PRESET_SOLIDS,
};

pub const UPLOAD_LABEL: &str = "Upload Screenshot";
pub const BACKGROUND_IMAGE_LABEL: &str = "Choose image…";
pub const WATERMARK_TOGGLE_LABEL: &str = "Show Watermark";
pub const CUSTOM_COLOR_FALLBACK: &str = "#000000";
pub const FOOTER_NOTE: &str = "Free plan includes watermark.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlMode {
    #[default]
    Templates,
    Canvas,
    Mockup,
    Background,
}

impl ControlMode {
    pub const ALL: [ControlMode; 4] = [
        ControlMode::Templates,
        ControlMode::Canvas,
        ControlMode::Mockup,
        ControlMode::Background,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Templates => "Templates",
            Self::Canvas => "Canvas",
            Self::Mockup => "Mockup",
            Self::Background => "Bg",
        }
    }

    /// Stable name used for the stack pages.
    pub const fn page_name(self) -> &'static str {
        match self {
            Self::Templates => "templates",
            Self::Canvas => "canvas",
            Self::Mockup => "mockup",
            Self::Background => "bg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderField {
    Padding,
    Inset,
    Scale,
    Shadow,
    BorderRadius,
    RotateX,
    RotateY,
}

impl SliderField {
    pub const CANVAS: [SliderField; 3] = [SliderField::Padding, SliderField::Inset, SliderField::Scale];
    pub const MOCKUP: [SliderField; 2] = [SliderField::Shadow, SliderField::BorderRadius];
    pub const TRANSFORM: [SliderField; 2] = [SliderField::RotateX, SliderField::RotateY];

    pub const fn mode(self) -> ControlMode {
        match self {
            Self::Padding | Self::Inset | Self::Scale => ControlMode::Canvas,
            Self::Shadow | Self::BorderRadius | Self::RotateX | Self::RotateY => {
                ControlMode::Mockup
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Padding => "Padding",
            Self::Inset => "Inset",
            Self::Scale => "Image Scale",
            Self::Shadow => "Shadow Intensity",
            Self::BorderRadius => "Border Radius",
            Self::RotateX => "Rotate X (Tilt)",
            Self::RotateY => "Rotate Y (Turn)",
        }
    }

    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::Padding => (0.0, 200.0),
            Self::Inset | Self::Shadow => (0.0, 100.0),
            Self::Scale => (0.5, 1.5),
            Self::BorderRadius => (0.0, 60.0),
            Self::RotateX | Self::RotateY => (-50.0, 50.0),
        }
    }

    pub const fn step(self) -> f64 {
        match self {
            Self::Scale => 0.01,
            _ => 1.0,
        }
    }

    pub fn value_of(self, config: &EditorConfig) -> f64 {
        match self {
            Self::Padding => config.padding,
            Self::Inset => config.inset,
            Self::Scale => config.scale,
            Self::Shadow => config.shadow,
            Self::BorderRadius => config.border_radius,
            Self::RotateX => config.rotate_x,
            Self::RotateY => config.rotate_y,
        }
    }

    /// Text shown next to the slider label.
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Padding | Self::Inset | Self::BorderRadius => format!("{}px", value.round()),
            Self::Scale => format!("{}%", (value * 100.0).round()),
            Self::Shadow => format!("{}", value.round()),
            Self::RotateX | Self::RotateY => format!("{}°", value.round()),
        }
    }

    /// Single-field patch with `value` snapped to the step and clamped to the range.
    pub fn patch(self, value: f64) -> ConfigPatch {
        let (min, max) = self.range();
        let step = self.step();
        let snapped = ((value / step).round() * step).clamp(min, max);
        let value = if step < 1.0 {
            (snapped * 100.0).round() / 100.0
        } else {
            snapped
        };
        let patch = ConfigPatch::new();
        match self {
            Self::Padding => patch.padding(value),
            Self::Inset => patch.inset(value),
            Self::Scale => patch.scale(value),
            Self::Shadow => patch.shadow(value),
            Self::BorderRadius => patch.border_radius(value),
            Self::RotateX => patch.rotate_x(value),
            Self::RotateY => patch.rotate_y(value),
        }
    }
}

pub const fn aspect_label(aspect: AspectRatio) -> &'static str {
    match aspect {
        AspectRatio::Auto => "AUTO",
        AspectRatio::Widescreen => "16:9",
        AspectRatio::Standard => "4:3",
        AspectRatio::Square => "1:1",
        AspectRatio::Twitter => "Twitt",
        AspectRatio::Instagram => "IG",
    }
}

pub const fn theme_label(theme: WindowTheme) -> &'static str {
    match theme {
        WindowTheme::MacOsDark => "macOS dark",
        WindowTheme::MacOsLight => "macOS light",
        WindowTheme::Windows => "windows",
        WindowTheme::Code => "code",
        WindowTheme::IPhone => "iphone",
        WindowTheme::None => "none",
    }
}

pub fn aspect_patch(aspect: AspectRatio) -> ConfigPatch {
    ConfigPatch::new().aspect_ratio(aspect)
}

pub fn theme_patch(theme: WindowTheme) -> ConfigPatch {
    ConfigPatch::new().window_theme(theme)
}

pub fn watermark_patch(show: bool) -> ConfigPatch {
    ConfigPatch::new().show_watermark(show)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Standard,
    Float3d,
    PhoneDemo,
    DevCode,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::Standard,
        Template::Float3d,
        Template::PhoneDemo,
        Template::DevCode,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Float3d => "3D Float",
            Self::PhoneDemo => "Phone Demo",
            Self::DevCode => "Dev Code",
        }
    }

    pub const fn icon_name(self) -> &'static str {
        match self {
            Self::Standard => "video-display-symbolic",
            Self::Float3d => "object-rotate-right-symbolic",
            Self::PhoneDemo => "phone-symbolic",
            Self::DevCode => "text-x-script-symbolic",
        }
    }

    /// Gradient the template applies; also used for its preview tile.
    pub const fn gradient(self) -> &'static str {
        match self {
            Self::Standard => PRESET_GRADIENTS[0],
            Self::Float3d => PRESET_GRADIENTS[1],
            Self::PhoneDemo => PRESET_GRADIENTS[2],
            Self::DevCode => PRESET_GRADIENTS[7],
        }
    }

    /// Batch patch; fields a template does not name are left untouched.
    pub fn patch(self) -> ConfigPatch {
        let base = ConfigPatch::new().background(BackgroundType::Gradient, self.gradient());
        match self {
            Self::Standard => base
                .padding(64.0)
                .shadow(20.0)
                .rotate_x(0.0)
                .rotate_y(0.0)
                .scale(1.0)
                .window_theme(WindowTheme::MacOsDark),
            Self::Float3d => base
                .padding(80.0)
                .shadow(50.0)
                .rotate_x(20.0)
                .rotate_y(-20.0)
                .scale(0.9)
                .window_theme(WindowTheme::MacOsDark),
            Self::PhoneDemo => base
                .padding(40.0)
                .shadow(30.0)
                .rotate_x(0.0)
                .rotate_y(0.0)
                .scale(1.0)
                .window_theme(WindowTheme::IPhone)
                .aspect_ratio(AspectRatio::Instagram),
            Self::DevCode => base
                .padding(50.0)
                .shadow(25.0)
                .rotate_x(0.0)
                .rotate_y(0.0)
                .scale(1.0)
                .window_theme(WindowTheme::Code)
                .aspect_ratio(AspectRatio::Auto),
        }
    }
}

pub fn gradient_swatch_patch(index: usize) -> Option<ConfigPatch> {
    PRESET_GRADIENTS
        .get(index)
        .map(|value| ConfigPatch::new().background(BackgroundType::Gradient, *value))
}

pub fn solid_swatch_patch(index: usize) -> Option<ConfigPatch> {
    PRESET_SOLIDS
        .get(index)
        .map(|value| ConfigPatch::new().background(BackgroundType::Solid, *value))
}

/// A swatch is highlighted when the current value equals it, whatever the type.
pub fn is_swatch_active(config: &EditorConfig, swatch: &str) -> bool {
    config.background_value == swatch
}

pub fn custom_color_patch(hex: &str) -> ConfigPatch {
    ConfigPatch::new().background(BackgroundType::Solid, hex)
}

pub fn custom_color_value(config: &EditorConfig) -> &str {
    if config.background_type == BackgroundType::Solid && config.background_value.starts_with('#')
    {
        &config.background_value
    } else {
        CUSTOM_COLOR_FALLBACK
    }
}

/// Background image picked from disk, referenced as `url(<file uri>)`.
pub fn background_image_patch(file_uri: &str) -> ConfigPatch {
    ConfigPatch::new().background(BackgroundType::Image, format!("url({file_uri})"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportButtonState {
    pub sensitive: bool,
    pub spinning: bool,
    pub label: &'static str,
}

pub fn export_button_state(busy: bool) -> ExportButtonState {
    if busy {
        ExportButtonState {
            sensitive: false,
            spinning: true,
            label: "Exporting...",
        }
    } else {
        ExportButtonState {
            sensitive: true,
            spinning: false,
            label: "Export Image",
        }
    }
}
