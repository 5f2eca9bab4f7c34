//! Pure derivation of the layered scene from the editor configuration.

use std::fmt;

use crate::geometry::{Rect, Rgba, Size};
use crate::model::{EditorConfig, WindowTheme};

use super::background::{resolve_background, Background};
use super::chrome::{chrome_for, Chrome, IPHONE_CORNER_RADIUS};
use super::layout::{cover_crop, layout};

pub const PERSPECTIVE: f64 = 2000.0;
pub const MAX_SHADOW_OPACITY: f64 = 0.6;
pub const WATERMARK_LABEL: &str = "SCREENGLOW";
pub const WATERMARK_OPACITY: f64 = 0.4;
pub const WATERMARK_INSET: f64 = 16.0;
pub const EMPTY_CANVAS_LABEL: &str = "Canvas Area";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectConstraint {
    /// Canvas height follows the content.
    Content,
    Fixed { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasLayer {
    pub size: Size,
    pub background: Background,
    pub padding: f64,
    pub aspect: AspectConstraint,
    pub empty_label: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub scale: f64,
    pub perspective: f64,
}

impl FrameTransform {
    pub fn is_identity(&self) -> bool {
        self.rotate_x == 0.0 && self.rotate_y == 0.0 && self.scale == 1.0
    }
}

impl fmt::Display for FrameTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rotateX({}deg) rotateY({}deg) scale({})",
            self.rotate_x, self.rotate_y, self.scale
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub opacity: f64,
}

impl DropShadow {
    /// `None` for a zero or negative intensity.
    pub fn from_intensity(intensity: f64) -> Option<Self> {
        (intensity > 0.0).then(|| Self {
            offset_x: intensity,
            offset_y: intensity * 2.0,
            blur: intensity * 4.0,
            opacity: (intensity / 50.0).min(MAX_SHADOW_OPACITY),
        })
    }

    /// Distance the shadow may reach past the frame on any side.
    pub fn extent(&self) -> f64 {
        self.offset_x.abs().max(self.offset_y.abs()) + self.blur
    }
}

impl fmt::Display for DropShadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px rgba(0,0,0,{})",
            self.offset_x, self.offset_y, self.blur, self.opacity
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrapperStyle {
    pub transform: FrameTransform,
    pub shadow: Option<DropShadow>,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentFill {
    Image {
        source_size: Size,
        /// Visible part of the source, in source pixels.
        crop: Rect,
    },
    Placeholder {
        label: &'static str,
        background: Rgba,
        text: Rgba,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentLayer {
    /// Frame-local rect.
    pub rect: Rect,
    pub fill: ContentFill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayer {
    pub inset: f64,
    /// Canvas-space rect of the untransformed frame.
    pub rect: Rect,
    pub style: WrapperStyle,
    pub chrome: Chrome,
    pub content: ContentLayer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Watermark {
    /// Bottom-right anchor in canvas coordinates.
    pub anchor: (f64, f64),
    pub label: &'static str,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub canvas: CanvasLayer,
    pub frame: FrameLayer,
    pub watermark: Option<Watermark>,
}

pub fn derive_scene(config: &EditorConfig, image: Option<Size>) -> Scene {
    let image = image.filter(|size| !size.is_empty());
    let placed = layout(config, image);
    let theme = config.window_theme;

    let content_fill = match image {
        Some(source_size) => ContentFill::Image {
            source_size,
            crop: cover_crop(source_size, placed.content.size()),
        },
        None => ContentFill::Placeholder {
            label: if theme == WindowTheme::IPhone {
                "Preview"
            } else {
                "Drop image here"
            },
            background: Rgba::rgb(0xf4, 0xf4, 0xf5),
            text: Rgba::rgb(0xa1, 0xa1, 0xaa),
        },
    };

    let canvas = CanvasLayer {
        size: placed.canvas,
        background: resolve_background(config.background_type, &config.background_value),
        padding: config.padding,
        aspect: match config.aspect_ratio.ratio() {
            Some((width, height)) => AspectConstraint::Fixed { width, height },
            None => AspectConstraint::Content,
        },
        empty_label: image.is_none().then_some(EMPTY_CANVAS_LABEL),
    };

    let frame = FrameLayer {
        inset: config.inset,
        rect: placed.frame,
        style: WrapperStyle {
            transform: FrameTransform {
                rotate_x: config.rotate_x,
                rotate_y: config.rotate_y,
                scale: config.scale,
                perspective: PERSPECTIVE,
            },
            shadow: DropShadow::from_intensity(config.shadow),
            corner_radius: if theme == WindowTheme::IPhone {
                IPHONE_CORNER_RADIUS
            } else {
                config.border_radius.max(0.0)
            },
        },
        chrome: chrome_for(theme, placed.frame.size()),
        content: ContentLayer {
            rect: placed.content,
            fill: content_fill,
        },
    };

    let watermark = config.show_watermark.then(|| Watermark {
        anchor: (
            placed.canvas.width - WATERMARK_INSET,
            placed.canvas.height - WATERMARK_INSET,
        ),
        label: WATERMARK_LABEL,
        opacity: WATERMARK_OPACITY,
    });

    Scene {
        canvas,
        frame,
        watermark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AspectRatio, BackgroundType, ConfigPatch, PRESET_SOLIDS};

    #[test]
    fn derivation_is_deterministic() {
        let config = ConfigPatch::new()
            .rotate_x(12.0)
            .window_theme(WindowTheme::Code)
            .applied_to(&EditorConfig::default());
        let image = Some(Size::new(1920.0, 1080.0));
        assert_eq!(derive_scene(&config, image), derive_scene(&config, image));
    }

    #[test]
    fn wrapper_style_renders_css_strings() {
        let config = ConfigPatch::new()
            .rotate_x(20.0)
            .rotate_y(-20.0)
            .scale(0.9)
            .shadow(50.0)
            .applied_to(&EditorConfig::default());
        let scene = derive_scene(&config, None);
        assert_eq!(
            scene.frame.style.transform.to_string(),
            "rotateX(20deg) rotateY(-20deg) scale(0.9)"
        );
        let shadow = scene.frame.style.shadow.expect("shadow should be present");
        assert_eq!(shadow.to_string(), "50px 100px 200px rgba(0,0,0,0.6)");
    }

    #[test]
    fn shadow_is_omitted_at_zero_and_capped_above() {
        assert_eq!(DropShadow::from_intensity(0.0), None);
        let mut previous = 0.0;
        for intensity in [1.0, 10.0, 25.0, 30.0, 60.0, 100.0] {
            let shadow = DropShadow::from_intensity(intensity).expect("positive intensity");
            assert!(shadow.opacity >= previous);
            assert!(shadow.opacity <= MAX_SHADOW_OPACITY);
            previous = shadow.opacity;
        }
        assert_eq!(
            DropShadow::from_intensity(20.0).map(|shadow| shadow.opacity),
            Some(0.4)
        );
    }

    #[test]
    fn iphone_ignores_border_radius_and_produces_same_chrome() {
        let base = ConfigPatch::new()
            .window_theme(WindowTheme::IPhone)
            .aspect_ratio(AspectRatio::Instagram)
            .applied_to(&EditorConfig::default());
        let sharp = ConfigPatch::new().border_radius(0.0).applied_to(&base);
        let round = ConfigPatch::new().border_radius(60.0).applied_to(&base);

        let sharp = derive_scene(&sharp, None);
        let round = derive_scene(&round, None);
        assert_eq!(sharp.frame.style.corner_radius, IPHONE_CORNER_RADIUS);
        assert_eq!(round.frame.style.corner_radius, IPHONE_CORNER_RADIUS);
        assert_eq!(sharp.frame.chrome, round.frame.chrome);
    }

    #[test]
    fn placeholder_label_depends_on_theme() {
        let window = derive_scene(&EditorConfig::default(), None);
        let phone = derive_scene(
            &ConfigPatch::new()
                .window_theme(WindowTheme::IPhone)
                .applied_to(&EditorConfig::default()),
            None,
        );
        assert!(matches!(
            window.frame.content.fill,
            ContentFill::Placeholder {
                label: "Drop image here",
                ..
            }
        ));
        assert!(matches!(
            phone.frame.content.fill,
            ContentFill::Placeholder { label: "Preview", .. }
        ));
        assert_eq!(window.canvas.empty_label, Some(EMPTY_CANVAS_LABEL));
    }

    #[test]
    fn image_scene_has_no_canvas_label_and_crops_to_cover() {
        let config = ConfigPatch::new()
            .aspect_ratio(AspectRatio::Square)
            .applied_to(&EditorConfig::default());
        let scene = derive_scene(&config, Some(Size::new(1600.0, 900.0)));
        assert_eq!(scene.canvas.empty_label, None);
        assert_eq!(
            scene.canvas.aspect,
            AspectConstraint::Fixed {
                width: 1,
                height: 1
            }
        );
        let ContentFill::Image { crop, .. } = scene.frame.content.fill else {
            panic!("image content expected");
        };
        assert!((crop.height - 900.0).abs() < 1e-6);
        assert!(crop.width < 1600.0);
    }

    #[test]
    fn watermark_follows_toggle_without_moving_layout() {
        let shown = derive_scene(&EditorConfig::default(), None);
        let hidden = derive_scene(
            &ConfigPatch::new()
                .show_watermark(false)
                .applied_to(&EditorConfig::default()),
            None,
        );
        let watermark = shown.watermark.expect("watermark enabled by default");
        assert_eq!(watermark.label, WATERMARK_LABEL);
        assert_eq!(watermark.anchor, (880.0, 488.0));
        assert_eq!(hidden.watermark, None);
        assert_eq!(shown.frame.rect, hidden.frame.rect);
        assert_eq!(shown.canvas.size, hidden.canvas.size);
    }

    #[test]
    fn canvas_background_resolves_solid_swatches() {
        let config = ConfigPatch::new()
            .background(BackgroundType::Solid, PRESET_SOLIDS[1])
            .applied_to(&EditorConfig::default());
        let scene = derive_scene(&config, None);
        assert!(matches!(scene.canvas.background, Background::Solid(_)));
    }
}
