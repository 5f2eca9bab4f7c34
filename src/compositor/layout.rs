use crate::geometry::{Rect, Size};
use crate::model::{EditorConfig, WindowTheme};

use super::chrome::{metrics_for, ChromeMetrics, IPHONE_MAX_WIDTH};

/// Largest on-canvas size of the screenshot, in CSS pixels.
pub const MAX_IMAGE_SIZE: Size = Size::new(1280.0, 800.0);
pub const EMPTY_CANVAS_WIDTH: f64 = 896.0;
pub const MIN_CANVAS_WIDTH: f64 = 300.0;
const EMPTY_ASPECT: (u32, u32) = (16, 9);
const PREVIEW_MARGIN: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub canvas: Size,
    /// Frame rect in canvas coordinates.
    pub frame: Rect,
    /// Content rect in frame-local coordinates.
    pub content: Rect,
}

/// Places canvas, frame and content for `config` and an optional image of `image` size.
pub fn layout(config: &EditorConfig, image: Option<Size>) -> CanvasLayout {
    let metrics = metrics_for(config.window_theme);
    let margin = config.padding.max(0.0) + config.inset.max(0.0);
    let natural_frame = image
        .filter(|size| !size.is_empty())
        .map(|size| metrics.frame_size_for(natural_content_size(config.window_theme, metrics, size)));

    let canvas = match (config.aspect_ratio.ratio(), natural_frame) {
        (Some(ratio), frame) => {
            let width = frame
                .map(|frame| canvas_width_for(frame, margin))
                .unwrap_or(EMPTY_CANVAS_WIDTH);
            with_ratio(width, ratio)
        }
        (None, Some(frame)) => Size::new(
            canvas_width_for(frame, margin),
            frame.height + margin * 2.0,
        ),
        (None, None) => with_ratio(EMPTY_CANVAS_WIDTH, EMPTY_ASPECT),
    };

    let inner = Rect::from_size(canvas).inset(margin);
    let frame = match (config.aspect_ratio.ratio(), natural_frame) {
        (None, Some(natural)) => inner.centered(Size::new(
            natural.width.min(inner.width),
            natural.height.min(inner.height),
        )),
        _ if config.window_theme == WindowTheme::IPhone => {
            inner.centered(Size::new(inner.width.min(IPHONE_MAX_WIDTH), inner.height))
        }
        _ => inner,
    };

    CanvasLayout {
        canvas,
        frame,
        content: metrics.content_rect(frame.size()),
    }
}

fn natural_content_size(theme: WindowTheme, metrics: ChromeMetrics, image: Size) -> Size {
    let bounds = if theme == WindowTheme::IPhone {
        Size::new(
            IPHONE_MAX_WIDTH - metrics.side * 2.0,
            MAX_IMAGE_SIZE.height * 2.0,
        )
    } else {
        MAX_IMAGE_SIZE
    };
    image.fit_within(bounds)
}

fn canvas_width_for(frame: Size, margin: f64) -> f64 {
    (frame.width + margin * 2.0).max(MIN_CANVAS_WIDTH)
}

fn with_ratio(width: f64, (ratio_width, ratio_height): (u32, u32)) -> Size {
    Size::new(width, width * f64::from(ratio_height) / f64::from(ratio_width))
}

/// Source-space rect that covers `target` without distortion, centered.
pub fn cover_crop(source: Size, target: Size) -> Rect {
    if source.is_empty() || target.is_empty() {
        return Rect::from_size(source);
    }
    let factor = (target.width / source.width).max(target.height / source.height);
    let visible = Size::new(target.width / factor, target.height / factor);
    Rect::from_size(source).centered(visible)
}

/// Zoom that fits `canvas` into `viewport` with a margin; never enlarges.
pub fn preview_zoom(canvas: Size, viewport: Size) -> f64 {
    if canvas.is_empty() {
        return 1.0;
    }
    let available = Size::new(
        (viewport.width - PREVIEW_MARGIN * 2.0).max(1.0),
        (viewport.height - PREVIEW_MARGIN * 2.0).max(1.0),
    );
    (available.width / canvas.width)
        .min(available.height / canvas.height)
        .min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AspectRatio;

    fn config(theme: WindowTheme, aspect: AspectRatio) -> EditorConfig {
        EditorConfig {
            window_theme: theme,
            aspect_ratio: aspect,
            ..EditorConfig::default()
        }
    }

    #[test]
    fn empty_auto_canvas_uses_sixteen_by_nine() {
        let layout = layout(&config(WindowTheme::MacOsDark, AspectRatio::Auto), None);
        assert_eq!(layout.canvas, Size::new(896.0, 504.0));
        assert_eq!(layout.frame, Rect::new(64.0, 64.0, 768.0, 376.0));
        assert_eq!(layout.content, Rect::new(0.0, 32.0, 768.0, 344.0));
    }

    #[test]
    fn auto_canvas_wraps_fitted_image_and_chrome() {
        let layout = layout(
            &config(WindowTheme::MacOsDark, AspectRatio::Auto),
            Some(Size::new(2560.0, 1600.0)),
        );
        assert_eq!(layout.content.size(), Size::new(1280.0, 800.0));
        assert_eq!(layout.frame.size(), Size::new(1280.0, 832.0));
        assert_eq!(layout.canvas, Size::new(1408.0, 960.0));
    }

    #[test]
    fn small_images_keep_minimum_canvas_width() {
        let mut config = config(WindowTheme::None, AspectRatio::Auto);
        config.padding = 10.0;
        let layout = layout(&config, Some(Size::new(100.0, 50.0)));
        assert_eq!(layout.canvas.width, MIN_CANVAS_WIDTH);
        assert_eq!(layout.frame.size(), Size::new(100.0, 50.0));
        assert_eq!(layout.frame.center().0, 150.0);
    }

    #[test]
    fn fixed_ratios_derive_height_from_width() {
        let image = Some(Size::new(800.0, 600.0));
        for (aspect, expected) in [
            (AspectRatio::Widescreen, 9.0 / 16.0),
            (AspectRatio::Twitter, 9.0 / 16.0),
            (AspectRatio::Standard, 3.0 / 4.0),
            (AspectRatio::Square, 1.0),
            (AspectRatio::Instagram, 5.0 / 4.0),
        ] {
            let layout = layout(&config(WindowTheme::MacOsDark, aspect), image);
            let ratio = layout.canvas.height / layout.canvas.width;
            assert!((ratio - expected).abs() < 1e-9, "{aspect:?} gave {ratio}");
        }
    }

    #[test]
    fn iphone_frame_is_capped_and_centered() {
        let layout = layout(&config(WindowTheme::IPhone, AspectRatio::Instagram), None);
        assert_eq!(layout.frame.width, IPHONE_MAX_WIDTH);
        assert_eq!(layout.frame.center().0, layout.canvas.width / 2.0);
    }

    #[test]
    fn iphone_content_fits_device_width() {
        let layout = layout(
            &config(WindowTheme::IPhone, AspectRatio::Auto),
            Some(Size::new(1170.0, 2532.0)),
        );
        assert!(layout.frame.width <= IPHONE_MAX_WIDTH);
        assert_eq!(layout.content.width, 376.0);
    }

    #[test]
    fn cover_crop_trims_the_longer_axis() {
        let crop = cover_crop(Size::new(400.0, 200.0), Size::new(100.0, 100.0));
        assert_eq!(crop, Rect::new(100.0, 0.0, 200.0, 200.0));
        let crop = cover_crop(Size::new(200.0, 400.0), Size::new(200.0, 100.0));
        assert_eq!(crop, Rect::new(0.0, 150.0, 200.0, 100.0));
    }

    #[test]
    fn preview_zoom_never_enlarges() {
        assert_eq!(
            preview_zoom(Size::new(400.0, 300.0), Size::new(2000.0, 2000.0)),
            1.0
        );
        let zoom = preview_zoom(Size::new(1464.0, 1000.0), Size::new(796.0, 600.0));
        assert!((zoom - 0.5).abs() < 1e-9);
    }
}
