//! Layered composition of the beautified screenshot.
//!
//! [`derive_scene`] turns the editor configuration into a [`Scene`] of plain
//! values; [`paint_scene`] draws a scene with cairo. The preview and the
//! exporter share both steps, so they cannot disagree about layout.

mod background;
mod chrome;
mod layout;
mod paint;
mod raster;
mod scene;
mod warp;

pub use background::{
    parse_background, parse_css_color, parse_linear_gradient, resolve_background, Background,
    BackgroundError, ColorStop, LinearGradient, FALLBACK_BACKGROUND,
};
pub use chrome::{chrome_for, metrics_for, Chrome, ChromeMetrics, DeviceShell};
pub use layout::{cover_crop, layout, preview_zoom, CanvasLayout};
pub use paint::{paint_scene, paint_swatch, PaintError, PaintResult, SurfaceCache};
pub use raster::{blank_surface, encode_png, RasterError, RasterResult};
pub use scene::{
    derive_scene, AspectConstraint, CanvasLayer, ContentFill, ContentLayer, DropShadow,
    FrameLayer, FrameTransform, Scene, Watermark, WrapperStyle,
};
