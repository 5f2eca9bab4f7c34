//! Settle-then-rasterize export of the composed canvas.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use gtk4::cairo::Context;
use thiserror::Error;

use crate::compositor::{
    blank_surface, derive_scene, encode_png, paint_scene, PaintError, RasterError, Scene,
    SurfaceCache,
};
use crate::model::EditorConfig;
use crate::source::SourceImage;
use crate::storage::StorageError;
use crate::store::Coordinator;

/// Delay between an export request and rasterization, so pending edits land first.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);
pub const EXPORT_FILE_PREFIX: &str = "screenglow";
pub const EXPORT_PIXEL_RATIO: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub cache_bust: bool,
    pub pixel_ratio: f64,
    pub skip_auto_scale: bool,
    pub font_embed_css: String,
    /// Style override for the canvas root while rasterizing; stands in for the preview zoom.
    pub style_transform: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            cache_bust: true,
            pixel_ratio: EXPORT_PIXEL_RATIO,
            skip_auto_scale: true,
            font_embed_css: String::new(),
            style_transform: "scale(1)".to_string(),
        }
    }
}

impl ExportOptions {
    /// Canvas scale forced by `style_transform`, if it is a plain positive `scale(n)`.
    pub fn forced_scale(&self) -> Option<f64> {
        self.style_transform
            .trim()
            .strip_prefix("scale(")?
            .strip_suffix(')')?
            .trim()
            .parse()
            .ok()
            .filter(|scale: &f64| scale.is_finite() && *scale > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Everything the rasterizer needs for one export.
#[derive(Debug, Clone)]
pub struct ExportFrame<'a> {
    pub scene: Scene,
    pub image: Option<&'a SourceImage>,
}

impl<'a> ExportFrame<'a> {
    pub fn new(config: &EditorConfig, image: Option<&'a SourceImage>) -> Self {
        Self {
            scene: derive_scene(config, image.map(SourceImage::size)),
            image,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: no image loaded")]
    NoImage,
    #[error("canvas is empty")]
    EmptyCanvas,
    #[error("failed to paint canvas: {0}")]
    Paint(#[from] PaintError),
    #[error("failed to rasterize canvas: {0}")]
    Raster(#[from] RasterError),
    #[error("failed to save export: {0}")]
    Storage(#[from] StorageError),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

pub trait Rasterizer {
    fn rasterize(&self, frame: &ExportFrame<'_>, options: &ExportOptions)
        -> ExportResult<EncodedImage>;
}

pub trait ExportSink {
    fn save(&self, image: &EncodedImage, file_name: &str) -> ExportResult<PathBuf>;
}

/// Paints the scene into an offscreen cairo surface and encodes it as PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct CairoRasterizer;

impl Rasterizer for CairoRasterizer {
    fn rasterize(
        &self,
        frame: &ExportFrame<'_>,
        options: &ExportOptions,
    ) -> ExportResult<EncodedImage> {
        let scene = &frame.scene;
        let canvas_scale = options.forced_scale().unwrap_or(1.0);
        let ratio = options.pixel_ratio.max(1.0) * canvas_scale;
        let width = (scene.canvas.size.width * ratio).round() as u32;
        let height = (scene.canvas.size.height * ratio).round() as u32;
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyCanvas);
        }

        let mut surface = blank_surface(width, height)?;
        {
            let context = Context::new(&surface).map_err(PaintError::from)?;
            context.scale(ratio, ratio);
            let mut cache = SurfaceCache::new();
            paint_scene(&context, scene, frame.image, &mut cache, ratio)?;
        }
        let bytes = encode_png(&mut surface)?;
        Ok(EncodedImage {
            bytes,
            width,
            height,
        })
    }
}

pub fn export_file_name(timestamp: SystemTime) -> String {
    let millis = timestamp
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    format!("{EXPORT_FILE_PREFIX}-{millis}.png")
}

/// Rasterizes and saves the state current at call time.
///
/// Completion is signalled to the store on success and on failure alike.
pub fn run_export<R, S>(
    coordinator: &Coordinator,
    rasterizer: &R,
    sink: &S,
    options: &ExportOptions,
) -> ExportResult<PathBuf>
where
    R: Rasterizer + ?Sized,
    S: ExportSink + ?Sized,
{
    let result = export_current(coordinator, rasterizer, sink, options);
    match &result {
        Ok(path) => tracing::info!(path = %path.display(), "export finished"),
        Err(err) => tracing::error!(%err, "export failed"),
    }
    coordinator.on_export_complete();
    result
}

fn export_current<R, S>(
    coordinator: &Coordinator,
    rasterizer: &R,
    sink: &S,
    options: &ExportOptions,
) -> ExportResult<PathBuf>
where
    R: Rasterizer + ?Sized,
    S: ExportSink + ?Sized,
{
    if let Err(err) = coordinator.mark_export_settled() {
        tracing::warn!(%err, "export settled outside of a pending export");
    }
    let snapshot = coordinator.snapshot();
    let image = snapshot.image.as_ref().ok_or(ExportError::NoImage)?;
    tracing::info!(
        trigger = snapshot.export_trigger,
        pixel_ratio = options.pixel_ratio,
        transform = options.style_transform.as_str(),
        "rasterizing export"
    );

    let frame = ExportFrame::new(&snapshot.config, Some(image));
    let encoded = rasterizer.rasterize(&frame, options)?;
    sink.save(&encoded, &export_file_name(SystemTime::now()))
}
