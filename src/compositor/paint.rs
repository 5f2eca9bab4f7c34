use std::path::PathBuf;

use gtk4::cairo::{self, Context, Filter, FontSlant, FontWeight, ImageSurface};
use gtk4::gio;
use gtk4::prelude::FileExt;
use thiserror::Error;

use crate::geometry::{Rect, Rgba, Size};
use crate::source::{load_image_file, SourceImage};

use super::background::{Background, FALLBACK_BACKGROUND};
use super::chrome::{
    CaptionGlyph, CaptionGlyphKind, Chrome, CodeChrome, DeviceShell, LabelPill, MacWindowChrome,
    TitleBar, TrafficLight, WindowsChrome,
};
use super::raster::{
    blank_surface, blur_premultiplied, premultiplied_to_surface, rgba_image_to_surface,
    surface_to_premultiplied, RasterError,
};
use super::scene::{ContentFill, DropShadow, FrameLayer, Scene, Watermark};
use super::warp::{warp_image, Projection};

const SANS: &str = "Sans";
const MONO: &str = "Monospace";
const EMPTY_LABEL_COLOR: Rgba = Rgba::rgb(113, 113, 122).with_alpha(0.5);
const WATERMARK_MARK: f64 = 12.0;
const WATERMARK_GAP: f64 = 6.0;

#[derive(Debug, Error)]
pub enum PaintError {
    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error(transparent)]
    Raster(#[from] RasterError),
}

pub type PaintResult<T> = std::result::Result<T, PaintError>;

/// Decoded surfaces reused across frames, keyed by image id and background reference.
#[derive(Debug, Default)]
pub struct SurfaceCache {
    source: Option<(u64, ImageSurface)>,
    background: Option<(String, Option<ImageSurface>)>,
}

impl SurfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn source_surface(&mut self, image: &SourceImage) -> PaintResult<ImageSurface> {
        if let Some((id, surface)) = self.source.as_ref() {
            if *id == image.id() {
                return Ok(surface.clone());
            }
        }
        let surface = rgba_image_to_surface(image.pixels())?;
        self.source = Some((image.id(), surface.clone()));
        Ok(surface)
    }

    fn background_surface(&mut self, reference: &str) -> Option<ImageSurface> {
        if let Some((cached, surface)) = self.background.as_ref() {
            if cached == reference {
                return surface.clone();
            }
        }
        let surface = load_background_image(reference);
        self.background = Some((reference.to_string(), surface.clone()));
        surface
    }
}

fn load_background_image(reference: &str) -> Option<ImageSurface> {
    let path = if reference.starts_with("file://") {
        gio::File::for_uri(reference).path()
    } else {
        Some(PathBuf::from(reference))
    };
    let Some(path) = path else {
        tracing::warn!(reference, "background image is not a local file");
        return None;
    };
    let image = match load_image_file(&path) {
        Ok(image) => image,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to load background image");
            return None;
        }
    };
    match rgba_image_to_surface(image.pixels()) {
        Ok(surface) => Some(surface),
        Err(err) => {
            tracing::warn!(%err, "failed to upload background image");
            None
        }
    }
}

/// Paints `scene` with `context` in canvas CSS pixels; `device_scale` is the
/// number of device pixels per CSS pixel on the target.
pub fn paint_scene(
    context: &Context,
    scene: &Scene,
    image: Option<&SourceImage>,
    cache: &mut SurfaceCache,
    device_scale: f64,
) -> PaintResult<()> {
    let canvas = Rect::from_size(scene.canvas.size);
    context.save()?;
    context.rectangle(canvas.x, canvas.y, canvas.width, canvas.height);
    context.clip();

    paint_background(context, &scene.canvas.background, canvas, cache)?;
    if let Some(label) = scene.canvas.empty_label {
        let (cx, cy) = canvas.center();
        paint_centered_text(context, label, (cx, cy), 20.0, FontWeight::Normal, EMPTY_LABEL_COLOR)?;
    }
    paint_wrapper(context, &scene.frame, image, cache, device_scale)?;
    if let Some(watermark) = scene.watermark.as_ref() {
        paint_watermark(context, watermark)?;
    }

    context.restore()?;
    Ok(())
}

/// Fills a rounded `size` tile with `background`, as the panel swatches show it.
pub fn paint_swatch(
    context: &Context,
    background: &Background,
    size: Size,
    radius: f64,
) -> PaintResult<()> {
    if size.is_empty() {
        return Ok(());
    }
    let tile = Rect::from_size(size);
    context.save()?;
    rounded_rect(context, tile, radius);
    context.clip();
    paint_background(context, background, tile, &mut SurfaceCache::new())?;
    context.restore()?;
    Ok(())
}

fn paint_background(
    context: &Context,
    background: &Background,
    canvas: Rect,
    cache: &mut SurfaceCache,
) -> PaintResult<()> {
    match background {
        Background::Solid(color) => fill_rect(context, canvas, *color),
        Background::Gradient(gradient) => {
            let ((x0, y0), (x1, y1)) = gradient.line(canvas.width, canvas.height);
            let pattern = cairo::LinearGradient::new(x0, y0, x1, y1);
            for stop in &gradient.stops {
                let (r, g, b, a) = stop.color.to_cairo_rgba();
                pattern.add_color_stop_rgba(stop.offset, r, g, b, a);
            }
            context.set_source(&pattern)?;
            context.rectangle(canvas.x, canvas.y, canvas.width, canvas.height);
            context.fill()?;
            Ok(())
        }
        Background::Image(reference) => {
            let Some(surface) = cache.background_surface(reference) else {
                return fill_rect(context, canvas, FALLBACK_BACKGROUND);
            };
            let source = Size::new(f64::from(surface.width()), f64::from(surface.height()));
            paint_surface_cover(context, &surface, Rect::from_size(source), canvas)
        }
    }
}

/// Draws `crop` of `surface` stretched over `target`.
fn paint_surface_cover(
    context: &Context,
    surface: &ImageSurface,
    crop: Rect,
    target: Rect,
) -> PaintResult<()> {
    if crop.size().is_empty() || target.size().is_empty() {
        return Ok(());
    }
    let (crop, factor) = {
        let factor = (target.width / crop.width).max(target.height / crop.height);
        let visible = Size::new(target.width / factor, target.height / factor);
        (crop.centered(visible), factor)
    };
    context.save()?;
    context.rectangle(target.x, target.y, target.width, target.height);
    context.clip();
    context.translate(target.x, target.y);
    context.scale(factor, factor);
    context.set_source_surface(surface, -crop.x, -crop.y)?;
    context.source().set_filter(Filter::Good);
    context.paint()?;
    context.restore()?;
    Ok(())
}

fn paint_wrapper(
    context: &Context,
    frame: &FrameLayer,
    image: Option<&SourceImage>,
    cache: &mut SurfaceCache,
    device_scale: f64,
) -> PaintResult<()> {
    if frame.rect.size().is_empty() {
        return Ok(());
    }
    let margin = frame.style.shadow.map(|shadow| shadow.extent()).unwrap_or(0.0) + 1.0;
    let extent = Size::new(
        frame.rect.width + margin * 2.0,
        frame.rect.height + margin * 2.0,
    );
    let pixel_width = (extent.width * device_scale).ceil() as u32;
    let pixel_height = (extent.height * device_scale).ceil() as u32;

    let mut wrapper = blank_surface(pixel_width, pixel_height)?;
    {
        let local = Context::new(&wrapper)?;
        local.scale(device_scale, device_scale);
        local.translate(margin, margin);
        if let Some(shadow) = frame.style.shadow.as_ref() {
            paint_shadow(
                &local,
                frame,
                shadow,
                margin,
                device_scale,
                (pixel_width, pixel_height),
            )?;
        }
        paint_frame(&local, frame, image, cache)?;
    }

    let transform = &frame.style.transform;
    let origin = (frame.rect.x - margin, frame.rect.y - margin);
    context.save()?;
    context.scale(1.0 / device_scale, 1.0 / device_scale);
    if transform.is_identity() {
        context.set_source_surface(&wrapper, origin.0 * device_scale, origin.1 * device_scale)?;
        context.paint()?;
        context.restore()?;
        return Ok(());
    }

    let projection = Projection::new(transform);
    let (cx, cy) = frame.rect.center();
    let (half_w, half_h) = (extent.width / 2.0, extent.height / 2.0);
    let corners = [
        (-half_w, -half_h),
        (half_w, -half_h),
        (half_w, half_h),
        (-half_w, half_h),
    ];
    let mut quad = [(0.0, 0.0); 4];
    for (slot, corner) in quad.iter_mut().zip(corners) {
        let Some((x, y)) = projection.project(corner) else {
            tracing::debug!(%transform, "frame rotated behind the viewer; skipping");
            context.restore()?;
            return Ok(());
        };
        *slot = ((cx + x) * device_scale, (cy + y) * device_scale);
    }

    let raster = surface_to_premultiplied(&mut wrapper)?;
    match warp_image(&raster, quad) {
        Some(warped) => {
            let surface = premultiplied_to_surface(&warped.image)?;
            context.set_source_surface(
                &surface,
                f64::from(warped.origin.0),
                f64::from(warped.origin.1),
            )?;
            context.paint()?;
        }
        None => tracing::debug!(%transform, "degenerate frame projection; skipping"),
    }
    context.restore()?;
    Ok(())
}

fn paint_shadow(
    context: &Context,
    frame: &FrameLayer,
    shadow: &DropShadow,
    margin: f64,
    device_scale: f64,
    (width, height): (u32, u32),
) -> PaintResult<()> {
    let mut layer = blank_surface(width, height)?;
    {
        let local = Context::new(&layer)?;
        local.scale(device_scale, device_scale);
        local.translate(margin + shadow.offset_x, margin + shadow.offset_y);
        rounded_rect(
            &local,
            Rect::from_size(frame.rect.size()),
            frame.style.corner_radius,
        );
        local.set_source_rgba(0.0, 0.0, 0.0, shadow.opacity);
        local.fill()?;
    }
    let sigma = (shadow.blur / 2.0 * device_scale) as f32;
    let blurred = blur_premultiplied(&surface_to_premultiplied(&mut layer)?, sigma);
    let blurred = premultiplied_to_surface(&blurred)?;

    context.save()?;
    context.translate(-margin, -margin);
    context.scale(1.0 / device_scale, 1.0 / device_scale);
    context.set_source_surface(&blurred, 0.0, 0.0)?;
    context.paint()?;
    context.restore()?;
    Ok(())
}

/// Frame body in frame-local coordinates.
fn paint_frame(
    context: &Context,
    frame: &FrameLayer,
    image: Option<&SourceImage>,
    cache: &mut SurfaceCache,
) -> PaintResult<()> {
    let bounds = Rect::from_size(frame.rect.size());
    context.save()?;
    rounded_rect(context, bounds, frame.style.corner_radius);
    context.clip();

    match &frame.chrome {
        Chrome::IPhone(shell) => paint_device_body(context, shell)?,
        _ => fill_rect(context, bounds, Rgba::WHITE)?,
    }
    paint_content(context, frame, image, cache)?;
    match &frame.chrome {
        Chrome::None => {}
        Chrome::MacWindow(chrome) => paint_mac_window(context, chrome)?,
        Chrome::Windows(chrome) => paint_windows_window(context, chrome)?,
        Chrome::Code(chrome) => paint_code_window(context, chrome)?,
        Chrome::IPhone(shell) => paint_device_overlay(context, shell)?,
    }

    context.restore()?;
    Ok(())
}

fn paint_content(
    context: &Context,
    frame: &FrameLayer,
    image: Option<&SourceImage>,
    cache: &mut SurfaceCache,
) -> PaintResult<()> {
    let rect = frame.content.rect;
    if rect.size().is_empty() {
        return Ok(());
    }
    match (&frame.content.fill, image) {
        (ContentFill::Image { crop, .. }, Some(image)) => {
            let surface = cache.source_surface(image)?;
            paint_surface_cover(context, &surface, *crop, rect)
        }
        (ContentFill::Placeholder { label, background, text }, _) => {
            fill_rect(context, rect, *background)?;
            paint_centered_text(context, label, rect.center(), 14.0, FontWeight::Normal, *text)
        }
        (ContentFill::Image { .. }, None) => Ok(()),
    }
}

fn paint_title_bar(context: &Context, bar: &TitleBar) -> PaintResult<()> {
    fill_rect(context, bar.rect, bar.fill)?;
    let border = Rect::new(bar.rect.x, bar.rect.y + bar.rect.height - 1.0, bar.rect.width, 1.0);
    fill_rect(context, border, bar.bottom_border)
}

fn paint_traffic_lights(context: &Context, lights: &[TrafficLight]) -> PaintResult<()> {
    for light in lights {
        context.new_sub_path();
        context.arc(
            light.center.0,
            light.center.1,
            light.radius,
            0.0,
            std::f64::consts::TAU,
        );
        set_color(context, light.fill);
        match light.border {
            Some(border) => {
                context.fill_preserve()?;
                set_color(context, border);
                context.set_line_width(0.5);
                context.stroke()?;
            }
            None => context.fill()?,
        }
    }
    Ok(())
}

fn paint_label_pill(context: &Context, pill: &LabelPill) -> PaintResult<()> {
    rounded_rect(context, pill.rect, 4.0);
    set_color(context, pill.fill);
    context.fill()?;

    let family = if pill.monospace { MONO } else { SANS };
    context.select_font_face(family, FontSlant::Normal, FontWeight::Normal);
    context.set_font_size(pill.font_size);
    let extents = context.text_extents(pill.label)?;
    let dot_space = if pill.dot.is_some() { 10.0 } else { 0.0 };
    let (cx, cy) = pill.rect.center();
    let left = cx - (extents.x_advance() + dot_space) / 2.0;

    if let Some(dot) = pill.dot {
        context.new_sub_path();
        context.arc(left + 3.0, cy, 3.0, 0.0, std::f64::consts::TAU);
        set_color(context, dot);
        context.fill()?;
    }
    set_color(context, pill.text);
    context.move_to(
        left + dot_space,
        cy - extents.y_bearing() - extents.height() / 2.0,
    );
    context.show_text(pill.label)?;
    Ok(())
}

fn paint_mac_window(context: &Context, chrome: &MacWindowChrome) -> PaintResult<()> {
    paint_title_bar(context, &chrome.bar)?;
    paint_traffic_lights(context, &chrome.lights)?;
    paint_label_pill(context, &chrome.address_bar)
}

fn paint_windows_window(context: &Context, chrome: &WindowsChrome) -> PaintResult<()> {
    paint_title_bar(context, &chrome.bar)?;
    for glyph in &chrome.glyphs {
        paint_caption_glyph(context, glyph)?;
    }
    Ok(())
}

fn paint_caption_glyph(context: &Context, glyph: &CaptionGlyph) -> PaintResult<()> {
    let rect = glyph.rect;
    set_color(context, glyph.color);
    context.set_line_width(1.0);
    match glyph.kind {
        CaptionGlyphKind::Minimize => {
            let y = rect.y + rect.height / 2.0;
            context.move_to(rect.x, y);
            context.line_to(rect.x + rect.width, y);
        }
        CaptionGlyphKind::Maximize => {
            context.rectangle(rect.x + 0.5, rect.y + 0.5, rect.width - 1.0, rect.height - 1.0);
        }
        CaptionGlyphKind::Close => {
            context.move_to(rect.x, rect.y);
            context.line_to(rect.x + rect.width, rect.y + rect.height);
            context.move_to(rect.x + rect.width, rect.y);
            context.line_to(rect.x, rect.y + rect.height);
        }
    }
    context.stroke()?;
    Ok(())
}

fn paint_code_window(context: &Context, chrome: &CodeChrome) -> PaintResult<()> {
    paint_title_bar(context, &chrome.bar)?;
    paint_traffic_lights(context, &chrome.lights)?;
    paint_label_pill(context, &chrome.file_tab)
}

fn paint_device_body(context: &Context, shell: &DeviceShell) -> PaintResult<()> {
    fill_rect(context, shell.outer, shell.bezel_color)?;
    let screen = shell.outer.inset(shell.bezel);
    rounded_rect(context, screen, (shell.corner_radius - shell.bezel).max(0.0));
    set_color(context, shell.screen_fill);
    context.fill()?;
    Ok(())
}

fn paint_device_overlay(context: &Context, shell: &DeviceShell) -> PaintResult<()> {
    fill_rect(context, shell.status_bar, shell.screen_fill)?;
    fill_rect(context, shell.home_bar, shell.screen_fill)?;

    context.select_font_face(SANS, FontSlant::Normal, FontWeight::Bold);
    context.set_font_size(10.0);
    let extents = context.text_extents(shell.status_time)?;
    let baseline = shell.battery.y + shell.battery.height / 2.0
        - extents.y_bearing()
        - extents.height() / 2.0;
    set_color(context, Rgba::BLACK);
    context.move_to(shell.status_bar.x + 24.0, baseline);
    context.show_text(shell.status_time)?;

    rounded_rect(context, shell.battery, 2.0);
    set_color(context, Rgba::BLACK);
    context.fill()?;
    rounded_rect(context, shell.battery_cap, 1.0);
    set_color(context, Rgba::BLACK.with_alpha(0.3));
    context.fill()?;

    rounded_rect(context, shell.home_indicator, 2.0);
    set_color(context, Rgba::BLACK.with_alpha(0.2));
    context.fill()?;

    paint_notch(context, shell)
}

fn paint_notch(context: &Context, shell: &DeviceShell) -> PaintResult<()> {
    let notch = shell.notch;
    let radius = 16.0;
    context.new_sub_path();
    context.move_to(notch.x, notch.y);
    context.line_to(notch.x + notch.width, notch.y);
    context.arc(
        notch.x + notch.width - radius,
        notch.y + notch.height - radius,
        radius,
        0.0,
        std::f64::consts::FRAC_PI_2,
    );
    context.arc(
        notch.x + radius,
        notch.y + notch.height - radius,
        radius,
        std::f64::consts::FRAC_PI_2,
        std::f64::consts::PI,
    );
    context.close_path();
    set_color(context, shell.bezel_color);
    context.fill()?;

    rounded_rect(context, shell.notch_speaker, 2.0);
    set_color(context, Rgba::rgb(0x2a, 0x2a, 0x2a));
    context.fill()?;
    Ok(())
}

fn paint_watermark(context: &Context, watermark: &Watermark) -> PaintResult<()> {
    context.save()?;
    context.select_font_face(SANS, FontSlant::Normal, FontWeight::Bold);
    context.set_font_size(10.0);
    let extents = context.text_extents(watermark.label)?;
    let (right, bottom) = watermark.anchor;
    let left = right - WATERMARK_MARK - WATERMARK_GAP - extents.x_advance();
    let top = bottom - WATERMARK_MARK;

    context.push_group();
    rounded_rect(
        context,
        Rect::new(left, top, WATERMARK_MARK, WATERMARK_MARK),
        2.0,
    );
    set_color(context, Rgba::WHITE.with_alpha(0.5));
    context.fill()?;
    set_color(context, Rgba::WHITE);
    context.move_to(
        left + WATERMARK_MARK + WATERMARK_GAP,
        top + WATERMARK_MARK / 2.0 - extents.y_bearing() - extents.height() / 2.0,
    );
    context.show_text(watermark.label)?;
    context.pop_group_to_source()?;
    context.set_operator(cairo::Operator::Over);
    context.paint_with_alpha(watermark.opacity)?;
    context.restore()?;
    Ok(())
}

fn paint_centered_text(
    context: &Context,
    text: &str,
    (cx, cy): (f64, f64),
    size: f64,
    weight: FontWeight,
    color: Rgba,
) -> PaintResult<()> {
    context.select_font_face(SANS, FontSlant::Normal, weight);
    context.set_font_size(size);
    let extents = context.text_extents(text)?;
    set_color(context, color);
    context.move_to(
        cx - extents.x_bearing() - extents.width() / 2.0,
        cy - extents.y_bearing() - extents.height() / 2.0,
    );
    context.show_text(text)?;
    Ok(())
}

fn fill_rect(context: &Context, rect: Rect, color: Rgba) -> PaintResult<()> {
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
    set_color(context, color);
    context.fill()?;
    Ok(())
}

fn set_color(context: &Context, color: Rgba) {
    let (r, g, b, a) = color.to_cairo_rgba();
    context.set_source_rgba(r, g, b, a);
}

fn rounded_rect(context: &Context, rect: Rect, radius: f64) {
    let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    if radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;
    context.new_sub_path();
    context.arc(
        right - radius,
        rect.y + radius,
        radius,
        -std::f64::consts::FRAC_PI_2,
        0.0,
    );
    context.arc(
        right - radius,
        bottom - radius,
        radius,
        0.0,
        std::f64::consts::FRAC_PI_2,
    );
    context.arc(
        rect.x + radius,
        bottom - radius,
        radius,
        std::f64::consts::FRAC_PI_2,
        std::f64::consts::PI,
    );
    context.arc(
        rect.x + radius,
        rect.y + radius,
        radius,
        std::f64::consts::PI,
        3.0 * std::f64::consts::FRAC_PI_2,
    );
    context.close_path();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::raster::unpremultiply;
    use crate::compositor::scene::derive_scene;
    use crate::model::{BackgroundType, ConfigPatch, EditorConfig, WindowTheme};
    use crate::store::test_image;

    fn render(config: &EditorConfig, image: Option<&SourceImage>) -> image::RgbaImage {
        let scene = derive_scene(config, image.map(SourceImage::size));
        let width = scene.canvas.size.width.ceil() as u32;
        let height = scene.canvas.size.height.ceil() as u32;
        let mut surface = blank_surface(width, height).expect("canvas surface");
        {
            let context = Context::new(&surface).expect("canvas context");
            paint_scene(&context, &scene, image, &mut SurfaceCache::new(), 1.0)
                .expect("paint should succeed");
        }
        unpremultiply(&surface_to_premultiplied(&mut surface).expect("readback"))
    }

    #[test]
    fn solid_background_fills_canvas_corners() {
        let config = ConfigPatch::new()
            .background(BackgroundType::Solid, "#ef4444")
            .show_watermark(false)
            .applied_to(&EditorConfig::default());
        let pixels = render(&config, None);
        assert_eq!(pixels.get_pixel(1, 1).0, [0xef, 0x44, 0x44, 255]);
    }

    #[test]
    fn image_content_is_painted_inside_frame() {
        let image = test_image();
        let config = ConfigPatch::new()
            .window_theme(WindowTheme::None)
            .shadow(0.0)
            .border_radius(0.0)
            .applied_to(&EditorConfig::default());
        let pixels = render(&config, Some(&image));
        let scene = derive_scene(&config, Some(image.size()));
        let (cx, cy) = scene.frame.rect.center();
        assert_eq!(pixels.get_pixel(cx as u32, cy as u32).0, [40, 80, 120, 255]);
    }

    #[test]
    fn unreadable_background_image_falls_back_to_neutral_fill() {
        let config = ConfigPatch::new()
            .background(BackgroundType::Image, "url(/nonexistent/screenglow-bg.png)")
            .show_watermark(false)
            .applied_to(&EditorConfig::default());
        let pixels = render(&config, None);
        let expected = FALLBACK_BACKGROUND;
        assert_eq!(
            pixels.get_pixel(1, 1).0,
            [expected.r, expected.g, expected.b, 255]
        );
    }

    #[test]
    fn rotated_frame_paints_without_error() {
        let image = test_image();
        let config = ConfigPatch::new()
            .rotate_x(20.0)
            .rotate_y(-20.0)
            .scale(0.9)
            .shadow(50.0)
            .applied_to(&EditorConfig::default());
        let pixels = render(&config, Some(&image));
        assert!(pixels.width() > 0);
    }

    #[test]
    fn swatch_is_clipped_to_rounded_tile() {
        let mut surface = blank_surface(32, 32).expect("swatch surface");
        {
            let context = Context::new(&surface).expect("swatch context");
            paint_swatch(
                &context,
                &Background::Solid(Rgba::rgb(0x3b, 0x82, 0xf6)),
                Size::new(32.0, 32.0),
                8.0,
            )
            .expect("paint swatch");
        }
        let pixels = unpremultiply(&surface_to_premultiplied(&mut surface).expect("readback"));
        assert_eq!(pixels.get_pixel(16, 16).0, [0x3b, 0x82, 0xf6, 255]);
        assert_eq!(pixels.get_pixel(0, 0).0[3], 0);
    }
}
