use std::cell::RefCell;
use std::rc::Rc;

use crate::compositor::{derive_scene, paint_scene, preview_zoom, SurfaceCache};
use crate::geometry::Size;
use crate::source::SourceImage;
use crate::store::Coordinator;
use gtk4::prelude::*;
use gtk4::{gdk, gio, DrawingArea, DropTarget};

use super::control_panel::ImageRequestHandler;
use super::worker::ImageRequest;

const DROP_ACTIVE_CLASS: &str = "drop-active";

/// Where the canvas lands inside the drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct StagePlacement {
    pub(super) zoom: f64,
    pub(super) offset_x: f64,
    pub(super) offset_y: f64,
}

/// Centers the canvas in `viewport` at the preview fit zoom.
pub(super) fn stage_placement(canvas: Size, viewport: Size) -> StagePlacement {
    let zoom = preview_zoom(canvas, viewport);
    StagePlacement {
        zoom,
        offset_x: ((viewport.width - canvas.width * zoom) / 2.0).round(),
        offset_y: ((viewport.height - canvas.height * zoom) / 2.0).round(),
    }
}

#[derive(Clone)]
pub(super) struct PreviewStage {
    pub(super) area: DrawingArea,
}

pub(super) fn build_preview_stage(
    coordinator: &Coordinator,
    on_image_request: ImageRequestHandler,
) -> PreviewStage {
    let area = DrawingArea::new();
    area.set_hexpand(true);
    area.set_vexpand(true);
    area.add_css_class("preview-stage");

    let cache = Rc::new(RefCell::new(SurfaceCache::new()));
    let coordinator_for_draw = coordinator.clone();
    area.set_draw_func(move |area, context, width, height| {
        if width <= 0 || height <= 0 {
            return;
        }
        let snapshot = coordinator_for_draw.snapshot();
        let scene = derive_scene(
            &snapshot.config,
            snapshot.image.as_ref().map(SourceImage::size),
        );
        let viewport = Size::new(f64::from(width), f64::from(height));
        let placement = stage_placement(scene.canvas.size, viewport);
        let device_scale = placement.zoom * f64::from(area.scale_factor().max(1));

        context.save().ok();
        context.translate(placement.offset_x, placement.offset_y);
        context.scale(placement.zoom, placement.zoom);
        let painted = paint_scene(
            context,
            &scene,
            snapshot.image.as_ref(),
            &mut cache.borrow_mut(),
            device_scale,
        );
        context.restore().ok();
        if let Err(err) = painted {
            tracing::warn!(%err, revision = snapshot.revision, "failed to paint preview");
        }
    });

    area.add_controller(build_drop_target(&area, on_image_request));
    PreviewStage { area }
}

fn build_drop_target(area: &DrawingArea, on_image_request: ImageRequestHandler) -> DropTarget {
    let drop_target = DropTarget::new(gio::File::static_type(), gdk::DragAction::COPY);
    {
        let area = area.clone();
        drop_target.connect_enter(move |_, _, _| {
            area.add_css_class(DROP_ACTIVE_CLASS);
            gdk::DragAction::COPY
        });
    }
    {
        let area = area.clone();
        drop_target.connect_leave(move |_| {
            area.remove_css_class(DROP_ACTIVE_CLASS);
        });
    }
    {
        let area = area.clone();
        drop_target.connect_drop(move |_, value, _, _| {
            area.remove_css_class(DROP_ACTIVE_CLASS);
            let Ok(file) = value.get::<gio::File>() else {
                tracing::debug!("ignoring drop without a file");
                return false;
            };
            let Some(path) = file.path() else {
                tracing::debug!(uri = %file.uri(), "ignoring non-local drop");
                return false;
            };
            on_image_request(ImageRequest::Dropped {
                path,
                content_type: query_content_type(&file),
            });
            true
        });
    }
    drop_target
}

fn query_content_type(file: &gio::File) -> Option<String> {
    match file.query_info(
        "standard::content-type",
        gio::FileQueryInfoFlags::NONE,
        gio::Cancellable::NONE,
    ) {
        Ok(info) => info.content_type().map(|content_type| content_type.to_string()),
        Err(err) => {
            tracing::debug!(%err, "failed to query dropped file content type");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_canvas_is_centered_at_full_size() {
        let placement = stage_placement(Size::new(400.0, 300.0), Size::new(1000.0, 800.0));
        assert_eq!(placement.zoom, 1.0);
        assert_eq!((placement.offset_x, placement.offset_y), (300.0, 250.0));
    }

    #[test]
    fn large_canvas_shrinks_to_fit_with_margin() {
        let placement = stage_placement(Size::new(2000.0, 1000.0), Size::new(1064.0, 800.0));
        assert!((placement.zoom - 0.5).abs() < 1e-9);
        assert_eq!(placement.offset_x, 32.0);
        assert_eq!(placement.offset_y, 150.0);
    }
}
