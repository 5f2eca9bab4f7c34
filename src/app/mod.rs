use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::AppResult;
use crate::export::{ExportResult, ExportSink};
use crate::source::{SourceError, SourceImage, SourceResult};
use crate::store::{Coordinator, EditorStore, StoreSnapshot};
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, Box as GtkBox, Orientation};

mod bootstrap;
mod control_panel;
mod export_runtime;
mod preview_stage;
mod runtime_css;
mod worker;

use self::bootstrap::*;
use self::control_panel::*;
use self::export_runtime::*;
use self::preview_stage::*;
use self::runtime_css::*;
use self::worker::*;

const APPLICATION_ID: &str = "io.github.screenglow.ScreenGlow";
const WINDOW_TITLE: &str = "ScreenGlow";

/// Replaces the active image on success; failed, refused or superseded inputs leave the store untouched.
fn apply_loaded_image(
    coordinator: &Coordinator,
    requests: &ImageRequestSequence,
    sequence: u64,
    result: SourceResult<SourceImage>,
) {
    if !requests.is_latest(sequence) {
        tracing::debug!(sequence, "discarding superseded screenshot load");
        return;
    }
    match result {
        Ok(image) => {
            tracing::info!(
                id = image.id(),
                width = image.width(),
                height = image.height(),
                "screenshot ready"
            );
            coordinator.set_image(Some(image));
        }
        Err(SourceError::UnsupportedContentType { content_type }) => {
            tracing::debug!(content_type = content_type.as_str(), "ignoring non-image input");
        }
        Err(err) => {
            tracing::warn!(%err, "failed to load screenshot");
        }
    }
}

fn image_request_handler(coordinator: &Coordinator) -> ImageRequestHandler {
    let coordinator = coordinator.clone();
    let requests = Rc::new(ImageRequestSequence::default());
    Rc::new(move |request: ImageRequest| {
        let coordinator = coordinator.clone();
        let requests = requests.clone();
        let sequence = requests.begin();
        load_image_in_background(request, move |result| {
            apply_loaded_image(&coordinator, &requests, sequence, result);
        });
    })
}

pub struct App {
    coordinator: Coordinator,
}

impl App {
    pub fn new() -> Self {
        Self {
            coordinator: Coordinator::new(EditorStore::new()),
        }
    }

    pub fn start(&mut self) -> AppResult<()> {
        gtk4::init()?;
        let bootstrap = bootstrap_app_runtime();
        let app_config = bootstrap.app_config;
        let sink: Rc<dyn ExportSink> = match initialize_storage_service(&app_config) {
            Some(storage_service) => Rc::new(storage_service),
            None => Rc::new(DisabledExportSink),
        };

        tracing::info!("starting gtk runtime");
        let application = Application::new(
            Some(APPLICATION_ID),
            gtk4::gio::ApplicationFlags::NON_UNIQUE,
        );
        let coordinator = self.coordinator.clone();
        let activate_once = Rc::new(Cell::new(false));

        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            let gtk_settings = gtk4::Settings::default();
            let theme_mode = resolve_runtime_theme_mode(app_config.theme, gtk_settings.as_ref());
            let ResolvedThemeRuntime {
                style_tokens,
                color_tokens,
            } = resolve_theme_runtime(&app_config, theme_mode);
            tracing::info!(
                requested_mode = ?app_config.theme,
                resolved_mode = ?theme_mode,
                "resolved runtime theme mode"
            );
            let motion_enabled = gtk_settings
                .as_ref()
                .map(|settings| settings.is_gtk_enable_animations())
                .unwrap_or(true);
            install_runtime_css(style_tokens, &color_tokens, motion_enabled);

            let window = ApplicationWindow::new(app);
            window.add_css_class("screenglow-root");
            window.set_title(Some(WINDOW_TITLE));
            window.set_default_size(
                style_tokens.window_default_width,
                style_tokens.window_default_height,
            );
            window.set_size_request(style_tokens.window_min_width, style_tokens.window_min_height);

            let on_image_request = image_request_handler(&coordinator);
            let panel = Rc::new(build_control_panel(&ControlPanelContext {
                style_tokens,
                coordinator: coordinator.clone(),
                window: window.clone(),
                on_image_request: on_image_request.clone(),
            }));
            let stage = build_preview_stage(&coordinator, on_image_request);

            let layout = GtkBox::new(Orientation::Horizontal, 0);
            layout.append(&panel.root);
            layout.append(&stage.area);
            window.set_child(Some(&layout));

            {
                let panel = panel.clone();
                let area = stage.area.clone();
                coordinator.subscribe(Rc::new(move |snapshot: &StoreSnapshot| {
                    panel.sync(snapshot);
                    area.queue_draw();
                }));
            }
            {
                let panel = panel.clone();
                connect_export_runtime(
                    &coordinator,
                    sink.clone(),
                    Rc::new(move |result: &ExportResult<PathBuf>| {
                        panel.set_status_text(&export_status_text(result));
                    }),
                );
            }
            panel.sync(&coordinator.snapshot());

            tracing::info!("presenting editor window");
            window.present();
        });

        application.run_with_args(&gtk_launch_args());
        Ok(())
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_image;

    #[test]
    fn non_image_input_leaves_store_unchanged() {
        let coordinator = Coordinator::new(EditorStore::new());
        let requests = ImageRequestSequence::default();
        let before = coordinator.snapshot();
        apply_loaded_image(
            &coordinator,
            &requests,
            requests.begin(),
            Err(SourceError::UnsupportedContentType {
                content_type: "text/plain".to_string(),
            }),
        );
        assert_eq!(coordinator.snapshot(), before);
    }

    #[test]
    fn unreadable_file_leaves_previous_image_active() {
        let coordinator = Coordinator::new(EditorStore::new());
        let image = test_image();
        coordinator.set_image(Some(image.clone()));

        let requests = ImageRequestSequence::default();
        let missing = ImageRequest::Picked(PathBuf::from("/nonexistent/screenglow-missing.png"));
        apply_loaded_image(&coordinator, &requests, requests.begin(), missing.load());
        assert_eq!(coordinator.image().map(|current| current.id()), Some(image.id()));
    }

    #[test]
    fn loaded_image_replaces_previous_one() {
        let coordinator = Coordinator::new(EditorStore::new());
        coordinator.set_image(Some(test_image()));
        let requests = ImageRequestSequence::default();
        let replacement = test_image();
        apply_loaded_image(&coordinator, &requests, requests.begin(), Ok(replacement.clone()));
        assert_eq!(
            coordinator.image().map(|current| current.id()),
            Some(replacement.id())
        );
    }

    #[test]
    fn slow_load_does_not_replace_a_newer_image() {
        let coordinator = Coordinator::new(EditorStore::new());
        let requests = ImageRequestSequence::default();
        let large = requests.begin();
        let small = requests.begin();

        let newer = test_image();
        apply_loaded_image(&coordinator, &requests, small, Ok(newer.clone()));
        apply_loaded_image(&coordinator, &requests, large, Ok(test_image()));
        assert_eq!(
            coordinator.image().map(|current| current.id()),
            Some(newer.id())
        );
    }
}
