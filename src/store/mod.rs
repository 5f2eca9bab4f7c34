//! The single owner of editable state: configuration, loaded image and export progress.

mod coordinator;
mod trigger;

pub use coordinator::{Coordinator, StoreListener};
pub use trigger::ExportTriggerWatch;

use thiserror::Error;

use crate::model::{ConfigPatch, EditorConfig};
use crate::source::SourceImage;
use crate::state::{ExportEvent, ExportPhase, ExportStateMachine, StateError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no image loaded; nothing to export")]
    NoImage,
    #[error(transparent)]
    State(#[from] StateError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Immutable view handed to dependents after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub config: EditorConfig,
    pub image: Option<SourceImage>,
    pub revision: u64,
    pub export_trigger: u64,
    pub export_phase: ExportPhase,
}

impl StoreSnapshot {
    pub fn is_busy(&self) -> bool {
        self.export_phase.is_busy()
    }
}

#[derive(Debug, Default)]
pub struct EditorStore {
    config: EditorConfig,
    image: Option<SourceImage>,
    revision: u64,
    export_trigger: u64,
    export: ExportStateMachine,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    /// Bumped by every configuration or image change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn export_trigger(&self) -> u64 {
        self.export_trigger
    }

    pub fn export_phase(&self) -> ExportPhase {
        self.export.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.export.is_busy()
    }

    /// Shallow-merges `patch`; values are stored as given, range limits are the controls' job.
    pub fn update_config(&mut self, patch: &ConfigPatch) {
        if patch.is_empty() {
            return;
        }
        patch.apply(&mut self.config);
        self.revision += 1;
        tracing::debug!(
            fields = ?patch.field_names(),
            revision = self.revision,
            "applied config patch"
        );
    }

    pub fn set_image(&mut self, image: Option<SourceImage>) {
        match image.as_ref() {
            Some(image) => tracing::info!(
                width = image.width(),
                height = image.height(),
                "source image replaced"
            ),
            None => tracing::info!("source image cleared"),
        }
        self.image = image;
        self.revision += 1;
    }

    /// Starts one export and returns the new trigger value.
    pub fn request_export(&mut self) -> StoreResult<u64> {
        if self.image.is_none() {
            return Err(StoreError::NoImage);
        }
        self.export.transition(ExportEvent::Request)?;
        self.export_trigger += 1;
        tracing::info!(trigger = self.export_trigger, "export requested");
        Ok(self.export_trigger)
    }

    pub fn mark_export_settled(&mut self) -> StoreResult<()> {
        self.export.transition(ExportEvent::Settled)?;
        Ok(())
    }

    /// Clears the busy flag; a completion with no export in flight is ignored.
    pub fn on_export_complete(&mut self) {
        if !self.export.is_busy() {
            tracing::debug!("export completion without an export in flight");
            return;
        }
        if let Err(err) = self.export.transition(ExportEvent::Finished) {
            tracing::warn!(?err, "failed to finish export");
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            config: self.config.clone(),
            image: self.image.clone(),
            revision: self.revision,
            export_trigger: self.export_trigger,
            export_phase: self.export.phase(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_image() -> SourceImage {
    crate::source::decode_image_bytes(crate::source::png_fixture(8, 6, [40, 80, 120, 255]))
        .expect("fixture image should decode")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BackgroundType, WindowTheme, PRESET_GRADIENTS};

    #[test]
    fn update_config_merges_patch_and_bumps_revision() {
        let mut store = EditorStore::new();
        store.update_config(&ConfigPatch::new().shadow(55.0));
        assert_eq!(store.config().shadow, 55.0);
        assert_eq!(store.revision(), 1);

        store.update_config(&ConfigPatch::new());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn set_image_replaces_previous_image() {
        let mut store = EditorStore::new();
        let first = test_image();
        let second = test_image();
        store.set_image(Some(first));
        store.set_image(Some(second.clone()));
        assert_eq!(store.image(), Some(&second));
        store.set_image(None);
        assert!(store.image().is_none());
    }

    #[test]
    fn export_request_without_image_is_refused() {
        let mut store = EditorStore::new();
        assert!(matches!(store.request_export(), Err(StoreError::NoImage)));
        assert_eq!(store.export_trigger(), 0);
        assert!(!store.is_busy());
    }

    #[test]
    fn export_trigger_increments_and_busy_flag_follows_completion() {
        let mut store = EditorStore::new();
        store.set_image(Some(test_image()));

        assert_eq!(store.request_export().expect("first export"), 1);
        assert!(store.is_busy());
        store.mark_export_settled().expect("settle");
        assert_eq!(store.export_phase(), ExportPhase::Rasterizing);
        store.on_export_complete();
        assert!(!store.is_busy());

        assert_eq!(store.request_export().expect("second export"), 2);
        store.on_export_complete();
        assert_eq!(store.export_trigger(), 2);
        assert!(!store.is_busy());
    }

    #[test]
    fn export_request_while_busy_is_not_queued() {
        let mut store = EditorStore::new();
        store.set_image(Some(test_image()));
        store.request_export().expect("first export");

        let err = store.request_export().expect_err("second export should fail");
        assert!(matches!(err, StoreError::State(_)));
        assert_eq!(store.export_trigger(), 1);
    }

    #[test]
    fn completion_without_export_is_ignored() {
        let mut store = EditorStore::new();
        store.on_export_complete();
        assert_eq!(store.export_phase(), ExportPhase::Idle);
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut store = EditorStore::new();
        store.update_config(
            &ConfigPatch::new()
                .window_theme(WindowTheme::Code)
                .background(BackgroundType::Gradient, PRESET_GRADIENTS[7]),
        );
        let snapshot = store.snapshot();
        assert_eq!(snapshot.config.window_theme, WindowTheme::Code);
        assert_eq!(snapshot.config.background_value, PRESET_GRADIENTS[7]);
        assert_eq!(snapshot.revision, 1);
        assert!(!snapshot.is_busy());
    }
}
