use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::export::{
    run_export, CairoRasterizer, EncodedImage, ExportError, ExportOptions, ExportResult,
    ExportSink, SETTLE_DELAY,
};
use crate::storage::StorageError;
use crate::store::{Coordinator, ExportTriggerWatch, StoreSnapshot};

pub(super) type ExportFinished = Rc<dyn Fn(&ExportResult<PathBuf>)>;

/// Sink used when no export directory could be resolved at startup.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct DisabledExportSink;

impl ExportSink for DisabledExportSink {
    fn save(&self, _image: &EncodedImage, _file_name: &str) -> ExportResult<PathBuf> {
        Err(ExportError::Storage(StorageError::MissingHomeDirectory))
    }
}

/// Runs one export per trigger increment, after the settle delay.
pub(super) fn connect_export_runtime(
    coordinator: &Coordinator,
    sink: Rc<dyn ExportSink>,
    on_finished: ExportFinished,
) {
    let watch = Rc::new(Cell::new(ExportTriggerWatch::new()));
    let handle = coordinator.clone();
    coordinator.subscribe(Rc::new(move |snapshot: &StoreSnapshot| {
        let mut observed = watch.get();
        if !observed.observe(snapshot.export_trigger) {
            return;
        }
        watch.set(observed);
        tracing::debug!(
            trigger = snapshot.export_trigger,
            delay_ms = SETTLE_DELAY.as_millis() as u64,
            "export scheduled"
        );

        let coordinator = handle.clone();
        let sink = sink.clone();
        let on_finished = on_finished.clone();
        gtk4::glib::timeout_add_local_once(SETTLE_DELAY, move || {
            let result = run_export(
                &coordinator,
                &CairoRasterizer,
                sink.as_ref(),
                &ExportOptions::default(),
            );
            on_finished(&result);
        });
    }));
}

pub(super) fn export_status_text(result: &ExportResult<PathBuf>) -> String {
    match result {
        Ok(path) => {
            let name = path
                .file_name()
                .map(Path::new)
                .unwrap_or(path.as_path())
                .display();
            format!("Saved {name}")
        }
        Err(err) => format!("Export failed: {err}"),
    }
}
