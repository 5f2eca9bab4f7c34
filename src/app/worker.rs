use std::cell::Cell;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crate::source::{load_dropped_file, load_image_file, SourceImage, SourceResult};

pub(super) const ACTION_RESULT_POLL_INTERVAL: Duration = Duration::from_millis(24);

/// Runs `work` on a background thread and delivers its result on the GTK main loop.
pub(super) fn spawn_worker_action<T, W, H>(work: W, mut on_result: H)
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    H: FnMut(T) + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    std::thread::spawn(move || {
        let result = work();
        let _ = tx.send(result);
    });

    gtk4::glib::timeout_add_local(ACTION_RESULT_POLL_INTERVAL, move || match rx.try_recv() {
        Ok(result) => {
            on_result(result);
            gtk4::glib::ControlFlow::Break
        }
        Err(mpsc::TryRecvError::Empty) => gtk4::glib::ControlFlow::Continue,
        Err(mpsc::TryRecvError::Disconnected) => {
            tracing::warn!("worker thread exited without a result");
            gtk4::glib::ControlFlow::Break
        }
    });
}

/// Where a screenshot came from; drops carry the advertised content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ImageRequest {
    Picked(PathBuf),
    Dropped {
        path: PathBuf,
        content_type: Option<String>,
    },
}

impl ImageRequest {
    pub(super) fn load(&self) -> SourceResult<SourceImage> {
        match self {
            Self::Picked(path) => load_image_file(path),
            Self::Dropped { path, content_type } => {
                load_dropped_file(path, content_type.as_deref())
            }
        }
    }
}

/// Numbers image requests so a slow decode cannot replace a newer pick or drop.
#[derive(Debug, Default)]
pub(super) struct ImageRequestSequence {
    latest: Cell<u64>,
}

impl ImageRequestSequence {
    pub(super) fn begin(&self) -> u64 {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        next
    }

    pub(super) fn is_latest(&self, sequence: u64) -> bool {
        self.latest.get() == sequence
    }
}

/// Decodes off the UI thread; `on_loaded` runs on the main loop.
pub(super) fn load_image_in_background<H>(request: ImageRequest, on_loaded: H)
where
    H: FnMut(SourceResult<SourceImage>) + 'static,
{
    tracing::debug!(?request, "decoding screenshot");
    spawn_worker_action(move || request.load(), on_loaded);
}
