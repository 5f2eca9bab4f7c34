use std::cell::RefCell;
use std::rc::Rc;

use super::{EditorStore, StoreResult, StoreSnapshot};
use crate::model::{ConfigPatch, EditorConfig};
use crate::source::SourceImage;

pub type StoreListener = Rc<dyn Fn(&StoreSnapshot)>;

/// UI-thread handle over the store. Every mutation notifies listeners once the
/// store borrow is released, so listeners may read or mutate it again.
#[derive(Clone, Default)]
pub struct Coordinator {
    store: Rc<RefCell<EditorStore>>,
    listeners: Rc<RefCell<Vec<StoreListener>>>,
}

impl Coordinator {
    pub fn new(store: EditorStore) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn subscribe(&self, listener: StoreListener) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn config(&self) -> EditorConfig {
        self.store.borrow().config().clone()
    }

    pub fn image(&self) -> Option<SourceImage> {
        self.store.borrow().image().cloned()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.borrow().snapshot()
    }

    pub fn is_busy(&self) -> bool {
        self.store.borrow().is_busy()
    }

    pub fn update_config(&self, patch: ConfigPatch) {
        if patch.is_empty() {
            return;
        }
        self.store.borrow_mut().update_config(&patch);
        self.notify();
    }

    pub fn set_image(&self, image: Option<SourceImage>) {
        self.store.borrow_mut().set_image(image);
        self.notify();
    }

    pub fn request_export(&self) -> StoreResult<u64> {
        let trigger = self.store.borrow_mut().request_export()?;
        self.notify();
        Ok(trigger)
    }

    pub fn mark_export_settled(&self) -> StoreResult<()> {
        self.store.borrow_mut().mark_export_settled()
    }

    pub fn on_export_complete(&self) {
        self.store.borrow_mut().on_export_complete();
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BackgroundType, PRESET_GRADIENTS, PRESET_SOLIDS};
    use crate::store::test_image;
    use std::cell::Cell;

    #[test]
    fn listeners_see_each_update_in_issue_order() {
        let coordinator = Coordinator::new(EditorStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            coordinator.subscribe(Rc::new(move |snapshot: &StoreSnapshot| {
                seen.borrow_mut().push(snapshot.config.padding);
            }));
        }

        coordinator.update_config(ConfigPatch::new().padding(10.0));
        coordinator.update_config(ConfigPatch::new().padding(20.0));
        coordinator.update_config(ConfigPatch::new());

        assert_eq!(*seen.borrow(), vec![10.0, 20.0]);
        assert_eq!(coordinator.config().padding, 20.0);
    }

    #[test]
    fn swatch_updates_never_expose_mismatched_background_pairs() {
        let coordinator = Coordinator::new(EditorStore::new());
        let mismatches = Rc::new(Cell::new(0_u32));
        {
            let mismatches = mismatches.clone();
            coordinator.subscribe(Rc::new(move |snapshot: &StoreSnapshot| {
                let value = snapshot.config.background_value.as_str();
                let consistent = match snapshot.config.background_type {
                    BackgroundType::Solid => value.starts_with('#'),
                    BackgroundType::Gradient => value.starts_with("linear-gradient("),
                    BackgroundType::Image => value.starts_with("url("),
                };
                if !consistent {
                    mismatches.set(mismatches.get() + 1);
                }
            }));
        }

        coordinator.update_config(
            ConfigPatch::new().background(BackgroundType::Solid, PRESET_SOLIDS[2]),
        );
        coordinator.update_config(
            ConfigPatch::new().background(BackgroundType::Gradient, PRESET_GRADIENTS[4]),
        );

        assert_eq!(mismatches.get(), 0);
        let config = coordinator.config();
        assert_eq!(config.background_type, BackgroundType::Gradient);
        assert_eq!(config.background_value, PRESET_GRADIENTS[4]);
    }

    #[test]
    fn listeners_may_read_the_store_during_notification() {
        let coordinator = Coordinator::new(EditorStore::new());
        let observed_busy = Rc::new(Cell::new(false));
        {
            let observed_busy = observed_busy.clone();
            let handle = coordinator.clone();
            coordinator.subscribe(Rc::new(move |_: &StoreSnapshot| {
                observed_busy.set(handle.is_busy());
            }));
        }

        coordinator.set_image(Some(test_image()));
        coordinator.request_export().expect("export request");
        assert!(observed_busy.get());

        coordinator.on_export_complete();
        assert!(!observed_busy.get());
    }
}
