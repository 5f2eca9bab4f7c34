/// Remembers the last export trigger value acted upon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportTriggerWatch {
    last_seen: u64,
}

impl ExportTriggerWatch {
    pub const fn new() -> Self {
        Self { last_seen: 0 }
    }

    /// True exactly when `trigger` moved past the last observed value.
    pub fn observe(&mut self, trigger: u64) -> bool {
        if trigger > self.last_seen {
            self.last_seen = trigger;
            return true;
        }
        false
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_fires_once_per_increment() {
        let mut watch = ExportTriggerWatch::new();
        assert!(!watch.observe(0));
        assert!(watch.observe(1));
        assert!(!watch.observe(1));
        assert!(watch.observe(3));
        assert!(!watch.observe(2));
        assert_eq!(watch.last_seen(), 3);
    }
}
