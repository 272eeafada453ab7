use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

/// Guards a process-wide initialisation so it runs exactly once no matter
/// how many components ask for it.
pub struct OneTimeSetup {
    once: Once,
}

impl OneTimeSetup {
    pub const fn new() -> Self {
        Self { once: Once::new() }
    }

    /// Runs `setup` on the first call only. Returns whether it ran now.
    pub fn run(&self, setup: impl FnOnce()) -> bool {
        let mut ran = false;
        self.once.call_once(|| {
            setup();
            ran = true;
        });
        ran
    }
}

impl Default for OneTimeSetup {
    fn default() -> Self {
        Self::new()
    }
}

/// Bumped whenever page layout may have changed (resize, font swap). Scroll
/// ranges cached against an older epoch must be re-resolved.
pub struct LayoutEpoch {
    value: AtomicU64,
}

impl LayoutEpoch {
    pub const fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn invalidate(&self) -> u64 {
        self.value.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for LayoutEpoch {
    fn default() -> Self {
        Self::new()
    }
}

pub static SCROLL_OBSERVER: OneTimeSetup = OneTimeSetup::new();
pub static LAYOUT_EPOCH: LayoutEpoch = LayoutEpoch::new();

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn setup_runs_once_across_repeated_mounts() {
        let setup = OneTimeSetup::new();
        let calls = Cell::new(0);

        let ran: Vec<bool> = (0..5)
            .map(|_| setup.run(|| calls.set(calls.get() + 1)))
            .collect();

        assert_eq!(calls.get(), 1);
        assert_eq!(ran, [true, false, false, false, false]);
    }

    #[test]
    fn run_reports_whether_it_executed() {
        let setup = OneTimeSetup::new();
        assert!(setup.run(|| {}));
        assert!(!setup.run(|| {}));
    }

    #[test]
    fn epoch_invalidation_is_observable() {
        let epoch = LayoutEpoch::new();
        let seen = epoch.current();
        assert_eq!(epoch.invalidate(), seen + 1);
        assert_ne!(epoch.current(), seen);
    }
}
