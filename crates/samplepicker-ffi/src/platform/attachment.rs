use std::sync::Mutex;

/// Slot for the state the host hands over at runtime, replaced each time
/// the host re-attaches.
pub struct Attachment<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Attachment<T> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn attach(&self, value: T) {
        *self.lock() = Some(value);
    }

    pub fn detach(&self) {
        *self.lock() = None;
    }

    /// Runs `f` on the attached value; `None` while nothing is attached.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.lock().as_ref().map(f)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<T>> {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
