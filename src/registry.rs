use std::sync::{Mutex, MutexGuard, PoisonError};

/// An ordered collection of the live instances of one tracked type.
///
/// Each tracked type owns its own registry (a distinct static per type), so
/// two tracked types never observe each other's instances. Instances are
/// appended at construction, in creation order, exactly once each.
///
/// Draining is snapshot-then-clear: the current sequence is taken and the
/// registry reset to empty before any per-instance teardown runs, so teardown
/// logic that indirectly constructs new instances of the same type never
/// re-observes entries that are already being deleted.
pub struct InstanceRegistry<T> {
    instances: Mutex<Vec<T>>,
}

impl<T> InstanceRegistry<T> {
    /// Creates an empty registry. Usable in statics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instances: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends an instance. Called once per construction, after the instance
    /// is fully initialized.
    pub fn register(&self, instance: T) {
        self.lock().push(instance);
    }

    /// The number of currently registered instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no instances are currently registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Visits the registered instances in registration order.
    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        for instance in self.lock().iter() {
            f(instance);
        }
    }

    /// Takes the current instance sequence, leaving the registry empty.
    ///
    /// The registry is already empty by the time the snapshot is returned;
    /// registrations performed while the caller processes the snapshot land
    /// in the fresh sequence.
    #[must_use]
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.lock())
    }

    /// Discards all registered instances without acting on them.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<T> Default for InstanceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
