// ── Listener registry ──
//
// Plain observer list owned by the Poller. Callbacks take no arguments:
// a notified listener re-reads the shared snapshot itself. Invocation
// order across listeners is unspecified.

use std::sync::{Arc, Mutex, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ListenerSet {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

/// Set of no-argument callbacks invoked after every poll cycle.
///
/// Safe to call [`add`](Self::add) or deregister while
/// [`notify_all`](Self::notify_all) is iterating: the callback set is
/// snapshotted before any callback runs, so mutations take effect on the
/// next notification.
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<ListenerSet>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. The returned handle deregisters it, either
    /// explicitly or on drop.
    pub fn add(&self, callback: impl Fn() + Send + Sync + 'static) -> ListenerHandle {
        let mut set = self.inner.lock().expect("listener lock poisoned");
        let id = set.next_id;
        set.next_id += 1;
        set.callbacks.push((id, Arc::new(callback)));
        ListenerHandle {
            id,
            set: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every registered callback once.
    pub fn notify_all(&self) {
        let snapshot: Vec<Callback> = {
            let set = self.inner.lock().expect("listener lock poisoned");
            set.callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in snapshot {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("listener lock poisoned").callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deregistration handle for one listener registration.
///
/// [`deregister`](Self::deregister) removes exactly one registration;
/// calling it twice is a no-op. Dropping the handle deregisters too, so a
/// registration can never outlive its owning adapter.
pub struct ListenerHandle {
    id: u64,
    set: Weak<Mutex<ListenerSet>>,
}

impl ListenerHandle {
    pub fn deregister(&self) {
        if let Some(inner) = self.set.upgrade() {
            let mut set = inner.lock().expect("listener lock poisoned");
            set.callbacks.retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.deregister();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn notify_all_invokes_every_listener() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&count);
        let _h1 = registry.add(move || {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&count);
        let _h2 = registry.add(move || {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        registry.notify_all();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn deregister_removes_exactly_one() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&count);
        let h1 = registry.add(move || {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&count);
        let _h2 = registry.add(move || {
            c2.fetch_add(10, Ordering::SeqCst);
        });

        h1.deregister();
        registry.notify_all();
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn double_deregister_is_noop() {
        let registry = ListenerRegistry::new();
        let handle = registry.add(|| {});
        handle.deregister();
        handle.deregister();
        assert!(registry.is_empty());
    }

    #[test]
    fn drop_deregisters() {
        let registry = ListenerRegistry::new();
        {
            let _handle = registry.add(|| {});
            assert_eq!(registry.len(), 1);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn deregister_during_notify_is_safe() {
        let registry = Arc::new(ListenerRegistry::new());
        let handle = Arc::new(Mutex::new(None::<ListenerHandle>));

        let handle_clone = Arc::clone(&handle);
        let h = registry.add(move || {
            // Deregister ourselves from inside the callback.
            if let Some(h) = handle_clone.lock().unwrap().take() {
                h.deregister();
            }
        });
        *handle.lock().unwrap() = Some(h);

        registry.notify_all();
        assert!(registry.is_empty());
        registry.notify_all(); // no panic, nothing left to call
    }

    #[test]
    fn add_during_notify_takes_effect_next_cycle() {
        let registry = Arc::new(ListenerRegistry::new());
        let count = Arc::new(AtomicUsize::new(0));
        let late_handle = Arc::new(Mutex::new(None::<ListenerHandle>));

        let reg = Arc::clone(&registry);
        let c = Arc::clone(&count);
        let slot = Arc::clone(&late_handle);
        let _h = registry.add(move || {
            let c_inner = Arc::clone(&c);
            let h = reg.add(move || {
                c_inner.fetch_add(1, Ordering::SeqCst);
            });
            let mut guard = slot.lock().unwrap();
            if guard.is_none() {
                *guard = Some(h);
            }
        });

        registry.notify_all();
        // Listener added mid-notify was not invoked in the same cycle.
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
