use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// Ordered set of callbacks for one kind of session event.
///
/// Registrations are independent: adding the same closure twice delivers
/// every payload twice, and each [`Subscription`] removes only its own entry.
pub struct Listeners<T: 'static> {
    registry: Rc<RefCell<Registry<T>>>,
}

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

#[cfg_attr(not(test), allow(dead_code))]
trait Unregister {
    fn unregister(&mut self, id: u64) -> bool;
}

impl<T> Unregister for Registry<T> {
    fn unregister(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T: 'static> Listeners<T> {
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, callback));
            id
        };

        let registry: Rc<RefCell<dyn Unregister>> = self.registry.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&registry),
        }
    }

    /// Delivers `payload` to every callback registered when the call starts.
    ///
    /// Callbacks may subscribe or unsubscribe while being notified. A callback
    /// that re-enters itself through a nested emit is skipped for that payload.
    pub fn emit(&self, payload: &T) -> usize {
        let snapshot: Vec<Callback<T>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        let mut delivered = 0;
        for callback in snapshot {
            match callback.try_borrow_mut() {
                Ok(mut callback) => {
                    (&mut *callback)(payload);
                    delivered += 1;
                }
                Err(_) => {
                    tracing::warn!(
                        code = "SESSION_LISTENER_REENTERED",
                        "skipping listener already running for this event"
                    );
                }
            }
        }

        delivered
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for one registration. Dropping it keeps the listener registered.
#[must_use = "keep the subscription to be able to remove the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<dyn Unregister>>,
}

impl Subscription {
    /// Removes exactly this registration. Returns false when it was already
    /// gone or the owning session no longer exists.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };

        let removed = registry.borrow_mut().unregister(self.id);
        removed
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
