use crate::Subscription;
use log::trace;
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt::Debug,
    rc::{Rc, Weak},
};

struct RegistryInner {
    handles: RefCell<HashMap<usize, Subscription>>,
    next_id: Cell<usize>,
}

/// An unordered set of subscription handles, owned by a [LifecycleOwner](./struct.LifecycleOwner.html).
///
/// A handle leaves the registry when it is revoked: either in bulk by `destroy()`, or individually
/// when it completes, fails, or is unsubscribed by the caller.
pub struct SubscriptionRegistry {
    inner: Rc<RegistryInner>,
}

impl SubscriptionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                handles: RefCell::new(HashMap::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Registers the handle, so it is revoked when the owner is destroyed.
    ///
    /// A handle which is already closed is accepted and immediately dropped.
    pub fn add(&self, handle: Subscription) {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        self.inner.handles.borrow_mut().insert(id, handle.clone());

        let registry: Weak<RegistryInner> = Rc::downgrade(&self.inner);
        handle.add_teardown(move || {
            if let Some(registry) = registry.upgrade() {
                registry.handles.borrow_mut().remove(&id);
            }
        });
    }

    /// The number of registered handles which have not been revoked
    pub fn len(&self) -> usize {
        self.inner.handles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.handles.borrow().is_empty()
    }

    pub fn contains(&self, handle: &Subscription) -> bool {
        self.inner
            .handles
            .borrow()
            .values()
            .any(|registered| registered.same_handle(handle))
    }

    /// Empties the registry, and revokes every handle it held.
    ///
    /// A panicking teardown is logged, and does not prevent the remaining handles from being revoked.
    /// Returns the number of handles revoked.
    pub(crate) fn revoke_all(&self) -> usize {
        let handles: Vec<Subscription> = self
            .inner
            .handles
            .borrow_mut()
            .drain()
            .map(|(_id, handle)| handle)
            .collect();

        let count = handles.len();
        let failed = handles
            .into_iter()
            .filter(|handle| !handle.unsubscribe_isolated())
            .count();

        trace!("REVOKE {} handles ({} failed)", count, failed);
        count
    }
}

impl Debug for SubscriptionRegistry {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("SubscriptionRegistry")
            .field("len", &self.len())
            .finish()
    }
}
