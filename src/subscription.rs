//! The revocable handle returned by every subscribe call.
use log::{error, trace};
use std::{
    any::Any,
    cell::{Cell, RefCell},
    fmt::Debug,
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

enum Teardown {
    Action(Box<dyn FnOnce()>),
    Child(Subscription),
}

impl Teardown {
    fn run(self) {
        match self {
            Teardown::Action(action) => action(),
            Teardown::Child(child) => child.unsubscribe(),
        }
    }
}

struct SubscriptionInner {
    closed: Cell<bool>,
    teardowns: RefCell<Vec<Teardown>>,
}

/// A revocable subscription handle.
///
/// Clones share the same underlying state, so revoking any clone revokes them all.
/// Revocation is idempotent and terminal: `unsubscribe` runs every teardown exactly once,
/// and a closed handle never reopens.
///
/// Example:
/// ```
/// use safeline::Subscription;
///
/// let subscription = Subscription::new();
/// subscription.unsubscribe();
/// subscription.unsubscribe();
/// assert!(subscription.is_closed());
/// ```
#[derive(Clone)]
#[must_use = "dropping the handle does not revoke it, but you lose the ability to revoke it early"]
pub struct Subscription {
    inner: Rc<SubscriptionInner>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SubscriptionInner {
                closed: Cell::new(false),
                teardowns: RefCell::new(Vec::new()),
            }),
        }
    }

    /// A handle which is already revoked
    pub fn closed() -> Self {
        let subscription = Self::new();
        subscription.inner.closed.set(true);
        subscription
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Revokes the handle.  Calling this more than once is a no-op.
    ///
    /// A panicking teardown propagates, and the teardowns after it do not run.
    /// Owners revoke through an isolated path which runs every teardown regardless.
    pub fn unsubscribe(&self) {
        if self.inner.closed.replace(true) {
            return;
        }

        let teardowns = std::mem::take(&mut *self.inner.teardowns.borrow_mut());
        trace!("UNSUBSCRIBE ({} teardowns)", teardowns.len());

        for teardown in teardowns {
            teardown.run();
        }
    }

    /// Revokes the handle, running each teardown (and each child's teardowns) under `catch_unwind`.
    ///
    /// Returns false if any teardown panicked.  The handle is closed, and every teardown has run, either way.
    pub(crate) fn unsubscribe_isolated(&self) -> bool {
        if self.inner.closed.replace(true) {
            return true;
        }

        let teardowns = std::mem::take(&mut *self.inner.teardowns.borrow_mut());
        trace!("UNSUBSCRIBE isolated ({} teardowns)", teardowns.len());

        let mut clean = true;
        for teardown in teardowns {
            let ran = match teardown {
                Teardown::Child(child) => child.unsubscribe_isolated(),
                Teardown::Action(action) => match catch_unwind(AssertUnwindSafe(action)) {
                    Ok(()) => true,
                    Err(panic) => {
                        error!("teardown panicked during revoke: {}", panic_message(&*panic));
                        false
                    }
                },
            };

            clean &= ran;
        }

        clean
    }

    /// Links a child handle, which is revoked together with this one.
    ///
    /// If this handle is already closed, the child is revoked immediately.
    pub fn add(&self, child: Subscription) {
        if Rc::ptr_eq(&self.inner, &child.inner) || child.is_closed() {
            return;
        }

        if self.is_closed() {
            child.unsubscribe();
            return;
        }

        self.inner.teardowns.borrow_mut().push(Teardown::Child(child));
    }

    /// Registers an action which runs once, when this handle is revoked.
    ///
    /// If this handle is already closed, the action runs immediately.
    pub fn add_teardown<F>(&self, teardown: F)
    where
        F: FnOnce() + 'static,
    {
        if self.is_closed() {
            teardown();
            return;
        }

        self.inner
            .teardowns
            .borrow_mut()
            .push(Teardown::Action(Box::new(teardown)));
    }

    pub(crate) fn same_handle(&self, other: &Subscription) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string panic>".to_string())
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Subscription {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .field("teardowns", &self.inner.teardowns.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Subscription;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn unsubscribe_is_idempotent() {
        let runs = Rc::new(Cell::new(0));
        let subscription = Subscription::new();

        let counter = runs.clone();
        subscription.add_teardown(move || counter.set(counter.get() + 1));

        subscription.unsubscribe();
        subscription.unsubscribe();

        assert!(subscription.is_closed());
        assert_eq!(1, runs.get());
    }

    #[test]
    fn clones_share_state() {
        let subscription = Subscription::new();
        let clone = subscription.clone();

        clone.unsubscribe();
        assert!(subscription.is_closed());
        assert!(subscription.same_handle(&clone));
    }

    #[test]
    fn children_are_revoked_with_parent() {
        let parent = Subscription::new();
        let child = Subscription::new();
        let sibling = Subscription::new();

        parent.add(child.clone());
        parent.unsubscribe();

        assert!(child.is_closed());
        assert!(!sibling.is_closed());
    }

    #[test]
    fn add_to_closed_parent_revokes_immediately() {
        let parent = Subscription::closed();
        let child = Subscription::new();
        parent.add(child.clone());
        assert!(child.is_closed());

        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        parent.add_teardown(move || flag.set(true));
        assert!(ran.get());
    }

    #[test]
    fn revoking_child_leaves_parent_open() {
        let parent = Subscription::new();
        let child = Subscription::new();
        parent.add(child.clone());

        child.unsubscribe();
        assert!(!parent.is_closed());
    }

    #[test]
    fn isolated_unsubscribe_reports_panics() {
        let subscription = Subscription::new();
        subscription.add_teardown(|| panic!("teardown failed"));

        assert!(!subscription.unsubscribe_isolated());
        assert!(subscription.is_closed());
        assert!(Subscription::new().unsubscribe_isolated());
    }

    #[test]
    fn isolated_unsubscribe_runs_the_teardowns_after_a_panic() {
        let runs = Rc::new(Cell::new(0));
        let subscription = Subscription::new();
        let child = Subscription::new();

        let (before, after, nested) = (runs.clone(), runs.clone(), runs.clone());
        subscription.add_teardown(move || before.set(before.get() + 1));
        subscription.add_teardown(|| panic!("teardown failed"));
        subscription.add_teardown(move || after.set(after.get() + 1));
        child.add_teardown(|| panic!("child teardown failed"));
        child.add_teardown(move || nested.set(nested.get() + 1));
        subscription.add(child.clone());

        assert!(!subscription.unsubscribe_isolated());
        assert_eq!(3, runs.get());
        assert!(child.is_closed());
        assert!(subscription.unsubscribe_isolated());
    }
}
