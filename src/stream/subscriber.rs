use super::Observer;
use crate::Subscription;
use log::trace;
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt::Debug,
    rc::Rc,
};

pub(crate) enum Terminal<E> {
    Error(E),
    Complete,
}

impl<E: Clone> Clone for Terminal<E> {
    fn clone(&self) -> Self {
        match self {
            Terminal::Error(err) => Terminal::Error(err.clone()),
            Terminal::Complete => Terminal::Complete,
        }
    }
}

struct SubscriberInner<T, E> {
    observer: RefCell<Box<dyn Observer<T, E>>>,
    subscription: Subscription,
    stopped: Cell<bool>,
    queued: RefCell<VecDeque<T>>,
    deferred: RefCell<Option<Terminal<E>>>,
}

/// The guarded delivery endpoint of a single subscription.
///
/// Producers push into a `Subscriber`, never into the observer directly.  The subscriber:
/// - drops values once its handle is revoked,
/// - delivers at most one terminal event (error or completion), then revokes its own handle,
/// - queues values pushed while its observer is mid-callback, and delivers them in order once that callback returns,
/// - defers a terminal event raised mid-callback until the queued values have been delivered.
///
/// Clones share the same observer and handle.
pub struct Subscriber<T, E> {
    inner: Rc<SubscriberInner<T, E>>,
}

impl<T, E> Clone for Subscriber<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Subscriber<T, E> {
    pub fn new<O>(observer: O) -> Self
    where
        O: Observer<T, E> + 'static,
    {
        Self {
            inner: Rc::new(SubscriberInner {
                observer: RefCell::new(Box::new(observer)),
                subscription: Subscription::new(),
                stopped: Cell::new(false),
                queued: RefCell::new(VecDeque::new()),
                deferred: RefCell::new(None),
            }),
        }
    }

    /// The handle which revokes this subscriber
    pub fn subscription(&self) -> &Subscription {
        &self.inner.subscription
    }

    /// True once the subscriber has been revoked, or has received its terminal event
    pub fn is_closed(&self) -> bool {
        self.inner.stopped.get() || self.inner.subscription.is_closed()
    }

    pub fn next(&self, value: T) {
        if self.is_closed() {
            return;
        }

        self.inner.queued.borrow_mut().push_back(value);
        self.flush();
    }

    pub fn error(&self, err: E) {
        self.terminate(Terminal::Error(err));
    }

    pub fn complete(&self) {
        self.terminate(Terminal::Complete);
    }

    pub(crate) fn terminate(&self, terminal: Terminal<E>) {
        if self.is_closed() {
            return;
        }

        self.inner.stopped.set(true);
        *self.inner.deferred.borrow_mut() = Some(terminal);
        self.flush();
    }

    /// Delivers queued values, then the deferred terminal event.
    ///
    /// Returns early while the observer is mid-callback; the outer call drains whatever was queued meanwhile.
    fn flush(&self) {
        loop {
            if self.inner.subscription.is_closed() {
                self.inner.queued.borrow_mut().clear();
                self.inner.deferred.borrow_mut().take();
                return;
            }

            let mut observer = match self.inner.observer.try_borrow_mut() {
                Ok(observer) => observer,
                Err(_) => {
                    trace!("QUEUE re-entrant event for a busy subscriber");
                    return;
                }
            };

            let value = self.inner.queued.borrow_mut().pop_front();
            if let Some(value) = value {
                observer.next(value);
                continue;
            }

            let deferred = self.inner.deferred.borrow_mut().take();
            if let Some(terminal) = deferred {
                Self::deliver(&mut observer, terminal);
                drop(observer);
                self.inner.subscription.unsubscribe();
            }

            return;
        }
    }

    fn deliver(observer: &mut Box<dyn Observer<T, E>>, terminal: Terminal<E>) {
        match terminal {
            Terminal::Error(err) => observer.error(err),
            Terminal::Complete => observer.complete(),
        }
    }
}

impl<T, E> Observer<T, E> for Subscriber<T, E> {
    fn next(&mut self, value: T) {
        Subscriber::next(self, value)
    }

    fn error(&mut self, err: E) {
        Subscriber::error(self, err)
    }

    fn complete(&mut self) {
        Subscriber::complete(self)
    }
}

impl<T, E> Debug for Subscriber<T, E> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Subscriber")
            .field("closed", &self.is_closed())
            .field("subscription", &self.inner.subscription)
            .finish()
    }
}
