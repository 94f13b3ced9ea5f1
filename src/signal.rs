use crate::{
    stream::{Observer, Subject, Subscribable, Subscriber},
    Subscription,
};
use futures_util::task::AtomicWaker;
use log::trace;
use std::{
    cell::Cell,
    convert::Infallible,
    fmt::Debug,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

/// A broadcast teardown notification.  Emits a single `()` value, then completes, when its owner is destroyed.
///
/// Callers can only listen: subscribe to it, gate other streams on it with
/// [subscribe_until](./trait.SafeSubscribe.html#method.subscribe_until), or await
/// [cancelled()](#method.cancelled).  Only the owning [LifecycleOwner](./struct.LifecycleOwner.html) can fire it.
///
/// Clones observe the same signal.
#[derive(Clone)]
pub struct CancellationSignal {
    subject: Subject<(), Infallible>,
    emissions: Rc<Cell<usize>>,
}

impl CancellationSignal {
    pub(crate) fn new() -> Self {
        Self {
            subject: Subject::new(),
            emissions: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn emit(&self) {
        self.emissions.set(self.emissions.get() + 1);
        self.subject.next(());
    }

    pub(crate) fn complete(&self) {
        self.subject.complete();
    }

    /// True once the signal has completed.  Listeners attached afterwards are completed immediately.
    pub fn is_terminated(&self) -> bool {
        self.subject.is_terminated()
    }

    /// How many times the signal has been fired.  Each `destroy()` fires it once.
    pub fn emit_count(&self) -> usize {
        self.emissions.get()
    }

    /// The number of listeners currently attached
    pub fn listener_count(&self) -> usize {
        self.subject.subscriber_count()
    }

    /// Returns a future which resolves once the signal has fired.
    ///
    /// Example:
    /// ```
    /// use safeline::prelude::*;
    ///
    /// let owner = LifecycleOwner::new();
    /// let cancelled = owner.signal().cancelled();
    ///
    /// owner.destroy();
    /// safeline::test::block_on(cancelled);
    /// ```
    pub fn cancelled(&self) -> Cancelled {
        Cancelled {
            signal: self.clone(),
            state: Rc::new(CancelledState {
                fired: Cell::new(false),
                waker: AtomicWaker::new(),
            }),
            listener: None,
        }
    }
}

impl Subscribable for CancellationSignal {
    type Item = ();
    type Error = Infallible;

    fn attach(&self, subscriber: Subscriber<(), Infallible>) {
        self.subject.attach(subscriber)
    }
}

impl Debug for CancellationSignal {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("CancellationSignal")
            .field("terminated", &self.is_terminated())
            .field("emissions", &self.emit_count())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

struct CancelledState {
    fired: Cell<bool>,
    waker: AtomicWaker,
}

impl CancelledState {
    fn fire(&self) {
        self.fired.set(true);
        self.waker.wake();
    }
}

struct Wake {
    state: Rc<CancelledState>,
}

impl Observer<(), Infallible> for Wake {
    fn next(&mut self, _value: ()) {
        self.state.fire()
    }

    fn error(&mut self, err: Infallible) {
        match err {}
    }

    fn complete(&mut self) {
        self.state.fire()
    }
}

/// A future which resolves when a [CancellationSignal](./struct.CancellationSignal.html) fires.
///
/// The listener is attached on first poll, and detached when the future is dropped.
#[must_use = "futures do nothing unless polled"]
pub struct Cancelled {
    signal: CancellationSignal,
    state: Rc<CancelledState>,
    listener: Option<Subscription>,
}

impl Cancelled {
    pub fn is_cancelled(&self) -> bool {
        self.state.fired.get() || self.signal.is_terminated()
    }
}

impl Future for Cancelled {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.is_cancelled() {
            return Poll::Ready(());
        }

        if this.listener.is_none() {
            trace!("LISTEN cancellation signal");
            let listener = this.signal.subscribe(Wake {
                state: this.state.clone(),
            });
            this.listener = Some(listener);
        }

        this.state.waker.register(cx.waker());

        // the signal may have fired between the first check and registration
        if this.is_cancelled() {
            return Poll::Ready(());
        }

        Poll::Pending
    }
}

impl Drop for Cancelled {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.unsubscribe();
        }
    }
}

impl Debug for Cancelled {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Cancelled")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
