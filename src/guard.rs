use crate::signal::Cancelled;
use log::debug;
use pin_project::pin_project;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

/// A future which wraps another future, and resolves to `None` as soon as its owner is destroyed.
///
/// Created by [LifecycleOwner::guard](./struct.LifecycleOwner.html#method.guard).  This extends the
/// owner's lifetime to async work: a guarded future is never polled again once the owner's
/// cancellation signal has fired.
#[pin_project]
#[must_use = "futures do nothing unless polled"]
pub struct Guarded<F: Future> {
    #[pin]
    future: F,
    name: String,
    cancelled: Cancelled,
}

impl<F: Future> Guarded<F> {
    pub(crate) fn new(name: String, future: F, cancelled: Cancelled) -> Self {
        debug!("START {}", &name);

        Self {
            future,
            name,
            cancelled,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl<F: Future> Future for Guarded<F> {
    type Output = Option<F::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        if Pin::new(&mut *this.cancelled).poll(cx).is_ready() {
            debug!("CANCEL {}", this.name);
            return Poll::Ready(None);
        }

        if let Poll::Ready(output) = this.future.poll(cx) {
            debug!("END {}", this.name);
            return Poll::Ready(Some(output));
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_completes, assert_times_out, LifecycleOwner};
    use std::future::{pending, ready};

    #[tokio::test]
    async fn resolves_with_output_while_owner_lives() {
        let owner = LifecycleOwner::new();

        let output = assert_completes!(owner.guard("ready", ready(42)));
        assert_eq!(Some(42), output);
    }

    #[tokio::test]
    async fn destroy_cancels_pending_future() {
        let owner = LifecycleOwner::new().named("Poller");
        let mut guarded = Box::pin(owner.guard("poll", pending::<()>()));
        assert_eq!("Poller/poll", guarded.name());

        assert_times_out!(guarded.as_mut());

        owner.destroy();
        let output = assert_completes!(guarded);
        assert_eq!(None, output);
    }

    #[tokio::test]
    async fn destroyed_owner_cancels_before_first_poll() {
        let owner = LifecycleOwner::new();
        owner.destroy();

        let output = assert_completes!(owner.guard("late", ready(1)));
        assert_eq!(None, output);
    }
}
