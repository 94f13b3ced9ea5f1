//! The handful of operators bindings and their callers compose with.
mod collect;
mod from_iter;
mod map;
mod merge;
mod share_replay;
mod take_until;
mod try_map;

pub use collect::Collect;
pub use from_iter::{from_iter, of, FromIter};
pub use map::Map;
pub use merge::Merge;
pub use share_replay::ShareReplay;
pub use take_until::TakeUntil;
pub use try_map::TryMap;

use super::{Observer, Subscribable, Subscriber};

/// Operator methods, available on every [Subscribable](../trait.Subscribable.html).
pub trait SubscribableExt: Subscribable + Sized {
    fn map<U, F>(self, map: F) -> Map<Self, F>
    where
        F: Fn(Self::Item) -> U + 'static,
        U: 'static,
    {
        Map::new(self, map)
    }

    /// Maps each value with a fallible function.  An `Err` is delivered through the error channel, and ends the stream.
    fn try_map<U, F>(self, map: F) -> TryMap<Self, F>
    where
        F: Fn(Self::Item) -> Result<U, Self::Error> + 'static,
        U: 'static,
    {
        TryMap::new(self, map)
    }

    /// Forwards values from both sources.  Completes once both have completed.
    fn merge<S>(self, other: S) -> Merge<Self, S>
    where
        S: Subscribable<Item = Self::Item, Error = Self::Error>,
    {
        Merge::new(self, other)
    }

    /// Collects every value, and emits them as a single `Vec` when the source completes.
    fn collect(self) -> Collect<Self> {
        Collect::new(self)
    }

    /// Shares a single upstream subscription between every subscriber, replaying all past values to late subscribers.
    ///
    /// The upstream is subscribed on first use, and stays connected when subscribers leave.
    fn share_replay(self) -> ShareReplay<Self>
    where
        Self::Item: Clone,
        Self::Error: Clone,
    {
        ShareReplay::new(self)
    }

    /// Mirrors the source until the notifier emits or completes, then completes.
    fn take_until<N>(self, notifier: N) -> TakeUntil<Self, N>
    where
        N: Subscribable,
    {
        TakeUntil::new(self, notifier)
    }
}

impl<S: Subscribable> SubscribableExt for S {}

/// Forwards events from an inner subscription into a downstream subscriber.
pub(crate) struct Forward<T, E> {
    downstream: Subscriber<T, E>,
}

impl<T, E> Forward<T, E> {
    pub(crate) fn new(downstream: Subscriber<T, E>) -> Self {
        Self { downstream }
    }
}

impl<T, E> Observer<T, E> for Forward<T, E> {
    fn next(&mut self, value: T) {
        self.downstream.next(value)
    }

    fn error(&mut self, err: E) {
        self.downstream.error(err)
    }

    fn complete(&mut self) {
        self.downstream.complete()
    }
}

/// Creates an inner subscriber, linked to the downstream so revoking the downstream revokes it too.
pub(crate) fn link<T, E, U, F, O>(downstream: &Subscriber<U, F>, observer: O) -> Subscriber<T, E>
where
    O: Observer<T, E> + 'static,
{
    let inner = Subscriber::new(observer);
    downstream.subscription().add(inner.subscription().clone());
    inner
}
