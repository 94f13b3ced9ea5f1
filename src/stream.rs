//! The push-based stream capability that bindings are layered on.
//!
//! Everything here runs synchronously on the caller's stack: pushing a value into a
//! [Subject](./struct.Subject.html) delivers it to every live subscriber before `next` returns.
//! Any other engine can be plugged in by implementing [Subscribable](./trait.Subscribable.html).
use crate::Subscription;

pub mod combinators;
mod observer;
mod subject;
mod subscriber;

pub use combinators::{from_iter, of, SubscribableExt};
pub use observer::Callbacks;
pub use subject::Subject;
pub use subscriber::Subscriber;

/// Receives the values, and the terminal event, of one subscription.
///
/// Any `FnMut(T)` closure is an observer which only handles values.  Use
/// [Callbacks](./struct.Callbacks.html) to attach error and completion handlers.
pub trait Observer<T, E> {
    fn next(&mut self, value: T);

    fn error(&mut self, err: E);

    fn complete(&mut self);
}

/// A producer which pushes a sequence of values, and eventually an error or completion, to its subscribers.
///
/// Implementations only provide `attach`, which connects a guarded
/// [Subscriber](./struct.Subscriber.html) to the producer.  The subscriber enforces delivery
/// rules (nothing after revoke, at most one terminal event), so producers can push blindly.
pub trait Subscribable {
    type Item: 'static;
    type Error: 'static;

    /// Connects the subscriber.  When the subscriber's handle is revoked, the producer must stop delivering to it.
    fn attach(&self, subscriber: Subscriber<Self::Item, Self::Error>);

    /// Subscribes the observer, returning the revocable handle.
    fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + 'static,
        Self: Sized,
    {
        let subscriber = Subscriber::new(observer);
        let subscription = subscriber.subscription().clone();
        self.attach(subscriber);
        subscription
    }
}

impl<S: Subscribable + ?Sized> Subscribable for &S {
    type Item = S::Item;
    type Error = S::Error;

    fn attach(&self, subscriber: Subscriber<Self::Item, Self::Error>) {
        (**self).attach(subscriber)
    }
}

impl<S: Subscribable + ?Sized> Subscribable for std::rc::Rc<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn attach(&self, subscriber: Subscriber<Self::Item, Self::Error>) {
        (**self).attach(subscriber)
    }
}
