use crate::{
    stream::{Observer, Subject, Subscribable, Subscriber},
    Subscription,
};
use log::trace;
use std::{cell::RefCell, rc::Rc};

struct ShareState<S: Subscribable> {
    source: S,
    subject: Subject<S::Item, S::Error>,
    buffer: Rc<RefCell<Vec<S::Item>>>,
    connection: RefCell<Option<Subscription>>,
}

/// A multicast wrapper around a source.  See [share_replay](./trait.SubscribableExt.html#method.share_replay).
///
/// Clones share the same upstream connection and replay buffer.
pub struct ShareReplay<S: Subscribable> {
    state: Rc<ShareState<S>>,
}

impl<S: Subscribable> Clone for ShareReplay<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<S> ShareReplay<S>
where
    S: Subscribable,
    S::Item: Clone,
    S::Error: Clone,
{
    pub fn new(source: S) -> Self {
        Self {
            state: Rc::new(ShareState {
                source,
                subject: Subject::new(),
                buffer: Rc::new(RefCell::new(Vec::new())),
                connection: RefCell::new(None),
            }),
        }
    }

    /// True once the upstream has been subscribed
    pub fn is_connected(&self) -> bool {
        self.state.connection.borrow().is_some()
    }

    fn connect(&self) {
        if self.is_connected() {
            return;
        }

        trace!("CONNECT share_replay");
        let observer = ReplayObserver {
            subject: self.state.subject.clone(),
            buffer: self.state.buffer.clone(),
        };

        // mark connected before subscribing, so a synchronous source can't connect twice
        *self.state.connection.borrow_mut() = Some(Subscription::closed());
        let connection = self.state.source.subscribe(observer);
        *self.state.connection.borrow_mut() = Some(connection);
    }
}

struct ReplayObserver<T, E> {
    subject: Subject<T, E>,
    buffer: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone, E: Clone> Observer<T, E> for ReplayObserver<T, E> {
    fn next(&mut self, value: T) {
        self.buffer.borrow_mut().push(value.clone());
        self.subject.next(value);
    }

    fn error(&mut self, err: E) {
        self.subject.error(err)
    }

    fn complete(&mut self) {
        self.subject.complete()
    }
}

impl<S> Subscribable for ShareReplay<S>
where
    S: Subscribable,
    S::Item: Clone,
    S::Error: Clone,
{
    type Item = S::Item;
    type Error = S::Error;

    fn attach(&self, downstream: Subscriber<S::Item, S::Error>) {
        let replay = self.state.buffer.borrow().clone();
        for value in replay {
            downstream.next(value);
        }

        self.state.subject.attach(downstream);
        self.connect();
    }
}
