use super::{subscriber::Terminal, Subscribable, Subscriber};
use crate::StreamError;
use std::{
    cell::RefCell,
    fmt::Debug,
    rc::{Rc, Weak},
};

struct SubjectState<T, E> {
    subscribers: Vec<(usize, Subscriber<T, E>)>,
    next_id: usize,
    terminal: Option<Terminal<E>>,
}

/// A hot, multicast source.  Every value pushed with `next` is delivered to each live subscriber, in subscription order.
///
/// Once `complete` or `error` is called, the subject is terminated: further values are ignored,
/// and late subscribers receive the terminal event immediately.
///
/// Clones share the same subscribers.
///
/// Example:
/// ```
/// use safeline::prelude::*;
/// use std::{cell::Cell, rc::Rc};
///
/// let subject: Subject<u32> = Subject::new();
/// let total = Rc::new(Cell::new(0));
///
/// let sum = total.clone();
/// let handle = subject.subscribe(move |value: u32| sum.set(sum.get() + value));
///
/// subject.next(2);
/// handle.unsubscribe();
/// subject.next(40);
///
/// assert_eq!(2, total.get());
/// ```
pub struct Subject<T, E = StreamError> {
    state: Rc<RefCell<SubjectState<T, E>>>,
}

impl<T, E> Clone for Subject<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T, E> Default for Subject<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Subject<T, E> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SubjectState {
                subscribers: Vec::new(),
                next_id: 0,
                terminal: None,
            })),
        }
    }

    /// The number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.state.borrow().terminal.is_some()
    }
}

impl<T: Clone, E: Clone> Subject<T, E> {
    pub fn next(&self, value: T) {
        let targets: Vec<Subscriber<T, E>> = {
            let state = self.state.borrow();
            if state.terminal.is_some() {
                return;
            }

            state.subscribers.iter().map(|(_, s)| s.clone()).collect()
        };

        for target in targets {
            target.next(value.clone());
        }
    }

    pub fn error(&self, err: E) {
        for target in self.terminate(Terminal::Error(err.clone())) {
            target.error(err.clone());
        }
    }

    pub fn complete(&self) {
        for target in self.terminate(Terminal::Complete) {
            target.complete();
        }
    }

    fn terminate(&self, terminal: Terminal<E>) -> Vec<Subscriber<T, E>> {
        let mut state = self.state.borrow_mut();
        if state.terminal.is_some() {
            return Vec::new();
        }

        state.terminal = Some(terminal);
        std::mem::take(&mut state.subscribers)
            .into_iter()
            .map(|(_, s)| s)
            .collect()
    }
}

impl<T, E> Subscribable for Subject<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Item = T;
    type Error = E;

    fn attach(&self, subscriber: Subscriber<T, E>) {
        if subscriber.is_closed() {
            return;
        }

        let terminal = self.state.borrow().terminal.clone();
        if let Some(terminal) = terminal {
            subscriber.terminate(terminal);
            return;
        }

        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, subscriber.clone()));
            id
        };

        let state: Weak<RefCell<SubjectState<T, E>>> = Rc::downgrade(&self.state);
        subscriber.subscription().add_teardown(move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().subscribers.retain(|(key, _)| *key != id);
            }
        });
    }
}

impl<T, E> Debug for Subject<T, E> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        fmt.debug_struct("Subject")
            .field("subscribers", &state.subscribers.len())
            .field("terminated", &state.terminal.is_some())
            .finish()
    }
}
