use super::link;
use crate::stream::{Observer, Subscribable, Subscriber};
use std::{cell::Cell, rc::Rc};

pub struct Merge<S1, S2> {
    first: S1,
    second: S2,
}

impl<S1, S2> Merge<S1, S2> {
    pub fn new(first: S1, second: S2) -> Self {
        Self { first, second }
    }
}

impl<S1: Clone, S2: Clone> Clone for Merge<S1, S2> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
        }
    }
}

struct MergeObserver<T, E> {
    downstream: Subscriber<T, E>,
    active: Rc<Cell<usize>>,
}

impl<T, E> Observer<T, E> for MergeObserver<T, E> {
    fn next(&mut self, value: T) {
        self.downstream.next(value)
    }

    fn error(&mut self, err: E) {
        self.downstream.error(err)
    }

    fn complete(&mut self) {
        let remaining = self.active.get().saturating_sub(1);
        self.active.set(remaining);

        if remaining == 0 {
            self.downstream.complete();
        }
    }
}

impl<S1, S2> Subscribable for Merge<S1, S2>
where
    S1: Subscribable,
    S2: Subscribable<Item = S1::Item, Error = S1::Error>,
{
    type Item = S1::Item;
    type Error = S1::Error;

    fn attach(&self, downstream: Subscriber<S1::Item, S1::Error>) {
        let active = Rc::new(Cell::new(2));

        let first = link(
            &downstream,
            MergeObserver {
                downstream: downstream.clone(),
                active: active.clone(),
            },
        );
        self.first.attach(first);

        let second = link(
            &downstream,
            MergeObserver {
                downstream: downstream.clone(),
                active,
            },
        );
        self.second.attach(second);
    }
}
