use super::link;
use crate::stream::{Observer, Subscribable, Subscriber};
use std::{marker::PhantomData, rc::Rc};

pub struct TryMap<S, F> {
    source: S,
    map: Rc<F>,
}

impl<S, F> TryMap<S, F> {
    pub fn new(source: S, map: F) -> Self {
        Self {
            source,
            map: Rc::new(map),
        }
    }
}

impl<S: Clone, F> Clone for TryMap<S, F> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            map: self.map.clone(),
        }
    }
}

struct TryMapObserver<T, U, E, F> {
    downstream: Subscriber<U, E>,
    map: Rc<F>,
    _t: PhantomData<T>,
}

impl<T, U, E, F> Observer<T, E> for TryMapObserver<T, U, E, F>
where
    F: Fn(T) -> Result<U, E>,
{
    fn next(&mut self, value: T) {
        match (self.map)(value) {
            Ok(value) => self.downstream.next(value),
            Err(err) => self.downstream.error(err),
        }
    }

    fn error(&mut self, err: E) {
        self.downstream.error(err)
    }

    fn complete(&mut self) {
        self.downstream.complete()
    }
}

impl<S, F, U> Subscribable for TryMap<S, F>
where
    S: Subscribable,
    F: Fn(S::Item) -> Result<U, S::Error> + 'static,
    U: 'static,
{
    type Item = U;
    type Error = S::Error;

    fn attach(&self, downstream: Subscriber<U, S::Error>) {
        let inner = link(
            &downstream,
            TryMapObserver {
                downstream: downstream.clone(),
                map: self.map.clone(),
                _t: PhantomData,
            },
        );

        self.source.attach(inner);
    }
}
