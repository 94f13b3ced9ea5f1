use super::link;
use crate::stream::{Observer, Subscribable, Subscriber};
use std::{marker::PhantomData, rc::Rc};

pub struct Map<S, F> {
    source: S,
    map: Rc<F>,
}

impl<S, F> Map<S, F> {
    pub fn new(source: S, map: F) -> Self {
        Self {
            source,
            map: Rc::new(map),
        }
    }
}

impl<S: Clone, F> Clone for Map<S, F> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            map: self.map.clone(),
        }
    }
}

struct MapObserver<T, U, E, F> {
    downstream: Subscriber<U, E>,
    map: Rc<F>,
    _t: PhantomData<T>,
}

impl<T, U, E, F> Observer<T, E> for MapObserver<T, U, E, F>
where
    F: Fn(T) -> U,
{
    fn next(&mut self, value: T) {
        self.downstream.next((self.map)(value))
    }

    fn error(&mut self, err: E) {
        self.downstream.error(err)
    }

    fn complete(&mut self) {
        self.downstream.complete()
    }
}

impl<S, F, U> Subscribable for Map<S, F>
where
    S: Subscribable,
    F: Fn(S::Item) -> U + 'static,
    U: 'static,
{
    type Item = U;
    type Error = S::Error;

    fn attach(&self, downstream: Subscriber<U, S::Error>) {
        let inner = link(
            &downstream,
            MapObserver {
                downstream: downstream.clone(),
                map: self.map.clone(),
                _t: PhantomData,
            },
        );

        self.source.attach(inner);
    }
}
