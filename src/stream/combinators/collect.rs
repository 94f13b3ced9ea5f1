use super::link;
use crate::stream::{Observer, Subscribable, Subscriber};

pub struct Collect<S> {
    source: S,
}

impl<S> Collect<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: Clone> Clone for Collect<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

struct CollectObserver<T, E> {
    downstream: Subscriber<Vec<T>, E>,
    values: Vec<T>,
}

impl<T, E> Observer<T, E> for CollectObserver<T, E> {
    fn next(&mut self, value: T) {
        self.values.push(value);
    }

    fn error(&mut self, err: E) {
        self.values.clear();
        self.downstream.error(err)
    }

    fn complete(&mut self) {
        let values = std::mem::take(&mut self.values);
        self.downstream.next(values);
        self.downstream.complete();
    }
}

impl<S: Subscribable> Subscribable for Collect<S> {
    type Item = Vec<S::Item>;
    type Error = S::Error;

    fn attach(&self, downstream: Subscriber<Vec<S::Item>, S::Error>) {
        let inner = link(
            &downstream,
            CollectObserver {
                downstream: downstream.clone(),
                values: Vec::new(),
            },
        );

        self.source.attach(inner);
    }
}
