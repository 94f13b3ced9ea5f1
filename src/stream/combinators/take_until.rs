use super::{link, Forward};
use crate::stream::{Observer, Subscribable, Subscriber};
use log::debug;
use std::marker::PhantomData;

pub struct TakeUntil<S, N> {
    source: S,
    notifier: N,
}

impl<S, N> TakeUntil<S, N> {
    pub fn new(source: S, notifier: N) -> Self {
        Self { source, notifier }
    }
}

impl<S: Clone, N: Clone> Clone for TakeUntil<S, N> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

/// Completes the downstream on the notifier's first event.
struct StopObserver<T, E, NT, NE> {
    downstream: Subscriber<T, E>,
    _n: PhantomData<(NT, NE)>,
}

impl<T, E, NT, NE> Observer<NT, NE> for StopObserver<T, E, NT, NE> {
    fn next(&mut self, _value: NT) {
        self.downstream.complete()
    }

    fn error(&mut self, _err: NE) {
        debug!("stop notifier failed, completing");
        self.downstream.complete()
    }

    fn complete(&mut self) {
        self.downstream.complete()
    }
}

impl<S, N> Subscribable for TakeUntil<S, N>
where
    S: Subscribable,
    N: Subscribable,
{
    type Item = S::Item;
    type Error = S::Error;

    fn attach(&self, downstream: Subscriber<S::Item, S::Error>) {
        let stop = link(
            &downstream,
            StopObserver {
                downstream: downstream.clone(),
                _n: PhantomData,
            },
        );
        self.notifier.attach(stop);

        // the notifier may already have fired, in which case the source is never subscribed
        if downstream.is_closed() {
            return;
        }

        let inner = link(&downstream, Forward::new(downstream.clone()));
        self.source.attach(inner);
    }
}
