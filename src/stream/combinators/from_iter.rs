use crate::{
    stream::{Subscribable, Subscriber},
    StreamError,
};
use std::marker::PhantomData;

/// A cold source: each subscriber receives every value, then completion, synchronously during `subscribe`.
pub struct FromIter<T, E = StreamError> {
    values: Vec<T>,
    _e: PhantomData<E>,
}

impl<T: Clone, E> Clone for FromIter<T, E> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            _e: PhantomData,
        }
    }
}

/// Creates a cold source which emits each value of the iterator, then completes
pub fn from_iter<T, E, I>(values: I) -> FromIter<T, E>
where
    I: IntoIterator<Item = T>,
{
    FromIter {
        values: values.into_iter().collect(),
        _e: PhantomData,
    }
}

/// Creates a cold source which emits a single value, then completes
pub fn of<T>(value: T) -> FromIter<T, StreamError> {
    from_iter(Some(value))
}

impl<T, E> Subscribable for FromIter<T, E>
where
    T: Clone + 'static,
    E: 'static,
{
    type Item = T;
    type Error = E;

    fn attach(&self, subscriber: Subscriber<T, E>) {
        for value in self.values.iter() {
            if subscriber.is_closed() {
                return;
            }

            subscriber.next(value.clone());
        }

        subscriber.complete();
    }
}
