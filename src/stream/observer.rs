use super::Observer;
use log::warn;
use std::fmt::Debug;

impl<T, E, F> Observer<T, E> for F
where
    F: FnMut(T),
    E: Debug,
{
    fn next(&mut self, value: T) {
        (self)(value)
    }

    fn error(&mut self, err: E) {
        warn!("unhandled upstream error: {:?}", err);
    }

    fn complete(&mut self) {}
}

/// An observer assembled from a `next` function, and optional `error` and `complete` functions.
///
/// Example:
/// ```
/// use safeline::prelude::*;
/// use std::{cell::Cell, rc::Rc};
///
/// let completed = Rc::new(Cell::new(false));
/// let flag = completed.clone();
///
/// let subject: Subject<u32> = Subject::new();
/// let _handle = subject.subscribe(
///     Callbacks::new(|value: u32| println!("got {}", value)).on_complete(move || flag.set(true)),
/// );
///
/// subject.next(1);
/// subject.complete();
/// assert!(completed.get());
/// ```
pub struct Callbacks<T, E> {
    next: Box<dyn FnMut(T)>,
    error: Option<Box<dyn FnMut(E)>>,
    complete: Option<Box<dyn FnMut()>>,
}

impl<T, E> Callbacks<T, E> {
    pub fn new<N>(next: N) -> Self
    where
        N: FnMut(T) + 'static,
    {
        Self {
            next: Box::new(next),
            error: None,
            complete: None,
        }
    }

    /// Builds the observer from separate callbacks, any of which may be absent
    pub fn from_parts<N, Er, C>(next: Option<N>, error: Option<Er>, complete: Option<C>) -> Self
    where
        N: FnMut(T) + 'static,
        Er: FnMut(E) + 'static,
        C: FnMut() + 'static,
        T: 'static,
    {
        let next: Box<dyn FnMut(T)> = match next {
            Some(next) => Box::new(next),
            None => Box::new(|_| {}),
        };

        Self {
            next,
            error: error.map(|f| Box::new(f) as Box<dyn FnMut(E)>),
            complete: complete.map(|f| Box::new(f) as Box<dyn FnMut()>),
        }
    }

    pub fn on_error<Er>(mut self, error: Er) -> Self
    where
        Er: FnMut(E) + 'static,
    {
        self.error = Some(Box::new(error));
        self
    }

    pub fn on_complete<C>(mut self, complete: C) -> Self
    where
        C: FnMut() + 'static,
    {
        self.complete = Some(Box::new(complete));
        self
    }
}

impl<T, E: Debug> Observer<T, E> for Callbacks<T, E> {
    fn next(&mut self, value: T) {
        (self.next)(value)
    }

    fn error(&mut self, err: E) {
        match self.error.as_mut() {
            Some(error) => error(err),
            None => warn!("unhandled upstream error: {:?}", err),
        }
    }

    fn complete(&mut self) {
        if let Some(complete) = self.complete.as_mut() {
            complete();
        }
    }
}

impl<T, E> Debug for Callbacks<T, E> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Callbacks")
            .field("error", &self.error.is_some())
            .field("complete", &self.complete.is_some())
            .finish()
    }
}
