//! Binding operations, which tie a subscription to a lifetime.
//!
//! - [bind_to_lifecycle](./fn.bind_to_lifecycle.html) registers the handle with an owner, which revokes it on `destroy()`.
//! - [bind_until_signal](./fn.bind_until_signal.html) gates the source on a stop token, with no registry involved.
//!
//! Both are also available as methods on every subscribable, through [SafeSubscribe](./trait.SafeSubscribe.html).
use crate::{
    error::{type_name, BindError},
    owner::probe,
    stream::{combinators::TakeUntil, Observer, Subscribable},
    Lifecycle, Subscription,
};
use log::debug;

/// Subscribes the observer to the source, and registers the handle with the owner.
///
/// The owner is validated before anything is subscribed: `None` fails with `BindError::NotAnOwner`,
/// and an owner without a lifecycle fails with `BindError::MissingCapability`.
///
/// The returned handle may be revoked early.  Otherwise it is revoked when the owner is destroyed,
/// or when the source completes or fails.  Revoking it never affects other subscribers of the same source.
pub fn bind_to_lifecycle<S, L, O>(
    source: &S,
    owner: Option<&L>,
    observer: O,
) -> Result<Subscription, BindError>
where
    S: Subscribable,
    L: Lifecycle + ?Sized,
    O: Observer<S::Item, S::Error> + 'static,
{
    let lifecycle = probe(owner).map_err(rejected::<S>)?;

    let subscription = source.subscribe(observer);
    lifecycle.registry().add(subscription.clone());

    debug!(
        "BIND {} < {} > ({} registered)",
        lifecycle.name(),
        type_name::<S::Item>(),
        lifecycle.registry().len()
    );

    Ok(subscription)
}

/// Subscribes the observer to the source, until the token emits or completes.
///
/// The token can be any subscribable, such as an owner's [signal](./struct.LifecycleOwner.html#method.signal)
/// or a plain [Subject](./stream/struct.Subject.html).  `None` fails with `BindError::MissingToken`.
pub fn bind_until_signal<S, N, O>(
    source: &S,
    token: Option<&N>,
    observer: O,
) -> Result<Subscription, BindError>
where
    S: Subscribable,
    N: Subscribable + ?Sized,
    O: Observer<S::Item, S::Error> + 'static,
{
    let token = token
        .ok_or_else(BindError::missing_token::<N>)
        .map_err(rejected::<S>)?;

    debug!(
        "BIND < {} > until < {} >",
        type_name::<S::Item>(),
        type_name::<N>()
    );

    Ok(TakeUntil::new(source, token).subscribe(observer))
}

fn rejected<S: Subscribable>(err: BindError) -> BindError {
    debug!("BIND < {} > rejected: {}", type_name::<S::Item>(), err.as_label());
    err
}

/// Lifetime-bound subscribe methods, available on every [Subscribable](./stream/trait.Subscribable.html).
///
/// Example:
/// ```
/// use safeline::prelude::*;
/// use std::{cell::Cell, rc::Rc};
///
/// let owner = LifecycleOwner::new();
/// let stop: Subject<()> = Subject::new();
/// let values: Subject<u32> = Subject::new();
///
/// let seen = Rc::new(Cell::new(0));
/// let (a, b) = (seen.clone(), seen.clone());
/// values.subscribe_safely(&owner, move |_: u32| a.set(a.get() + 1))?;
/// values.subscribe_until(&stop, move |_: u32| b.set(b.get() + 10))?;
///
/// values.next(1);
/// stop.next(());
/// values.next(1);
/// owner.destroy();
/// values.next(1);
///
/// assert_eq!(12, seen.get());
/// # Ok::<(), safeline::error::BindError>(())
/// ```
pub trait SafeSubscribe: Subscribable + Sized {
    /// Subscribes, and registers the handle with the owner.  See [bind_to_lifecycle](./fn.bind_to_lifecycle.html).
    fn subscribe_safely<L, O>(&self, owner: &L, observer: O) -> Result<Subscription, BindError>
    where
        L: Lifecycle + ?Sized,
        O: Observer<Self::Item, Self::Error> + 'static,
    {
        bind_to_lifecycle(self, Some(owner), observer)
    }

    #[deprecated(since = "0.1.0", note = "use `subscribe_safely`")]
    fn safe_subscribe<L, O>(&self, owner: &L, observer: O) -> Result<Subscription, BindError>
    where
        L: Lifecycle + ?Sized,
        O: Observer<Self::Item, Self::Error> + 'static,
    {
        self.subscribe_safely(owner, observer)
    }

    /// Subscribes until the token emits or completes.  See [bind_until_signal](./fn.bind_until_signal.html).
    fn subscribe_until<N, O>(&self, token: &N, observer: O) -> Result<Subscription, BindError>
    where
        N: Subscribable + ?Sized,
        O: Observer<Self::Item, Self::Error> + 'static,
    {
        bind_until_signal(self, Some(token), observer)
    }
}

impl<S: Subscribable> SafeSubscribe for S {}
