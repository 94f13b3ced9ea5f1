use crate::{
    error::{type_name, BindError},
    guard::Guarded,
    CancellationSignal, SubscriptionRegistry,
};
use log::{debug, trace};
use std::{cell::RefCell, fmt::Debug, future::Future};

/// The lifetime of a group of subscriptions.
///
/// A `LifecycleOwner` holds a [SubscriptionRegistry](./struct.SubscriptionRegistry.html) and a
/// [CancellationSignal](./struct.CancellationSignal.html).  Components embed one, and expose it
/// through the [Lifecycle](./trait.Lifecycle.html) trait.
///
/// `destroy()` runs these steps, in order, each one completing before the next begins:
/// 1. revoke every handle in the registry,
/// 2. emit on the cancellation signal, then complete it,
/// 3. invoke the post-destroy callback, if one was supplied at construction,
/// 4. invoke the component's `on_destroy` hook.
///
/// Destroying twice is allowed.  The registry step is a no-op the second time, but the signal is
/// fired and the callbacks are invoked again.
pub struct LifecycleOwner {
    name: String,
    registry: SubscriptionRegistry,
    signal: CancellationSignal,
    post_destroy: RefCell<Option<Box<dyn FnMut()>>>,
}

impl LifecycleOwner {
    pub fn new() -> Self {
        Self {
            name: type_name::<Self>(),
            registry: SubscriptionRegistry::new(),
            signal: CancellationSignal::new(),
            post_destroy: RefCell::new(None),
        }
    }

    /// Constructs an owner which invokes the callback after its signal has fired, on every `destroy()`
    pub fn with_post_destroy<F>(callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let owner = Self::new();
        *owner.post_destroy.borrow_mut() = Some(Box::new(callback));
        owner
    }

    /// Constructs an owner named after the component type which embeds it
    pub fn owned_by<Component: ?Sized>() -> Self {
        Self::new().named(type_name::<Component>())
    }

    /// Sets the name used in log lines
    pub fn named<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    pub fn signal(&self) -> &CancellationSignal {
        &self.signal
    }

    /// True once `destroy()` has run at least once
    pub fn is_destroyed(&self) -> bool {
        self.signal.is_terminated()
    }

    /// Runs the teardown steps, with a no-op `on_destroy` hook
    pub fn destroy(&self) {
        self.teardown(|| {})
    }

    /// Runs the teardown steps, invoking `hook` as the final step
    pub fn teardown<H>(&self, hook: H)
    where
        H: FnOnce(),
    {
        debug!("DESTROY {}", self.name);

        let revoked = self.registry.revoke_all();
        trace!("DESTROY {}: revoked {} subscriptions", self.name, revoked);

        self.signal.emit();
        self.signal.complete();

        self.run_post_destroy();
        hook();
    }

    fn run_post_destroy(&self) {
        // taken out of the cell, so a callback which destroys the owner again doesn't re-borrow it
        let callback = self.post_destroy.borrow_mut().take();

        if let Some(mut callback) = callback {
            trace!("DESTROY {}: post-destroy callback", self.name);
            callback();

            let mut slot = self.post_destroy.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    /// Wraps the future, so it is cancelled as soon as this owner is destroyed.
    ///
    /// The returned future resolves to `Some(output)` if the future completes first, or `None` if the owner is destroyed first.
    ///
    /// Example:
    /// ```
    /// use safeline::prelude::*;
    ///
    /// let owner = LifecycleOwner::new();
    /// let guarded = owner.guard("poll", std::future::pending::<()>());
    ///
    /// owner.destroy();
    /// assert_eq!(None, safeline::test::block_on(guarded));
    /// ```
    pub fn guard<F: Future>(&self, name: &str, future: F) -> Guarded<F> {
        let name = self.name.clone() + "/" + name;
        Guarded::new(name, future, self.signal.cancelled())
    }
}

impl Default for LifecycleOwner {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for LifecycleOwner {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("LifecycleOwner")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .field("signal", &self.signal)
            .field("post_destroy", &self.post_destroy.borrow().is_some())
            .finish()
    }
}

/// A component whose subscriptions are bound to its lifetime.
///
/// Implementors embed a [LifecycleOwner](./struct.LifecycleOwner.html) and return it from `lifecycle()`.
/// The host calls `destroy()` once, when the component is torn down.
///
/// Overriding `destroy()` is allowed, but the override **must** call [destroy_base](./fn.destroy_base.html).
/// Nothing enforces this: an override which forgets leaves every registered subscription live.
///
/// Example:
/// ```
/// use safeline::prelude::*;
///
/// struct Clock {
///     lifecycle: LifecycleOwner,
/// }
///
/// impl Lifecycle for Clock {
///     fn lifecycle(&self) -> Option<&LifecycleOwner> {
///         Some(&self.lifecycle)
///     }
///
///     fn destroy(&self) {
///         destroy_base(self);
///         println!("clock stopped");
///     }
/// }
///
/// let clock = Clock { lifecycle: LifecycleOwner::owned_by::<Clock>() };
/// let ticks: Subject<u64> = Subject::new();
/// let handle = ticks.subscribe_safely(&clock, |tick: u64| println!("tick {}", tick))?;
///
/// clock.destroy();
/// assert!(handle.is_closed());
/// # Ok::<(), safeline::error::BindError>(())
/// ```
pub trait Lifecycle {
    /// The registry and signal backing this component.  `None` means the component never wired one up.
    fn lifecycle(&self) -> Option<&LifecycleOwner>;

    /// Tears the component down.  Overrides must chain to [destroy_base](./fn.destroy_base.html).
    fn destroy(&self) {
        destroy_base(self)
    }

    /// Runs last, after the post-destroy callback.
    ///
    /// Kept for components which hooked teardown before the constructor callback existed;
    /// new components should prefer [LifecycleOwner::with_post_destroy](./struct.LifecycleOwner.html#method.with_post_destroy).
    fn on_destroy(&self) {}
}

impl Lifecycle for LifecycleOwner {
    fn lifecycle(&self) -> Option<&LifecycleOwner> {
        Some(self)
    }
}

/// The base teardown for a [Lifecycle](./trait.Lifecycle.html) component.
///
/// Runs the owner's teardown steps, then the component's `on_destroy` hook.
pub fn destroy_base<L: Lifecycle + ?Sized>(component: &L) {
    match component.lifecycle() {
        Some(owner) => owner.teardown(|| component.on_destroy()),
        None => debug!("DESTROY {}: no lifecycle owner", type_name::<L>()),
    }
}

/// Checks that a candidate owner exposes a usable lifecycle, before anything is subscribed.
pub fn probe<L: Lifecycle + ?Sized>(owner: Option<&L>) -> Result<&LifecycleOwner, BindError> {
    let owner = owner.ok_or_else(BindError::not_an_owner::<L>)?;
    owner
        .lifecycle()
        .ok_or_else(BindError::missing_capability::<L>)
}
