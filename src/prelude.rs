//! Prelude, including all the traits and types required for typical safeline usage.

pub use crate::{
    destroy_base,
    stream::{Callbacks, Observer, Subject, Subscribable, SubscribableExt},
    Lifecycle, LifecycleOwner, SafeSubscribe, StreamError, Subscription,
};
