//! Safeline binds reactive subscriptions to the lifetime of the component that owns them.
//!
//! A component embeds a [LifecycleOwner](./struct.LifecycleOwner.html).  Subscriptions made with
//! [subscribe_safely](./trait.SafeSubscribe.html#method.subscribe_safely) are revoked when the component is destroyed,
//! and subscriptions made with [subscribe_until](./trait.SafeSubscribe.html#method.subscribe_until) stop when a token fires.
mod bind;
pub mod error;
mod guard;
mod owner;
mod registry;
mod signal;
pub mod stream;
mod subscription;

pub mod prelude;
pub mod test;

pub use bind::{bind_to_lifecycle, bind_until_signal, SafeSubscribe};
pub use error::{BindError, StreamError};
pub use guard::Guarded;
pub use owner::{destroy_base, probe, Lifecycle, LifecycleOwner};
pub use registry::SubscriptionRegistry;
pub use signal::{CancellationSignal, Cancelled};
pub use subscription::Subscription;
