//! Helpers which assist in testing components built on safeline.

/// Blocks on the future, using a new single-threaded runtime.
/// This is helpful in doctests, where bindings and guarded futures must stay on one thread.
#[cfg(feature = "tokio-executor")]
pub fn block_on<Fut: std::future::Future<Output = Out>, Out>(fut: Fut) -> Out {
    use tokio::runtime::Builder;

    let runtime = Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("doctest runtime creation failed");
    runtime.block_on(fut)
}

// forked from https://github.com/tokio-rs/tokio/pull/2522/files

/// Asserts that the expression completes within a given number of milliseconds.
///
/// This will invoke the `panic!` macro if the provided future
/// expression fails to complete within the given number of
/// milliseconds. This macro expands to an `await` and must be
/// invoked inside an async context.
///
/// A default timeout of 50ms is used if no duration is passed.
///
/// # Examples
///
/// ```rust
/// use safeline::{assert_completes, LifecycleOwner};
///
/// # let fut =
/// async {
///     let owner = LifecycleOwner::new();
///     let cancelled = owner.signal().cancelled();
///
///     // Succeeds because the owner was destroyed before the wait.
///     owner.destroy();
///     assert_completes!(cancelled);
/// }
/// # ;
/// # safeline::test::block_on(fut);
///```
///
/// ```rust,should_panic
/// use safeline::{assert_completes, LifecycleOwner};
///
/// # let fut =
/// async {
///     let owner = LifecycleOwner::new();
///
///     // Fails because the owner is never destroyed.
///     assert_completes!(owner.signal().cancelled(), 10);
/// }
/// # ;
/// # safeline::test::block_on(fut);
/// ```
#[macro_export]
macro_rules! assert_completes {
    ($e:expr) => {
        $crate::assert_completes!($e, 50)
    };
    ($e:expr, $time:literal) => {{
        use std::time::Duration;
        use tokio::time::timeout;
        match timeout(Duration::from_millis($time), $e).await {
            Ok(ret) => ret,
            Err(_) => panic!(
                "assertion failed: {} timed out after {} ms",
                stringify!($e),
                $time,
            ),
        }
    }};
}

/// Asserts that the expression does not complete within a given number of milliseconds.
///
/// This will invoke the `panic!` macro if the provided future
/// expression completes within the given number of milliseconds.
/// This macro expands to an `await` and must be invoked inside an
/// async context.
///
/// A default timeout of 50ms is used if no duration is passed.
///
/// # Examples
///
/// ```rust
/// use safeline::{assert_times_out, LifecycleOwner};
///
/// # let fut =
/// async {
///     let owner = LifecycleOwner::new();
///     let mut guarded = Box::pin(owner.guard("idle", std::future::pending::<()>()));
///
///     // Succeeds because the owner is still alive.
///     assert_times_out!(guarded.as_mut(), 10);
/// }
/// # ;
/// # safeline::test::block_on(fut);
/// ```
///
/// ```rust,should_panic
/// use safeline::{assert_times_out, LifecycleOwner};
///
/// # let fut =
/// async {
///     let owner = LifecycleOwner::new();
///     owner.destroy();
///
///     // Fails because a destroyed owner cancels the future immediately.
///     assert_times_out!(owner.guard("idle", std::future::pending::<()>()));
/// }
/// # ;
/// # safeline::test::block_on(fut);
/// ```
#[macro_export]
macro_rules! assert_times_out {
    ($e:expr) => {
        $crate::assert_times_out!($e, 50)
    };
    ($e:expr, $time:literal) => {{
        use std::time::Duration;
        use tokio::time::timeout;
        match timeout(Duration::from_millis($time), $e).await {
            Ok(_) => panic!(
                "assertion failed: {} completed within {} ms",
                stringify!($e),
                $time,
            ),
            Err(err) => err,
        }
    }};
}
