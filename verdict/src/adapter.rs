//! # Adapters
//!
//! Turn computations that panic or fail into computations that produce an
//! [`Outcome`].
//!
//! A wrapped function keeps its parameter shape: its arguments are passed as
//! one tuple, `f((a, b))` for a two-argument function.
//!
//! | Wrapper                 | Wrapped                      | Failure reason |
//! |-------------------------|------------------------------|----------------|
//! | [`resultfy`]            | `Fn(Args) -> T`              | [`Panic`]      |
//! | [`resultfy_try`]        | `Fn(Args) -> Result<T, X>`   | `X`            |
//! | [`resultfy_async`]      | `Fn(Args) -> impl Future`    | [`Panic`]      |
//! | [`resultfy_async_try`]  | `Fn(Args) -> impl Future<Output = Result<T, X>>` | `X` |
//!
//! Each has a `_labeled` twin; without a label, failures are labelled with
//! [`Label::unknown`].
//!
//! Only callables are accepted. Anything else is rejected at compile time:
//!
//! ```compile_fail
//! use verdict::{resultfy, Tag};
//!
//! let wrapped = resultfy::<(), u32, _, Tag>(42);
//! ```

use crate::error::Label;
use crate::failure::Failure;
use crate::future::{panicked, ResultFuture, TryResultFuture};
use crate::outcome::Outcome;
use crate::panic::Panic;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};

// =============================================================================
// Synchronous functions
// =============================================================================

/// Wrap `f` so that a panic becomes an `unknown` failure.
///
/// ```rust
/// use verdict::{resultfy, Outcome, Panic, Tag};
///
/// let add = resultfy(|(a, b): (i32, i32)| a + b);
/// let sum: Outcome<i32, Tag, Panic> = add((3, 4));
/// assert_eq!(sum.unwrap_or(0), 7);
/// ```
#[track_caller]
pub fn resultfy<Args, T, F, E>(f: F) -> impl Fn(Args) -> Outcome<T, E, Panic>
where
    F: Fn(Args) -> T,
    E: Label,
{
    wrap_panics(f, None, Location::caller())
}

/// Wrap `f` so that a panic becomes a failure labelled `label`
#[track_caller]
pub fn resultfy_labeled<Args, T, F, E>(f: F, label: E) -> impl Fn(Args) -> Outcome<T, E, Panic>
where
    F: Fn(Args) -> T,
    E: Label,
{
    wrap_panics(f, Some(label), Location::caller())
}

fn wrap_panics<Args, T, F, E>(
    f: F,
    label: Option<E>,
    location: &'static Location<'static>,
) -> impl Fn(Args) -> Outcome<T, E, Panic>
where
    F: Fn(Args) -> T,
    E: Label,
{
    move |args| match catch_unwind(AssertUnwindSafe(|| f(args))) {
        Ok(data) => Outcome::Ok(data),
        Err(payload) => panicked(label.clone(), payload, location),
    }
}

/// Wrap a fallible `f`; its error becomes the reason of an `unknown`
/// failure.
///
/// Panics inside `f` are not caught.
///
/// ```rust
/// use verdict::{resultfy_try, Outcome};
///
/// let parse = resultfy_try(|(raw,): (&str,)| raw.parse::<u8>());
/// let out: Outcome<u8, &str, _> = parse(("300",));
/// assert_eq!(out.error(), Some(&"unknown"));
/// assert!(out.reason().is_some());
/// ```
#[track_caller]
pub fn resultfy_try<Args, T, X, F, E>(f: F) -> impl Fn(Args) -> Outcome<T, E, X>
where
    F: Fn(Args) -> Result<T, X>,
    E: Label,
{
    wrap_errors(f, None, Location::caller())
}

/// Wrap a fallible `f`; its error becomes the reason of a failure labelled
/// `label`
#[track_caller]
pub fn resultfy_try_labeled<Args, T, X, F, E>(f: F, label: E) -> impl Fn(Args) -> Outcome<T, E, X>
where
    F: Fn(Args) -> Result<T, X>,
    E: Label,
{
    wrap_errors(f, Some(label), Location::caller())
}

fn wrap_errors<Args, T, X, F, E>(
    f: F,
    label: Option<E>,
    location: &'static Location<'static>,
) -> impl Fn(Args) -> Outcome<T, E, X>
where
    F: Fn(Args) -> Result<T, X>,
    E: Label,
{
    move |args| match f(args) {
        Ok(data) => Outcome::Ok(data),
        Err(reason) => {
            let label = label.clone().unwrap_or_else(E::unknown);
            tracing::debug!(label = %label, at = %location, "captured error");
            Outcome::Err(Failure::at(label, Some(reason), location))
        }
    }
}

// =============================================================================
// Asynchronous functions
// =============================================================================

/// Wrap an async `f`; the returned futures settle panics into `unknown`
/// failures.
///
/// A panic raised while `f` builds its future settles immediately.
///
/// ```rust
/// use verdict::{resultfy_async, Outcome, Panic, Tag};
///
/// let fetch = resultfy_async(|(id,): (u32,)| async move {
///     if id == 0 {
///         panic!("no such id");
///     }
///     id * 10
/// });
///
/// # tokio_test::block_on(async {
/// let found: Outcome<u32, Tag, Panic> = fetch((4,)).await;
/// assert_eq!(found.unwrap_or(0), 40);
///
/// let missing: Outcome<u32, Tag, Panic> = fetch((0,)).await;
/// assert_eq!(missing.reason().and_then(Panic::message), Some("no such id"));
/// # });
/// ```
#[track_caller]
pub fn resultfy_async<Args, Fut, F, E>(f: F) -> impl Fn(Args) -> ResultFuture<Fut, E>
where
    F: Fn(Args) -> Fut,
    Fut: Future,
    E: Label,
{
    wrap_async(f, None, Location::caller())
}

/// Wrap an async `f`; the returned futures settle panics into failures
/// labelled `label`
#[track_caller]
pub fn resultfy_async_labeled<Args, Fut, F, E>(f: F, label: E) -> impl Fn(Args) -> ResultFuture<Fut, E>
where
    F: Fn(Args) -> Fut,
    Fut: Future,
    E: Label,
{
    wrap_async(f, Some(label), Location::caller())
}

fn wrap_async<Args, Fut, F, E>(
    f: F,
    label: Option<E>,
    location: &'static Location<'static>,
) -> impl Fn(Args) -> ResultFuture<Fut, E>
where
    F: Fn(Args) -> Fut,
    Fut: Future,
    E: Label,
{
    move |args| match catch_unwind(AssertUnwindSafe(|| f(args))) {
        Ok(fut) => ResultFuture::new(fut, label.clone(), location),
        Err(payload) => ResultFuture::settled(panicked(label.clone(), payload, location), location),
    }
}

/// Wrap an async fallible `f`; the returned futures settle an `Err` output
/// into an `unknown` failure carrying it as reason.
///
/// Like [`resultfy_try`], panics are not caught, neither while `f` builds
/// its future nor while the future is polled: the reason type is `X`, which
/// has no room for a [`Panic`].
///
/// ```rust
/// use verdict::{resultfy_async_try, Outcome, Tag};
///
/// let fetch = resultfy_async_try(|(id,): (u32,)| async move {
///     if id == 0 {
///         return Err(format!("no user {}", id));
///     }
///     Ok(id * 10)
/// });
///
/// # tokio_test::block_on(async {
/// let found: Outcome<u32, Tag, String> = fetch((4,)).await;
/// assert_eq!(found.unwrap_or(0), 40);
///
/// let missing: Outcome<u32, Tag, String> = fetch((0,)).await;
/// assert_eq!(missing.error(), Some(&Tag::UNKNOWN));
/// assert_eq!(missing.reason().map(String::as_str), Some("no user 0"));
/// # });
/// ```
#[track_caller]
pub fn resultfy_async_try<Args, T, X, Fut, F, E>(f: F) -> impl Fn(Args) -> TryResultFuture<Fut, E>
where
    F: Fn(Args) -> Fut,
    Fut: Future<Output = Result<T, X>>,
    E: Label,
{
    wrap_async_errors(f, None, Location::caller())
}

/// Wrap an async fallible `f`; the returned futures settle an `Err` output
/// into a failure labelled `label`
#[track_caller]
pub fn resultfy_async_try_labeled<Args, T, X, Fut, F, E>(
    f: F,
    label: E,
) -> impl Fn(Args) -> TryResultFuture<Fut, E>
where
    F: Fn(Args) -> Fut,
    Fut: Future<Output = Result<T, X>>,
    E: Label,
{
    wrap_async_errors(f, Some(label), Location::caller())
}

fn wrap_async_errors<Args, T, X, Fut, F, E>(
    f: F,
    label: Option<E>,
    location: &'static Location<'static>,
) -> impl Fn(Args) -> TryResultFuture<Fut, E>
where
    F: Fn(Args) -> Fut,
    Fut: Future<Output = Result<T, X>>,
    E: Label,
{
    move |args| TryResultFuture::new(f(args), label.clone(), location)
}

// =============================================================================
// Handlers for manual composition
// =============================================================================

/// A ready-made failure handler: `reason => Err(label, reason)`.
///
/// Pairs with [`ok_fulfilled`] as the two arms of `Result::map_or_else`:
///
/// ```rust
/// use verdict::{err_reject, ok_fulfilled, Outcome};
///
/// let read: Result<u64, String> = Err("disk full".to_string());
/// let out: Outcome<u64, &str, String> =
///     read.map_or_else(err_reject("Io"), ok_fulfilled(|bytes: u64| bytes / 1024));
/// assert_eq!(out.error(), Some(&"Io"));
/// ```
#[track_caller]
pub fn err_reject<T, E, R>(label: E) -> impl Fn(R) -> Outcome<T, E, R>
where
    E: Label,
{
    let location = Location::caller();
    move |reason| Outcome::Err(Failure::at(label.clone(), Some(reason), location))
}

/// A ready-made success handler: `data => Ok(map(data))`
pub fn ok_fulfilled<D, T, E, R>(map: impl Fn(D) -> T) -> impl Fn(D) -> Outcome<T, E, R> {
    move |data| Outcome::Ok(map(data))
}
