//! # Future adapters
//!
//! Wrappers that settle a future into an [`Outcome`] instead of letting it
//! panic or resolve to a bare `Result`.
//!
//! - [`ResultFuture`] resolves any future to `Ok(output)`, or to a failure
//!   whose reason is the [`Panic`] if polling it panicked
//! - [`TryResultFuture`] resolves a `Future<Output = Result<T, X>>` to
//!   `Ok(t)` or to a failure whose reason is `x`
//!
//! Neither wrapper reorders, buffers or cancels anything: they resolve when
//! the inner future resolves, on whatever executor polls them.

use crate::error::Label;
use crate::failure::Failure;
use crate::outcome::Outcome;
use crate::panic::Panic;
use futures_core::FusedFuture;
use futures_util::future::{CatchUnwind, FutureExt};
use std::any::Any;
use std::future::Future;
use std::mem;
use std::panic::{AssertUnwindSafe, Location};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Build the failure for a caught panic.
pub(crate) fn panicked<T, E: Label>(
    label: Option<E>,
    payload: Box<dyn Any + Send>,
    location: &'static Location<'static>,
) -> Outcome<T, E, Panic> {
    let label = label.unwrap_or_else(E::unknown);
    let panic = Panic::new(payload);
    tracing::debug!(label = %label, reason = %panic, at = %location, "captured panic");
    Outcome::Err(Failure::at(label, Some(panic), location))
}

// =============================================================================
// ResultFuture - panics become failures
// =============================================================================

/// A future resolving to `Outcome<Fut::Output, E, Panic>`.
///
/// Created by [`resultfy_future`], [`OutcomeFutureExt::resultfy`] or the
/// wrappers returned by [`resultfy_async`](crate::resultfy_async).
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ResultFuture<Fut: Future, E> {
    state: State<Fut, E>,
    label: Option<E>,
    location: &'static Location<'static>,
}

enum State<Fut: Future, E> {
    Pending(Pin<Box<CatchUnwind<AssertUnwindSafe<Fut>>>>),
    Settled(Outcome<Fut::Output, E, Panic>),
    Done,
}

// The inner future is pinned on the heap; nothing else is structurally pinned.
impl<Fut: Future, E> Unpin for ResultFuture<Fut, E> {}

impl<Fut: Future, E> ResultFuture<Fut, E> {
    pub(crate) fn new(fut: Fut, label: Option<E>, location: &'static Location<'static>) -> Self {
        Self {
            state: State::Pending(Box::pin(AssertUnwindSafe(fut).catch_unwind())),
            label,
            location,
        }
    }

    pub(crate) fn settled(
        outcome: Outcome<Fut::Output, E, Panic>,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            state: State::Settled(outcome),
            label: None,
            location,
        }
    }
}

impl<Fut: Future, E: Label> Future for ResultFuture<Fut, E> {
    type Output = Outcome<Fut::Output, E, Panic>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match mem::replace(&mut this.state, State::Done) {
            State::Pending(mut inner) => match inner.as_mut().poll(cx) {
                Poll::Pending => {
                    this.state = State::Pending(inner);
                    Poll::Pending
                }
                Poll::Ready(Ok(data)) => Poll::Ready(Outcome::Ok(data)),
                Poll::Ready(Err(payload)) => {
                    Poll::Ready(panicked(this.label.take(), payload, this.location))
                }
            },
            State::Settled(outcome) => Poll::Ready(outcome),
            State::Done => panic!("`ResultFuture` polled after completion"),
        }
    }
}

impl<Fut: Future, E: Label> FusedFuture for ResultFuture<Fut, E> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

// =============================================================================
// TryResultFuture - errors become failures
// =============================================================================

/// A future resolving `Result<T, X>` to `Outcome<T, E, X>`.
///
/// Panics of the inner future are not caught; only its `Err` is settled
/// into a failure. Created by [`settle`], [`OutcomeTryFutureExt::settle`] or
/// the wrappers returned by [`resultfy_async_try`](crate::resultfy_async_try).
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct TryResultFuture<Fut, E> {
    inner: Option<Pin<Box<Fut>>>,
    label: Option<E>,
    location: &'static Location<'static>,
}

impl<Fut, E> Unpin for TryResultFuture<Fut, E> {}

impl<Fut, E> TryResultFuture<Fut, E> {
    pub(crate) fn new(fut: Fut, label: Option<E>, location: &'static Location<'static>) -> Self {
        Self {
            inner: Some(Box::pin(fut)),
            label,
            location,
        }
    }
}

impl<Fut, T, X, E> Future for TryResultFuture<Fut, E>
where
    Fut: Future<Output = Result<T, X>>,
    E: Label,
{
    type Output = Outcome<T, E, X>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let inner = match this.inner.as_mut() {
            Some(inner) => inner,
            None => panic!("`TryResultFuture` polled after completion"),
        };

        let result = match inner.as_mut().poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };
        this.inner = None;

        Poll::Ready(match result {
            Ok(data) => Outcome::Ok(data),
            Err(reason) => {
                let label = this.label.take().unwrap_or_else(E::unknown);
                tracing::debug!(label = %label, at = %this.location, "settled rejected future");
                Outcome::Err(Failure::at(label, Some(reason), this.location))
            }
        })
    }
}

impl<Fut, T, X, E> FusedFuture for TryResultFuture<Fut, E>
where
    Fut: Future<Output = Result<T, X>>,
    E: Label,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Settle `fut` into an outcome; a panic becomes an `unknown` failure
#[track_caller]
pub fn resultfy_future<Fut: Future, E: Label>(fut: Fut) -> ResultFuture<Fut, E> {
    ResultFuture::new(fut, None, Location::caller())
}

/// Settle `fut` into an outcome; a panic becomes a failure labelled `label`
#[track_caller]
pub fn resultfy_future_labeled<Fut: Future, E: Label>(fut: Fut, label: E) -> ResultFuture<Fut, E> {
    ResultFuture::new(fut, Some(label), Location::caller())
}

/// Settle a fallible future; its error becomes the reason of an `unknown`
/// failure
#[track_caller]
pub fn settle<Fut, T, X, E>(fut: Fut) -> TryResultFuture<Fut, E>
where
    Fut: Future<Output = Result<T, X>>,
    E: Label,
{
    TryResultFuture::new(fut, None, Location::caller())
}

/// Settle a fallible future; its error becomes the reason of a failure
/// labelled `label`
#[track_caller]
pub fn settle_labeled<Fut, T, X, E>(fut: Fut, label: E) -> TryResultFuture<Fut, E>
where
    Fut: Future<Output = Result<T, X>>,
    E: Label,
{
    TryResultFuture::new(fut, Some(label), Location::caller())
}

// =============================================================================
// Extension traits
// =============================================================================

/// Outcome adapters for any future.
///
/// ```rust
/// use verdict::{OutcomeFutureExt, Outcome, Panic, Tag};
///
/// # tokio_test::block_on(async {
/// let out: Outcome<u32, Tag, Panic> = async { 42 }.resultfy().await;
/// assert_eq!(out.unwrap_or(0), 42);
/// # });
/// ```
pub trait OutcomeFutureExt: Future + Sized {
    /// See [`resultfy_future`]
    #[track_caller]
    fn resultfy<E: Label>(self) -> ResultFuture<Self, E> {
        resultfy_future(self)
    }

    /// See [`resultfy_future_labeled`]
    #[track_caller]
    fn resultfy_labeled<E: Label>(self, label: E) -> ResultFuture<Self, E> {
        resultfy_future_labeled(self, label)
    }
}

impl<F: Future> OutcomeFutureExt for F {}

/// Outcome adapters for futures resolving to a `Result`.
///
/// ```rust
/// use verdict::{OutcomeTryFutureExt, Outcome};
///
/// # tokio_test::block_on(async {
/// let out: Outcome<u32, &str, String> =
///     async { Err::<u32, _>("disk full".to_string()) }.settle_labeled("Io").await;
/// assert_eq!(out.error(), Some(&"Io"));
/// assert_eq!(out.reason().map(String::as_str), Some("disk full"));
/// # });
/// ```
pub trait OutcomeTryFutureExt<T, X>: Future<Output = Result<T, X>> + Sized {
    /// See [`settle`]
    #[track_caller]
    fn settle<E: Label>(self) -> TryResultFuture<Self, E> {
        settle(self)
    }

    /// See [`settle_labeled`]
    #[track_caller]
    fn settle_labeled<E: Label>(self, label: E) -> TryResultFuture<Self, E> {
        settle_labeled(self, label)
    }
}

impl<F, T, X> OutcomeTryFutureExt<T, X> for F where F: Future<Output = Result<T, X>> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Tag;
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready, task};

    async fn explode() -> i32 {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_resolved_future() {
        let out: Outcome<i32, Tag, Panic> = resultfy_future(async { 42 }).await;
        assert_eq!(out.data(), Some(&42));
    }

    #[tokio::test]
    async fn test_panicking_future() {
        let out: Outcome<i32, Tag, Panic> = resultfy_future(explode()).await;
        assert_eq!(out.error(), Some(&Tag::UNKNOWN));
        assert_eq!(out.reason().and_then(Panic::message), Some("boom"));
        assert_eq!(out.failure().unwrap().origin().location().file(), file!());

        let out: Outcome<i32, &str, Panic> = explode().resultfy_labeled("Exploded").await;
        assert_eq!(out.error(), Some(&"Exploded"));
    }

    #[tokio::test]
    async fn test_settle() {
        let out: Outcome<i32, &str, &str> = settle(async { Ok::<i32, &str>(42) }).await;
        assert_eq!(out.data(), Some(&42));

        let out: Outcome<i32, &str, &str> = settle(async { Err::<i32, &str>("x") }).await;
        assert_eq!(out.error(), Some(&"unknown"));
        assert_eq!(out.reason(), Some(&"x"));

        let out: Outcome<i32, &str, &str> = async { Err::<i32, &str>("x") }.settle_labeled("custom").await;
        assert_eq!(out.error(), Some(&"custom"));
    }

    #[test]
    fn test_settle_waits_for_inner() {
        let (tx, rx) = oneshot::channel::<u32>();
        let mut fut = task::spawn(settle::<_, _, _, Tag>(rx));

        assert_pending!(fut.poll());
        tx.send(5).unwrap();
        assert!(fut.is_woken());

        let out = assert_ready!(fut.poll());
        assert_eq!(out.data(), Some(&5));
    }

    #[test]
    fn test_settle_dropped_sender() {
        let (tx, rx) = oneshot::channel::<u32>();
        let mut fut = task::spawn(rx.settle_labeled(Tag::from("Cancelled")));

        drop(tx);
        let out = assert_ready!(fut.poll());
        assert_eq!(out.error(), Some(&Tag::from("Cancelled")));
        assert!(out.reason().is_some());
    }

    #[test]
    fn test_result_future_pending_then_ready() {
        let (tx, rx) = oneshot::channel::<&'static str>();
        let mut fut = task::spawn(resultfy_future::<_, Tag>(async move { rx.await.unwrap_or("closed") }));

        assert_pending!(fut.poll());
        tx.send("done").unwrap();
        let out = assert_ready!(fut.poll());
        assert_eq!(out.data(), Some(&"done"));
    }

    #[test]
    fn test_fused() {
        let waker = futures_task::noop_waker();
        let mut cx = Context::from_waker(&waker);

        let mut fut = resultfy_future::<_, Tag>(async { 1 });
        assert!(!fut.is_terminated());
        assert!(Pin::new(&mut fut).poll(&mut cx).is_ready());
        assert!(fut.is_terminated());

        let mut fut = settle::<_, _, _, Tag>(async { Ok::<u8, ()>(1) });
        assert!(!fut.is_terminated());
        assert!(Pin::new(&mut fut).poll(&mut cx).is_ready());
        assert!(fut.is_terminated());
    }

    #[test]
    fn test_settled_state() {
        let waker = futures_task::noop_waker();
        let mut cx = Context::from_waker(&waker);

        let location = Location::caller();
        let mut fut: ResultFuture<std::future::Ready<i32>, Tag> =
            ResultFuture::settled(Outcome::ok(3), location);
        match Pin::new(&mut fut).poll(&mut cx) {
            Poll::Ready(out) => assert_eq!(out.data(), Some(&3)),
            Poll::Pending => panic!("settled future must be ready"),
        }
    }
}
