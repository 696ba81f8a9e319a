//! # Outcome
//!
//! The value model: an operation either succeeded with data or failed with
//! a labelled [`Failure`]. Every combinator consumes the outcome and returns
//! a new one; nothing is mutated in place.
//!
//! Extraction comes in two flavours:
//! - `try_*` methods return `Err(UnwrapError)` when the outcome does not
//!   hold what was asked for
//! - the plain methods (`unwrap`, `unwrap_err`, `expect`, ...) raise the
//!   same `UnwrapError` as a panic payload

use crate::error::{Label, Mismatch, Origin, Tag, UnwrapError, UnwrapPanic};
use crate::failure::Failure;
use std::fmt;
use std::panic::Location;

/// The outcome of an operation that may fail.
///
/// # Example
///
/// ```rust
/// use verdict::{err, ok, Outcome};
///
/// fn parse_port(raw: &str) -> Outcome<u16, &'static str, String> {
///     match raw.parse::<u16>() {
///         Ok(port) => ok(port),
///         Err(e) => verdict::err_with("InvalidPort", e.to_string()),
///     }
/// }
///
/// let port = parse_port("8080").and_then(|p| if p > 1024 { ok(p) } else { err("Privileged") });
/// assert_eq!(port.unwrap_or(80), 8080);
///
/// let bad = parse_port("http");
/// assert!(bad.is_err());
/// assert_eq!(bad.error(), Some(&"InvalidPort"));
/// ```
#[must_use = "this `Outcome` may be a failure, which should be handled"]
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome<T, E = Tag, R = ()> {
    /// Success with data
    Ok(T),
    /// Failure with a label and an optional reason
    Err(Failure<E, R>),
}

// =============================================================================
// Construction
// =============================================================================

/// Create a successful outcome
pub fn ok<T, E, R>(data: T) -> Outcome<T, E, R> {
    Outcome::Ok(data)
}

/// Create a failed outcome without a reason
#[track_caller]
pub fn err<T, E, R>(error: E) -> Outcome<T, E, R> {
    Outcome::Err(Failure::new(error))
}

/// Create a failed outcome with a reason
#[track_caller]
pub fn err_with<T, E, R>(error: E, reason: R) -> Outcome<T, E, R> {
    Outcome::Err(Failure::with_reason(error, reason))
}

/// Create a failed outcome labelled with the `unknown` sentinel
#[track_caller]
pub fn unknown<T, E: Label, R>() -> Outcome<T, E, R> {
    Outcome::Err(Failure::unknown())
}

impl<T, E, R> Outcome<T, E, R> {
    /// Create a successful outcome
    pub fn ok(data: T) -> Self {
        Outcome::Ok(data)
    }

    /// Create a failed outcome without a reason
    #[track_caller]
    pub fn err(error: E) -> Self {
        Outcome::Err(Failure::new(error))
    }

    /// Create a failed outcome with a reason
    #[track_caller]
    pub fn err_with(error: E, reason: R) -> Self {
        Outcome::Err(Failure::with_reason(error, reason))
    }

    /// Create a failed outcome labelled with the `unknown` sentinel
    #[track_caller]
    pub fn unknown() -> Self
    where
        E: Label,
    {
        Outcome::Err(Failure::unknown())
    }

    // =========================================================================
    // Narrowing & inspection
    // =========================================================================

    /// The discriminant: `true` for a success
    pub fn success(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// Returns `true` for a success
    pub fn is_ok(&self) -> bool {
        self.success()
    }

    /// Returns `true` for a failure
    pub fn is_err(&self) -> bool {
        !self.success()
    }

    /// The data of a success
    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Ok(data) => Some(data),
            Outcome::Err(_) => None,
        }
    }

    /// The failure, if any
    pub fn failure(&self) -> Option<&Failure<E, R>> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(failure) => Some(failure),
        }
    }

    /// The failure label, if any
    pub fn error(&self) -> Option<&E> {
        self.failure().map(Failure::error)
    }

    /// The failure reason, if any
    pub fn reason(&self) -> Option<&R> {
        self.failure().and_then(Failure::reason)
    }

    /// Consume into the data of a success
    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Ok(data) => Some(data),
            Outcome::Err(_) => None,
        }
    }

    /// Consume into the failure, if any
    pub fn into_failure(self) -> Option<Failure<E, R>> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(failure) => Some(failure),
        }
    }

    /// Borrow the data and failure in place
    pub fn as_ref(&self) -> Outcome<&T, &E, &R> {
        match self {
            Outcome::Ok(data) => Outcome::Ok(data),
            Outcome::Err(failure) => Outcome::Err(Failure::from_parts(
                failure.error(),
                failure.reason(),
                failure.origin().clone(),
            )),
        }
    }

    // =========================================================================
    // Extraction that never fails
    // =========================================================================

    /// The data of a success, or `default`
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Outcome::Ok(data) => data,
            Outcome::Err(_) => default,
        }
    }

    /// The data of a success, or the value computed from the failure.
    ///
    /// `f` is not invoked for a success.
    pub fn unwrap_or_else(self, f: impl FnOnce(Failure<E, R>) -> T) -> T {
        match self {
            Outcome::Ok(data) => data,
            Outcome::Err(failure) => f(failure),
        }
    }

    /// The failure, or `default` for a success
    pub fn unwrap_err_or(self, default: Failure<E, R>) -> Failure<E, R> {
        match self {
            Outcome::Ok(_) => default,
            Outcome::Err(failure) => failure,
        }
    }

    /// The failure, or the failure computed from the data of a success.
    ///
    /// `f` is not invoked for a failure.
    pub fn unwrap_err_or_else(self, f: impl FnOnce(T) -> Failure<E, R>) -> Failure<E, R> {
        match self {
            Outcome::Ok(data) => f(data),
            Outcome::Err(failure) => failure,
        }
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    /// `next` if this is a success, otherwise this failure
    pub fn and<U>(self, next: Outcome<U, E, R>) -> Outcome<U, E, R> {
        match self {
            Outcome::Ok(_) => next,
            Outcome::Err(failure) => Outcome::Err(failure),
        }
    }

    /// Chain a fallible step onto a success.
    ///
    /// `f` is not invoked for a failure, which is passed through unchanged.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U, E, R>) -> Outcome<U, E, R> {
        match self {
            Outcome::Ok(data) => f(data),
            Outcome::Err(failure) => Outcome::Err(failure),
        }
    }

    /// This success, otherwise `fallback`
    pub fn or<E2, R2>(self, fallback: Outcome<T, E2, R2>) -> Outcome<T, E2, R2> {
        match self {
            Outcome::Ok(data) => Outcome::Ok(data),
            Outcome::Err(_) => fallback,
        }
    }

    /// Recover from a failure.
    ///
    /// `f` is not invoked for a success, which is passed through unchanged.
    pub fn or_else<E2, R2>(
        self,
        f: impl FnOnce(Failure<E, R>) -> Outcome<T, E2, R2>,
    ) -> Outcome<T, E2, R2> {
        match self {
            Outcome::Ok(data) => Outcome::Ok(data),
            Outcome::Err(failure) => f(failure),
        }
    }

    /// Hand the whole outcome to `f` and return what it produces.
    ///
    /// `f` is always invoked, whatever the variant.
    pub fn map<U>(self, f: impl FnOnce(Self) -> U) -> U {
        f(self)
    }

    /// Transform the data of a success
    pub fn map_ok<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E, R> {
        match self {
            Outcome::Ok(data) => Outcome::Ok(f(data)),
            Outcome::Err(failure) => Outcome::Err(failure),
        }
    }

    /// Relabel a failure, keeping its reason and origin
    pub fn map_error<E2>(self, f: impl FnOnce(E) -> E2) -> Outcome<T, E2, R> {
        match self {
            Outcome::Ok(data) => Outcome::Ok(data),
            Outcome::Err(failure) => Outcome::Err(failure.map_error(f)),
        }
    }

    /// Transform the reason of a failure, keeping its label and origin
    pub fn map_reason<R2>(self, f: impl FnOnce(R) -> R2) -> Outcome<T, E, R2> {
        match self {
            Outcome::Ok(data) => Outcome::Ok(data),
            Outcome::Err(failure) => Outcome::Err(failure.map_reason(f)),
        }
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Convert into a standard result, so `?` can propagate the failure
    pub fn into_result(self) -> Result<T, Failure<E, R>> {
        match self {
            Outcome::Ok(data) => Ok(data),
            Outcome::Err(failure) => Err(failure),
        }
    }

    /// Convert a standard result; its error becomes the reason of an
    /// `unknown` failure
    #[track_caller]
    pub fn from_result(result: Result<T, R>) -> Self
    where
        E: Label,
    {
        Self::from_result_labeled(result, E::unknown())
    }

    /// Convert a standard result; its error becomes the reason of a failure
    /// labelled `error`
    #[track_caller]
    pub fn from_result_labeled(result: Result<T, R>, error: E) -> Self {
        match result {
            Ok(data) => Outcome::Ok(data),
            Err(reason) => Outcome::Err(Failure::with_reason(error, reason)),
        }
    }

    /// Convert into an `anyhow::Result` at an application boundary
    pub fn into_anyhow(self) -> anyhow::Result<T>
    where
        Failure<E, R>: std::error::Error + Send + Sync + 'static,
    {
        self.into_result().map_err(anyhow::Error::new)
    }
}

// =============================================================================
// Extraction that may fail
// =============================================================================

impl<T, E: Label, R> Outcome<T, E, R> {
    /// The data of a success, or an `UnwrapError` carrying the failure's
    /// label, reason and origin
    #[track_caller]
    pub fn try_unwrap(self) -> Result<T, UnwrapError<E, R>> {
        self.unwrap_at(None, Location::caller())
    }

    /// Like [`try_unwrap`](Self::try_unwrap), raising with `label` instead
    /// of the failure's own label
    #[track_caller]
    pub fn try_unwrap_labeled(self, label: E) -> Result<T, UnwrapError<E, R>> {
        self.unwrap_at(Some(label), Location::caller())
    }

    /// The failure, or an `UnwrapError` labelled [`Label::unwrapped`] for a
    /// success
    #[track_caller]
    pub fn try_unwrap_err(self) -> Result<Failure<E, R>, UnwrapError<E, R>> {
        self.unwrap_err_at(None, Location::caller())
    }

    /// Like [`try_unwrap_err`](Self::try_unwrap_err), raising with `label`
    #[track_caller]
    pub fn try_unwrap_err_labeled(self, label: E) -> Result<Failure<E, R>, UnwrapError<E, R>> {
        self.unwrap_err_at(Some(label), Location::caller())
    }

    /// The failure if its label satisfies `expected`, otherwise an
    /// `UnwrapError` naming both the expected and the actual label
    #[track_caller]
    pub fn try_expect(self, expected: &E) -> Result<Failure<E, R>, UnwrapError<E, R>> {
        self.expect_at(expected, None, Location::caller())
    }

    /// Like [`try_expect`](Self::try_expect), raising with `label`
    #[track_caller]
    pub fn try_expect_labeled(
        self,
        expected: &E,
        label: E,
    ) -> Result<Failure<E, R>, UnwrapError<E, R>> {
        self.expect_at(expected, Some(label), Location::caller())
    }

    fn unwrap_at(
        self,
        label: Option<E>,
        location: &'static Location<'static>,
    ) -> Result<T, UnwrapError<E, R>> {
        match self {
            Outcome::Ok(data) => Ok(data),
            Outcome::Err(failure) => {
                let (actual, reason, origin) = failure.into_components();
                let error = label.unwrap_or_else(|| actual.clone());
                Err(UnwrapError::new(
                    Mismatch::Failure { actual },
                    error,
                    reason,
                    Origin::at(location),
                    Some(origin),
                ))
            }
        }
    }

    fn unwrap_err_at(
        self,
        label: Option<E>,
        location: &'static Location<'static>,
    ) -> Result<Failure<E, R>, UnwrapError<E, R>> {
        match self {
            Outcome::Ok(_) => Err(UnwrapError::new(
                Mismatch::Success,
                label.unwrap_or_else(E::unwrapped),
                None,
                Origin::at(location),
                None,
            )),
            Outcome::Err(failure) => Ok(failure),
        }
    }

    fn expect_at(
        self,
        expected: &E,
        label: Option<E>,
        location: &'static Location<'static>,
    ) -> Result<Failure<E, R>, UnwrapError<E, R>> {
        match self {
            Outcome::Err(failure) if failure.error().satisfies(expected) => Ok(failure),
            Outcome::Err(failure) => {
                let (actual, reason, origin) = failure.into_components();
                let error = label.unwrap_or_else(|| actual.clone());
                Err(UnwrapError::new(
                    Mismatch::Expected {
                        expected: expected.clone(),
                        actual: Some(actual),
                    },
                    error,
                    reason,
                    Origin::at(location),
                    Some(origin),
                ))
            }
            Outcome::Ok(_) => Err(UnwrapError::new(
                Mismatch::Expected {
                    expected: expected.clone(),
                    actual: None,
                },
                label.unwrap_or_else(E::unwrapped),
                None,
                Origin::at(location),
                None,
            )),
        }
    }
}

// =============================================================================
// Panicking extraction
// =============================================================================

impl<T, E, R> Outcome<T, E, R>
where
    E: Label + Send + 'static,
    R: Send + 'static,
{
    /// The data of a success.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapPanic`] payload wrapping the [`UnwrapError`]
    /// for a failure. The panic is reported at the caller's location.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.unwrap_at(None, Location::caller()) {
            Ok(value) => value,
            Err(error) => raise(error),
        }
    }

    /// The data of a success.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapError`] labelled `label` for a failure.
    #[track_caller]
    pub fn unwrap_labeled(self, label: E) -> T {
        match self.unwrap_at(Some(label), Location::caller()) {
            Ok(value) => value,
            Err(error) => raise(error),
        }
    }

    /// The failure.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapError`] for a success.
    #[track_caller]
    pub fn unwrap_err(self) -> Failure<E, R> {
        match self.unwrap_err_at(None, Location::caller()) {
            Ok(value) => value,
            Err(error) => raise(error),
        }
    }

    /// The failure.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapError`] labelled `label` for a success.
    #[track_caller]
    pub fn unwrap_err_labeled(self, label: E) -> Failure<E, R> {
        match self.unwrap_err_at(Some(label), Location::caller()) {
            Ok(value) => value,
            Err(error) => raise(error),
        }
    }

    /// The failure, if its label satisfies `expected`.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapError`] for a success or a different label.
    #[track_caller]
    pub fn expect(self, expected: &E) -> Failure<E, R> {
        match self.expect_at(expected, None, Location::caller()) {
            Ok(value) => value,
            Err(error) => raise(error),
        }
    }

    /// The failure, if its label satisfies `expected`.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapError`] labelled `label` for a success or a
    /// different label.
    #[track_caller]
    pub fn expect_labeled(self, expected: &E, label: E) -> Failure<E, R> {
        match self.expect_at(expected, Some(label), Location::caller()) {
            Ok(value) => value,
            Err(error) => raise(error),
        }
    }
}

#[track_caller]
fn raise<E, R>(error: UnwrapError<E, R>) -> !
where
    E: Label + Send + 'static,
    R: Send + 'static,
{
    tracing::error!(label = %error.error(), "{}", error.message());
    UnwrapPanic::new(error).raise()
}

// =============================================================================
// Conversions
// =============================================================================

impl<T, E, R> From<Failure<E, R>> for Outcome<T, E, R> {
    fn from(failure: Failure<E, R>) -> Self {
        Outcome::Err(failure)
    }
}

impl<T, E, R> From<Outcome<T, E, R>> for Result<T, Failure<E, R>> {
    fn from(outcome: Outcome<T, E, R>) -> Self {
        outcome.into_result()
    }
}

// =============================================================================
// Display - compact stringification
// =============================================================================

impl<T: fmt::Debug, E: fmt::Display, R: fmt::Debug> fmt::Display for Outcome<T, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok(data) => write!(f, "Ok({:?})", data),
            Outcome::Err(failure) => write!(f, "Err({})", failure),
        }
    }
}
