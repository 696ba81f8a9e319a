//! # Failure
//!
//! The failure branch of an outcome: a label, an optional reason, and the
//! origin recorded when the failure was constructed.

use crate::error::{Label, Origin};
use crate::outcome::Outcome;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;

/// A labelled failure.
///
/// - `error`: what kind of failure occurred; always present
/// - `reason`: auxiliary diagnostic payload (a caught panic, a validation
///   detail, the error of a wrapped call); optional
/// - `origin`: where the failure was constructed, captured once
///
/// Failures are immutable. The `map_*` methods build new failures that keep
/// the original origin.
///
/// # Example
///
/// ```rust
/// use verdict::Failure;
///
/// let failure: Failure<&str, String> = Failure::with_reason("NotFound", "user 42".to_string());
/// assert_eq!(*failure.error(), "NotFound");
/// assert_eq!(failure.reason().map(String::as_str), Some("user 42"));
/// assert_eq!(failure.origin().location().file(), file!());
/// ```
#[derive(Clone)]
pub struct Failure<E, R = ()> {
    error: E,
    reason: Option<R>,
    origin: Origin,
}

impl<E, R> Failure<E, R> {
    /// Create a failure without a reason
    #[track_caller]
    pub fn new(error: E) -> Self {
        Self::from_parts(error, None, Origin::here())
    }

    /// Create a failure with a reason
    #[track_caller]
    pub fn with_reason(error: E, reason: R) -> Self {
        Self::from_parts(error, Some(reason), Origin::here())
    }

    /// Create a failure recorded at `location` rather than at the caller
    pub fn at(error: E, reason: Option<R>, location: &'static Location<'static>) -> Self {
        Self::from_parts(error, reason, Origin::at(location))
    }

    /// Assemble a failure from an already captured origin
    pub fn from_parts(error: E, reason: Option<R>, origin: Origin) -> Self {
        Self {
            error,
            reason,
            origin,
        }
    }

    /// Create a failure labelled with the `unknown` sentinel
    #[track_caller]
    pub fn unknown() -> Self
    where
        E: Label,
    {
        Self::new(E::unknown())
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The failure label
    pub fn error(&self) -> &E {
        &self.error
    }

    /// The failure reason, if any
    pub fn reason(&self) -> Option<&R> {
        self.reason.as_ref()
    }

    /// Where this failure was constructed
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The stack captured at construction, if any
    pub fn origin_stack(&self) -> Option<&Backtrace> {
        self.origin.stack()
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Split into label and reason, dropping the origin
    pub fn into_parts(self) -> (E, Option<R>) {
        (self.error, self.reason)
    }

    /// Take the reason, dropping label and origin
    pub fn into_reason(self) -> Option<R> {
        self.reason
    }

    /// Relabel this failure, keeping reason and origin
    pub fn map_error<E2>(self, f: impl FnOnce(E) -> E2) -> Failure<E2, R> {
        Failure {
            error: f(self.error),
            reason: self.reason,
            origin: self.origin,
        }
    }

    /// Transform the reason, keeping label and origin
    pub fn map_reason<R2>(self, f: impl FnOnce(R) -> R2) -> Failure<E, R2> {
        Failure {
            error: self.error,
            reason: self.reason.map(f),
            origin: self.origin,
        }
    }

    /// Wrap into the failure branch of an outcome
    pub fn into_outcome<T>(self) -> Outcome<T, E, R> {
        Outcome::Err(self)
    }

    pub(crate) fn into_components(self) -> (E, Option<R>, Origin) {
        (self.error, self.reason, self.origin)
    }
}

// Failures compare by label and reason; where they were produced does not
// take part in equality.
impl<E: PartialEq, R: PartialEq> PartialEq for Failure<E, R> {
    fn eq(&self, other: &Self) -> bool {
        self.error == other.error && self.reason == other.reason
    }
}

impl<E: Eq, R: Eq> Eq for Failure<E, R> {}

impl<E: fmt::Display, R: fmt::Debug> fmt::Display for Failure<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(reason) = &self.reason {
            write!(f, ": {:?}", reason)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug, R: fmt::Debug> fmt::Debug for Failure<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Failure");
        d.field("error", &self.error);
        if let Some(reason) = &self.reason {
            d.field("reason", reason);
        }
        d.field("origin", &format_args!("{}", self.origin.location()));
        d.finish()
    }
}

impl<E: fmt::Display + fmt::Debug, R: fmt::Debug> std::error::Error for Failure<E, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Tag;

    #[test]
    fn test_failure_creation() {
        let failure: Failure<&str> = Failure::new("NotFound");
        assert_eq!(*failure.error(), "NotFound");
        assert!(failure.reason().is_none());
        assert_eq!(failure.origin().location().file(), file!());
    }

    #[test]
    fn test_unknown_label() {
        let failure: Failure<Tag> = Failure::unknown();
        assert_eq!(*failure.error(), Tag::UNKNOWN);
    }

    #[test]
    fn test_map_keeps_origin() {
        let failure: Failure<&str, i32> = Failure::with_reason("Parse", 7);
        let location = failure.origin().location();

        let relabelled = failure.map_error(|e| format!("io::{}", e)).map_reason(|r| r * 2);
        assert_eq!(relabelled.error(), "io::Parse");
        assert_eq!(relabelled.reason(), Some(&14));
        assert_eq!(relabelled.origin().location(), location);
    }

    #[test]
    fn test_equality_ignores_origin() {
        let a: Failure<&str, i32> = Failure::with_reason("A", 1);
        let b: Failure<&str, i32> = Failure::with_reason("A", 1);
        assert_ne!(a.origin().location(), b.origin().location());
        assert_eq!(a, b);
        assert_ne!(a, Failure::with_reason("A", 2));
        assert_ne!(a, Failure::new("A"));
    }

    #[test]
    fn test_display() {
        let failure: Failure<&str, &str> = Failure::with_reason("Timeout", "5s");
        assert_eq!(failure.to_string(), "Timeout: \"5s\"");

        let failure: Failure<&str> = Failure::new("Timeout");
        assert_eq!(failure.to_string(), "Timeout");
    }

    #[test]
    fn test_debug() {
        let failure: Failure<&str, i32> = Failure::with_reason("A", 1);
        let debug = format!("{:?}", failure);
        assert!(debug.contains("error: \"A\""));
        assert!(debug.contains("reason: 1"));
        assert!(debug.contains(file!()));
    }

    #[test]
    fn test_into_parts() {
        let failure: Failure<&str, i32> = Failure::with_reason("A", 1);
        assert_eq!(failure.clone().into_parts(), ("A", Some(1)));
        assert_eq!(failure.into_reason(), Some(1));
    }
}
