//! The unwrap-failure signal

use crate::{Label, Origin};
use std::any::Any;
use std::fmt;

/// What an extraction expected and what it found.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch<E> {
    /// A value was requested from a failure
    Failure { actual: E },

    /// A failure was requested from a success
    Success,

    /// A failure with a specific label was expected
    Expected { expected: E, actual: Option<E> },
}

impl<E: fmt::Display> fmt::Display for Mismatch<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Failure { actual } => {
                write!(f, "Could not unwrap value: got error `{}`", actual)
            }
            Mismatch::Success => write!(f, "Could not unwrap error: got success"),
            Mismatch::Expected { expected, actual: Some(actual) } => {
                write!(f, "Expected error `{}` but got error `{}`", expected, actual)
            }
            Mismatch::Expected { expected, actual: None } => {
                write!(f, "Expected error `{}` but got success", expected)
            }
        }
    }
}

/// Raised when an extraction asks for something the outcome does not hold.
///
/// An `UnwrapError` carries:
/// - `error`: the label it was raised with (custom label, the failure's own
///   label, or [`Label::unwrapped`] when the source was a success)
/// - `reason`: the source failure's reason, if any
/// - `site`: where the extraction was attempted
/// - `origin`: where the source failure was produced, if it was one
/// - `message`: a description followed by both locations and stacks
///
/// Panicking extractions raise it inside an [`UnwrapPanic`](crate::UnwrapPanic)
/// payload, so a handler can recover it with [`UnwrapError::from_panic`].
///
/// # Example
///
/// ```rust
/// use verdict_error::{CaptureMode, Mismatch, Origin, UnwrapError};
///
/// let source = Origin::here_with(CaptureMode::Disabled);
/// let site = Origin::here_with(CaptureMode::Disabled);
/// let err: UnwrapError<&str, ()> = UnwrapError::new(
///     Mismatch::Failure { actual: "NotFound" },
///     "NotFound",
///     None,
///     site,
///     Some(source),
/// );
///
/// assert_eq!(*err.error(), "NotFound");
/// assert!(err.message().contains("Could not unwrap value"));
/// assert!(err.message().contains("--- origin ---"));
/// ```
pub struct UnwrapError<E, R> {
    error: E,
    reason: Option<R>,
    mismatch: Mismatch<E>,
    site: Origin,
    origin: Option<Origin>,
    message: String,
}

impl<E: Label, R> UnwrapError<E, R> {
    /// Create a new unwrap error and compose its message
    pub fn new(
        mismatch: Mismatch<E>,
        error: E,
        reason: Option<R>,
        site: Origin,
        origin: Option<Origin>,
    ) -> Self {
        let message = compose_message(&mismatch, &error, &site, origin.as_ref());
        Self {
            error,
            reason,
            mismatch,
            site,
            origin,
            message,
        }
    }
}

impl<E, R> UnwrapError<E, R> {
    // =========================================================================
    // Getters
    // =========================================================================

    /// The label this error was raised with
    pub fn error(&self) -> &E {
        &self.error
    }

    /// The reason of the source failure
    pub fn reason(&self) -> Option<&R> {
        self.reason.as_ref()
    }

    /// What was expected and what was found
    pub fn mismatch(&self) -> &Mismatch<E> {
        &self.mismatch
    }

    /// Where the extraction was attempted
    pub fn site(&self) -> &Origin {
        &self.site
    }

    /// Where the source failure was produced
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// The full diagnostic message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Split into label and reason
    pub fn into_parts(self) -> (E, Option<R>) {
        (self.error, self.reason)
    }
}

impl<E: 'static, R: 'static> UnwrapError<E, R> {
    /// Recover an unwrap error from a panic payload.
    ///
    /// Accepts an [`UnwrapPanic`](crate::UnwrapPanic) as well as a bare
    /// `UnwrapError`. Returns `None` when the panic was raised by something
    /// else, or with different label/reason types.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Option<&Self> {
        match payload.downcast_ref::<crate::UnwrapPanic>() {
            Some(unwrap) => unwrap.error(),
            None => payload.downcast_ref::<Self>(),
        }
    }
}

fn compose_message<E: Label>(
    mismatch: &Mismatch<E>,
    error: &E,
    site: &Origin,
    origin: Option<&Origin>,
) -> String {
    let mut message = format!("{} [label: {}]", mismatch, error);
    message.push_str(&format!("\n  unwrapped at {}", site.location()));
    if let Some(stack) = site.render_stack() {
        message.push('\n');
        message.push_str(stack.trim_end());
    }

    if let Some(origin) = origin {
        message.push_str("\n\n--- origin ---");
        message.push_str(&format!("\n  created at {}", origin.location()));
        if let Some(stack) = origin.render_stack() {
            message.push('\n');
            message.push_str(stack.trim_end());
        }
    }

    message
}

// =============================================================================
// Display - the composed message
// =============================================================================

impl<E, R> fmt::Display for UnwrapError<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// =============================================================================
// Debug - structured fields
// =============================================================================

impl<E: fmt::Debug, R: fmt::Debug> fmt::Debug for UnwrapError<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnwrapError")
            .field("error", &self.error)
            .field("reason", &self.reason)
            .field("mismatch", &self.mismatch)
            .field("site", &self.site)
            .field("origin", &self.origin)
            .finish()
    }
}

impl<E: fmt::Debug, R: fmt::Debug> std::error::Error for UnwrapError<E, R> {}
