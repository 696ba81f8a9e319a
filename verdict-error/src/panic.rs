//! Panic payload and reporting for failed unwraps
//!
//! A panicking extraction raises an [`UnwrapPanic`]: the typed
//! [`UnwrapError`] boxed next to its composed message and the location the
//! panic was raised from. The default panic hook only prints string
//! payloads, so [`install_panic_hook`] adds a hook that prints the composed
//! message for these panics and defers to the previous hook for all others.

use crate::{Label, UnwrapError};
use std::any::Any;
use std::fmt;
use std::panic::{self, Location};
use std::sync::Once;
use std::thread;

/// The payload of a panic raised by a failed unwrap.
pub struct UnwrapPanic {
    message: String,
    location: &'static Location<'static>,
    error: Box<dyn Any + Send>,
}

impl UnwrapPanic {
    /// Wrap `error`, recording the caller as the panic location
    #[track_caller]
    pub fn new<E, R>(error: UnwrapError<E, R>) -> Self
    where
        E: Label + Send + 'static,
        R: Send + 'static,
    {
        Self {
            message: error.message().to_string(),
            location: Location::caller(),
            error: Box::new(error),
        }
    }

    /// The composed message of the wrapped error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the panic was raised
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The wrapped error, if it has label type `E` and reason type `R`
    pub fn error<E: 'static, R: 'static>(&self) -> Option<&UnwrapError<E, R>> {
        self.error.downcast_ref()
    }

    /// Take the wrapped error back, or `self` if the types do not match
    pub fn into_error<E: 'static, R: 'static>(self) -> Result<UnwrapError<E, R>, Self> {
        match self.error.downcast::<UnwrapError<E, R>>() {
            Ok(error) => Ok(*error),
            Err(error) => Err(Self { error, ..self }),
        }
    }

    /// Raise this payload with `std::panic::panic_any`
    #[track_caller]
    pub fn raise(self) -> ! {
        install_panic_hook();
        panic::panic_any(self)
    }
}

impl fmt::Display for UnwrapPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for UnwrapPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnwrapPanic")
            .field("location", &format_args!("{}", self.location))
            .field("message", &self.message)
            .finish()
    }
}

// =============================================================================
// Panic hook
// =============================================================================

/// Install a panic hook that prints the composed message of an
/// [`UnwrapPanic`].
///
/// The hook chains to the one that was installed before it for every other
/// payload. Installing is idempotent, and [`UnwrapPanic::raise`] installs
/// the hook on first use; a hook set after that replaces it as usual.
pub fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            match info.payload().downcast_ref::<UnwrapPanic>() {
                Some(unwrap) => eprint!("{}", render_report(thread::current().name(), unwrap)),
                None => previous(info),
            }
        }));
    });
}

fn render_report(thread: Option<&str>, unwrap: &UnwrapPanic) -> String {
    format!(
        "thread '{}' panicked at {}:\n{}\n",
        thread.unwrap_or("<unnamed>"),
        unwrap.location,
        unwrap.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CaptureMode, Mismatch, Origin};

    fn sample() -> UnwrapError<&'static str, u8> {
        UnwrapError::new(
            Mismatch::Failure { actual: "NotFound" },
            "NotFound",
            Some(7),
            Origin::here_with(CaptureMode::Disabled),
            Some(Origin::here_with(CaptureMode::Disabled)),
        )
    }

    #[test]
    fn test_new_records_caller() {
        let line = line!() + 1;
        let payload = UnwrapPanic::new(sample());
        assert_eq!(payload.location().file(), file!());
        assert_eq!(payload.location().line(), line);
        assert!(payload.message().starts_with("Could not unwrap value"));
    }

    #[test]
    fn test_typed_access() {
        let payload = UnwrapPanic::new(sample());
        assert_eq!(payload.error::<&'static str, u8>().map(|e| *e.error()), Some("NotFound"));
        assert!(payload.error::<String, u8>().is_none());

        let payload = payload.into_error::<String, u8>().unwrap_err();
        let error = payload.into_error::<&'static str, u8>().unwrap();
        assert_eq!(error.reason(), Some(&7));
    }

    #[test]
    fn test_raise_is_caught_with_caller_location() {
        let line = line!() + 1;
        let payload = panic::catch_unwind(|| UnwrapPanic::new(sample()).raise()).unwrap_err();

        let unwrap = payload.downcast_ref::<UnwrapPanic>().unwrap();
        assert_eq!(unwrap.location().line(), line);
        assert_eq!(
            UnwrapError::<&'static str, u8>::from_panic(payload.as_ref()).map(|e| e.message()),
            Some(unwrap.message())
        );
    }

    #[test]
    fn test_report_names_site_and_origin() {
        let payload = UnwrapPanic::new(sample());
        let report = render_report(Some("worker"), &payload);

        assert!(report.starts_with(&format!("thread 'worker' panicked at {}:\n", payload.location())));
        assert!(report.contains("unwrapped at"));
        assert!(report.contains("--- origin ---"));
        assert!(render_report(None, &payload).starts_with("thread '<unnamed>'"));
    }

    #[test]
    fn test_install_is_idempotent() {
        install_panic_hook();
        install_panic_hook();
        let payload = panic::catch_unwind(|| panic!("plain")).unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"plain"));
    }
}
