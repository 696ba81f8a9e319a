//! The reason recorded when a wrapped computation panics

use crate::error::{UnwrapError, UnwrapPanic};
use std::any::Any;
use std::fmt;
use thiserror::Error;

/// A caught panic, kept as the reason of a failure.
///
/// The payload is stored untouched; [`Panic::message`] reads it when it is
/// the usual `&str`/`String` panic message or an [`UnwrapPanic`].
///
/// A panic payload is `Send` but not `Sync`, and so is `Panic`. Failures
/// carrying it cannot go through [`Outcome::into_anyhow`] directly; render
/// the reason first:
///
/// ```rust
/// use verdict::{resultfy, Outcome, Panic, Tag};
///
/// let boom = resultfy(|(): ()| -> u8 { panic!("boom") });
/// let out: Outcome<u8, Tag, Panic> = boom(());
///
/// let err = out.map_reason(|panic| panic.to_string()).into_anyhow().unwrap_err();
/// assert!(err.to_string().contains("panicked: boom"));
/// ```
///
/// [`Outcome::into_anyhow`]: crate::Outcome::into_anyhow
#[derive(Error)]
#[error("panicked: {}", describe(.payload.as_ref()))]
pub struct Panic {
    payload: Box<dyn Any + Send>,
}

impl Panic {
    /// Wrap a payload returned by `catch_unwind`
    pub fn new(payload: Box<dyn Any + Send>) -> Self {
        Self { payload }
    }

    /// The panic message, when the payload is a string
    pub fn message(&self) -> Option<&str> {
        message_of(self.payload.as_ref())
    }

    /// The payload, if it has type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// The unwrap error this panic was raised with, if it has label type `E`
    /// and reason type `R`
    pub fn unwrap_error<E: 'static, R: 'static>(&self) -> Option<&UnwrapError<E, R>> {
        UnwrapError::from_panic(self.payload.as_ref())
    }

    /// Take the raw payload back
    pub fn into_payload(self) -> Box<dyn Any + Send> {
        self.payload
    }

    /// Continue unwinding with the original payload
    pub fn resume(self) -> ! {
        std::panic::resume_unwind(self.payload)
    }
}

fn message_of(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .or_else(|| payload.downcast_ref::<UnwrapPanic>().map(UnwrapPanic::message))
}

fn describe(payload: &(dyn Any + Send)) -> &str {
    message_of(payload).unwrap_or("<non-string payload>")
}

impl fmt::Debug for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.debug_tuple("Panic").field(&message).finish(),
            None => f.debug_tuple("Panic").field(&"<non-string payload>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn catch(f: impl FnOnce()) -> Panic {
        Panic::new(catch_unwind(AssertUnwindSafe(f)).unwrap_err())
    }

    #[test]
    fn test_str_message() {
        let panic = catch(|| panic!("boom"));
        assert_eq!(panic.message(), Some("boom"));
        assert_eq!(panic.to_string(), "panicked: boom");
    }

    #[test]
    fn test_formatted_message() {
        let code = 7;
        let panic = catch(move || panic!("code {}", code));
        assert_eq!(panic.message(), Some("code 7"));
        assert_eq!(format!("{:?}", panic), "Panic(\"code 7\")");
    }

    #[test]
    fn test_custom_payload() {
        let panic = catch(|| std::panic::panic_any(42u8));
        assert!(panic.message().is_none());
        assert_eq!(panic.downcast_ref::<u8>(), Some(&42));
        assert_eq!(panic.to_string(), "panicked: <non-string payload>");
    }

    #[test]
    fn test_unwrap_panic_payload() {
        let panic = catch(|| {
            crate::outcome::err::<u8, &'static str, ()>("Missing").unwrap();
        });
        assert!(panic.message().unwrap().starts_with("Could not unwrap value: got error `Missing`"));
        assert_eq!(panic.unwrap_error::<&'static str, ()>().map(|e| *e.error()), Some("Missing"));
        assert!(panic.unwrap_error::<String, ()>().is_none());
    }

    #[test]
    fn test_rendered_reason_reaches_anyhow() {
        let panic = catch(|| panic!("boom"));
        let out: crate::Outcome<u8, crate::Tag, Panic> = crate::Outcome::err_with(crate::Tag::from("Crashed"), panic);

        let err = out.map_reason(|p| p.to_string()).into_anyhow().unwrap_err();
        assert_eq!(err.to_string(), "Crashed: \"panicked: boom\"");
    }

    #[test]
    fn test_resume() {
        let panic = catch(|| panic!("again"));
        let resumed = catch(move || panic.resume());
        assert_eq!(resumed.message(), Some("again"));
    }
}
