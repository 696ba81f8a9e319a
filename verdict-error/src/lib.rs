//! # verdict-error
//!
//! The leaf of verdict: labels, provenance capture and the unwrap-failure
//! signal.
//!
//! ## Design Philosophy
//!
//! - **Label**: Know what failure occurred (e.g., NotFound, Timeout), from a
//!   label space closed per call site
//! - **Origin**: Know where it occurred, by recording the caller's location
//!   and, when enabled, a stack trace
//! - **UnwrapError**: When an extraction contract is violated, report both
//!   where the value was unwrapped and where the failure was produced
//! - **CaptureMode**: Decide how much provenance is worth paying for
//!
//! ## Usage
//!
//! ```rust
//! use verdict_error::{CaptureMode, Label, Origin, Tag};
//!
//! verdict_error::set_capture_mode(CaptureMode::Disabled);
//!
//! let origin = Origin::here();
//! assert!(!origin.has_stack());
//! assert_eq!(origin.location().file(), file!());
//! assert_eq!(Tag::unknown(), "unknown");
//! ```

mod config;
mod error;
mod label;
mod origin;
mod panic;

pub use config::{capture_mode, set_capture_mode, CaptureMode};
pub use error::{Mismatch, UnwrapError};
pub use label::{Label, Tag};
pub use origin::Origin;
pub use panic::{install_panic_hook, UnwrapPanic};
