//! Labels, provenance and the unwrap-failure signal
//!
//! Re-exports verdict-error so users only depend on verdict.

pub use verdict_error::{
    capture_mode, install_panic_hook, set_capture_mode, CaptureMode, Label, Mismatch, Origin, Tag,
    UnwrapError, UnwrapPanic,
};
