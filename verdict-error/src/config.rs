//! Process-wide capture configuration

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// When stack traces are captured for failures and unwrap sites.
///
/// Source locations are always recorded; only the full stack trace is
/// governed by this mode. The default is [`CaptureMode::Forced`]: a stack is
/// captured wherever the platform can produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureMode {
    /// Never capture a stack trace
    Disabled,

    /// Capture when the standard library would (`RUST_BACKTRACE` /
    /// `RUST_LIB_BACKTRACE`)
    Auto,

    /// Always capture, regardless of the environment
    #[default]
    Forced,
}

impl CaptureMode {
    /// Returns the mode as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::Disabled => "disabled",
            CaptureMode::Auto => "auto",
            CaptureMode::Forced => "forced",
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            CaptureMode::Disabled => 0,
            CaptureMode::Auto => 1,
            CaptureMode::Forced => 2,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => CaptureMode::Disabled,
            1 => CaptureMode::Auto,
            _ => CaptureMode::Forced,
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static CAPTURE_MODE: AtomicU8 = AtomicU8::new(CaptureMode::Forced.to_u8());

/// Set the process-wide capture mode.
///
/// Affects failures constructed after the call; existing origins keep what
/// they captured.
pub fn set_capture_mode(mode: CaptureMode) {
    CAPTURE_MODE.store(mode.to_u8(), Ordering::Relaxed);
}

/// The current process-wide capture mode
pub fn capture_mode() -> CaptureMode {
    CaptureMode::from_u8(CAPTURE_MODE.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_encoding() {
        for mode in [CaptureMode::Disabled, CaptureMode::Auto, CaptureMode::Forced] {
            assert_eq!(CaptureMode::from_u8(mode.to_u8()), mode);
        }
        assert_eq!(CaptureMode::from_u8(200), CaptureMode::Forced);
    }

    #[test]
    fn test_display() {
        assert_eq!(CaptureMode::Forced.to_string(), "forced");
        assert_eq!(CaptureMode::default(), CaptureMode::Forced);
    }

    #[test]
    fn test_default_mode_captures() {
        // no test in this crate changes the process-wide mode
        assert_eq!(capture_mode(), CaptureMode::default());
    }
}
