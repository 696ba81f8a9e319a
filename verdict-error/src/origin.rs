//! Provenance of failures and unwrap sites
//!
//! An [`Origin`] pairs the `#[track_caller]` location of a call with an
//! optional stack trace. The location is always available; the stack trace
//! is captured according to the process-wide [`CaptureMode`].

use crate::config::{self, CaptureMode};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Symbol prefixes of frames that belong to the capture machinery itself.
/// Leading frames matching one of these are dropped when rendering.
const INTERNAL_FRAMES: &[&str] = &[
    "std::backtrace",
    "std::backtrace_rs",
    "verdict_error::",
    "verdict::",
];

/// Where a value was produced or consumed.
///
/// Cloning is cheap: the stack trace is shared.
#[derive(Clone)]
pub struct Origin {
    location: &'static Location<'static>,
    stack: Option<Arc<Backtrace>>,
}

impl Origin {
    /// Capture the caller's origin with the current capture mode
    #[track_caller]
    pub fn here() -> Self {
        Self::at(Location::caller())
    }

    /// Capture the caller's origin with an explicit capture mode
    #[track_caller]
    pub fn here_with(mode: CaptureMode) -> Self {
        Self::at_with(Location::caller(), mode)
    }

    /// Record `location`, capturing a stack with the current capture mode
    pub fn at(location: &'static Location<'static>) -> Self {
        Self::at_with(location, config::capture_mode())
    }

    /// Record `location`, capturing a stack with an explicit capture mode
    pub fn at_with(location: &'static Location<'static>, mode: CaptureMode) -> Self {
        let stack = match mode {
            CaptureMode::Disabled => None,
            CaptureMode::Auto => Some(Backtrace::capture()),
            CaptureMode::Forced => Some(Backtrace::force_capture()),
        };

        Self {
            location,
            stack: stack
                .filter(|bt| bt.status() == BacktraceStatus::Captured)
                .map(Arc::new),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The source location of the recorded call
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The captured stack trace, if any
    pub fn stack(&self) -> Option<&Backtrace> {
        self.stack.as_deref()
    }

    /// Whether a stack trace was captured
    pub fn has_stack(&self) -> bool {
        self.stack.is_some()
    }

    /// Render the stack trace, starting at the first frame outside the
    /// capture machinery
    pub fn render_stack(&self) -> Option<String> {
        self.stack.as_ref().map(|bt| trim_frames(&bt.to_string()))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)?;
        if let Some(stack) = self.render_stack() {
            writeln!(f)?;
            write!(f, "{}", stack.trim_end())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Origin")
            .field("location", &format_args!("{}", self.location))
            .field("stack", &if self.has_stack() { "<captured>" } else { "<none>" })
            .finish()
    }
}

// =============================================================================
// Frame trimming
// =============================================================================

/// A frame header line looks like `  12: crate::module::function`.
fn frame_symbol(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let (index, symbol) = trimmed.split_once(": ")?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(symbol.trim_start_matches('<'))
}

fn is_internal(symbol: &str) -> bool {
    INTERNAL_FRAMES.iter().any(|prefix| symbol.starts_with(prefix))
}

/// Drop the leading frames that belong to the capture machinery.
///
/// Frames after the first foreign frame are kept untouched. If every frame
/// is internal the trace is returned as is.
pub(crate) fn trim_frames(rendered: &str) -> String {
    let mut skipping = true;
    let mut kept = Vec::new();

    for line in rendered.lines() {
        if skipping {
            match frame_symbol(line) {
                Some(symbol) if is_internal(symbol) => continue,
                Some(_) => skipping = false,
                // location line of a skipped frame
                None => continue,
            }
        }
        kept.push(line);
    }

    if kept.is_empty() {
        return rendered.to_string();
    }
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:116:5
   1: std::backtrace::Backtrace::create
             at /rustc/library/std/src/backtrace.rs:331:13
   2: verdict_error::origin::Origin::at_with
             at ./verdict-error/src/origin.rs:52:36
   3: <verdict::outcome::Outcome<T,E,R>>::unwrap
             at ./verdict/src/outcome.rs:200:9
   4: app::load_config
             at ./src/main.rs:14:5
   5: verdict::adapter::helper
             at ./verdict/src/adapter.rs:10:5";

    #[test]
    fn test_trim_leading_internal_frames() {
        let trimmed = trim_frames(RENDERED);
        assert!(trimmed.starts_with("   4: app::load_config"));
        assert!(trimmed.contains("./src/main.rs:14:5"));
        // frames after the first foreign one are kept
        assert!(trimmed.contains("verdict::adapter::helper"));
        assert!(!trimmed.contains("Backtrace::create"));
    }

    #[test]
    fn test_trim_all_internal_keeps_everything() {
        let rendered = "   0: verdict::outcome::x\n             at ./a.rs:1:1";
        assert_eq!(trim_frames(rendered), rendered);
    }

    #[test]
    fn test_frame_symbol() {
        assert_eq!(frame_symbol("  12: foo::bar"), Some("foo::bar"));
        assert_eq!(frame_symbol("  3: <foo::Bar as Baz>::qux"), Some("foo::Bar as Baz>::qux"));
        assert_eq!(frame_symbol("             at ./src/main.rs:1:1"), None);
    }

    #[test]
    fn test_disabled_has_no_stack() {
        let origin = Origin::here_with(CaptureMode::Disabled);
        assert!(!origin.has_stack());
        assert!(origin.render_stack().is_none());
        assert_eq!(origin.location().file(), file!());
        assert_eq!(origin.to_string(), origin.location().to_string());
    }

    #[test]
    fn test_forced_has_stack() {
        let origin = Origin::here_with(CaptureMode::Forced);
        // unsupported platforms report BacktraceStatus::Unsupported
        if let Some(stack) = origin.render_stack() {
            assert!(!stack.is_empty());
            assert!(origin.to_string().starts_with(&origin.location().to_string()));
        }
    }

    #[test]
    fn test_clone_shares_stack() {
        let origin = Origin::here_with(CaptureMode::Forced);
        let copy = origin.clone();
        assert_eq!(copy.location(), origin.location());
        assert_eq!(copy.has_stack(), origin.has_stack());
    }

    #[test]
    fn test_debug() {
        let origin = Origin::here_with(CaptureMode::Disabled);
        let debug = format!("{:?}", origin);
        assert!(debug.contains("<none>"));
        assert!(debug.contains(file!()));
    }
}
