//! # verdict
//!
//! Outcomes of operations that may fail, as values: success with data, or
//! failure with a label, a reason, and the place it was produced.
//!
//! ## Core Concepts
//! - **Outcome**: `Ok(data)` or `Err(Failure)`, inspected by matching and
//!   transformed with combinators (`and_then`, `or_else`, ...)
//! - **Failure**: a label from a closed label space, an optional reason, and
//!   the origin captured at construction
//! - **UnwrapError**: raised when an extraction asks for something the
//!   outcome does not hold; reports both the unwrap site and the origin
//!
//! Panicking extractions (`unwrap`, `unwrap_err`, `expect`) panic at the
//! caller's location with an [`UnwrapPanic`] payload. The first such panic
//! installs a hook ([`install_panic_hook`]) that prints the composed message,
//! since the default hook cannot print non-string payloads. Stack traces are
//! captured by default; see [`CaptureMode`].
//! - **Adapters**: `resultfy` and friends turn panicking, failing or async
//!   computations into outcome-producing ones
//!
//! ## Usage
//!
//! ```rust
//! use verdict::{err_with, ok, Failure, Outcome};
//!
//! verdict::labels! {
//!     pub enum ConfigError {
//!         Missing,
//!         Invalid,
//!     }
//! }
//!
//! fn lookup(key: &str) -> Outcome<&'static str, ConfigError, String> {
//!     match key {
//!         "port" => ok("8080"),
//!         _ => err_with(ConfigError::Missing, key.to_string()),
//!     }
//! }
//!
//! fn port() -> Outcome<u16, ConfigError, String> {
//!     lookup("port").and_then(|raw| match raw.parse() {
//!         Ok(port) => ok(port),
//!         Err(e) => err_with(ConfigError::Invalid, format!("{}", e)),
//!     })
//! }
//!
//! assert_eq!(port().unwrap(), 8080);
//!
//! let failure: Failure<ConfigError, String> = lookup("host").expect(&ConfigError::Missing);
//! assert_eq!(failure.reason().map(String::as_str), Some("host"));
//! ```

pub mod adapter;
pub mod error;
pub mod failure;
pub mod future;
pub mod outcome;
pub mod panic;
pub mod wire;

pub use adapter::{
    err_reject, ok_fulfilled, resultfy, resultfy_async, resultfy_async_labeled,
    resultfy_async_try, resultfy_async_try_labeled, resultfy_labeled, resultfy_try,
    resultfy_try_labeled,
};
pub use error::{
    capture_mode, install_panic_hook, set_capture_mode, CaptureMode, Label, Mismatch, Origin, Tag,
    UnwrapError, UnwrapPanic,
};
pub use failure::Failure;
pub use future::{
    resultfy_future, resultfy_future_labeled, settle, settle_labeled, OutcomeFutureExt,
    OutcomeTryFutureExt, ResultFuture, TryResultFuture,
};
pub use outcome::{err, err_with, ok, unknown, Outcome};
pub use panic::Panic;
pub use verdict_error::labels;
pub use wire::WireError;
