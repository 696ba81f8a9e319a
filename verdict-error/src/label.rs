//! Error labels for verdict failures

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// The label space of a failure.
///
/// A label identifies what kind of failure occurred (e.g. `NotFound`). The
/// space is closed per call site: either a plain string tag or an enum
/// declaring every failure the call site can produce.
///
/// Two labels are reserved:
/// - [`Label::unknown`] is used whenever a failure is produced without a
///   label (adapters, `unknown()` constructors, conversions);
/// - [`Label::unwrapped`] is carried by an [`UnwrapError`](crate::UnwrapError)
///   raised while expecting a failure from a success.
///
/// # Example
///
/// ```rust
/// use verdict_error::Label;
///
/// assert_eq!(<&'static str as Label>::unknown(), "unknown");
/// assert_eq!(<&'static str as Label>::unwrapped(), "unwrap");
/// assert!("NotFound".satisfies(&"NotFound"));
/// ```
pub trait Label: Clone + PartialEq + fmt::Debug + fmt::Display {
    /// The sentinel used when no label was given
    fn unknown() -> Self;

    /// The sentinel used when a success was unwrapped as a failure
    fn unwrapped() -> Self {
        Self::unknown()
    }

    /// Whether `self` satisfies an `expect(expected)` check.
    ///
    /// Defaults to equality. Enums whose variants carry payloads can
    /// override this to compare variants only.
    fn satisfies(&self, expected: &Self) -> bool {
        self == expected
    }
}

impl Label for &'static str {
    fn unknown() -> Self {
        "unknown"
    }

    fn unwrapped() -> Self {
        "unwrap"
    }
}

impl Label for String {
    fn unknown() -> Self {
        "unknown".to_string()
    }

    fn unwrapped() -> Self {
        "unwrap".to_string()
    }
}

impl Label for Cow<'static, str> {
    fn unknown() -> Self {
        Cow::Borrowed("unknown")
    }

    fn unwrapped() -> Self {
        Cow::Borrowed("unwrap")
    }
}

// =============================================================================
// Tag - the default string label
// =============================================================================

/// A string label, the default label type of an outcome.
///
/// Static tags borrow, dynamic tags own their text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(Cow<'static, str>);

impl Tag {
    /// The `unknown` sentinel
    pub const UNKNOWN: Tag = Tag(Cow::Borrowed("unknown"));

    /// The `unwrap` sentinel
    pub const UNWRAP: Tag = Tag(Cow::Borrowed("unwrap"));

    /// Create a tag from a static string without allocating
    pub const fn from_static(name: &'static str) -> Self {
        Tag(Cow::Borrowed(name))
    }

    /// Create a tag from any string
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Tag(name.into())
    }

    /// The tag text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Label for Tag {
    fn unknown() -> Self {
        Tag::UNKNOWN
    }

    fn unwrapped() -> Self {
        Tag::UNWRAP
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::UNKNOWN
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.0)
    }
}

impl From<&'static str> for Tag {
    fn from(name: &'static str) -> Self {
        Tag::from_static(name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag(Cow::Owned(name))
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

// =============================================================================
// labels! - declare a label enum for a call site
// =============================================================================

/// Declare a label enum.
///
/// The generated enum gets the two reserved variants `Unknown` and `Unwrap`
/// in addition to the declared ones, plus `as_str`, `Display` and a
/// [`Label`] implementation.
///
/// `Unknown` and `Unwrap` are reserved: they back [`Label::unknown`] and
/// [`Label::unwrapped`] and display as `unknown` and `unwrap`. Declaring
/// either one again is a duplicate-variant error:
///
/// ```compile_fail
/// verdict_error::labels! {
///     pub enum Clash {
///         Unknown,
///     }
/// }
/// ```
///
/// ```rust
/// verdict_error::labels! {
///     /// Failures of the user lookup
///     pub enum LookupError {
///         NotFound,
///         Forbidden,
///     }
/// }
///
/// use verdict_error::Label;
///
/// assert_eq!(LookupError::NotFound.to_string(), "NotFound");
/// assert_eq!(LookupError::unknown(), LookupError::Unknown);
/// assert_eq!(LookupError::unwrapped().as_str(), "unwrap");
/// ```
#[macro_export]
macro_rules! labels {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            /// No label was given
            Unknown,
            /// A success was unwrapped as a failure
            Unwrap,
            $( $(#[$vmeta])* $variant ),*
        }

        impl $name {
            /// Returns the label as a static string
            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::Unknown => "unknown",
                    $name::Unwrap => "unwrap",
                    $( $name::$variant => stringify!($variant), )*
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::Label for $name {
            fn unknown() -> Self {
                $name::Unknown
            }

            fn unwrapped() -> Self {
                $name::Unwrap
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::labels! {
        enum FetchError {
            NotFound,
            Timeout,
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ParseError {
        Unknown,
        BadDigit(char),
    }

    impl fmt::Display for ParseError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ParseError::Unknown => write!(f, "unknown"),
                ParseError::BadDigit(c) => write!(f, "BadDigit({})", c),
            }
        }
    }

    impl Label for ParseError {
        fn unknown() -> Self {
            ParseError::Unknown
        }

        fn satisfies(&self, expected: &Self) -> bool {
            std::mem::discriminant(self) == std::mem::discriminant(expected)
        }
    }

    #[test]
    fn test_str_sentinels() {
        assert_eq!(<&'static str as Label>::unknown(), "unknown");
        assert_eq!(<&'static str as Label>::unwrapped(), "unwrap");
        assert_eq!(String::unknown(), "unknown");
        assert_eq!(<Cow<'static, str> as Label>::unwrapped(), "unwrap");
    }

    #[test]
    fn test_tag() {
        let tag = Tag::from("NotFound");
        assert_eq!(tag, "NotFound");
        assert_eq!(tag.to_string(), "NotFound");
        assert_eq!(Tag::unknown(), Tag::UNKNOWN);
        assert_eq!(Tag::default(), Tag::UNKNOWN);
        assert_eq!(Tag::from(format!("E{}", 42)).as_str(), "E42");
    }

    #[test]
    fn test_tag_serde() {
        let json = serde_json::to_string(&Tag::from("Timeout")).unwrap();
        assert_eq!(json, "\"Timeout\"");

        let tag: Tag = serde_json::from_str("\"Timeout\"").unwrap();
        assert_eq!(tag, Tag::from_static("Timeout"));
    }

    #[test]
    fn test_labels_macro() {
        assert_eq!(FetchError::unknown(), FetchError::Unknown);
        assert_eq!(FetchError::unwrapped(), FetchError::Unwrap);
        assert_eq!(FetchError::Timeout.to_string(), "Timeout");
        assert!(FetchError::NotFound.satisfies(&FetchError::NotFound));
        assert!(!FetchError::NotFound.satisfies(&FetchError::Timeout));
    }

    #[test]
    fn test_matches_by_variant() {
        let actual = ParseError::BadDigit('x');
        assert!(actual.satisfies(&ParseError::BadDigit('_')));
        assert!(!actual.satisfies(&ParseError::Unknown));
        // unwrapped falls back to unknown
        assert_eq!(ParseError::unwrapped(), ParseError::Unknown);
    }
}
