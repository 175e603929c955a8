use core::fmt;

/// Failure to access a [`Variant`](crate::Variant) as a particular alternative.
///
/// Requesting a type outside the alternative set is rejected at compile time
/// by the [`Member`](crate::Member) bound, so only mismatches against the
/// active alternative surface at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum VariantError {
    /// The requested alternative is not the active one.
    TypeMismatch {
        /// Name of the requested alternative.
        expected: &'static str,
        /// Name of the active alternative, or `None` if the variant is empty.
        found: Option<&'static str>,
    },
}

impl VariantError {
    /// Whether the variant held no value at all.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::TypeMismatch { found: None, .. })
    }
}

impl fmt::Display for VariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch {
                expected,
                found: Some(found),
            } => write!(f, "expected alternative `{expected}`, found `{found}`"),
            Self::TypeMismatch {
                expected,
                found: None,
            } => write!(f, "expected alternative `{expected}`, variant is empty"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VariantError {}
