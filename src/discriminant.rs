use crate::Member;
use core::fmt;

/// Identifies which alternative a [`Variant`](crate::Variant) holds, if any.
///
/// Non-empty discriminants are the zero-based position of the alternative in
/// its list, assigned at compile time through [`Member::INDEX`]. The same
/// positions are used to tag a stored value and to test for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Discriminant(usize);

impl Discriminant {
    /// The discriminant of a container holding no value.
    pub const EMPTY: Self = Self(usize::MAX);

    /// The discriminant of alternative `T` in list `L`.
    pub const fn of<L, T, I>() -> Self
    where
        L: Member<T, I>,
    {
        Self(L::INDEX)
    }

    /// Position of the active alternative, or `None` when empty.
    pub const fn index(self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Whether this is [`Discriminant::EMPTY`].
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

impl Default for Discriminant {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(index) => write!(f, "#{index}"),
            None => f.write_str("empty"),
        }
    }
}
