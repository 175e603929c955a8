#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! A closed tagged union over a statically declared list of types.
//!
//! A [`Variant`] holds at most one value out of its alternative set, inline and
//! without allocation. The set is a type-level list, written either with the
//! [`alternatives!`] macro or declared from a struct's field types with
//! `#[derive(Alternatives)]`:
//!
//! ```
//! use tagged_variant::{alternatives, Variant};
//!
//! let mut v: Variant<alternatives![i32, String]> = Variant::new();
//! v.set(42_i32);
//! assert_eq!(v.get::<i32, _>(), Ok(&42));
//!
//! v.set(String::from("hi"));
//! assert!(v.get::<i32, _>().is_err());
//! assert_eq!(v.get::<String, _>().map(String::as_str), Ok("hi"));
//! ```

#[macro_use]
mod tracing_macros;

mod discriminant;
pub use discriminant::Discriminant;

mod error;
pub use error::VariantError;

mod list;
pub use list::{AlternativeList, CloneList, Cons, Here, Member, Nil, Slot, There};
pub use list::{I0, I1, I2, I3, I4, I5, I6, I7};

mod storage;

mod variant;
pub use variant::Variant;

pub use tagged_variant_derive::Alternatives;

/// A closed set of alternative types a [`Variant`] can hold.
///
/// Implemented by every non-empty [`Cons`] list and by structs deriving
/// `Alternatives`, which use their field types in declaration order.
pub trait Alternatives {
    /// The alternatives as a type-level list.
    type List: AlternativeList;
}

impl<H, T: AlternativeList> Alternatives for Cons<H, T> {
    type List = Self;
}

/// Builds the type-level list for a set of alternatives.
///
/// `alternatives![i32, String]` is `Cons<i32, Cons<String, Nil>>`.
#[macro_export]
macro_rules! alternatives {
    () => { $crate::Nil };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::Cons<$head, $crate::alternatives![$($tail),*]>
    };
}

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}
