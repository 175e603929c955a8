//! Type-level alternative lists and the per-position dispatch over them.
//!
//! Every operation that depends on the active alternative's type takes its
//! position and walks the list: position `0` is the head, anything else is
//! forwarded to the tail as `index - 1`. Walking off the end reaches [`Nil`],
//! which means the position did not come from this list.

use crate::max;
use core::{
    any::type_name,
    marker::PhantomData,
    mem::{align_of, size_of, ManuallyDrop},
    ptr,
};

/// The end of an alternative list.
pub enum Nil {}

/// An alternative list with `H` at position 0 followed by `T`.
pub struct Cons<H, T> {
    marker: PhantomData<fn() -> (H, T)>,
}

/// Position marker: the alternative is the head of the list.
pub struct Here;

/// Position marker: the alternative is at position `I` of the tail.
pub struct There<I>(PhantomData<I>);

/// Position marker for position 0.
pub type I0 = Here;
/// Position marker for position 1.
pub type I1 = There<I0>;
/// Position marker for position 2.
pub type I2 = There<I1>;
/// Position marker for position 3.
pub type I3 = There<I2>;
/// Position marker for position 4.
pub type I4 = There<I3>;
/// Position marker for position 5.
pub type I5 = There<I4>;
/// Position marker for position 6.
pub type I6 = There<I5>;
/// Position marker for position 7.
pub type I7 = There<I6>;

/// Storage for a [`Cons`] list: every alternative overlapping at offset 0.
#[repr(C)]
#[allow(dead_code)]
pub union Slot<H, T> {
    head: ManuallyDrop<H>,
    tail: ManuallyDrop<T>,
}

/// A type-level list of alternatives with position-based dispatch.
///
/// # Safety
///
/// `Storage` must be at least [`MAX_SIZE`](Self::MAX_SIZE) bytes and aligned
/// to [`MAX_ALIGN`](Self::MAX_ALIGN), with every alternative at offset 0. The
/// dispatch functions must operate on the alternative at position `index`
/// and no other.
pub unsafe trait AlternativeList {
    /// Number of alternatives.
    const LEN: usize;
    /// Largest `size_of` over the alternatives.
    const MAX_SIZE: usize;
    /// Largest `align_of` over the alternatives.
    const MAX_ALIGN: usize;

    /// Inline storage able to hold any one alternative.
    type Storage;

    /// Name of the alternative at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LEN`.
    fn type_name(index: usize) -> &'static str;

    /// Drops the alternative at `index` stored at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live, properly aligned value of the alternative
    /// at `index`. The value must not be used afterwards.
    unsafe fn drop_in_place(index: usize, ptr: *mut u8);

    /// Moves the alternative at `index` from `src` into `dst`.
    ///
    /// # Safety
    ///
    /// `src` must point to a live value of the alternative at `index`, and
    /// `dst` to non-overlapping storage suitable for it. `src` is logically
    /// uninitialized afterwards.
    unsafe fn move_to(index: usize, src: *const u8, dst: *mut u8);
}

/// An [`AlternativeList`] whose alternatives are all [`Clone`].
///
/// # Safety
///
/// `clone_to` must write a clone of the alternative at `index` and nothing
/// else.
pub unsafe trait CloneList: AlternativeList {
    /// Writes a clone of the alternative at `index` from `src` into `dst`.
    ///
    /// # Safety
    ///
    /// `src` must point to a live value of the alternative at `index`, and
    /// `dst` to storage suitable for it that holds no live value.
    unsafe fn clone_to(index: usize, src: *const u8, dst: *mut u8);
}

/// `T` is the alternative at position [`INDEX`](Self::INDEX), found through
/// the position marker `I`.
///
/// `I` is normally inferred. It only needs to be spelled out when `T` occurs
/// more than once in the list.
///
/// The trait is sealed: positions only come from the impls on [`Cons`].
///
/// Types outside the set are rejected at compile time:
///
/// ```compile_fail
/// use tagged_variant::{alternatives, Variant};
///
/// let mut v = Variant::<alternatives![i32, String]>::new();
/// v.set(1.5_f64);
/// ```
///
/// and so are positions declared outside this crate:
///
/// ```compile_fail
/// use tagged_variant::{Cons, Member, Nil};
///
/// struct Elsewhere;
///
/// impl Member<[u64; 64], Elsewhere> for Cons<u8, Nil> {
///     const INDEX: usize = 0;
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{T}` is not an alternative of `{Self}`",
    label = "not in the alternative set"
)]
pub trait Member<T, I>: AlternativeList + sealed::Sealed<T, I> {
    /// Position of `T` in the list.
    const INDEX: usize;
}

mod sealed {
    pub trait Sealed<T, I> {}
}

impl<H, T: AlternativeList> sealed::Sealed<H, Here> for Cons<H, T> {}

impl<H, T: AlternativeList> Member<H, Here> for Cons<H, T> {
    const INDEX: usize = 0;
}

impl<H, T, U, I> sealed::Sealed<U, There<I>> for Cons<H, T> where T: Member<U, I> {}

impl<H, T, U, I> Member<U, There<I>> for Cons<H, T>
where
    T: Member<U, I>,
{
    const INDEX: usize = 1 + T::INDEX;
}

/// `overshoot` is what is left of a discriminant after walking the whole
/// list, so `0` means the discriminant equals the list's length.
#[cold]
#[track_caller]
fn past_end(overshoot: usize) -> ! {
    let past = overshoot + 1;
    error!(past, "variant discriminant past the end of its alternative list");
    panic!("variant discriminant is {past} past the last alternative")
}

unsafe impl AlternativeList for Nil {
    const LEN: usize = 0;
    const MAX_SIZE: usize = 0;
    const MAX_ALIGN: usize = 1;

    type Storage = ();

    fn type_name(index: usize) -> &'static str {
        past_end(index)
    }

    unsafe fn drop_in_place(index: usize, _ptr: *mut u8) {
        past_end(index)
    }

    unsafe fn move_to(index: usize, _src: *const u8, _dst: *mut u8) {
        past_end(index)
    }
}

unsafe impl CloneList for Nil {
    unsafe fn clone_to(index: usize, _src: *const u8, _dst: *mut u8) {
        past_end(index)
    }
}

unsafe impl<H, T: AlternativeList> AlternativeList for Cons<H, T> {
    const LEN: usize = 1 + T::LEN;
    const MAX_SIZE: usize = max(size_of::<H>(), T::MAX_SIZE);
    const MAX_ALIGN: usize = max(align_of::<H>(), T::MAX_ALIGN);

    type Storage = Slot<H, T::Storage>;

    fn type_name(index: usize) -> &'static str {
        match index {
            0 => type_name::<H>(),
            _ => T::type_name(index - 1),
        }
    }

    unsafe fn drop_in_place(index: usize, data: *mut u8) {
        match index {
            // SAFETY: the caller guarantees a live `H` at `data`
            0 => unsafe { ptr::drop_in_place(data.cast::<H>()) },
            // SAFETY: same contract, one position further down
            _ => unsafe { T::drop_in_place(index - 1, data) },
        }
    }

    unsafe fn move_to(index: usize, src: *const u8, dst: *mut u8) {
        match index {
            // SAFETY:
            // - `src` holds a live `H` and `dst` can hold one
            // - the two regions don't overlap
            0 => unsafe { ptr::copy_nonoverlapping(src.cast::<H>(), dst.cast::<H>(), 1) },
            // SAFETY: same contract, one position further down
            _ => unsafe { T::move_to(index - 1, src, dst) },
        }
    }
}

unsafe impl<H: Clone, T: CloneList> CloneList for Cons<H, T> {
    unsafe fn clone_to(index: usize, src: *const u8, dst: *mut u8) {
        match index {
            0 => {
                // SAFETY: the caller guarantees a live `H` at `src`
                let value = unsafe { &*src.cast::<H>() }.clone();
                // SAFETY: `dst` is suitable for an `H` and holds no live value
                unsafe { dst.cast::<H>().write(value) }
            }
            // SAFETY: same contract, one position further down
            _ => unsafe { T::clone_to(index - 1, src, dst) },
        }
    }
}
