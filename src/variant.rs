use crate::{
    storage::RawStorage, AlternativeList, Alternatives, CloneList, Discriminant, Member,
    VariantError,
};
use core::{
    any::type_name,
    fmt,
    marker::PhantomData,
    mem::{self, align_of, size_of},
};

type Storage<A> = <<A as Alternatives>::List as AlternativeList>::Storage;

/// A value of exactly one of the alternatives in `A`, or nothing.
///
/// The value is stored inline. Type parameters named `I` on the accessors are
/// position markers and are normally left as `_`:
///
/// ```
/// use tagged_variant::{alternatives, Variant};
///
/// let mut v = Variant::<alternatives![u8, char]>::with('x');
/// assert!(v.is::<char, _>());
/// *v.get_mut::<char, _>().unwrap() = 'y';
/// assert_eq!(v.take_as::<char, _>(), Ok('y'));
/// assert!(v.is_empty());
/// ```
pub struct Variant<A: Alternatives> {
    discriminant: Discriminant,
    storage: RawStorage<A::List>,
    marker: PhantomData<fn() -> A>,
}

impl<A: Alternatives> Variant<A> {
    /// Number of alternatives.
    pub const COUNT: usize = <A::List as AlternativeList>::LEN;

    /// Size in bytes of the inline storage.
    pub const STORAGE_SIZE: usize = size_of::<Storage<A>>();

    /// Alignment of the inline storage.
    pub const STORAGE_ALIGN: usize = align_of::<Storage<A>>();

    /// Creates an empty variant.
    pub const fn new() -> Self {
        Self {
            discriminant: Discriminant::EMPTY,
            storage: RawStorage::uninit(),
            marker: PhantomData,
        }
    }

    /// Creates a variant holding `value`.
    pub fn with<T, I>(value: T) -> Self
    where
        A::List: Member<T, I>,
    {
        let mut out = Self::new();
        out.set(value);
        out
    }

    /// Which alternative is held, if any.
    pub const fn discriminant(&self) -> Discriminant {
        self.discriminant
    }

    /// Whether no value is held.
    pub const fn is_empty(&self) -> bool {
        self.discriminant.is_empty()
    }

    /// Whether the held value is a `T`.
    pub fn is<T, I>(&self) -> bool
    where
        A::List: Member<T, I>,
    {
        self.discriminant == Discriminant::of::<A::List, T, I>()
    }

    /// Type name of the held value.
    pub fn alternative_name(&self) -> Option<&'static str> {
        self.discriminant
            .index()
            .map(<A::List as AlternativeList>::type_name)
    }

    /// Borrows the held value as a `T`.
    pub fn get<T, I>(&self) -> Result<&T, VariantError>
    where
        A::List: Member<T, I>,
    {
        if !self.is::<T, I>() {
            return Err(self.mismatch::<T>());
        }
        // SAFETY: the discriminant says the storage holds a `T`
        Ok(unsafe { self.storage.get::<T>() })
    }

    /// Mutably borrows the held value as a `T`.
    pub fn get_mut<T, I>(&mut self) -> Result<&mut T, VariantError>
    where
        A::List: Member<T, I>,
    {
        if !self.is::<T, I>() {
            return Err(self.mismatch::<T>());
        }
        // SAFETY: the discriminant says the storage holds a `T`
        Ok(unsafe { self.storage.get_mut::<T>() })
    }

    /// Drops the held value, if any, and stores `value`.
    pub fn set<T, I>(&mut self, value: T)
    where
        A::List: Member<T, I>,
    {
        self.clear();
        trace!(alternative = type_name::<T>(), "set variant");
        // SAFETY: `T` is an alternative and `clear` left nothing live
        unsafe { self.storage.write(value) };
        self.discriminant = Discriminant::of::<A::List, T, I>();
    }

    /// Builds a `T` with `make`, then stores it.
    ///
    /// The held value is only dropped once `make` has returned, so a panic in
    /// `make` leaves the variant as it was.
    pub fn set_with<T, I, F>(&mut self, make: F)
    where
        A::List: Member<T, I>,
        F: FnOnce() -> T,
    {
        let value = make();
        self.set(value);
    }

    /// Like [`set_with`](Self::set_with) for fallible construction. On `Err`
    /// the variant is left unchanged.
    pub fn try_set_with<T, I, E, F>(&mut self, make: F) -> Result<(), E>
    where
        A::List: Member<T, I>,
        F: FnOnce() -> Result<T, E>,
    {
        let value = make()?;
        self.set(value);
        Ok(())
    }

    /// Moves the held `T` out, leaving the variant empty.
    ///
    /// On mismatch the variant is left unchanged.
    pub fn take_as<T, I>(&mut self) -> Result<T, VariantError>
    where
        A::List: Member<T, I>,
    {
        if !self.is::<T, I>() {
            return Err(self.mismatch::<T>());
        }
        self.discriminant = Discriminant::EMPTY;
        trace!(alternative = type_name::<T>(), "take variant value");
        // SAFETY: the storage held a `T`, and is no longer considered live
        Ok(unsafe { self.storage.read::<T>() })
    }

    /// Moves the held value, if any, into a new variant and leaves this one
    /// empty.
    pub fn take(&mut self) -> Self {
        let mut out = Self::new();
        if let Some(index) = self.discriminant.index() {
            trace!(index, "move variant");
            // SAFETY:
            // - the discriminant names the alternative at `index`
            // - `out` is a distinct, empty variant
            unsafe {
                <A::List as AlternativeList>::move_to(
                    index,
                    self.storage.as_ptr(),
                    out.storage.as_mut_ptr(),
                )
            };
            out.discriminant = self.discriminant;
            self.discriminant = Discriminant::EMPTY;
        }
        out
    }

    /// Drops the held value, if any.
    pub fn clear(&mut self) {
        if let Some(index) = self.discriminant.index() {
            trace!(index, "drop variant value");
            // Marked empty first so a panicking drop can't lead to a second one
            self.discriminant = Discriminant::EMPTY;
            // SAFETY: the discriminant named the alternative at `index`
            unsafe { <A::List as AlternativeList>::drop_in_place(index, self.storage.as_mut_ptr()) };
        }
    }

    /// Exchanges the contents of two variants.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.discriminant, &mut other.discriminant);
        mem::swap(&mut self.storage, &mut other.storage);
    }

    /// Replaces the contents with a clone of `rhs`.
    ///
    /// `rhs` is cloned before anything is dropped, so if cloning panics the
    /// variant keeps its previous value.
    pub fn assign(&mut self, rhs: &Self)
    where
        A::List: CloneList,
    {
        debug!(from = ?rhs.discriminant, to = ?self.discriminant, "assign variant");
        let mut copy = rhs.clone();
        self.swap(&mut copy);
    }

    fn mismatch<T>(&self) -> VariantError {
        VariantError::TypeMismatch {
            expected: type_name::<T>(),
            found: self.alternative_name(),
        }
    }
}

impl<A: Alternatives> Default for Variant<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alternatives> Clone for Variant<A>
where
    A::List: CloneList,
{
    fn clone(&self) -> Self {
        let mut out = Self::new();
        if let Some(index) = self.discriminant.index() {
            // SAFETY:
            // - the discriminant names the alternative at `index`
            // - `out` is empty
            unsafe {
                <A::List as CloneList>::clone_to(
                    index,
                    self.storage.as_ptr(),
                    out.storage.as_mut_ptr(),
                )
            };
            out.discriminant = self.discriminant;
        }
        out
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<A: Alternatives> Drop for Variant<A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<A: Alternatives> fmt::Debug for Variant<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("discriminant", &self.discriminant.index())
            .field("alternative", &self.alternative_name())
            .finish()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::{alternatives, Here, I1};
    use std::{
        cell::Cell,
        panic::{catch_unwind, AssertUnwindSafe},
        rc::Rc,
    };

    type IntOrString = Variant<alternatives![i32, String]>;

    /// Counts how many times it has been dropped.
    #[derive(Debug, Clone)]
    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Panics when cloned after `budget` clones.
    #[derive(Debug, PartialEq)]
    struct Fragile {
        id: u32,
        budget: Rc<Cell<u32>>,
    }

    impl Clone for Fragile {
        fn clone(&self) -> Self {
            let left = self.budget.get();
            if left == 0 {
                panic!("clone budget exhausted");
            }
            self.budget.set(left - 1);
            Self {
                id: self.id,
                budget: self.budget.clone(),
            }
        }
    }

    #[test]
    fn int_then_string() {
        let mut v = IntOrString::new();
        v.set(42_i32);
        assert_eq!(v.get::<i32, _>(), Ok(&42));

        v.set(String::from("hi"));
        assert_eq!(
            v.get::<i32, _>(),
            Err(VariantError::TypeMismatch {
                expected: "i32",
                found: Some(type_name::<String>()),
            })
        );
        assert_eq!(v.get::<String, _>().map(String::as_str), Ok("hi"));
    }

    #[test]
    fn empty_by_default() {
        let mut v = IntOrString::default();
        assert!(v.is_empty());
        assert_eq!(v.discriminant(), Discriminant::EMPTY);
        assert_eq!(v.alternative_name(), None);
        assert!(!v.is::<i32, _>());
        assert!(v.get::<i32, _>().unwrap_err().is_empty());
        assert!(v.get::<String, _>().unwrap_err().is_empty());
        assert!(v.get_mut::<i32, _>().is_err());
        assert!(v.take_as::<String, _>().is_err());
    }

    #[test]
    fn exclusive_alternatives() {
        let mut v = Variant::<alternatives![u8, u16, char]>::with('c');
        assert!(v.is::<char, _>());
        assert!(!v.is::<u8, _>());
        assert!(v.get::<u8, _>().is_err());
        assert!(v.get::<u16, _>().is_err());

        v.set(7_u16);
        assert_eq!(v.get::<u16, _>(), Ok(&7));
        assert!(v.get::<char, _>().is_err());
        assert_eq!(v.alternative_name(), Some("u16"));
    }

    #[test]
    fn get_mut_writes_through() {
        let mut v = IntOrString::with(String::from("a"));
        v.get_mut::<String, _>().unwrap().push('b');
        assert_eq!(v.get::<String, _>().unwrap(), "ab");
    }

    #[test]
    fn clone_is_independent() {
        let original = IntOrString::with(String::from("left"));
        let mut copy = original.clone();
        copy.get_mut::<String, _>().unwrap().push_str(" and right");

        assert_eq!(original.get::<String, _>().unwrap(), "left");
        assert_eq!(copy.get::<String, _>().unwrap(), "left and right");
        assert_eq!(copy.discriminant(), original.discriminant());
    }

    #[test]
    fn clone_of_empty_is_empty() {
        let empty = IntOrString::new();
        assert!(empty.clone().is_empty());
    }

    #[test]
    fn take_leaves_source_empty() {
        let drops = Rc::new(Cell::new(0));
        let mut source = Variant::<alternatives![u8, DropCounter]>::with(DropCounter(drops.clone()));

        let moved = source.take();
        assert!(source.is_empty());
        assert!(moved.is::<DropCounter, _>());
        assert_eq!(drops.get(), 0);

        drop(source);
        assert_eq!(drops.get(), 0);
        drop(moved);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn native_move_drops_once() {
        let drops = Rc::new(Cell::new(0));
        let source = Variant::<alternatives![DropCounter]>::with(DropCounter(drops.clone()));
        let moved = source;
        drop(moved);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn set_drops_previous_value() {
        let drops = Rc::new(Cell::new(0));
        let mut v = Variant::<alternatives![u8, DropCounter]>::with(DropCounter(drops.clone()));
        v.set(DropCounter(drops.clone()));
        assert_eq!(drops.get(), 1);
        v.set(3_u8);
        assert_eq!(drops.get(), 2);
        v.clear();
        v.clear();
        assert_eq!(drops.get(), 2);
        assert!(v.is_empty());
    }

    #[test]
    fn take_as_moves_out() {
        let mut v = IntOrString::with(String::from("gone"));
        assert!(v.take_as::<i32, _>().is_err());
        assert!(v.is::<String, _>());
        assert_eq!(v.take_as::<String, _>().unwrap(), "gone");
        assert!(v.is_empty());
    }

    #[test]
    fn assign_replaces_and_drops_old() {
        let drops = Rc::new(Cell::new(0));
        let mut lhs = Variant::<alternatives![u8, DropCounter]>::with(DropCounter(drops.clone()));
        let rhs = Variant::<alternatives![u8, DropCounter]>::with(9_u8);

        lhs.assign(&rhs);
        assert_eq!(drops.get(), 1);
        assert_eq!(lhs.get::<u8, _>(), Ok(&9));
        assert_eq!(rhs.get::<u8, _>(), Ok(&9));
    }

    #[test]
    fn assign_from_own_clone() {
        let mut v = IntOrString::with(String::from("same"));
        let snapshot = v.clone();
        v.assign(&snapshot);
        v.clone_from(&snapshot);
        assert_eq!(v.get::<String, _>().unwrap(), "same");
        assert_eq!(snapshot.get::<String, _>().unwrap(), "same");
    }

    #[test]
    fn failed_assign_keeps_previous_value() {
        let budget = Rc::new(Cell::new(0));
        let mut lhs = Variant::<alternatives![u8, Fragile]>::with(Fragile {
            id: 1,
            budget: budget.clone(),
        });
        let rhs = Variant::<alternatives![u8, Fragile]>::with(Fragile {
            id: 2,
            budget: budget.clone(),
        });

        let result = catch_unwind(AssertUnwindSafe(|| lhs.assign(&rhs)));
        assert!(result.is_err());
        assert_eq!(lhs.get::<Fragile, _>().map(|f| f.id), Ok(1));

        budget.set(1);
        lhs.assign(&rhs);
        assert_eq!(lhs.get::<Fragile, _>().map(|f| f.id), Ok(2));
    }

    #[test]
    fn failed_set_keeps_previous_value() {
        let mut v = IntOrString::with(5_i32);

        let result: Result<(), &str> = v.try_set_with(|| Err::<String, _>("refused"));
        assert_eq!(result, Err("refused"));
        assert_eq!(v.get::<i32, _>(), Ok(&5));

        let result = catch_unwind(AssertUnwindSafe(|| {
            v.set_with::<String, _, _>(|| panic!("construction failed"))
        }));
        assert!(result.is_err());
        assert_eq!(v.get::<i32, _>(), Ok(&5));

        v.set_with(|| String::from("built"));
        assert_eq!(v.get::<String, _>().unwrap(), "built");
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut a = IntOrString::with(1_i32);
        let mut b = IntOrString::new();
        a.swap(&mut b);
        assert!(a.is_empty());
        assert_eq!(b.get::<i32, _>(), Ok(&1));
    }

    #[test]
    fn duplicates_by_position() {
        let mut v = Variant::<alternatives![u8, u8]>::new();
        v.set::<u8, I1>(4);
        assert!(v.is::<u8, I1>());
        assert!(!v.is::<u8, Here>());
        assert!(v.get::<u8, Here>().is_err());
        assert_eq!(v.get::<u8, I1>(), Ok(&4));
        assert_eq!(v.discriminant().index(), Some(1));
    }

    #[test]
    fn storage_layout() {
        type Wide = Variant<alternatives![u8, u64, [u16; 7]]>;
        assert_eq!(Wide::COUNT, 3);
        assert!(Wide::STORAGE_SIZE >= 14);
        assert_eq!(Wide::STORAGE_ALIGN, align_of::<u64>());
        assert!(size_of::<Wide>() < Wide::STORAGE_SIZE + 2 * size_of::<usize>());
    }

    #[test]
    fn debug_names_alternative() {
        let v = IntOrString::with(3_i32);
        let rendered = format!("{v:?}");
        assert!(rendered.contains("Some(0)"));
        assert!(rendered.contains("i32"));
    }
}
