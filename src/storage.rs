use crate::AlternativeList;
use core::mem::{align_of, size_of, MaybeUninit};

/// Inline, possibly uninitialized storage for one alternative of `L`.
///
/// The storage doesn't know what it holds. Owners track that and must only
/// access it as the alternative they last wrote.
pub(crate) struct RawStorage<L: AlternativeList> {
    bytes: MaybeUninit<L::Storage>,
}

impl<L: AlternativeList> RawStorage<L> {
    const COVERS_ALTERNATIVES: () = assert!(
        size_of::<L::Storage>() >= L::MAX_SIZE && align_of::<L::Storage>() >= L::MAX_ALIGN,
        "alternative storage is smaller or less aligned than an alternative"
    );

    /// Creates storage holding no value.
    pub(crate) const fn uninit() -> Self {
        let () = Self::COVERS_ALTERNATIVES;
        Self {
            bytes: MaybeUninit::uninit(),
        }
    }

    /// Whether a `T` fits in the storage at offset 0.
    pub(crate) const fn fits<T>() -> bool {
        size_of::<T>() <= size_of::<L::Storage>() && align_of::<T>() <= align_of::<L::Storage>()
    }

    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr().cast()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr().cast()
    }

    /// Moves `value` into the storage without dropping anything already there.
    ///
    /// # Safety
    ///
    /// `T` must be an alternative of `L`, and the storage must not hold a live
    /// value the caller still expects to be dropped.
    pub(crate) unsafe fn write<T>(&mut self, value: T) {
        const { assert!(Self::fits::<T>(), "type does not fit the alternative storage") };
        // SAFETY: every alternative lives at offset 0 and fits
        unsafe { self.as_mut_ptr().cast::<T>().write(value) }
    }

    /// # Safety
    ///
    /// The storage must hold a live `T`.
    pub(crate) unsafe fn get<T>(&self) -> &T {
        const { assert!(Self::fits::<T>(), "type does not fit the alternative storage") };
        // SAFETY: the caller guarantees a live `T` at offset 0
        unsafe { &*self.as_ptr().cast::<T>() }
    }

    /// # Safety
    ///
    /// The storage must hold a live `T`.
    pub(crate) unsafe fn get_mut<T>(&mut self) -> &mut T {
        const { assert!(Self::fits::<T>(), "type does not fit the alternative storage") };
        // SAFETY: the caller guarantees a live `T` at offset 0
        unsafe { &mut *self.as_mut_ptr().cast::<T>() }
    }

    /// Moves the stored `T` out.
    ///
    /// # Safety
    ///
    /// The storage must hold a live `T`, which is logically uninitialized
    /// afterwards. Owners must stop treating it as live.
    pub(crate) unsafe fn read<T>(&self) -> T {
        const { assert!(Self::fits::<T>(), "type does not fit the alternative storage") };
        // SAFETY: the caller guarantees a live `T` at offset 0
        unsafe { self.as_ptr().cast::<T>().read() }
    }
}
