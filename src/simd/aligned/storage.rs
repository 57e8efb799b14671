use alloc::{
    alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout},
    sync::Arc,
};
use core::{
    fmt,
    marker::PhantomData,
    mem,
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
    slice,
};

use super::{has_room, is_aligned};
use crate::{
    error::{Error, Result},
    scalar::{Lane, Primitive},
    LANES, VECTOR_BYTES,
};

const fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// A heap buffer of `length` elements of `T` whose first element sits on an
/// `ALIGN`-byte boundary.
///
/// The buffer over-allocates by one alignment unit and offsets into the raw block
/// instead of asking the allocator for `ALIGN` directly, so any `ALIGN` works,
/// including ones that are not a power of two. When `ALIGN` is not a multiple of
/// `T`'s own alignment the boundary used is the least common multiple of both,
/// which is still a multiple of `ALIGN`.
///
/// The contents start zeroed. Element access goes through the `[T]` the storage
/// dereferences to: `storage[i]` panics out of range, `get_unchecked` is
/// the unchecked hot path, and [`AlignedStorage::at`] reports an [`Error`] instead.
///
/// ```
/// use vect128::{AlignedStorage, Vect128f};
///
/// let mut buf = AlignedStorage::<f32, 16>::new(8);
/// buf[1] = 1.5;
/// let v = unsafe { Vect128f::load(buf.as_ptr()) };
/// assert_eq!(v.lane(1), 1.5);
/// assert!(buf.at(8).is_err());
/// ```
pub struct AlignedStorage<T: Primitive, const ALIGN: usize> {
    raw: NonNull<u8>,
    layout: Layout,
    aligned: NonNull<T>,
    length: usize,
    _owns: PhantomData<T>,
}

unsafe impl<T: Primitive + Send, const ALIGN: usize> Send for AlignedStorage<T, ALIGN> {}
unsafe impl<T: Primitive + Sync, const ALIGN: usize> Sync for AlignedStorage<T, ALIGN> {}

impl<T: Primitive, const ALIGN: usize> AlignedStorage<T, ALIGN> {
    const _ASSERT_ALIGN: () = {
        core::assert!(ALIGN > 0, "alignment must be non-zero");
    };

    /// The boundary actually used: `lcm(ALIGN, align_of::<T>())`.
    const BOUNDARY: usize = ALIGN / gcd(ALIGN, mem::align_of::<T>()) * mem::align_of::<T>();

    /// Allocates `length` zeroed elements.
    ///
    /// Allocation failure is fatal and goes through [`handle_alloc_error`]; a byte
    /// size that overflows `isize` panics. Use [`AlignedStorage::try_new`] to get
    /// either case back as an [`Error`].
    pub fn new(length: usize) -> Self {
        match Self::try_new(length) {
            Ok(storage) => storage,
            Err(Error::AllocationFailed { size, align }) => {
                handle_alloc_error(unsafe { Layout::from_size_align_unchecked(size, align) })
            }
            Err(err) => panic!("{err}"),
        }
    }

    /// Allocates `length` zeroed elements, reporting failure instead of aborting.
    pub fn try_new(length: usize) -> Result<Self> {
        const {
            let _ = Self::_ASSERT_ALIGN;
        }

        let size = length
            .checked_mul(mem::size_of::<T>())
            .and_then(|bytes| bytes.checked_add(Self::BOUNDARY))
            .ok_or(Error::CapacityOverflow { length })?;
        let layout = Layout::from_size_align(size, mem::align_of::<T>())
            .map_err(|_| Error::CapacityOverflow { length })?;

        // `size` is at least `BOUNDARY`, so the layout is never zero-sized.
        let raw = NonNull::new(unsafe { alloc_zeroed(layout) }).ok_or_else(|| {
            log::debug!("aligned storage: allocation of {size} bytes failed");
            Error::AllocationFailed {
                size,
                align: layout.align(),
            }
        })?;

        let offset = Self::align_offset(raw.as_ptr() as usize);
        let aligned = unsafe { NonNull::new_unchecked(raw.as_ptr().add(offset).cast::<T>()) };
        log::trace!(
            "aligned storage: {length} x {} bytes at {:p} (+{offset} to {ALIGN}-byte boundary)",
            mem::size_of::<T>(),
            raw.as_ptr(),
        );

        Ok(Self {
            raw,
            layout,
            aligned,
            length,
            _owns: PhantomData,
        })
    }

    /// Distance from `addr` to the next boundary, in `0..BOUNDARY`.
    ///
    /// `addr` is aligned for `T` and `BOUNDARY` is a multiple of `align_of::<T>()`,
    /// so the result is too and the aligned pointer stays valid for `T`.
    #[inline(always)]
    const fn align_offset(addr: usize) -> usize {
        (Self::BOUNDARY - addr % Self::BOUNDARY) % Self::BOUNDARY
    }

    /// Number of elements.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Whether the storage holds no elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The requested alignment in bytes.
    #[inline(always)]
    pub const fn alignment(&self) -> usize {
        ALIGN
    }

    /// Sets every element to zero.
    pub fn clear(&mut self) {
        unsafe { ptr::write_bytes(self.aligned.as_ptr(), 0, self.length) }
    }

    /// The aligned pointer.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.aligned.as_ptr()
    }

    /// The aligned pointer, writable.
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.aligned.as_ptr()
    }

    /// A pointer `count` elements away from the aligned pointer.
    ///
    /// Nothing is checked; the result may point outside the buffer, exactly like
    /// [`pointer::wrapping_offset`]. Dereferencing it is the caller's business.
    #[inline(always)]
    pub fn offset_ptr(&self, count: isize) -> *const T {
        self.as_ptr().wrapping_offset(count)
    }

    /// Writable variant of [`AlignedStorage::offset_ptr`].
    #[inline(always)]
    pub fn offset_mut_ptr(&mut self, count: isize) -> *mut T {
        self.as_mut_ptr().wrapping_offset(count)
    }

    /// The elements as a slice.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.aligned.as_ptr(), self.length) }
    }

    /// The elements as a mutable slice.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.aligned.as_ptr(), self.length) }
    }

    /// Bounds-checked element access.
    pub fn at(&self, index: usize) -> Result<&T> {
        let length = self.length;
        self.as_slice()
            .get(index)
            .ok_or(Error::OutOfBounds { index, length })
    }

    /// Bounds-checked mutable element access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let length = self.length;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, length })
    }

    /// Moves the storage behind an [`Arc`] so several owners can read it; the
    /// allocation is released when the last one drops.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<T: Lane, const ALIGN: usize> AlignedStorage<T, ALIGN> {
    /// Loads the 4 lanes starting at element `index`.
    ///
    /// Uses the aligned load when the element address is on a 16-byte boundary and
    /// the unaligned one otherwise. Fails if fewer than 4 elements remain.
    pub fn vector_at(&self, index: usize) -> Result<T::Vector> {
        self.check_vector_room(index)?;
        let ptr = unsafe { self.as_ptr().add(index) };
        Ok(unsafe {
            if is_aligned::<VECTOR_BYTES, _>(ptr) {
                T::load_aligned(ptr)
            } else {
                T::load_unaligned(ptr)
            }
        })
    }

    /// Stores 4 lanes starting at element `index`; see [`AlignedStorage::vector_at`].
    pub fn set_vector_at(&mut self, index: usize, vector: T::Vector) -> Result<()> {
        self.check_vector_room(index)?;
        let ptr = unsafe { self.as_mut_ptr().add(index) };
        unsafe {
            if is_aligned::<VECTOR_BYTES, _>(ptr) {
                T::store_aligned(vector, ptr)
            } else {
                T::store_unaligned(vector, ptr)
            }
        }
        Ok(())
    }

    #[inline(always)]
    fn check_vector_room(&self, index: usize) -> Result<()> {
        if has_room::<LANES>(index, self.length) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                index: index.saturating_add(LANES - 1),
                length: self.length,
            })
        }
    }
}

impl<T: Primitive, const ALIGN: usize> Drop for AlignedStorage<T, ALIGN> {
    fn drop(&mut self) {
        log::trace!(
            "aligned storage: releasing {} bytes at {:p}",
            self.layout.size(),
            self.raw.as_ptr()
        );
        unsafe { dealloc(self.raw.as_ptr(), self.layout) }
    }
}

impl<T: Primitive, const ALIGN: usize> Clone for AlignedStorage<T, ALIGN> {
    /// Copies the elements into a fresh allocation.
    fn clone(&self) -> Self {
        let mut out = Self::new(self.length);
        out.copy_from_slice(self);
        out
    }
}

impl<T: Primitive, const ALIGN: usize> Deref for AlignedStorage<T, ALIGN> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Primitive, const ALIGN: usize> DerefMut for AlignedStorage<T, ALIGN> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Primitive + fmt::Debug, const ALIGN: usize> fmt::Debug for AlignedStorage<T, ALIGN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedStorage")
            .field("align", &ALIGN)
            .field("data", &self.as_slice())
            .finish()
    }
}
