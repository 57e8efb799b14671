#[cfg(feature = "alloc")]
mod storage;
#[cfg(feature = "alloc")]
pub use storage::AlignedStorage;

use core::ops::{Deref, DerefMut};

/// A value forced onto a 16-byte boundary, suitable for [`Vect128i::load`] and
/// [`Vect128f::store`] without a heap allocation.
///
/// [`Vect128i::load`]: crate::Vect128i::load
/// [`Vect128f::store`]: crate::Vect128f::store
#[repr(align(16))]
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimdAligned<T: ?Sized>(pub T);

impl<T> Deref for SimdAligned<T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for SimdAligned<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

/// Checks whether `ptr` sits on an `ALIGN`-byte boundary.
///
/// `ALIGN` need not be a power of two.
#[inline(always)]
pub fn is_aligned<const ALIGN: usize, T>(ptr: *const T) -> bool {
    (ptr as usize) % ALIGN == 0
}

/// Checks whether `M` more elements fit between `index` and `length`.
///
/// Used to decide whether a full vector step can still be taken or the tail must be
/// handled one scalar at a time.
#[inline(always)]
pub const fn has_room<const M: usize>(index: usize, length: usize) -> bool {
    match index.checked_add(M) {
        Some(end) => end <= length,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_is_register_aligned() {
        let a = SimdAligned([0i32; 4]);
        let b = SimdAligned([0u8; 3]);
        assert!(is_aligned::<16, _>(a.as_ptr()));
        assert!(is_aligned::<16, _>(b.as_ptr()));
        assert_eq!(core::mem::align_of::<SimdAligned<u8>>(), 16);
    }

    #[test]
    fn odd_alignment_check() {
        assert!(is_aligned::<17, u8>(34 as *const u8));
        assert!(!is_aligned::<17, u8>(35 as *const u8));
    }

    #[test]
    fn room_for_a_full_step() {
        assert!(has_room::<4>(0, 4));
        assert!(has_room::<4>(4, 8));
        assert!(!has_room::<4>(5, 8));
        assert!(!has_room::<4>(usize::MAX, usize::MAX));
    }
}
