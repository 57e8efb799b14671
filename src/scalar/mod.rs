//! Marker traits for the scalars that can live in aligned storage and vector lanes.

use crate::simd::{Vect128f, Vect128i};

/// A marker trait for plain scalars with no indirection.
///
/// # Safety
///
/// Implementors must be `Copy`, contain no padding, and accept the all-zero byte
/// pattern as a valid value. Fresh [`crate::AlignedStorage`] buffers are zero-filled
/// and exposed as `&[T]` immediately, so this is what makes them readable.
pub unsafe trait Primitive: Copy + 'static + crate::Internal {}

macro_rules! primitive_impl {
    ($($ty:ty),*) => {
        $(
            impl crate::Internal for $ty {}
            unsafe impl Primitive for $ty {}
        )*
    };
}

primitive_impl!(u8, u16, u32, u64, u128, usize);
primitive_impl!(i8, i16, i32, i64, i128, isize);
primitive_impl!(f32, f64);

/// A scalar that fills one lane of a 128-bit vector type.
///
/// Ties `i32` to [`Vect128i`] and `f32` to [`Vect128f`] so generic code (such as
/// [`crate::AlignedStorage::vector_at`]) can move whole vectors in and out of memory.
pub trait Lane: Primitive {
    /// The 4-lane vector holding this scalar.
    type Vector: Copy;

    /// Loads 4 lanes starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 values. It need not be aligned.
    unsafe fn load_unaligned(ptr: *const Self) -> Self::Vector;

    /// Loads 4 lanes starting at a 16-byte aligned `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 values and aligned to 16 bytes.
    unsafe fn load_aligned(ptr: *const Self) -> Self::Vector;

    /// Stores 4 lanes starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 4 values. It need not be aligned.
    unsafe fn store_unaligned(vector: Self::Vector, ptr: *mut Self);

    /// Stores 4 lanes starting at a 16-byte aligned `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 4 values and aligned to 16 bytes.
    unsafe fn store_aligned(vector: Self::Vector, ptr: *mut Self);
}

macro_rules! lane_impl {
    ($scalar:ty => $vector:ty) => {
        impl Lane for $scalar {
            type Vector = $vector;

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const Self) -> Self::Vector {
                unsafe { <$vector>::loadu(ptr) }
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const Self) -> Self::Vector {
                unsafe { <$vector>::load(ptr) }
            }

            #[inline(always)]
            unsafe fn store_unaligned(vector: Self::Vector, ptr: *mut Self) {
                unsafe { vector.storeu(ptr) }
            }

            #[inline(always)]
            unsafe fn store_aligned(vector: Self::Vector, ptr: *mut Self) {
                unsafe { vector.store(ptr) }
            }
        }
    };
}

lane_impl!(i32 => Vect128i);
lane_impl!(f32 => Vect128f);
