use core::{
    fmt,
    ops::{Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign},
    ops::{Div, DivAssign, Mul, MulAssign, Not, Sub, SubAssign},
};

use num_traits::{One, Zero};

use super::backend::{self, __m128, simd_arch::*};
use super::Vect128i;

/// A 128-bit register holding 4 lanes of `f32`.
///
/// Arithmetic follows IEEE-754 single precision per lane. Comparisons use the
/// native SSE float compares and produce mask vectors: a true lane has every bit
/// set, which reads back as `NaN`, and a false lane is `0.0`. Check results with
/// [`f32::is_nan`], not against a number.
///
/// ```
/// use vect128::Vect128f;
///
/// let r = Vect128f::new(0.0, 1.0, -1.0, 2147483647.0).cmp_gt(Vect128f::new(0.0, 0.0, 0.0, 1.0));
/// assert_eq!(r.lane(0), 0.0);
/// assert!(r.lane(3).is_nan());
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Vect128f(__m128);

impl Vect128f {
    /// A vector with every lane `0.0`.
    #[inline(always)]
    pub fn empty() -> Self {
        Self(unsafe { _mm_setzero_ps() })
    }

    /// Sets every lane to `value`.
    #[inline(always)]
    pub fn splat(value: f32) -> Self {
        Self(unsafe { _mm_set1_ps(value) })
    }

    /// Builds a vector from lanes 0 through 3, in that order.
    #[inline(always)]
    pub fn new(f0: f32, f1: f32, f2: f32, f3: f32) -> Self {
        Self(unsafe { _mm_setr_ps(f0, f1, f2, f3) })
    }

    /// Builds a vector from an array, lane `i` taking `lanes[i]`.
    #[inline(always)]
    pub fn from_array(lanes: [f32; 4]) -> Self {
        unsafe { Self::loadu(lanes.as_ptr()) }
    }

    /// Loads the first 4 values of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than 4.
    #[inline(always)]
    pub fn from_slice(slice: &[f32]) -> Self {
        assert!(slice.len() >= 4, "slice must hold at least 4 lanes");
        unsafe { Self::loadu(slice.as_ptr()) }
    }

    /// Loads 128 bits starting at `ptr`, which may have any alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 `f32`.
    #[inline(always)]
    pub unsafe fn loadu(ptr: *const f32) -> Self {
        Self(unsafe { _mm_loadu_ps(ptr) })
    }

    /// Loads 128 bits from a 16-byte aligned `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 `f32` and aligned to 16 bytes.
    #[inline(always)]
    pub unsafe fn load(ptr: *const f32) -> Self {
        Self(unsafe { _mm_load_ps(ptr) })
    }

    /// Writes the 4 lanes starting at `ptr`, which may have any alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 4 `f32`.
    #[inline(always)]
    pub unsafe fn storeu(self, ptr: *mut f32) {
        unsafe { _mm_storeu_ps(ptr, self.0) }
    }

    /// Writes the 4 lanes to a 16-byte aligned `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 4 `f32` and aligned to 16 bytes.
    #[inline(always)]
    pub unsafe fn store(self, ptr: *mut f32) {
        unsafe { _mm_store_ps(ptr, self.0) }
    }

    /// Writes the 4 lanes into the front of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than 4.
    #[inline(always)]
    pub fn write_to_slice(self, slice: &mut [f32]) {
        assert!(slice.len() >= 4, "slice must hold at least 4 lanes");
        unsafe { self.storeu(slice.as_mut_ptr()) }
    }

    /// Copies the lanes out into an array.
    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut out = [0f32; 4];
        unsafe { self.storeu(out.as_mut_ptr()) };
        out
    }

    /// Reads lane `idx` by spilling the register; for debugging.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= 4`.
    #[inline]
    pub fn lane(self, idx: usize) -> f32 {
        self.to_array()[idx]
    }

    /// Converts every lane to `i32`, truncating toward zero.
    ///
    /// Lanes outside the `i32` range (and NaN) become `i32::MIN`, the x86
    /// "integer indefinite" value.
    #[inline(always)]
    pub fn to_int(self) -> Vect128i {
        Vect128i::from(unsafe { _mm_cvttps_epi32(self.0) })
    }

    /// The raw bit pattern of every lane, unchanged.
    #[inline(always)]
    pub fn to_bits(self) -> Vect128i {
        Vect128i::from(unsafe { _mm_castps_si128(self.0) })
    }

    /// `self < rhs` per lane (ordered).
    #[inline(always)]
    pub fn cmp_lt(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmplt_ps(self.0, rhs.0) })
    }

    /// "Not greater than" per lane.
    ///
    /// Matches `<=` for ordinary numbers but is also true when either lane is NaN.
    #[inline(always)]
    pub fn cmp_le(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmpngt_ps(self.0, rhs.0) })
    }

    /// `self > rhs` per lane (ordered).
    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmpgt_ps(self.0, rhs.0) })
    }

    /// "Not less than" per lane; true for NaN lanes, like [`Vect128f::cmp_le`].
    #[inline(always)]
    pub fn cmp_ge(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmpnlt_ps(self.0, rhs.0) })
    }

    /// `self == rhs` per lane (ordered; NaN never equals anything).
    #[inline(always)]
    pub fn cmp_eq(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmpeq_ps(self.0, rhs.0) })
    }

    /// `self != rhs` per lane (unordered; true for NaN lanes).
    #[inline(always)]
    pub fn cmp_ne(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmpneq_ps(self.0, rhs.0) })
    }
}

impl Default for Vect128f {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Vect128f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vect128f({:?})", self.to_array())
    }
}

/// `true` when every lane compares equal under IEEE rules, so any NaN lane makes
/// two vectors unequal.
impl PartialEq for Vect128f {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        unsafe { _mm_movemask_ps(_mm_cmpeq_ps(self.0, other.0)) == 0xF }
    }
}

impl From<__m128> for Vect128f {
    #[inline(always)]
    fn from(v: __m128) -> Self {
        Self(v)
    }
}

impl From<Vect128f> for __m128 {
    #[inline(always)]
    fn from(v: Vect128f) -> Self {
        v.0
    }
}

impl From<Vect128i> for Vect128f {
    /// Numeric conversion of each lane, not a reinterpretation.
    #[inline(always)]
    fn from(v: Vect128i) -> Self {
        v.to_float()
    }
}

impl From<[f32; 4]> for Vect128f {
    #[inline(always)]
    fn from(lanes: [f32; 4]) -> Self {
        Self::from_array(lanes)
    }
}

impl From<Vect128f> for [f32; 4] {
    #[inline(always)]
    fn from(v: Vect128f) -> Self {
        v.to_array()
    }
}

impl Not for Vect128f {
    type Output = Self;

    /// XOR against all-ones bits. This flips the bit pattern; it is not `-x` and the
    /// result is rarely a meaningful number.
    #[inline(always)]
    fn not(self) -> Self {
        self ^ Self(backend::all_ones_ps())
    }
}

macro_rules! impl_binary_op {
    ($tr:ident, $method:ident, $assign_tr:ident, $assign_method:ident, $intrinsic:path) => {
        impl $tr for Vect128f {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self(unsafe { $intrinsic(self.0, rhs.0) })
            }
        }

        impl $assign_tr for Vect128f {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = $tr::$method(*self, rhs);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, _mm_add_ps);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, _mm_sub_ps);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, _mm_mul_ps);
impl_binary_op!(Div, div, DivAssign, div_assign, _mm_div_ps);
impl_binary_op!(BitAnd, bitand, BitAndAssign, bitand_assign, _mm_and_ps);
impl_binary_op!(BitOr, bitor, BitOrAssign, bitor_assign, _mm_or_ps);
impl_binary_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, _mm_xor_ps);

impl Zero for Vect128f {
    #[inline(always)]
    fn zero() -> Self {
        Self::empty()
    }

    /// `-0.0` counts as zero.
    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::empty()
    }
}

impl One for Vect128f {
    #[inline(always)]
    fn one() -> Self {
        Self::splat(1.0)
    }
}
