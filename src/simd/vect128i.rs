use core::{
    fmt,
    ops::{Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign},
    ops::{Mul, MulAssign, Not, Sub, SubAssign},
};

use num_traits::{One, Zero};

use super::backend::{self, __m128i, simd_arch::*};
use super::Vect128f;

/// A 128-bit register holding 4 lanes of `i32`.
///
/// Arithmetic wraps on overflow. Comparisons produce mask vectors whose lanes are
/// `-1` (all bits set) where the predicate holds and `0` where it does not, so
/// they can be fed straight into `&`, `|` and `!` for branch-free selection:
///
/// ```
/// use vect128::Vect128i;
///
/// let a = Vect128i::new(3, -7, 12, 0);
/// let limit = Vect128i::splat(5);
/// let over = a.cmp_gt(limit);
/// let clamped = (limit & over) | (a & !over);
/// assert_eq!(clamped.to_array(), [3, -7, 5, 0]);
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Vect128i(__m128i);

impl Vect128i {
    /// A vector with every lane zero.
    ///
    /// Registers cannot be observed uninitialised, so "empty" is all-zero.
    #[inline(always)]
    pub fn empty() -> Self {
        Self(unsafe { _mm_setzero_si128() })
    }

    /// Sets every lane to `value`.
    #[inline(always)]
    pub fn splat(value: i32) -> Self {
        Self(unsafe { _mm_set1_epi32(value) })
    }

    /// Builds a vector from lanes 0 through 3, in that order.
    #[inline(always)]
    pub fn new(i0: i32, i1: i32, i2: i32, i3: i32) -> Self {
        Self(unsafe { _mm_setr_epi32(i0, i1, i2, i3) })
    }

    /// Builds a vector from an array, lane `i` taking `lanes[i]`.
    #[inline(always)]
    pub fn from_array(lanes: [i32; 4]) -> Self {
        unsafe { Self::loadu(lanes.as_ptr()) }
    }

    /// Loads the first 4 values of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than 4.
    #[inline(always)]
    pub fn from_slice(slice: &[i32]) -> Self {
        assert!(slice.len() >= 4, "slice must hold at least 4 lanes");
        unsafe { Self::loadu(slice.as_ptr()) }
    }

    /// Loads 128 bits starting at `ptr`, which may have any alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 `i32`.
    #[inline(always)]
    pub unsafe fn loadu(ptr: *const i32) -> Self {
        Self(unsafe { _mm_loadu_si128(ptr.cast()) })
    }

    /// Loads 128 bits from a 16-byte aligned `ptr`, which is faster than
    /// [`Vect128i::loadu`] on most CPUs.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 `i32` and aligned to 16 bytes; a misaligned
    /// pointer faults at the instruction level.
    #[inline(always)]
    pub unsafe fn load(ptr: *const i32) -> Self {
        Self(unsafe { _mm_load_si128(ptr.cast()) })
    }

    /// Writes the 4 lanes starting at `ptr`, which may have any alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 4 `i32`.
    #[inline(always)]
    pub unsafe fn storeu(self, ptr: *mut i32) {
        unsafe { _mm_storeu_si128(ptr.cast(), self.0) }
    }

    /// Writes the 4 lanes to a 16-byte aligned `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 4 `i32` and aligned to 16 bytes.
    #[inline(always)]
    pub unsafe fn store(self, ptr: *mut i32) {
        unsafe { _mm_store_si128(ptr.cast(), self.0) }
    }

    /// Writes the 4 lanes into the front of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than 4.
    #[inline(always)]
    pub fn write_to_slice(self, slice: &mut [i32]) {
        assert!(slice.len() >= 4, "slice must hold at least 4 lanes");
        unsafe { self.storeu(slice.as_mut_ptr()) }
    }

    /// Copies the lanes out into an array.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 4] {
        let mut out = [0i32; 4];
        unsafe { self.storeu(out.as_mut_ptr()) };
        out
    }

    /// Reads lane `idx`.
    ///
    /// This spills the whole register to memory first and is by far the slowest way
    /// to look at a vector; meant for debugging and tests.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= 4`.
    #[inline]
    pub fn lane(self, idx: usize) -> i32 {
        self.to_array()[idx]
    }

    /// Converts every lane to the nearest `f32`.
    #[inline(always)]
    pub fn to_float(self) -> Vect128f {
        Vect128f::from(unsafe { _mm_cvtepi32_ps(self.0) })
    }

    /// `self < rhs` per lane.
    #[inline(always)]
    pub fn cmp_lt(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmplt_epi32(self.0, rhs.0) })
    }

    /// `self > rhs` per lane.
    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmpgt_epi32(self.0, rhs.0) })
    }

    /// `self == rhs` per lane.
    #[inline(always)]
    pub fn cmp_eq(self, rhs: Self) -> Self {
        Self(unsafe { _mm_cmpeq_epi32(self.0, rhs.0) })
    }

    /// `self <= rhs` per lane, as `!(self > rhs)`.
    #[inline(always)]
    pub fn cmp_le(self, rhs: Self) -> Self {
        !self.cmp_gt(rhs)
    }

    /// `self >= rhs` per lane, as `!(self < rhs)`.
    #[inline(always)]
    pub fn cmp_ge(self, rhs: Self) -> Self {
        !self.cmp_lt(rhs)
    }

    /// `self != rhs` per lane, as `!(self == rhs)`.
    #[inline(always)]
    pub fn cmp_ne(self, rhs: Self) -> Self {
        !self.cmp_eq(rhs)
    }
}

impl Default for Vect128i {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Vect128i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vect128i({:?})", self.to_array())
    }
}

/// Whole-vector equality: `true` only if all 4 lanes match. Use
/// [`Vect128i::cmp_eq`] for the per-lane mask.
impl PartialEq for Vect128i {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        unsafe { _mm_movemask_epi8(_mm_cmpeq_epi32(self.0, other.0)) == 0xFFFF }
    }
}

impl Eq for Vect128i {}

impl From<__m128i> for Vect128i {
    #[inline(always)]
    fn from(v: __m128i) -> Self {
        Self(v)
    }
}

impl From<Vect128i> for __m128i {
    #[inline(always)]
    fn from(v: Vect128i) -> Self {
        v.0
    }
}

impl From<[i32; 4]> for Vect128i {
    #[inline(always)]
    fn from(lanes: [i32; 4]) -> Self {
        Self::from_array(lanes)
    }
}

impl From<Vect128i> for [i32; 4] {
    #[inline(always)]
    fn from(v: Vect128i) -> Self {
        v.to_array()
    }
}

impl Not for Vect128i {
    type Output = Self;

    /// Flips every bit, as XOR against all-ones; SSE has no NOT instruction.
    #[inline(always)]
    fn not(self) -> Self {
        self ^ Self(backend::all_ones_si128())
    }
}

macro_rules! impl_binary_op {
    ($tr:ident, $method:ident, $assign_tr:ident, $assign_method:ident, $intrinsic:path) => {
        impl $tr for Vect128i {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self(unsafe { $intrinsic(self.0, rhs.0) })
            }
        }

        impl $assign_tr for Vect128i {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = $tr::$method(*self, rhs);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, _mm_add_epi32);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, _mm_sub_epi32);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, backend::mullo_epi32);
impl_binary_op!(BitAnd, bitand, BitAndAssign, bitand_assign, _mm_and_si128);
impl_binary_op!(BitOr, bitor, BitOrAssign, bitor_assign, _mm_or_si128);
impl_binary_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, _mm_xor_si128);

impl Zero for Vect128i {
    #[inline(always)]
    fn zero() -> Self {
        Self::empty()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::empty()
    }
}

impl One for Vect128i {
    #[inline(always)]
    fn one() -> Self {
        Self::splat(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimdAligned;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn check_equal(v: Vect128i, expected: [i32; 4]) {
        for (i, want) in expected.into_iter().enumerate() {
            assert_eq!(v.lane(i), want, "lane {i} of {v:?}");
        }
    }

    #[test]
    fn construction() {
        let empty = Vect128i::empty();
        let copy = empty;
        assert_eq!(copy, Vect128i::default());
        check_equal(empty, [0; 4]);

        check_equal(Vect128i::splat(1), [1, 1, 1, 1]);
        check_equal(Vect128i::new(0, 1, 2, 3), [0, 1, 2, 3]);

        let raw: __m128i = Vect128i::new(0, 1, 2, 3).into();
        check_equal(Vect128i::from(raw), [0, 1, 2, 3]);

        let lanes = [-1, 1, i32::MAX, i32::MIN];
        check_equal(Vect128i::new(-1, 1, i32::MAX, i32::MIN), lanes);
        check_equal(Vect128i::from_array(lanes), lanes);
        check_equal(Vect128i::from_slice(&[9, 8, 7, 6, 5]), [9, 8, 7, 6]);
    }

    #[test]
    #[should_panic]
    fn from_short_slice_panics() {
        let _ = Vect128i::from_slice(&[1, 2, 3]);
    }

    #[test]
    fn load_and_store() {
        let x = [0, 1, 2, 3];
        check_equal(unsafe { Vect128i::loadu(x.as_ptr()) }, x);

        let aligned = SimdAligned([0, 1, 2, 3]);
        check_equal(unsafe { Vect128i::load(aligned.as_ptr()) }, [0, 1, 2, 3]);

        let mut q = [0i32; 4];
        unsafe { Vect128i::new(0, 1, 2, 3).storeu(q.as_mut_ptr()) };
        assert_eq!(q, [0, 1, 2, 3]);

        let mut p = SimdAligned([0i32; 4]);
        unsafe { Vect128i::new(0, 1, 2, 3).store(p.as_mut_ptr()) };
        assert_eq!(p.0, [0, 1, 2, 3]);

        // unaligned round trip one element into a larger buffer
        let mut wide = SimdAligned([0i32; 5]);
        unsafe { Vect128i::new(4, 5, 6, 7).storeu(wide.as_mut_ptr().add(1)) };
        assert_eq!(wide.0, [0, 4, 5, 6, 7]);
        assert_eq!(
            unsafe { Vect128i::loadu(wide.as_ptr().add(1)) },
            Vect128i::new(4, 5, 6, 7)
        );
    }

    #[test]
    fn round_trip_random() {
        let mut rng = StdRng::seed_from_u64(128);
        let mut buf = SimdAligned([0i32; 4]);
        for _ in 0..1000 {
            let v = Vect128i::from_array(rng.gen());
            unsafe { v.store(buf.as_mut_ptr()) };
            assert_eq!(unsafe { Vect128i::load(buf.as_ptr()) }, v);
            assert_eq!(Vect128i::from(v.to_array()), v);
        }
    }

    #[test]
    fn not() {
        let v = Vect128i::splat(0xFF00FF00_u32 as i32);
        let s = Vect128i::splat(0x00FF00FF);
        assert_eq!(v, !s);
        assert_eq!(s, !v);
        assert_eq!(!!s, s);
    }

    #[test]
    fn add_wraps() {
        let mut i = Vect128i::new(0, -1, 1, i32::MAX);
        let s = Vect128i::splat(1);
        let r = Vect128i::new(1, 0, 2, i32::MIN);
        assert_eq!(i + s, r);
        assert_eq!(s + i, r);
        i += s;
        assert_eq!(i, r);
    }

    #[test]
    fn sub_wraps() {
        let mut i = Vect128i::new(0, -1, 1, i32::MIN);
        let s = Vect128i::splat(1);
        let r = Vect128i::new(-1, -2, 0, i32::MAX);
        assert_eq!(i - s, r);
        i -= s;
        assert_eq!(i, r);
    }

    #[test]
    fn mul() {
        let mut i = Vect128i::new(0, -1, 1, i32::MIN);
        let s = Vect128i::splat(1);
        assert_eq!(i * s, i);
        assert_eq!(s * i, i);
        i *= Vect128i::new(3, -4, 5, -1);
        assert_eq!(i, Vect128i::new(0, 4, 5, i32::MIN));
        assert_eq!(
            Vect128i::splat(65_536) * Vect128i::splat(65_537),
            Vect128i::splat(65_536)
        );
    }

    #[test]
    fn commutative_over_random_lanes() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..1000 {
            let a = Vect128i::from_array(rng.gen());
            let b = Vect128i::from_array(rng.gen());
            assert_eq!(a + b, b + a);
            assert_eq!(a * b, b * a);
            let want: [i32; 4] =
                core::array::from_fn(|k| a.lane(k).wrapping_mul(b.lane(k)));
            assert_eq!((a * b).to_array(), want);
        }
    }

    #[test]
    fn bitwise() {
        let (x, y) = (0xF0F10, 0xF001F);
        let mut i = Vect128i::splat(x);
        let s = Vect128i::splat(y);
        assert_eq!(i & s, Vect128i::splat(x & y));
        assert_eq!(i | s, Vect128i::splat(x | y));
        assert_eq!(i ^ s, Vect128i::splat(x ^ y));

        i &= s;
        assert_eq!(i, Vect128i::splat(x & y));
        i |= Vect128i::splat(x);
        assert_eq!(i, Vect128i::splat((x & y) | x));
        i ^= s;
        assert_eq!(i, Vect128i::splat(((x & y) | x) ^ y));
    }

    #[test]
    fn comparisons_are_masks() {
        let i = Vect128i::new(0, 1, -1, i32::MAX);
        let s = Vect128i::splat(0);
        check_equal(i.cmp_gt(s), [0, -1, 0, -1]);
        check_equal(i.cmp_lt(s), [0, 0, -1, 0]);
        check_equal(i.cmp_ge(s), [-1, -1, 0, -1]);
        check_equal(i.cmp_le(s), [-1, 0, -1, 0]);
        check_equal(i.cmp_eq(s), [-1, 0, 0, 0]);
        check_equal(i.cmp_ne(s), [0, -1, -1, -1]);
    }

    #[test]
    fn converts_numerically() {
        let v = Vect128i::new(23, -7, 0, 1 << 24);
        assert_eq!(v.to_float().to_array(), [23.0, -7.0, 0.0, 16_777_216.0]);
        assert_eq!(Vect128f::from(v), v.to_float());
        assert_eq!(Vect128i::splat(23).to_float().to_int(), Vect128i::splat(23));
    }

    #[test]
    fn numeric_identities() {
        assert!(Vect128i::zero().is_zero());
        assert!(!Vect128i::new(0, 0, 0, 1).is_zero());
        let v = Vect128i::new(5, -6, 7, -8);
        assert_eq!(v * Vect128i::one(), v);
        assert_eq!(v + Vect128i::zero(), v);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn debug_lists_lanes() {
        let shown = alloc::format!("{:?}", Vect128i::new(1, -2, 3, -4));
        assert_eq!(shown, "Vect128i([1, -2, 3, -4])");
    }
}
