//! Lane-wise helpers built on top of the vector types.
//!
//! The square root family uses the hardware estimate instructions, so results are
//! only accurate to about 12 bits (relative error below `1.5 * 2^-12`).

use super::backend::{self, __m128, simd_arch::*};
use super::{Vect128f, Vect128i};

/// Per-lane minimum and maximum.
pub trait Extrema: Copy {
    /// The smaller of each pair of lanes.
    fn lowest(self, other: Self) -> Self;
    /// The larger of each pair of lanes.
    fn highest(self, other: Self) -> Self;
}

impl Extrema for Vect128i {
    #[inline(always)]
    fn lowest(self, other: Self) -> Self {
        backend::min_epi32(self.into(), other.into()).into()
    }

    #[inline(always)]
    fn highest(self, other: Self) -> Self {
        backend::max_epi32(self.into(), other.into()).into()
    }
}

/// `minps`/`maxps` semantics: if either lane is NaN, the lane from `other` is returned.
impl Extrema for Vect128f {
    #[inline(always)]
    fn lowest(self, other: Self) -> Self {
        let (a, b): (__m128, __m128) = (self.into(), other.into());
        unsafe { _mm_min_ps(a, b) }.into()
    }

    #[inline(always)]
    fn highest(self, other: Self) -> Self {
        let (a, b): (__m128, __m128) = (self.into(), other.into());
        unsafe { _mm_max_ps(a, b) }.into()
    }
}

/// Per-lane minimum of `a` and `b`.
#[inline(always)]
pub fn lowest<V: Extrema>(a: V, b: V) -> V {
    a.lowest(b)
}

/// Per-lane maximum of `a` and `b`.
#[inline(always)]
pub fn highest<V: Extrema>(a: V, b: V) -> V {
    a.highest(b)
}

/// Adds `0.5` and truncates toward zero.
///
/// This rounds half up for positive lanes but not for negative ones: `2.5` becomes
/// `3`, while `-1.5` becomes `-1` and `-2.7` becomes `-2`.
#[inline(always)]
pub fn round(v: Vect128f) -> Vect128i {
    (v + Vect128f::splat(0.5)).to_int()
}

/// Approximate `1 / sqrt(x)` per lane.
#[inline(always)]
pub fn rsqrt(v: Vect128f) -> Vect128f {
    unsafe { _mm_rsqrt_ps(v.into()) }.into()
}

/// Approximate `1 / x` per lane.
#[inline(always)]
pub fn reciprocal(v: Vect128f) -> Vect128f {
    unsafe { _mm_rcp_ps(v.into()) }.into()
}

/// Approximate `sqrt(x)` per lane, as the reciprocal of [`rsqrt`].
///
/// Both estimates contribute error. `sqrt(0)` comes out as `0` since the reciprocal
/// of infinity is zero.
#[inline(always)]
pub fn sqrt(v: Vect128f) -> Vect128f {
    reciprocal(rsqrt(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const TOLERANCE: f32 = 1e-3;

    fn close(got: f32, want: f32) -> bool {
        if want == 0.0 {
            got.abs() <= TOLERANCE
        } else {
            ((got - want) / want).abs() <= TOLERANCE
        }
    }

    #[test]
    fn integer_extrema() {
        let a = Vect128i::new(0, -5, i32::MAX, i32::MIN);
        let b = Vect128i::new(1, -6, i32::MIN, 0);
        assert_eq!(lowest(a, b).to_array(), [0, -6, i32::MIN, i32::MIN]);
        assert_eq!(highest(a, b).to_array(), [1, -5, i32::MAX, 0]);
    }

    #[test]
    fn integer_extrema_random() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..1000 {
            let (x, y): ([i32; 4], [i32; 4]) = (rng.gen(), rng.gen());
            let (a, b) = (Vect128i::from(x), Vect128i::from(y));
            let lo: [i32; 4] = core::array::from_fn(|i| x[i].min(y[i]));
            let hi: [i32; 4] = core::array::from_fn(|i| x[i].max(y[i]));
            assert_eq!(a.lowest(b).to_array(), lo);
            assert_eq!(a.highest(b).to_array(), hi);
        }
    }

    #[test]
    fn float_extrema() {
        let a = Vect128f::new(0.5, -1.0, 3.0, -0.25);
        let b = Vect128f::new(0.25, -2.0, 4.0, 0.0);
        assert_eq!(lowest(a, b).to_array(), [0.25, -2.0, 3.0, -0.25]);
        assert_eq!(highest(a, b).to_array(), [0.5, -1.0, 4.0, 0.0]);

        let n = Vect128f::splat(f32::NAN);
        let one = Vect128f::splat(1.0);
        assert_eq!(n.lowest(one), one);
        assert!(one.highest(n).lane(0).is_nan());
    }

    #[test]
    fn round_biases_toward_positive() {
        let v = Vect128f::new(2.5, 1.4, -1.5, -2.7);
        assert_eq!(round(v).to_array(), [3, 1, -1, -2]);
        assert_eq!(round(Vect128f::splat(-0.4)).to_array(), [0; 4]);
    }

    #[test]
    fn estimates_within_tolerance() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..1000 {
            let lanes: [f32; 4] = core::array::from_fn(|_| rng.gen_range(1e-3..1e6));
            let v = Vect128f::from_array(lanes);
            let (r, q, s) = (rsqrt(v), reciprocal(v), sqrt(v));
            for i in 0..4 {
                let x = lanes[i];
                assert!(close(r.lane(i), 1.0 / x.sqrt()), "rsqrt({x}) = {}", r.lane(i));
                assert!(close(q.lane(i), 1.0 / x), "rcp({x}) = {}", q.lane(i));
                assert!(close(s.lane(i), x.sqrt()), "sqrt({x}) = {}", s.lane(i));
            }
        }
    }

    #[test]
    fn sqrt_of_known_values() {
        let s = sqrt(Vect128f::new(0.0, 1.0, 4.0, 2.0)).to_array();
        assert_eq!(s[0], 0.0);
        assert!(close(s[1], 1.0));
        assert!(close(s[2], 2.0));
        assert!(close(s[3], core::f32::consts::SQRT_2));
    }
}
