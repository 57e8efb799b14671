//! The internal low-level backend: raw register types and the instruction sequences
//! whose choice depends on the compiled [`crate::InstructionTier`].
//!
//! Every path that has a native SSE4.1 instruction also has an SSE2 sequence. The
//! SSE2 sequence is always compiled so it can be checked against the native one;
//! which of the two the vector types call is decided by `cfg(target_feature)` alone.

#[cfg(target_arch = "x86")]
pub use core::arch::x86 as simd_arch;
#[cfg(target_arch = "x86_64")]
pub use core::arch::x86_64 as simd_arch;

pub use simd_arch::{__m128, __m128i};

use simd_arch::*;

/// `_MM_SHUFFLE(0, 0, 2, 0)`: lanes 0 and 2 into the low half.
const SHUFFLE_EVEN_TO_LOW: i32 = 0b00_00_10_00;

/// Low 32 bits of each lane product using only SSE2.
///
/// `_mm_mul_epu32` multiplies lanes 0 and 2 into 64-bit results; shifting both
/// operands right by one lane does the same for lanes 1 and 3. The low halves of
/// the four products are then gathered and interleaved back into lane order. The
/// low 32 bits of an unsigned product equal those of the signed product, so this
/// is bit-identical to `_mm_mullo_epi32`.
#[inline(always)]
pub fn mullo_epi32_sse2(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let even = _mm_mul_epu32(a, b);
        let odd = _mm_mul_epu32(_mm_srli_si128::<4>(a), _mm_srli_si128::<4>(b));
        _mm_unpacklo_epi32(
            _mm_shuffle_epi32::<SHUFFLE_EVEN_TO_LOW>(even),
            _mm_shuffle_epi32::<SHUFFLE_EVEN_TO_LOW>(odd),
        )
    }
}

/// Native 32-bit lane multiply.
#[cfg(target_feature = "sse4.1")]
#[inline(always)]
pub fn mullo_epi32_sse41(a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_mullo_epi32(a, b) }
}

/// Lane-wise wrapping multiply on the best path this build has.
#[inline(always)]
pub fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_feature = "sse4.1")]
    {
        mullo_epi32_sse41(a, b)
    }
    #[cfg(not(target_feature = "sse4.1"))]
    {
        mullo_epi32_sse2(a, b)
    }
}

#[inline(always)]
fn to_lanes(a: __m128i) -> [i32; 4] {
    let mut out = [0i32; 4];
    unsafe { _mm_storeu_si128(out.as_mut_ptr().cast(), a) };
    out
}

#[inline(always)]
fn from_lanes(lanes: [i32; 4]) -> __m128i {
    unsafe { _mm_loadu_si128(lanes.as_ptr().cast()) }
}

/// Signed lane minimum through scalar `min`, for builds without SSE4.1.
#[inline(always)]
pub fn min_epi32_scalar(a: __m128i, b: __m128i) -> __m128i {
    let (a, b) = (to_lanes(a), to_lanes(b));
    from_lanes(core::array::from_fn(|i| a[i].min(b[i])))
}

/// Signed lane maximum through scalar `max`, for builds without SSE4.1.
#[inline(always)]
pub fn max_epi32_scalar(a: __m128i, b: __m128i) -> __m128i {
    let (a, b) = (to_lanes(a), to_lanes(b));
    from_lanes(core::array::from_fn(|i| a[i].max(b[i])))
}

/// Signed lane minimum.
#[inline(always)]
pub fn min_epi32(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_feature = "sse4.1")]
    unsafe {
        _mm_min_epi32(a, b)
    }
    #[cfg(not(target_feature = "sse4.1"))]
    {
        min_epi32_scalar(a, b)
    }
}

/// Signed lane maximum.
#[inline(always)]
pub fn max_epi32(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_feature = "sse4.1")]
    unsafe {
        _mm_max_epi32(a, b)
    }
    #[cfg(not(target_feature = "sse4.1"))]
    {
        max_epi32_scalar(a, b)
    }
}

/// All 128 bits set, as integer lanes.
#[inline(always)]
pub fn all_ones_si128() -> __m128i {
    unsafe { _mm_set1_epi32(-1) }
}

/// All 128 bits set, reinterpreted as float lanes (each lane reads as NaN).
#[inline(always)]
pub fn all_ones_ps() -> __m128 {
    unsafe { _mm_castsi128_ps(_mm_set1_epi32(-1)) }
}
