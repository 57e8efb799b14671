//! With nothing but `core`, `num_traits`, and an allocator for the aligned
//! buffers, the crate wraps one SSE register as a value type. It supports
//! addition, multiplication, subtraction, bitwise logic, and lane-wise
//! comparison on 4 lanes of `i32` or `f32`, written with ordinary operators
//! instead of intrinsics.
//!
//! Comparisons return *mask vectors*, not booleans: every lane is either all
//! bits set (true) or all bits clear (false). For [`Vect128i`] a true lane reads
//! as `-1`, for [`Vect128f`] it reads as `NaN`.
//!
//! ```
//! use vect128::{AlignedStorage, Vect128i};
//!
//! let mut buf = AlignedStorage::<i32, 16>::new(4);
//! let v = Vect128i::new(0, -1, 1, i32::MAX) + Vect128i::splat(1);
//! unsafe { v.store(buf.as_mut_ptr()) };
//! assert_eq!(&buf[..], &[1, 0, 2, i32::MIN]);
//! ```

#![forbid(missing_docs)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "x86", target_feature = "sse2")
)))]
compile_error!("vect128 requires SSE2 (x86 or x86_64)");

mod private {
    pub trait Internal {}
}

use crate::private::Internal;

pub mod error;
pub mod scalar;
pub mod simd;

pub use error::{Error, Result};
pub use simd::{
    has_room, highest, is_aligned, lowest, reciprocal, round, rsqrt, sqrt, Extrema, SimdAligned,
    Vect128f, Vect128i,
};

#[cfg(feature = "alloc")]
pub use simd::AlignedStorage;

/// The size (in bytes) of the single register every vector type wraps.
pub const VECTOR_BYTES: usize = 16;

/// Lane count of both [`Vect128i`] and [`Vect128f`].
pub const LANES: usize = 4;

/// A generation of x86 vector extensions, each a strict superset of the one before.
///
/// The tier is fixed when the crate is compiled (see [`INSTRUCTION_TIER`]); nothing
/// in the crate inspects the CPU at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstructionTier {
    /// Baseline; integer multiply and min/max use fallback sequences.
    Sse2,
    /// Supplemental SSE3.
    Ssse3,
    /// Adds native 32-bit lane multiply and signed min/max.
    Sse41,
    /// SSE4.2.
    Sse42,
}

impl InstructionTier {
    /// Whether `_mm_mullo_epi32` and `_mm_{min,max}_epi32` are compiled in.
    pub const fn has_native_i32_ops(self) -> bool {
        matches!(self, Self::Sse41 | Self::Sse42)
    }
}

/// The tier this build targets, derived from the enabled `target_feature`s.
pub const INSTRUCTION_TIER: InstructionTier = if cfg!(target_feature = "sse4.2") {
    InstructionTier::Sse42
} else if cfg!(target_feature = "sse4.1") {
    InstructionTier::Sse41
} else if cfg!(target_feature = "ssse3") {
    InstructionTier::Ssse3
} else {
    InstructionTier::Sse2
};
