//! The vector value types, aligned buffers for feeding them, and lane-wise math.

pub mod backend;

mod aligned;
#[cfg(feature = "alloc")]
pub use aligned::AlignedStorage;
pub use aligned::{has_room, is_aligned, SimdAligned};

mod vect128f;
mod vect128i;
pub use vect128f::Vect128f;
pub use vect128i::Vect128i;

mod math;
pub use math::{highest, lowest, reciprocal, round, rsqrt, sqrt, Extrema};
