//! Error types for aligned storage.

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by [`crate::AlignedStorage`].
///
/// Vector operations never fail; misuse of their `unsafe` load/store contracts is
/// undefined behaviour rather than an error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Bounds-checked access past the end of the buffer
    #[error("index {index} outside of aligned storage boundary (length {length})")]
    OutOfBounds {
        /// Requested element index
        index: usize,
        /// Element count of the storage
        length: usize,
    },

    /// Byte size of the requested buffer does not fit in `isize`
    #[error("aligned storage of {length} elements exceeds the addressable size")]
    CapacityOverflow {
        /// Requested element count
        length: usize,
    },

    /// The global allocator returned null
    #[error("failed to allocate {size} bytes (align {align})")]
    AllocationFailed {
        /// Requested byte size, padding included
        size: usize,
        /// Alignment requested from the allocator
        align: usize,
    },
}
