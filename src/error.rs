use thiserror::Error;

/// Result alias used by every fallible ring buffer operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Status of a failed ring buffer operation.
///
/// Success is expressed as `Ok(..)`. The variants fall into three groups:
/// usage errors (the buffer is left untouched), capacity signals (routine,
/// the caller picks a retry/drop policy) and resource errors (construction
/// aborted, no buffer produced).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operation on a buffer that has not been set up yet
    #[error("ring buffer is not initialized")]
    NotInitialized,

    /// Buffer was already set up; it is never silently re-initialized
    #[error("ring buffer is already initialized")]
    AlreadyInitialized,

    /// Argument does not match the buffer layout (item length, zero sizes, short storage)
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Historical index outside `[-capacity, capacity)`
    #[error("index {index} out of range for capacity {capacity}")]
    InvalidIndex {
        /// Requested index
        index: isize,
        /// Buffer capacity in items
        capacity: usize,
    },

    /// Storage allocation failed
    #[error("failed to allocate {bytes} bytes of ring buffer storage")]
    OutOfMemory {
        /// Requested allocation size
        bytes: usize,
    },

    /// `add` on a full buffer without override
    #[error("ring buffer is full")]
    Full,

    /// `get` on an empty buffer
    #[error("ring buffer is empty")]
    Empty,

    /// `add_multi` asked for more slots than are free; nothing was written
    #[error("not enough space: requested {requested} items, {free} free")]
    InsufficientSpace {
        /// Items requested
        requested: usize,
        /// Items free at the time of the call
        free: usize,
    },

    /// `get_multi` asked for more items than are stored; nothing was read
    #[error("not enough data: requested {requested} items, {available} available")]
    InsufficientData {
        /// Items requested
        requested: usize,
        /// Items stored at the time of the call
        available: usize,
    },

    /// Producer/consumer split requested on an override-enabled buffer
    #[error("override-enabled buffers cannot be split into producer and consumer")]
    SplitWithOverride,

    /// Attribute parsing failed
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Full/empty/insufficient-space/insufficient-data: expected back-pressure signals.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            Error::Full
                | Error::Empty
                | Error::InsufficientSpace { .. }
                | Error::InsufficientData { .. }
        )
    }

    /// Misuse reported synchronously with the buffer left untouched.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::NotInitialized
                | Error::AlreadyInitialized
                | Error::InvalidArgument(_)
                | Error::InvalidIndex { .. }
                | Error::SplitWithOverride
        )
    }
}
