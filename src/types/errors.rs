use core::error::Error;
use core::fmt;

/// Returned by an `AltAllocator` when it cannot satisfy a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AllocError;

impl Error for AllocError {}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("A memory allocation error occurred.")
    }
}

/// What went wrong during a `Vx` or `VxStr` operation.
///
/// Whatever the reason, the vector the operation was applied to keeps the
/// count and contents it had before the call.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    /// The new count or capacity does not fit in the length type.
    CapacityOverflow = 1,
    /// A size computation overflowed `usize`.
    UsizeOverflow,
    /// The backing block could not be described by a valid `Layout`.
    LayoutFailure,
    /// The allocator refused the request.
    AllocFailure,
    /// `reserve` asked for fewer slots than there are live units.
    ShrinkBelowCount,
    /// An index or removal range reached outside the live units.
    OutOfBounds,
    /// A `Display` implementation failed, or wrote a different amount of
    /// text on the second formatting pass than on the first.
    FormatFailure,
}

/// A type alias for `Result<T, VxErr>`
pub type VxResult<T> = Result<T, VxErr>;

#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VxErr(ErrorReason);

impl VxErr {
    pub(crate) const fn new(reason: ErrorReason) -> Self {
        return Self(reason);
    }

    pub const fn reason(self) -> ErrorReason {
        return self.0;
    }
}

impl From<ErrorReason> for VxErr {
    fn from(reason: ErrorReason) -> Self {
        return Self::new(reason);
    }
}

impl Error for VxErr {}

impl fmt::Display for VxErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ErrorReason::CapacityOverflow => f.write_str("Capacity type overflowed."),
            ErrorReason::UsizeOverflow => f.write_str("usize overflowed."),
            ErrorReason::LayoutFailure => f.write_str("Failed to create layout."),
            ErrorReason::AllocFailure => f.write_str("An allocation failure occurred."),
            ErrorReason::ShrinkBelowCount => {
                f.write_str("Cannot resize a vector below its current count.")
            }
            ErrorReason::OutOfBounds => f.write_str("Index is outside the live units."),
            ErrorReason::FormatFailure => f.write_str("Formatting the text failed."),
        }
    }
}
