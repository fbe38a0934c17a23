//! # vx
//!
//! A `#[no_std]` growable vector, `Vx`, built around one rule: capacity always
//! fits exactly. Growing past the current capacity reallocates to precisely the
//! new count and zero-fills the new slots, and `shrink` gives the spare slots
//! back. There is no geometric growth, so memory use is predictable at the cost
//! of a reallocation per growth.
//!
//! Insertion and removal are one primitive, [`Vx::shift`], which opens a zeroed
//! gap for a positive displacement and removes the units in front of an index
//! for a negative one. `push`, `append`, `insert`, and `emplace` are built on
//! `grow` and `shift`.
//!
//! A vector may carry a per-unit destructor ([`UnitFree`]). It runs on every
//! removed or destroyed unit that has actually been written, which the vector
//! tracks with an occupancy flag per slot kept in the same allocation as the
//! units themselves.
//!
//! Every fallible operation returns a [`VxResult`](types::VxResult) and leaves
//! the vector's count and contents untouched on failure, so chains of
//! operations can be written with `?`.
//!
//! [`VxStr`] is a byte vector that always keeps a trailing `0` terminator, with
//! formatted construction, appending, and insertion through the [`vx_str!`],
//! [`vx_str_append!`], and [`vx_str_emplace!`] macros. Formatting measures the
//! text first and then writes it straight into the vector.
//!
//! # Feature Flags
//! * `diagnostics` - Report allocation failures and attempts to reserve below
//! the live count through the `log` crate, under the `vx` target.
//!
//! * `alloc_api2` - Implement `AltAllocator` for every allocator implementing
//! `allocator_api2::alloc::Allocator`.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

macro_rules! diag {
    ($level:ident, $($arg:tt)+) => {{
        #[cfg(feature = "diagnostics")]
        ::log::$level!(target: "vx", $($arg)+);
        #[cfg(not(feature = "diagnostics"))]
        {
            let _ = ::core::format_args!($($arg)+);
        }
    }};
}

pub mod types;
mod vx;
mod vx_str;

pub use vx::UnitFree;
pub use vx::Vx;
pub use vx_str::VxStr;

/// Builds a [`VxStr`] from `format!` style arguments.
///
/// ```
/// let s = vx::vx_str!("{}-{}", 1, 2).unwrap();
/// assert_eq!(s, "1-2");
/// assert_eq!(s.as_vx().len(), 4);
/// ```
#[macro_export]
macro_rules! vx_str {
    ($($arg:tt)*) => {
        $crate::VxStr::from_fmt(::core::format_args!($($arg)*))
    };
}

/// Appends `format!` style arguments to a [`VxStr`].
///
/// ```
/// let mut s = vx::vx_str!("a").unwrap();
/// vx::vx_str_append!(s, "{}", 42).unwrap();
/// assert_eq!(s, "a42");
/// ```
#[macro_export]
macro_rules! vx_str_append {
    ($s:expr, $($arg:tt)*) => {
        $s.append_fmt(::core::format_args!($($arg)*))
    };
}

/// Inserts `format!` style arguments into a [`VxStr`] at a byte index.
///
/// ```
/// let mut s = vx::vx_str!("ad").unwrap();
/// vx::vx_str_emplace!(s, 1, "{}{}", 'b', 'c').unwrap();
/// assert_eq!(s, "abcd");
/// ```
#[macro_export]
macro_rules! vx_str_emplace {
    ($s:expr, $index:expr, $($arg:tt)*) => {
        $s.emplace_fmt($index, ::core::format_args!($($arg)*))
    };
}
