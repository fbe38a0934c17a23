//! Supporting types for `Vx` and `VxStr`: the error types, the `LengthType`
//! trait, and the `AltAllocator` trait with its `Global` implementation.
//!
//! With the `alloc_api2` feature, `AltAllocator` is also implemented for every
//! `allocator_api2` allocator.

#[cfg(feature = "alloc_api2")]
mod alloc_api2;
mod alt_alloc;
mod errors;
mod global;
mod len_type;

pub use alt_alloc::AltAllocator;
pub use errors::*;
pub use global::Global;
pub use len_type::LengthType;
