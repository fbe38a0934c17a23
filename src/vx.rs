mod array;
mod inner;

pub use array::UnitFree;
pub use array::Vx;
