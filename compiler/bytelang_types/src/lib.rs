//! Compile-time values and byte-exact type profiles.
//!
//! [`RValue`] is what constant evaluation produces. [`TypeProfile`] is a
//! resolved type that knows its encoded size and how to convert between
//! values and little-endian bytes.

mod errors;
mod primitive;
mod profile;
mod value;

pub use errors::{OpError, PackError};
pub use primitive::{primitive_registry, PrimitiveType};
pub use profile::TypeProfile;
pub use value::RValue;
