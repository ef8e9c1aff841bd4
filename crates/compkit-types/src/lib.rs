//! compkit Type Tags
//!
//! Runtime type representation for dynamically accessed components.
//!
//! Every property, parameter and action return value carries a [`TypeTag`].
//! Values crossing the string-keyed boundary are [`Value`]s, and every
//! type check is an explicit comparison between a tag and a value (or two
//! tags), never a coercion.

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod subtyping;
pub mod ty;
pub mod value;

pub use convert::FromValue;
pub use error::TypeError;
pub use ty::TypeTag;
pub use value::Value;
