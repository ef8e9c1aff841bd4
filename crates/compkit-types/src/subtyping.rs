//! Assignability rules for type tags
//!
//! Implements the relation `sub <: sup`: a value declared as `sub` may be
//! stored where `sup` is declared. The relation only widens; there is no
//! narrowing and no implicit conversion.

use crate::ty::TypeTag;

/// Check if `sub` is assignable to `sup` (sub <: sup)
pub fn is_assignable(sub: &TypeTag, sup: &TypeTag) -> bool {
    // Reflexivity: T <: T
    if sub == sup {
        return true;
    }

    match (sub, sup) {
        // Everything is assignable to Any
        (_, TypeTag::Any) => true,

        // Void and Null both only hold null
        (TypeTag::Void, TypeTag::Null) | (TypeTag::Null, TypeTag::Void) => true,

        // Numeric widening: int <: number, float <: number
        (TypeTag::Int | TypeTag::Float, TypeTag::Number) => true,

        // Array subtyping: T[] <: U[] if T <: U
        (TypeTag::Array(e1), TypeTag::Array(e2)) => is_assignable(e1, e2),

        // No other relationships
        _ => false,
    }
}

impl TypeTag {
    /// Check if a value declared as `other` may be stored where `self` is declared
    pub fn is_assignable_from(&self, other: &TypeTag) -> bool {
        is_assignable(other, self)
    }
}
