//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// holding the same attributes are interchangeable. To "modify" one, build a
/// new one.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct OverdraftLimit(Decimal);
///
/// impl ValueObject for OverdraftLimit {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
