//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Inventory rows are identified by their normalized item key, staff rows by
/// their name.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
