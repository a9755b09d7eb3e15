//! Domain Layer - Core Entity Trait
//!
//! Every record held by the client is a re-fetchable copy of a remote row
//! and is addressed by its numeric ID.

/// Core trait for all domain entities
pub trait Entity: Sized + Clone {
    /// Returns the entity's unique identifier
    fn id(&self) -> u32;
}

/// Find an entity by ID in a fetched collection
pub fn find_by_id<T: Entity>(items: &[T], id: u32) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}
