//! Generic repository trait for storage access.

use async_trait::async_trait;

use crate::result::AppResult;

/// Generic CRUD repository trait.
///
/// Each entity gets a strongly typed repository on top of this one;
/// entity-specific queries (natural-key lookups, filtered listings) are
/// declared on the per-entity traits that extend it.
#[async_trait]
pub trait Repository<Entity, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its primary key.
    async fn find(&self, id: Id) -> AppResult<Option<Entity>>;

    /// Insert or update an entity.
    ///
    /// When the entity carries no identifier a fresh one is taken from the
    /// entity's counter; the returned entity always carries its id.
    async fn persist(&self, entity: Entity) -> AppResult<Entity>;

    /// Delete an entity by its primary key. Returns `true` if deleted.
    async fn delete(&self, id: Id) -> AppResult<bool>;
}
