//! Generic repository trait for keyed record storage.

use async_trait::async_trait;

use crate::result::AppResult;

/// Generic CRUD repository trait.
///
/// Every mutating method must return only after its write has been
/// committed, so a read issued right after it observes the change.
/// Entity-specific queries live on sub-traits in the storage crate.
#[async_trait]
pub trait Repository<Entity, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static + serde::Serialize,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<Entity>>;

    /// Return every stored entity.
    async fn find_all(&self) -> AppResult<Vec<Entity>>;

    /// Insert a new entity. Fails with `DuplicateKey` if the key is taken.
    async fn create(&self, entity: &Entity) -> AppResult<()>;

    /// Insert or replace an entity by primary key.
    async fn update(&self, entity: &Entity) -> AppResult<()>;

    /// Delete an entity by its primary key. Returns `true` if a record was removed.
    async fn delete(&self, id: &Id) -> AppResult<bool>;

    /// Count total entities.
    async fn count(&self) -> AppResult<u64>;
}
