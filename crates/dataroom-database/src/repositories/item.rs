//! Item repository implementation.

use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use dataroom_core::config::StorageConfig;
use dataroom_core::error::{AppError, ErrorKind};
use dataroom_core::result::AppResult;
use dataroom_core::traits::Repository;
use dataroom_core::types::ItemId;
use dataroom_entity::item::{FileContent, Item, ItemContent, ItemKind};

use crate::connection::DatabasePool;
use crate::migration::run_migrations;

const SELECT_COLUMNS: &str =
    "SELECT id, name, parent_id, kind, size, mime_type, payload, created_at, updated_at FROM items";

/// Item-specific storage operations on top of [`Repository`].
#[async_trait]
pub trait ItemStore: Repository<Item, ItemId> {
    /// Direct children of `parent_id`, or root-level items for `None`.
    async fn find_by_parent(&self, parent_id: Option<ItemId>) -> AppResult<Vec<Item>>;

    /// Delete the given items, in order, in a single transaction.
    /// Returns how many records were removed.
    async fn delete_many(&self, ids: &[ItemId]) -> AppResult<u64>;
}

/// Raw `items` row.
#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    name: String,
    parent_id: Option<String>,
    kind: String,
    size: Option<i64>,
    mime_type: Option<String>,
    payload: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ItemRow> for Item {
    type Error = AppError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let id = parse_id(&row.id)?;
        let parent_id = row.parent_id.as_deref().map(parse_id).transpose()?;
        let kind = ItemKind::parse(&row.kind)
            .ok_or_else(|| AppError::storage(format!("Unknown item kind '{}' for {id}", row.kind)))?;

        let content = match kind {
            ItemKind::Folder => ItemContent::Folder,
            ItemKind::File => match (row.size, row.mime_type, row.payload) {
                (Some(size), Some(mime_type), Some(payload)) => ItemContent::File(FileContent {
                    size,
                    mime_type,
                    payload,
                }),
                _ => return Err(AppError::storage(format!("File {id} is missing content columns"))),
            },
        };

        Ok(Item {
            id,
            name: row.name,
            parent_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            content,
        })
    }
}

fn parse_id(raw: &str) -> AppResult<ItemId> {
    raw.parse()
        .map_err(|e| AppError::with_source(ErrorKind::Storage, format!("Corrupt item id '{raw}'"), e))
}

fn rows_to_items(rows: Vec<ItemRow>) -> AppResult<Vec<Item>> {
    rows.into_iter().map(Item::try_from).collect()
}

/// SQLite-backed store of one user's items.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Create a repository over an already migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the user's database, apply migrations, and return the store.
    pub async fn open(config: &StorageConfig, user_id: &str) -> AppResult<Self> {
        let db = DatabasePool::open_for_user(config, user_id).await?;
        run_migrations(db.pool()).await?;
        Ok(Self::new(db.into_pool()))
    }

    /// Open a migrated in-memory store.
    pub async fn in_memory() -> AppResult<Self> {
        let db = DatabasePool::in_memory().await?;
        run_migrations(db.pool()).await?;
        Ok(Self::new(db.into_pool()))
    }

    /// Close the underlying pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Insert or upsert `item` in its own transaction. Returns `false` when
    /// a plain insert found the id already taken.
    async fn write(&self, item: &Item, upsert: bool) -> Result<bool, sqlx::Error> {
        let (size, mime_type, payload) = match &item.content {
            ItemContent::Folder => (None, None, None),
            ItemContent::File(f) => (
                Some(f.size),
                Some(f.mime_type.as_str()),
                Some(f.payload.as_str()),
            ),
        };

        let sql = if upsert {
            "INSERT INTO items (id, name, parent_id, kind, size, mime_type, payload, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, parent_id = excluded.parent_id, \
             kind = excluded.kind, size = excluded.size, mime_type = excluded.mime_type, \
             payload = excluded.payload, created_at = excluded.created_at, updated_at = excluded.updated_at"
        } else {
            "INSERT INTO items (id, name, parent_id, kind, size, mime_type, payload, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        };

        let mut tx = self.pool.begin().await?;

        if !upsert {
            let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM items WHERE id = ?1")
                .bind(item.id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_some() {
                tx.rollback().await?;
                return Ok(false);
            }
        }

        sqlx::query(sql)
            .bind(item.id.to_string())
            .bind(&item.name)
            .bind(item.parent_id.map(|p| p.to_string()))
            .bind(item.kind().as_str())
            .bind(size)
            .bind(mime_type)
            .bind(payload)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl Repository<Item, ItemId> for ItemRepository {
    async fn find_by_id(&self, id: &ItemId) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to find item", e))?;
        row.map(Item::try_from).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to list items", e))?;
        rows_to_items(rows)
    }

    async fn create(&self, item: &Item) -> AppResult<()> {
        let inserted = self.write(item, false).await.map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::duplicate_key(format!("Item {} already exists", item.id))
            }
            _ => AppError::with_source(ErrorKind::Storage, "Failed to create item", e),
        })?;
        if !inserted {
            return Err(AppError::duplicate_key(format!(
                "Item {} already exists",
                item.id
            )));
        }
        debug!(item_id = %item.id, kind = %item.kind(), "Item committed");
        Ok(())
    }

    async fn update(&self, item: &Item) -> AppResult<()> {
        self.write(item, true)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to update item", e))?;
        debug!(item_id = %item.id, "Item update committed");
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> AppResult<bool> {
        let removed = self.delete_many(std::slice::from_ref(id)).await?;
        Ok(removed > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to count items", e))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn find_by_parent(&self, parent_id: Option<ItemId>) -> AppResult<Vec<Item>> {
        // Root items are matched with IS NULL; `parent_id = NULL` never matches.
        let filter = if parent_id.is_some() {
            "parent_id = ?1"
        } else {
            "parent_id IS NULL"
        };
        let sql = format!("{SELECT_COLUMNS} WHERE {filter} ORDER BY created_at ASC, rowid ASC");

        let query = sqlx::query_as::<_, ItemRow>(&sql);
        let query = match parent_id {
            Some(parent) => query.bind(parent.to_string()),
            None => query,
        };

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to list children", e))?;
        rows_to_items(rows)
    }

    async fn delete_many(&self, ids: &[ItemId]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result: Result<u64, sqlx::Error> = async {
            let mut tx = self.pool.begin().await?;
            let mut removed = 0u64;
            for id in ids {
                removed += sqlx::query("DELETE FROM items WHERE id = ?1")
                    .bind(id.to_string())
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
            }
            tx.commit().await?;
            Ok(removed)
        }
        .await;

        let removed = result
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to delete items", e))?;
        debug!(requested = ids.len(), removed, "Item deletion committed");
        Ok(removed)
    }
}
