//! Validated mutations and reads over one user's item tree.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use dataroom_core::config::{AppConfig, ValidationConfig};
use dataroom_core::error::AppError;
use dataroom_core::result::AppResult;
use dataroom_core::types::{ItemId, SortConfig};
use dataroom_database::repositories::{ItemRepository, ItemStore};
use dataroom_entity::factory::{self, build_file, build_folder};
use dataroom_entity::item::now_millis;
use dataroom_entity::{Breadcrumb, Item, ItemKind, ItemNode, ItemTree, NewFile, NewFolder};

use crate::context::UserContext;
use crate::item::search::{SearchQuery, search_items};
use crate::item::sort::sort_items;

/// Default label of the synthetic root breadcrumb.
pub const DEFAULT_ROOT_LABEL: &str = "DataRoom";

/// Sole mutator of a user's hierarchy.
///
/// Every operation either passes all of its checks and commits exactly one
/// write, or persists nothing and returns a tagged [`AppError`].
#[derive(Clone)]
pub struct TreeService {
    /// Item store of the current user.
    store: Arc<dyn ItemStore>,
    /// Whose tree this is.
    ctx: UserContext,
    /// Name, type, and size limits handed to the factories.
    limits: ValidationConfig,
    /// Label of the synthetic root breadcrumb.
    root_label: String,
}

impl std::fmt::Debug for TreeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeService")
            .field("user_id", &self.ctx.user_id)
            .field("root_label", &self.root_label)
            .finish_non_exhaustive()
    }
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(store: Arc<dyn ItemStore>, ctx: UserContext, limits: ValidationConfig) -> Self {
        Self {
            store,
            ctx,
            limits,
            root_label: DEFAULT_ROOT_LABEL.to_string(),
        }
    }

    /// Opens the store of `ctx.user_id` as configured and binds a service to it.
    pub async fn open(config: &AppConfig, ctx: UserContext) -> AppResult<Self> {
        let repo = ItemRepository::open(&config.storage, &ctx.user_id).await?;
        Ok(Self::new(Arc::new(repo), ctx, config.validation.clone())
            .with_root_label(config.display.root_label.clone()))
    }

    /// Overrides the root breadcrumb label.
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Label of the synthetic root breadcrumb.
    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    /// The user this service acts for.
    pub fn context(&self) -> &UserContext {
        &self.ctx
    }

    /// Creates a folder under `req.parent_id`.
    pub async fn create_folder(&self, req: NewFolder) -> AppResult<Item> {
        let name = factory::validate_name(&self.limits, ItemKind::Folder, &req.name)?;
        self.require_folder(req.parent_id).await?;
        self.ensure_unique_name(&name, req.parent_id, None, ItemKind::Folder)
            .await?;

        let folder = build_folder(
            &self.limits,
            NewFolder {
                name,
                parent_id: req.parent_id,
            },
        )?;
        self.store.create(&folder).await?;

        info!(
            user_id = %self.ctx.user_id,
            item_id = %folder.id,
            name = %folder.name,
            "Folder created"
        );
        Ok(folder)
    }

    /// Stores a new file under `req.parent_id`.
    pub async fn upload_file(&self, req: NewFile) -> AppResult<Item> {
        let name = factory::validate_name(&self.limits, ItemKind::File, &req.name)?;
        self.require_folder(req.parent_id).await?;
        self.ensure_unique_name(&name, req.parent_id, None, ItemKind::File)
            .await?;

        let file = build_file(&self.limits, NewFile { name, ..req })?;
        self.store.create(&file).await?;

        info!(
            user_id = %self.ctx.user_id,
            item_id = %file.id,
            name = %file.name,
            size = file.size(),
            "File uploaded"
        );
        Ok(file)
    }

    /// Renames an item in place.
    pub async fn rename_item(&self, id: ItemId, new_name: &str) -> AppResult<Item> {
        let mut item = self.require_item(id).await?;
        let name = factory::validate_name(&self.limits, item.kind(), new_name)?;
        self.ensure_unique_name(&name, item.parent_id, Some(id), item.kind())
            .await?;

        let previous = std::mem::replace(&mut item.name, name);
        item.touch(now_millis());
        self.store.update(&item).await?;

        info!(
            user_id = %self.ctx.user_id,
            item_id = %id,
            from = %previous,
            to = %item.name,
            "Item renamed"
        );
        Ok(item)
    }

    /// Moves an item under `new_parent_id` (`None` for the root).
    pub async fn move_item(&self, id: ItemId, new_parent_id: Option<ItemId>) -> AppResult<Item> {
        let mut item = self.require_item(id).await?;

        if item.is_folder() {
            if new_parent_id == Some(id) {
                return Err(AppError::invalid_move("Cannot move folder into itself"));
            }
            if let Some(target) = new_parent_id {
                self.require_folder(Some(target)).await?;
                if self.is_within(target, id).await? {
                    warn!(
                        user_id = %self.ctx.user_id,
                        item_id = %id,
                        target = %target,
                        "Rejected move into own subtree"
                    );
                    return Err(AppError::invalid_move(
                        "Cannot move folder into its own subfolder",
                    ));
                }
            }
        } else {
            self.require_folder(new_parent_id).await?;
        }

        if new_parent_id != item.parent_id {
            let clash = self
                .store
                .find_by_parent(new_parent_id)
                .await?
                .into_iter()
                .any(|sibling| sibling.id != id && sibling.has_name(&item.name));
            if clash {
                return Err(AppError::duplicate_name(
                    "An item with this name already exists in the target location",
                ));
            }
        }

        item.parent_id = new_parent_id;
        item.touch(now_millis());
        self.store.update(&item).await?;

        info!(
            user_id = %self.ctx.user_id,
            item_id = %id,
            parent_id = ?new_parent_id,
            "Item moved"
        );
        Ok(item)
    }

    /// Deletes an item and, for folders, everything beneath it.
    ///
    /// Deleting an id that does not exist succeeds and removes nothing.
    /// Returns the number of items removed.
    pub async fn delete_item(&self, id: ItemId) -> AppResult<u64> {
        let Some(item) = self.store.find_by_id(&id).await? else {
            return Ok(0);
        };

        let ids = self.collect_subtree(&item).await?;
        let removed = self.store.delete_many(&ids).await?;

        info!(
            user_id = %self.ctx.user_id,
            item_id = %id,
            removed,
            "Item deleted"
        );
        Ok(removed)
    }

    /// Breadcrumb trail from the synthetic root down to `folder_id`.
    pub async fn get_breadcrumbs(&self, folder_id: Option<ItemId>) -> AppResult<Vec<Breadcrumb>> {
        let limit = self.walk_limit().await?;
        let mut trail = Vec::new();
        let mut current = folder_id;
        let mut steps = 0u64;

        while let Some(id) = current {
            steps += 1;
            if steps > limit {
                return Err(AppError::consistency(format!(
                    "Parent chain of {id} does not terminate"
                )));
            }
            match self.store.find_by_id(&id).await? {
                Some(folder) if folder.is_folder() => {
                    current = folder.parent_id;
                    trail.push(Breadcrumb::folder(folder.id, folder.name));
                }
                _ => break,
            }
        }

        trail.push(Breadcrumb::root(self.root_label.clone()));
        trail.reverse();
        Ok(trail)
    }

    /// Looks up a single item.
    pub async fn get_item(&self, id: ItemId) -> AppResult<Option<Item>> {
        self.store.find_by_id(&id).await
    }

    /// Direct children of `parent_id` (`None` for the root).
    pub async fn get_items(&self, parent_id: Option<ItemId>) -> AppResult<Vec<Item>> {
        self.store.find_by_parent(parent_id).await
    }

    /// Every folder of the user, e.g. for a move-target picker.
    pub async fn get_all_folders(&self) -> AppResult<Vec<Item>> {
        let items = self.store.find_all().await?;
        Ok(items.into_iter().filter(Item::is_folder).collect())
    }

    /// Every item of the user.
    pub async fn get_all_items(&self) -> AppResult<Vec<Item>> {
        self.store.find_all().await
    }

    /// The whole hierarchy as nested nodes, each level ordered by `sort`.
    ///
    /// Items whose parent chain never reaches the root are left out.
    pub async fn get_tree(&self, sort: SortConfig) -> AppResult<ItemTree> {
        let mut by_parent: HashMap<Option<ItemId>, Vec<Item>> = HashMap::new();
        for item in self.store.find_all().await? {
            by_parent.entry(item.parent_id).or_default().push(item);
        }
        let roots = build_level(&mut by_parent, None, sort);
        Ok(ItemTree { roots })
    }

    /// Global search over every item of the user.
    pub async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Item>> {
        let items = self.store.find_all().await?;
        Ok(search_items(items, query))
    }

    /// Sorts a listing, folders first.
    pub fn sort_items(&self, items: Vec<Item>, config: SortConfig) -> Vec<Item> {
        sort_items(items, config)
    }

    async fn require_item(&self, id: ItemId) -> AppResult<Item> {
        self.store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))
    }

    /// Checks that `parent_id` names an existing folder; `None` is the root.
    async fn require_folder(&self, parent_id: Option<ItemId>) -> AppResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        match self.store.find_by_id(&parent_id).await? {
            Some(parent) if parent.is_folder() => Ok(()),
            Some(_) => Err(AppError::invalid_input("Target is not a folder")),
            None => Err(AppError::not_found("Folder not found")),
        }
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        parent_id: Option<ItemId>,
        exclude: Option<ItemId>,
        kind: ItemKind,
    ) -> AppResult<()> {
        let siblings = self.store.find_by_parent(parent_id).await?;
        let clash = siblings
            .iter()
            .any(|sibling| Some(sibling.id) != exclude && sibling.has_name(name));
        if !clash {
            return Ok(());
        }

        let message = match (exclude, kind) {
            (Some(_), _) => "An item with this name already exists in this location",
            (None, ItemKind::Folder) => "A folder with this name already exists in this location",
            (None, ItemKind::File) => "A file with this name already exists in this location",
        };
        Err(AppError::duplicate_name(message))
    }

    /// Whether `ancestor` appears on the parent chain starting at `start`.
    ///
    /// A missing link ends the chain. A chain longer than the number of
    /// stored items can only be a cycle and yields a consistency error.
    async fn is_within(&self, start: ItemId, ancestor: ItemId) -> AppResult<bool> {
        let limit = self.walk_limit().await?;
        let mut current = Some(start);
        let mut steps = 0u64;

        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            steps += 1;
            if steps > limit {
                return Err(AppError::consistency(format!(
                    "Parent chain of {start} does not terminate"
                )));
            }
            current = match self.store.find_by_id(&id).await? {
                Some(item) => item.parent_id,
                None => None,
            };
        }
        Ok(false)
    }

    /// Ids of `root` and its descendants, children before their folder.
    async fn collect_subtree(&self, root: &Item) -> AppResult<Vec<ItemId>> {
        let mut ordered = Vec::new();
        let mut seen = HashSet::from([root.id]);
        let mut stack = vec![(root.id, root.is_folder(), false)];

        while let Some((id, is_folder, expanded)) = stack.pop() {
            if !is_folder || expanded {
                ordered.push(id);
                continue;
            }
            stack.push((id, true, true));
            for child in self.store.find_by_parent(Some(id)).await? {
                if !seen.insert(child.id) {
                    return Err(AppError::consistency(format!(
                        "Item {} is reachable twice below {}",
                        child.id, root.id
                    )));
                }
                stack.push((child.id, child.is_folder(), false));
            }
        }
        Ok(ordered)
    }

    async fn walk_limit(&self) -> AppResult<u64> {
        Ok(self.store.count().await? + 1)
    }
}

/// Detaches the children of `parent` from `by_parent` and nests them.
fn build_level(
    by_parent: &mut HashMap<Option<ItemId>, Vec<Item>>,
    parent: Option<ItemId>,
    sort: SortConfig,
) -> Vec<ItemNode> {
    let children = by_parent.remove(&parent).unwrap_or_default();
    sort_items(children, sort)
        .into_iter()
        .map(|item| {
            let children = if item.is_folder() {
                build_level(by_parent, Some(item.id), sort)
            } else {
                Vec::new()
            };
            ItemNode {
                id: item.id,
                kind: item.kind(),
                size: item.size(),
                name: item.name,
                children,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataroom_core::error::ErrorKind;

    async fn service() -> TreeService {
        let repo = ItemRepository::in_memory().await.unwrap();
        TreeService::new(
            Arc::new(repo),
            UserContext::new("tester"),
            ValidationConfig::default(),
        )
        .with_root_label("root")
    }

    fn pdf(name: &str, parent_id: Option<ItemId>) -> NewFile {
        NewFile {
            name: name.to_string(),
            parent_id,
            size: 1_024,
            mime_type: "application/pdf".to_string(),
            payload: "data:application/pdf;base64,JVBERi0=".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_folder_sanitizes_and_persists() {
        let svc = service().await;
        let folder = svc
            .create_folder(NewFolder::new("  Q1<Reports>  ", None))
            .await
            .unwrap();
        assert_eq!(folder.name, "Q1Reports");

        let stored = svc.get_item(folder.id).await.unwrap().unwrap();
        assert_eq!(stored, folder);
    }

    #[tokio::test]
    async fn test_create_folder_rejects_duplicate_ignoring_case() {
        let svc = service().await;
        svc.create_folder(NewFolder::new("Reports", None))
            .await
            .unwrap();

        let err = svc
            .create_folder(NewFolder::new("reports", None))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::DuplicateName));
        assert_eq!(
            err.message,
            "A folder with this name already exists in this location"
        );
        assert_eq!(svc.get_items(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_name_allowed_in_different_folders() {
        let svc = service().await;
        let a = svc.create_folder(NewFolder::new("A", None)).await.unwrap();
        let b = svc.create_folder(NewFolder::new("B", None)).await.unwrap();

        svc.create_folder(NewFolder::new("Docs", Some(a.id)))
            .await
            .unwrap();
        svc.create_folder(NewFolder::new("Docs", Some(b.id)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_under_missing_parent_fails() {
        let svc = service().await;
        let err = svc
            .create_folder(NewFolder::new("Orphan", Some(ItemId::new())))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_upload_into_file_is_rejected() {
        let svc = service().await;
        let file = svc.upload_file(pdf("a.pdf", None)).await.unwrap();
        let err = svc
            .upload_file(pdf("b.pdf", Some(file.id)))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
    }

    #[tokio::test]
    async fn test_upload_duplicate_name_wins_over_bad_size_and_type() {
        let svc = service().await;
        svc.upload_file(pdf("a.pdf", None)).await.unwrap();

        let oversized = NewFile {
            size: 52_428_801,
            ..pdf("a.pdf", None)
        };
        let err = svc.upload_file(oversized).await.unwrap_err();
        assert!(err.is(ErrorKind::DuplicateName));

        let wrong_type = NewFile {
            mime_type: "text/plain".to_string(),
            ..pdf("A.PDF", None)
        };
        let err = svc.upload_file(wrong_type).await.unwrap_err();
        assert!(err.is(ErrorKind::DuplicateName));
        assert_eq!(svc.get_all_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_to_case_variant_of_itself() {
        let svc = service().await;
        let folder = svc
            .create_folder(NewFolder::new("docs", None))
            .await
            .unwrap();

        let renamed = svc.rename_item(folder.id, "Docs").await.unwrap();
        assert_eq!(renamed.name, "Docs");
        assert!(renamed.updated_at >= folder.updated_at);
    }

    #[tokio::test]
    async fn test_breadcrumbs_of_root_is_root_only() {
        let svc = service().await;
        let crumbs = svc.get_breadcrumbs(None).await.unwrap();
        assert_eq!(crumbs, vec![Breadcrumb::root("root")]);
    }

    #[tokio::test]
    async fn test_tree_nests_and_sorts_levels() {
        let svc = service().await;
        let b = svc.create_folder(NewFolder::new("B", None)).await.unwrap();
        svc.create_folder(NewFolder::new("A", None)).await.unwrap();
        svc.upload_file(pdf("z.pdf", Some(b.id))).await.unwrap();
        svc.create_folder(NewFolder::new("Inner", Some(b.id)))
            .await
            .unwrap();

        let tree = svc.get_tree(SortConfig::default()).await.unwrap();
        assert_eq!(tree.count(), 4);
        let names: Vec<_> = tree.roots.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);

        let inner: Vec<_> = tree.roots[1]
            .children
            .iter()
            .map(|n| (n.name.as_str(), n.kind))
            .collect();
        assert_eq!(inner, [("Inner", ItemKind::Folder), ("z.pdf", ItemKind::File)]);
    }

    #[tokio::test]
    async fn test_collect_subtree_orders_children_first() {
        let svc = service().await;
        let top = svc.create_folder(NewFolder::new("Top", None)).await.unwrap();
        let mid = svc
            .create_folder(NewFolder::new("Mid", Some(top.id)))
            .await
            .unwrap();
        let leaf = svc.upload_file(pdf("leaf.pdf", Some(mid.id))).await.unwrap();

        let ids = svc.collect_subtree(&top).await.unwrap();
        let pos = |id: ItemId| ids.iter().position(|x| *x == id).unwrap();
        assert_eq!(ids.len(), 3);
        assert!(pos(leaf.id) < pos(mid.id));
        assert!(pos(mid.id) < pos(top.id));
    }
}
