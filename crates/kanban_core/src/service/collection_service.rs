//! Collection registry.
//!
//! # Responsibility
//! - Create, look up, rename and delete collections.
//! - Manage the active flag through the repository's single-switch call.
//!
//! # Invariants
//! - Names are unique case-insensitively; a collection may be renamed to a
//!   case variant of its own name.
//! - `delete` removes only the collection row; callers delete tasks first.
//! - `list_all` recomputes each `task_count` through the task registry.

use crate::model::{Collection, CollectionId, NewCollection};
use crate::repo::collection_repo::CollectionRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::task_service::TaskService;
use crate::service::{storage, storage_write, EntityKind, ServiceError, ServiceResult};
use chrono::NaiveDateTime;

/// Collection registry over a repository implementation.
pub struct CollectionService<R: CollectionRepository> {
    repo: R,
}

impl<R: CollectionRepository> CollectionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Underlying repository, used by the active-collection context.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates an inactive collection stamped with `now`.
    pub fn create(&self, name: &str, now: NaiveDateTime) -> ServiceResult<Collection> {
        let draft = NewCollection::new(name, now)?;
        if self.get_by_name(draft.name())?.is_some() {
            return Err(ServiceError::DuplicateName {
                kind: EntityKind::Collection,
                name: draft.name().to_string(),
            });
        }

        storage_write(
            "collection_create",
            EntityKind::Collection,
            self.repo.create_collection(&draft),
        )
    }

    pub fn get_by_name(&self, name: &str) -> ServiceResult<Option<Collection>> {
        storage(
            "collection_get",
            self.repo.find_collection_by_name(name),
        )
    }

    /// Like [`Self::get_by_name`], failing with `NotFound` when absent.
    pub fn require_by_name(&self, name: &str) -> ServiceResult<Collection> {
        self.get_by_name(name)?.ok_or_else(|| ServiceError::NotFound {
            kind: EntityKind::Collection,
            name: name.trim().to_string(),
        })
    }

    /// All collections, newest first, with task counts filled in.
    pub fn list_all<T: TaskRepository>(
        &self,
        tasks: &TaskService<T>,
    ) -> ServiceResult<Vec<Collection>> {
        let mut collections = storage("collection_list", self.repo.list_collections())?;
        for collection in &mut collections {
            collection.set_task_count(tasks.count_by_collection(collection.id())?);
        }
        Ok(collections)
    }

    /// Renames `name` to `new_name` and stamps `updated_at`. An identical
    /// name is `AlreadyInState`; a change of case is a rename.
    pub fn rename(
        &self,
        name: &str,
        new_name: &str,
        now: NaiveDateTime,
    ) -> ServiceResult<Collection> {
        let mut collection = self.require_by_name(name)?;
        let previous = collection.name().to_string();
        collection.set_name(new_name)?;
        if collection.name() == previous {
            return Err(ServiceError::AlreadyInState(format!(
                "Collection '{previous}' already has that name."
            )));
        }

        if let Some(existing) = self.get_by_name(collection.name())? {
            if existing.id() != collection.id() {
                return Err(ServiceError::DuplicateName {
                    kind: EntityKind::Collection,
                    name: collection.name().to_string(),
                });
            }
        }

        collection.set_updated_at(Some(now))?;
        storage_write(
            "collection_rename",
            EntityKind::Collection,
            self.repo
                .rename_collection(collection.id(), collection.name(), now),
        )?;
        Ok(collection)
    }

    /// Removes the collection together with its tasks; returns tasks removed.
    pub fn delete(&self, id: CollectionId) -> ServiceResult<usize> {
        storage("collection_delete", self.repo.delete_collection(id))
    }

    /// Removes every collection and task; returns `(collections, tasks)` removed.
    pub fn delete_all(&self) -> ServiceResult<(usize, usize)> {
        storage("collection_delete_all", self.repo.delete_all_collections())
    }

    /// Makes `name` the only active collection. The caller checks existence.
    pub fn set_active(&self, name: &str) -> ServiceResult<()> {
        storage("collection_set_active", self.repo.set_active(name))
    }

    pub fn clear_all_active(&self) -> ServiceResult<()> {
        storage("collection_clear_active", self.repo.clear_all_active())
    }
}
