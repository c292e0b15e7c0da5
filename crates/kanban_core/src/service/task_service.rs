//! Task registry.
//!
//! # Responsibility
//! - Task CRUD, status moves, due-date changes and bulk sweeps within one
//!   collection scope.
//!
//! # Invariants
//! - Every call names its collection scope explicitly.
//! - No-op changes are reported as `AlreadyInState` before any write.
//! - `move_all_by_status` with identical statuses never reaches storage.

use crate::model::timestamp::format_date;
use crate::model::{CollectionId, NewTask, Task, TaskStatus};
use crate::repo::task_repo::TaskRepository;
use crate::service::{storage, storage_write, EntityKind, ServiceError, ServiceResult};
use chrono::NaiveDateTime;

/// Task registry over a repository implementation.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task in `scope`, stamped with `now` as its creation time.
    pub fn create(
        &self,
        scope: CollectionId,
        name: &str,
        status: TaskStatus,
        due_date: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> ServiceResult<Task> {
        let draft = NewTask::new(scope, name, now)?
            .with_status(status)
            .with_due_date(due_date)?;

        if self.get_by_name(scope, draft.name())?.is_some() {
            return Err(ServiceError::DuplicateName {
                kind: EntityKind::Task,
                name: draft.name().to_string(),
            });
        }

        storage_write("task_create", EntityKind::Task, self.repo.create_task(&draft))
    }

    pub fn get_by_name(&self, scope: CollectionId, name: &str) -> ServiceResult<Option<Task>> {
        storage("task_get", self.repo.find_task_by_name(scope, name))
    }

    /// Like [`Self::get_by_name`], failing with `NotFound` when absent.
    pub fn require_by_name(&self, scope: CollectionId, name: &str) -> ServiceResult<Task> {
        self.get_by_name(scope, name)?
            .ok_or_else(|| ServiceError::NotFound {
                kind: EntityKind::Task,
                name: name.trim().to_string(),
            })
    }

    pub fn list_all(&self, scope: CollectionId) -> ServiceResult<Vec<Task>> {
        storage("task_list", self.repo.list_tasks(scope))
    }

    pub fn list_by_status(
        &self,
        scope: CollectionId,
        status: TaskStatus,
    ) -> ServiceResult<Vec<Task>> {
        storage(
            "task_list_by_status",
            self.repo.list_tasks_by_status(scope, status),
        )
    }

    pub fn rename(
        &self,
        scope: CollectionId,
        current_name: &str,
        new_name: &str,
        now: NaiveDateTime,
    ) -> ServiceResult<Task> {
        let mut task = self.require_by_name(scope, current_name)?;
        let previous = task.name().to_string();
        task.set_name(new_name)?;
        if task.name() == previous {
            return Err(ServiceError::AlreadyInState(format!(
                "Task '{previous}' already has that name."
            )));
        }

        if let Some(existing) = self.get_by_name(scope, task.name())? {
            if existing.id() != task.id() {
                return Err(ServiceError::DuplicateName {
                    kind: EntityKind::Task,
                    name: task.name().to_string(),
                });
            }
        }

        task.set_updated_at(Some(now))?;
        storage_write("task_rename", EntityKind::Task, self.repo.update_task(&task))?;
        Ok(task)
    }

    /// Moves one task to `status`.
    pub fn set_status(
        &self,
        task: &Task,
        status: TaskStatus,
        now: NaiveDateTime,
    ) -> ServiceResult<Task> {
        if task.status() == status {
            return Err(ServiceError::AlreadyInState(format!(
                "Task '{}' is already in status '{}'.",
                task.name(),
                status
            )));
        }

        let mut updated = task.clone();
        updated.set_status(status);
        updated.set_updated_at(Some(now))?;
        storage("task_set_status", self.repo.update_task(&updated))?;
        Ok(updated)
    }

    /// Sets (`Some`) or clears (`None`) the due date of one task.
    pub fn set_due_date(
        &self,
        task: &Task,
        due_date: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> ServiceResult<Task> {
        match (task.due_date(), due_date) {
            (None, None) => {
                return Err(ServiceError::AlreadyInState(format!(
                    "Task '{}' does not have a due date.",
                    task.name()
                )));
            }
            (Some(current), Some(requested)) if current == requested => {
                return Err(ServiceError::AlreadyInState(format!(
                    "Task '{}' already has due date {}.",
                    task.name(),
                    format_date(&current)
                )));
            }
            _ => {}
        }

        let mut updated = task.clone();
        updated.set_due_date(due_date)?;
        updated.set_updated_at(Some(now))?;
        storage("task_set_due_date", self.repo.update_task(&updated))?;
        Ok(updated)
    }

    /// Moves every `from` task in `scope` to `to`; returns rows changed.
    pub fn move_all_by_status(
        &self,
        scope: CollectionId,
        from: TaskStatus,
        to: TaskStatus,
        now: NaiveDateTime,
    ) -> ServiceResult<usize> {
        if from == to {
            return Err(ServiceError::InvalidArgument(
                "Source and destination status are the same.".to_string(),
            ));
        }
        storage(
            "task_move_all",
            self.repo.move_all_by_status(scope, from, to, now),
        )
    }

    pub fn delete(&self, task: &Task) -> ServiceResult<()> {
        storage("task_delete", self.repo.delete_task(task.id()))
    }

    pub fn delete_by_status(&self, scope: CollectionId, status: TaskStatus) -> ServiceResult<usize> {
        storage(
            "task_delete_by_status",
            self.repo.delete_tasks_by_status(scope, status),
        )
    }

    pub fn delete_by_collection(&self, collection_id: CollectionId) -> ServiceResult<usize> {
        storage(
            "task_delete_by_collection",
            self.repo.delete_tasks_by_collection(collection_id),
        )
    }

    pub fn count_by_collection(&self, collection_id: CollectionId) -> ServiceResult<u32> {
        storage(
            "task_count",
            self.repo.count_tasks_by_collection(collection_id),
        )
    }

    /// Deletes `status` tasks in `scope` whose due date lies before `now`.
    pub fn remove_expired(
        &self,
        scope: CollectionId,
        status: TaskStatus,
        now: NaiveDateTime,
    ) -> ServiceResult<usize> {
        let mut removed = 0;
        for task in self.list_by_status(scope, status)? {
            if task.is_expired(now) {
                self.delete(&task)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
