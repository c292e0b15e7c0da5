//! Task commands scoped to the active collection.

use super::args::{parse_due_date, parse_status, required_name, DueDateChange, DueDateRequest};
use super::{settle, Kanban, Outcome};
use crate::model::{render_sections, CollectionId, TaskStatus};
use crate::repo::collection_repo::CollectionRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::ServiceResult;
use chrono::NaiveDateTime;
use log::info;
use mockable::Clock;

impl<CR, TR, C> Kanban<CR, TR, C>
where
    CR: CollectionRepository,
    TR: TaskRepository,
    C: Clock,
{
    /// Creates a task in the active collection and touches the collection.
    ///
    /// `status` defaults to `todo`; `due_date` uses the `dd/MM/yyyy` layout.
    pub fn new_task(
        &mut self,
        name: &str,
        status: Option<&str>,
        due_date: Option<&str>,
    ) -> ServiceResult<Outcome> {
        let name = required_name(Some(name), "Task name is required.")?;
        let status = status.map(parse_status).transpose()?.unwrap_or_default();
        let due_date = due_date.map(parse_due_date).transpose()?;

        let active = self.active()?;
        let now = self.now();
        let task = self
            .tasks
            .create(active.id(), &name, status, due_date, now)?;
        self.context.invalidate();
        info!(
            "event=task_create module=ops status=ok collection_id={} task_id={}",
            active.id(),
            task.id()
        );

        Ok(Outcome::done()
            .line("Task created successfully!")
            .block(&task.to_string()))
    }

    /// Lists the active collection's tasks grouped by status.
    pub fn list_tasks(&mut self, status: Option<&str>) -> ServiceResult<Outcome> {
        let filter = status.map(parse_status).transpose()?;
        let active = self.active()?;

        let tasks = match filter {
            Some(status) => self.tasks.list_by_status(active.id(), status)?,
            None => self.tasks.list_all(active.id())?,
        };

        let mut outcome = Outcome::done()
            .line(format!(
                "All tasks in collection '{}': ({} Tasks)",
                active.name(),
                tasks.len()
            ))
            .line("");
        if let Some(status) = filter {
            outcome = outcome.line(format!("Filtered by status: {status}")).line("");
        }
        Ok(outcome.block(&render_sections(&tasks, filter)))
    }

    /// Moves one task of the active collection to `status`.
    pub fn move_task(&mut self, status: &str, name: &str) -> ServiceResult<Outcome> {
        let status = parse_status(status)?;
        let name = required_name(Some(name), "Task name is required.")?;
        let active = self.active()?;
        let now = self.now();

        settle(self.move_one(active.id(), &name, status, now))
    }

    fn move_one(
        &self,
        scope: CollectionId,
        name: &str,
        status: TaskStatus,
        now: NaiveDateTime,
    ) -> ServiceResult<Outcome> {
        let task = self.tasks.require_by_name(scope, name)?;
        let moved = self.tasks.set_status(&task, status, now)?;
        info!(
            "event=task_move module=ops status=ok task_id={} to={}",
            moved.id(),
            status
        );
        Ok(Outcome::done()
            .line(format!("Task '{}' moved to '{}'.", moved.name(), status))
            .block(&moved.to_string()))
    }

    pub(super) fn rename_task(
        &mut self,
        current_name: &str,
        new_name: &str,
    ) -> ServiceResult<Outcome> {
        let active = self.active()?;
        let now = self.now();
        let renamed = self.tasks.rename(active.id(), current_name, new_name, now)?;
        info!(
            "event=task_rename module=ops status=ok task_id={}",
            renamed.id()
        );

        Ok(Outcome::done()
            .line("Task renamed successfully!")
            .block(&renamed.to_string()))
    }

    /// Sets or removes the due date of one task in the active collection.
    pub fn due_date(&mut self, request: &DueDateRequest) -> ServiceResult<Outcome> {
        let change = request.change()?;
        let name = required_name(Some(&request.name), "No task name specified.")?;
        let active = self.active()?;
        let now = self.now();

        let due_date = match change {
            DueDateChange::Set(date) => Some(date),
            DueDateChange::Remove => None,
        };

        settle(self.change_due_date(active.id(), &name, due_date, now))
    }

    fn change_due_date(
        &self,
        scope: CollectionId,
        name: &str,
        due_date: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> ServiceResult<Outcome> {
        let task = self.tasks.require_by_name(scope, name)?;
        let updated = self.tasks.set_due_date(&task, due_date, now)?;
        info!(
            "event=task_due_date module=ops status=ok task_id={} cleared={}",
            updated.id(),
            due_date.is_none()
        );
        Ok(Outcome::done()
            .line("Task updated successfully!")
            .block(&updated.to_string()))
    }
}
