//! Destructive and bulk commands: `delete`, `move --all` and `cleanup`.
//!
//! Each command validates arguments, resolves its scope, asks for
//! confirmation, then writes. A declined prompt returns `Cancelled`.

use super::args::{invalid, parse_status, required_name, CleanupRequest, DeleteRequest};
use super::confirm::Confirm;
use super::{ask, Kanban, Outcome};
use crate::repo::collection_repo::CollectionRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::{EntityKind, ServiceResult};
use log::{info, warn};
use mockable::Clock;

const IGNORED_STATUS_NOTICE: &str =
    "Warning: --status only applies to 'delete task --all'. Ignoring --status.";

impl<CR, TR, C> Kanban<CR, TR, C>
where
    CR: CollectionRepository,
    TR: TaskRepository,
    C: Clock,
{
    /// Deletes one collection, one task, or all of either.
    ///
    /// Deleting a collection deletes its tasks first. `--status` narrows
    /// `delete task --all`; anywhere else it is reported and ignored.
    pub fn delete(
        &mut self,
        request: &DeleteRequest,
        confirm: &mut impl Confirm,
    ) -> ServiceResult<Outcome> {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        if request.all && name.is_some() {
            return Err(invalid("Cannot use --all together with a name."));
        }

        let status = request.status.as_deref();
        let mut notices = Vec::new();
        let filters_tasks = request.all && request.kind == EntityKind::Task;
        if !filters_tasks && status.is_some_and(|status| !status.trim().is_empty()) {
            warn!("event=delete_status_ignored module=ops status=warn");
            notices.push(IGNORED_STATUS_NOTICE.to_string());
        }

        let outcome = match (request.kind, request.all) {
            (EntityKind::Collection, true) => self.delete_all_collections(confirm)?,
            (EntityKind::Collection, false) => {
                let name = required_name(name, "Collection name is required.")?;
                self.delete_collection(&name, confirm)?
            }
            (EntityKind::Task, true) => match status {
                Some(status) => self.delete_tasks_with_status(status, confirm)?,
                None => self.delete_all_tasks(confirm)?,
            },
            (EntityKind::Task, false) => {
                let name = required_name(name, "Task name is required.")?;
                let active = self.active()?;
                let task = self.tasks.require_by_name(active.id(), &name)?;
                self.tasks.delete(&task)?;
                info!(
                    "event=task_delete module=ops status=ok task_id={}",
                    task.id()
                );
                Outcome::done().line(format!("Task '{}' deleted.", task.name()))
            }
        };

        Ok(outcome.with_notices(notices))
    }

    fn delete_tasks_with_status(
        &mut self,
        status: &str,
        confirm: &mut impl Confirm,
    ) -> ServiceResult<Outcome> {
        let status = parse_status(status)?;
        let active = self.active()?;
        let question = format!(
            "Delete ALL tasks with status '{status}' in collection '{}'?",
            active.name()
        );
        if !ask(confirm, &question)? {
            return Ok(Outcome::cancelled());
        }

        let removed = self.tasks.delete_by_status(active.id(), status)?;
        info!(
            "event=bulk_delete module=ops status=ok scope=status collection_id={} removed={removed}",
            active.id()
        );
        Ok(Outcome::done().line(format!("{removed} task(s) with status '{status}' deleted.")))
    }

    fn delete_all_tasks(&mut self, confirm: &mut impl Confirm) -> ServiceResult<Outcome> {
        let active = self.active()?;
        let question = format!("Delete ALL tasks in collection '{}'?", active.name());
        if !ask(confirm, &question)? {
            return Ok(Outcome::cancelled());
        }

        let removed = self.tasks.delete_by_collection(active.id())?;
        info!(
            "event=bulk_delete module=ops status=ok scope=collection collection_id={} removed={removed}",
            active.id()
        );
        Ok(Outcome::done().line(format!("{removed} task(s) deleted.")))
    }

    fn delete_collection(
        &mut self,
        name: &str,
        confirm: &mut impl Confirm,
    ) -> ServiceResult<Outcome> {
        let collection = self.collections.require_by_name(name)?;
        if !ask(
            confirm,
            &format!(
                "Delete collection '{}' and all its tasks?",
                collection.name()
            ),
        )? {
            return Ok(Outcome::cancelled());
        }

        let removed = self.collections.delete(collection.id())?;
        if collection.is_active() {
            self.context.invalidate();
        }
        info!(
            "event=collection_delete module=ops status=ok collection_id={} tasks_removed={removed}",
            collection.id()
        );

        Ok(Outcome::done().line(format!(
            "Collection '{}' deleted ({removed} task(s) removed).",
            collection.name()
        )))
    }

    fn delete_all_collections(&mut self, confirm: &mut impl Confirm) -> ServiceResult<Outcome> {
        let collections = self.collections.list_all(&self.tasks)?;
        if collections.is_empty() {
            return Ok(Outcome::unchanged("No collections found."));
        }
        if !ask(confirm, "Delete ALL collections and their tasks?")? {
            return Ok(Outcome::cancelled());
        }

        let (removed, tasks_removed) = self.collections.delete_all()?;
        self.context.invalidate();
        info!(
            "event=bulk_delete module=ops status=ok scope=all_collections removed={removed} tasks_removed={tasks_removed}"
        );

        Ok(Outcome::done().line("All collections deleted."))
    }

    /// Moves every `from` task of the active collection to `to`.
    pub fn move_all(
        &mut self,
        from: &str,
        to: &str,
        confirm: &mut impl Confirm,
    ) -> ServiceResult<Outcome> {
        let from = parse_status(from)?;
        let to = parse_status(to)?;
        if from == to {
            return Err(invalid("Source and destination status are the same."));
        }

        let active = self.active()?;
        if !ask(
            confirm,
            &format!(
                "Move ALL tasks from '{from}' to '{to}' in collection '{}'?",
                active.name()
            ),
        )? {
            return Ok(Outcome::cancelled());
        }

        let now = self.now();
        let moved = self.tasks.move_all_by_status(active.id(), from, to, now)?;
        info!(
            "event=task_move_all module=ops status=ok collection_id={} from={from} to={to} moved={moved}",
            active.id()
        );

        Ok(Outcome::done().line(format!("{moved} task(s) moved from '{from}' to '{to}'.")))
    }

    /// Deletes tasks whose due date lies before now.
    pub fn cleanup(
        &mut self,
        request: &CleanupRequest,
        confirm: &mut impl Confirm,
    ) -> ServiceResult<Outcome> {
        let statuses = request.statuses()?;
        let active = self.active()?;

        let question = match statuses.as_slice() {
            [status] if !request.all => format!(
                "Remove expired tasks with status '{status}' from collection '{}'?",
                active.name()
            ),
            _ => format!(
                "Remove ALL expired tasks from collection '{}'?",
                active.name()
            ),
        };
        if !ask(confirm, &question)? {
            return Ok(Outcome::cancelled());
        }

        let now = self.now();
        let mut removed = 0;
        for status in statuses {
            removed += self.tasks.remove_expired(active.id(), status, now)?;
        }
        info!(
            "event=cleanup module=ops status=ok collection_id={} removed={removed}",
            active.id()
        );

        Ok(Outcome::done().line(format!("{removed} expired task(s) removed.")))
    }
}
