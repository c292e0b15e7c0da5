//! Collection-level commands: `use`, `new`, `list` (collections) and `rename`.

use super::args::required_name;
use super::{settle, Kanban, Outcome};
use crate::repo::collection_repo::CollectionRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::{EntityKind, ServiceError, ServiceResult};
use log::info;
use mockable::Clock;

impl<CR, TR, C> Kanban<CR, TR, C>
where
    CR: CollectionRepository,
    TR: TaskRepository,
    C: Clock,
{
    /// Makes `name` the single active collection.
    ///
    /// An unknown name is rejected and the known collections are listed.
    pub fn use_collection(&mut self, name: &str) -> ServiceResult<Outcome> {
        let name = required_name(Some(name), "Collection name is required.")?;

        let Some(collection) = self.collections.get_by_name(&name)? else {
            let missing = ServiceError::NotFound {
                kind: EntityKind::Collection,
                name,
            };
            let mut outcome = Outcome::rejected(missing.to_string()).line("Available collections:");
            let known = self.collections.list_all(&self.tasks)?;
            if known.is_empty() {
                outcome = outcome.line(
                    "No collections found. Create a new collection using the 'new' command.",
                );
            }
            for collection in known {
                outcome = outcome.block(&collection.to_string());
            }
            return Ok(outcome);
        };

        if collection.is_active() {
            let collection = self.counted(collection)?;
            return Ok(Outcome::unchanged(format!(
                "Collection '{}' is already active.",
                collection.name()
            ))
            .block(&collection.to_string()));
        }

        self.collections.set_active(collection.name())?;
        self.context.invalidate();
        info!(
            "event=collection_switch module=ops status=ok collection_id={}",
            collection.id()
        );

        let active = self.active()?;
        let active = self.counted(active)?;
        Ok(Outcome::done()
            .line(format!("Now working with collection: {}", active.name()))
            .block(&active.to_string()))
    }

    /// Creates an inactive collection.
    pub fn new_collection(&mut self, name: &str) -> ServiceResult<Outcome> {
        let name = required_name(Some(name), "Collection name is required.")?;
        let now = self.now();
        let collection = self.collections.create(&name, now)?;
        info!(
            "event=collection_create module=ops status=ok collection_id={}",
            collection.id()
        );

        Ok(Outcome::done()
            .line("Collection created successfully!")
            .block(&collection.to_string()))
    }

    /// Lists every collection, newest first, with task counts.
    pub fn list_collections(&mut self) -> ServiceResult<Outcome> {
        let collections = self.collections.list_all(&self.tasks)?;
        if collections.is_empty() {
            return Ok(Outcome::done().line("No collections found."));
        }

        let mut outcome = Outcome::done().line(format!("Collections: ({})", collections.len()));
        for collection in &collections {
            outcome = outcome.line("").block(&collection.to_string());
        }
        Ok(outcome)
    }

    /// Renames a collection, or a task in the active collection.
    pub fn rename(
        &mut self,
        kind: EntityKind,
        current_name: &str,
        new_name: &str,
    ) -> ServiceResult<Outcome> {
        let current_name = required_name(Some(current_name), "Current name not specified.")?;
        let new_name = required_name(Some(new_name), "New name not specified.")?;
        settle(match kind {
            EntityKind::Collection => self.rename_collection(&current_name, &new_name),
            EntityKind::Task => self.rename_task(&current_name, &new_name),
        })
    }

    fn rename_collection(&mut self, current_name: &str, new_name: &str) -> ServiceResult<Outcome> {
        let now = self.now();
        let renamed = self.collections.rename(current_name, new_name, now)?;
        if renamed.is_active() {
            self.context.invalidate();
        }
        info!(
            "event=collection_rename module=ops status=ok collection_id={}",
            renamed.id()
        );

        let renamed = self.counted(renamed)?;
        Ok(Outcome::done()
            .line("Collection renamed successfully!")
            .block(&renamed.to_string()))
    }
}
