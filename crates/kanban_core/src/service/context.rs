//! Active-collection context.
//!
//! # Responsibility
//! - Cache the single active collection for the lifetime of one command.
//! - Route every read through one lazy-loading accessor.
//!
//! # Invariants
//! - The cache is either unloaded or holds the last storage answer.
//! - Anything that changes which collection is active, or the active
//!   collection's attributes, must call `invalidate` (or `clear`).

use crate::model::Collection;
use crate::repo::collection_repo::CollectionRepository;
use crate::service::{storage, ServiceError, ServiceResult};
use log::debug;

#[derive(Debug, Clone, Default)]
enum CacheState {
    #[default]
    Unloaded,
    Loaded(Option<Collection>),
}

/// Process-wide view of the active collection, owned by the command facade.
#[derive(Debug, Default)]
pub struct ActiveCollectionContext {
    state: CacheState,
}

impl ActiveCollectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active collection, loading it from storage on first use.
    pub fn get_active<R: CollectionRepository>(
        &mut self,
        repo: &R,
    ) -> ServiceResult<Option<&Collection>> {
        if matches!(self.state, CacheState::Unloaded) {
            let loaded = storage("active_collection_load", repo.load_active_collection())?;
            debug!(
                "event=active_collection_load module=context status=ok found={}",
                loaded.is_some()
            );
            self.state = CacheState::Loaded(loaded);
        }

        match &self.state {
            CacheState::Loaded(active) => Ok(active.as_ref()),
            CacheState::Unloaded => Ok(None),
        }
    }

    /// Same lazy path as [`Self::get_active`].
    pub fn has_active<R: CollectionRepository>(&mut self, repo: &R) -> ServiceResult<bool> {
        Ok(self.get_active(repo)?.is_some())
    }

    /// Returns an owned copy of the active collection or `NoActiveCollection`.
    pub fn require_active<R: CollectionRepository>(
        &mut self,
        repo: &R,
    ) -> ServiceResult<Collection> {
        self.get_active(repo)?
            .cloned()
            .ok_or(ServiceError::NoActiveCollection)
    }

    /// Unsets every active flag in storage, then drops the cache.
    pub fn clear<R: CollectionRepository>(&mut self, repo: &R) -> ServiceResult<()> {
        storage("active_collection_clear", repo.clear_all_active())?;
        self.invalidate();
        Ok(())
    }

    /// Drops the cache; the next access re-queries storage.
    pub fn invalidate(&mut self) {
        self.state = CacheState::Unloaded;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, CacheState::Loaded(_))
    }
}
