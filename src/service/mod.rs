//! Block Application Service
//!
//! An asynchronous façade over a [`BlockRepository`]. The service assigns
//! identities, fills defaults, validates input, and turns partial updates
//! into read-modify-write cycles against the repository.
//!
//! A missing id is an ordinary outcome: lookups return `None` and updates
//! return `false`. Errors are reserved for malformed input and repository
//! failures. Writes are last-write-wins; nothing here locks or versions.

pub mod repository;

use std::sync::Arc;

use crate::core::block::{new_block_id, Position, Props, Size};
use crate::core::entity::{BlockDraft, BlockEntity};

use self::repository::{BlockRepository, RepositoryError};

/// Async CRUD service for block entities
#[derive(Clone)]
pub struct BlockService {
    repository: Arc<dyn BlockRepository>,
}

impl BlockService {
    pub fn new(repository: Arc<dyn BlockRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn BlockRepository> {
        &self.repository
    }

    /// Create and persist a new entity with a fresh id
    ///
    /// Omitted settings and props default to empty mappings; metadata is
    /// stamped with the current time and version 1.
    ///
    /// # Returns
    /// * `Err(ServiceError::InvalidInput)` if the draft has no type
    pub async fn create_block(&self, draft: BlockDraft) -> Result<BlockEntity, ServiceError> {
        if draft.block_type.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Block type cannot be empty".into(),
            ));
        }

        let block = draft.into_entity(new_block_id());
        self.repository.save(&block).await?;
        tracing::debug!(block_id = %block.id(), block_type = %block.block_type(), "created block");
        Ok(block)
    }

    pub async fn get_block(&self, id: &str) -> Result<Option<BlockEntity>, ServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Every stored entity in repository order
    pub async fn get_all_blocks(&self) -> Result<Vec<BlockEntity>, ServiceError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get_blocks_by_type(&self, block_type: &str) -> Result<Vec<BlockEntity>, ServiceError> {
        let blocks = self.repository.find_all().await?;
        Ok(blocks
            .into_iter()
            .filter(|b| b.block_type() == block_type)
            .collect())
    }

    /// Merge `partial` into the block's settings
    pub async fn update_block_settings(&self, id: &str, partial: Props) -> Result<bool, ServiceError> {
        self.modify(id, move |block| block.update_settings(partial)).await
    }

    /// Merge `partial` into the block's props
    pub async fn update_block_props(&self, id: &str, partial: Props) -> Result<bool, ServiceError> {
        self.modify(id, move |block| block.update_props(partial)).await
    }

    pub async fn move_block(&self, id: &str, position: Position) -> Result<bool, ServiceError> {
        self.modify(id, move |block| block.move_to(position)).await
    }

    pub async fn resize_block(&self, id: &str, size: Size) -> Result<bool, ServiceError> {
        self.modify(id, move |block| block.resize(size)).await
    }

    pub async fn set_block_locked(&self, id: &str, locked: bool) -> Result<bool, ServiceError> {
        self.modify(id, move |block| block.set_locked(locked)).await
    }

    pub async fn set_block_visible(&self, id: &str, visible: bool) -> Result<bool, ServiceError> {
        self.modify(id, move |block| block.set_visible(visible)).await
    }

    /// Remove a block; `false` if it did not exist
    pub async fn delete_block(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            tracing::debug!(block_id = %id, "deleted block");
        }
        Ok(deleted)
    }

    /// Persist a copy of a block under a fresh id
    pub async fn duplicate_block(&self, id: &str) -> Result<Option<BlockEntity>, ServiceError> {
        let Some(source) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        let copy = source.clone_with_id(new_block_id());
        self.repository.save(&copy).await?;
        tracing::debug!(source_id = %id, block_id = %copy.id(), "duplicated block");
        Ok(Some(copy))
    }

    async fn modify<F>(&self, id: &str, apply: F) -> Result<bool, ServiceError>
    where
        F: FnOnce(&mut BlockEntity) + Send,
    {
        let Some(mut block) = self.repository.find_by_id(id).await? else {
            return Ok(false);
        };

        apply(&mut block);
        self.repository.save(&block).await?;
        tracing::debug!(block_id = %id, "updated block");
        Ok(true)
    }
}

impl std::fmt::Debug for BlockService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockService").finish_non_exhaustive()
    }
}

/// Service errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// Caller passed malformed data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
