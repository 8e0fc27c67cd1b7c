//! Block repositories
//!
//! The storage abstraction consumed by [`BlockService`](super::BlockService).
//! Implementations can sit on memory, a database, or a remote service; the
//! in-memory one here keeps insertion order and overwrites on duplicate ids.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::entity::BlockEntity;

/// Storage for block entities
#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// Insert or overwrite the entity with the same id
    async fn save(&self, block: &BlockEntity) -> Result<(), RepositoryError>;

    /// Look up one entity
    async fn find_by_id(&self, id: &str) -> Result<Option<BlockEntity>, RepositoryError>;

    /// Every stored entity, in repository-defined order
    async fn find_all(&self) -> Result<Vec<BlockEntity>, RepositoryError>;

    /// Remove an entity; returns whether one was stored under `id`
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}

/// Repository failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    /// The backing store could not be reached
    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    /// The backing store failed the operation
    #[error("Repository backend error: {0}")]
    Backend(String),
}

/// Repository kept entirely in memory
///
/// Entities are returned in the order they were first saved; saving an
/// existing id replaces it in place.
#[derive(Debug, Default)]
pub struct InMemoryBlockRepository {
    blocks: RwLock<Vec<BlockEntity>>,
}

impl InMemoryBlockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }
}

#[async_trait]
impl BlockRepository for InMemoryBlockRepository {
    async fn save(&self, block: &BlockEntity) -> Result<(), RepositoryError> {
        let mut blocks = self.blocks.write();
        match blocks.iter_mut().find(|b| b.id() == block.id()) {
            Some(existing) => *existing = block.clone(),
            None => blocks.push(block.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlockEntity>, RepositoryError> {
        Ok(self.blocks.read().iter().find(|b| b.id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<BlockEntity>, RepositoryError> {
        Ok(self.blocks.read().clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut blocks = self.blocks.write();
        let before = blocks.len();
        blocks.retain(|b| b.id() != id);
        Ok(blocks.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preserves_insertion_order() {
        let repo = InMemoryBlockRepository::new();
        for id in ["c", "a", "b"] {
            repo.save(&BlockEntity::new(id, "text")).await.unwrap();
        }

        let ids: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|b| b.id().to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_save_overwrites_in_place() {
        let repo = InMemoryBlockRepository::new();
        repo.save(&BlockEntity::new("a", "text")).await.unwrap();
        repo.save(&BlockEntity::new("b", "text")).await.unwrap();
        repo.save(&BlockEntity::new("a", "text").with_name("renamed"))
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), "a");
        assert_eq!(all[0].name(), "renamed");
    }

    #[tokio::test]
    async fn test_find_and_delete() {
        let repo = InMemoryBlockRepository::new();
        repo.save(&BlockEntity::new("a", "text")).await.unwrap();

        assert!(repo.find_by_id("a").await.unwrap().is_some());
        assert!(repo.find_by_id("missing").await.unwrap().is_none());

        assert!(repo.delete("a").await.unwrap());
        assert!(!repo.delete("a").await.unwrap());
        assert!(repo.is_empty());
    }
}
