//! Project-level locking
//!
//! Read handlers share a project's lock; mutating handlers hold it exclusively
//! until their changes are committed.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Manages one read/write lock per open project
pub struct ProjectLocks {
    locks: Arc<RwLock<HashMap<String, Arc<RwLock<()>>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get or create the lock for a project
    async fn get_lock(&self, project: &str) -> Arc<RwLock<()>> {
        let mut locks = self.locks.write().await;
        locks
            .entry(project.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Shared access for queries
    pub async fn read(&self, project: &str) -> OwnedRwLockReadGuard<()> {
        self.get_lock(project).await.read_owned().await
    }

    /// Exclusive access for mutations
    pub async fn write(&self, project: &str) -> OwnedRwLockWriteGuard<()> {
        self.get_lock(project).await.write_owned().await
    }
}

impl Default for ProjectLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_readers_share() {
        let locks = ProjectLocks::new();
        let _first = locks.read("demo").await;
        let _second = locks.read("demo").await;
        assert!(locks.get_lock("demo").await.try_write().is_err());
        assert!(locks.get_lock("demo").await.try_read().is_ok());
    }

    #[tokio::test]
    async fn test_writer_excludes_readers() {
        let locks = Arc::new(ProjectLocks::new());
        let guard = locks.write("demo").await;
        assert!(locks.get_lock("demo").await.try_read().is_err());

        let reader = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.read("demo").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!reader.is_finished());

        drop(guard);
        reader.await.unwrap();
    }

    #[tokio::test]
    async fn test_projects_lock_independently() {
        let locks = ProjectLocks::new();
        let _guard = locks.write("a").await;
        assert!(locks.get_lock("b").await.try_read().is_ok());
        let _other = locks.write("b").await;
        assert!(locks.get_lock("a").await.try_read().is_err());
    }
}
