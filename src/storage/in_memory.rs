//! In-memory implementation of RecordPersister for testing and development

use crate::core::{Record, RecordPersister};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory persister
///
/// Keeps the last persisted value of every record plus a count of writes.
/// Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryPersister<R: Record> {
    records: Arc<RwLock<HashMap<String, R>>>,
    writes: Arc<RwLock<usize>>,
}

impl<R: Record> InMemoryPersister<R> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            writes: Arc::new(RwLock::new(0)),
        }
    }

    /// Last persisted value for `id`
    pub fn get(&self, id: &str) -> Result<Option<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    /// Number of successful `persist` calls
    pub fn write_count(&self) -> Result<usize> {
        let writes = self
            .writes
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(*writes)
    }
}

impl<R: Record> Default for InMemoryPersister<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordPersister<R> for InMemoryPersister<R> {
    async fn persist(&self, record: R) -> Result<R> {
        {
            let mut records = self
                .records
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
            records.insert(record.id().to_string(), record.clone());
        }

        let mut writes = self
            .writes
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        *writes += 1;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Patient, PatientStatus};

    fn patient(id: &str) -> Patient {
        Patient::new(
            id,
            PatientStatus::Onboarding,
            "Ana Ruiz".to_string(),
            "ana@example.com".to_string(),
            None,
            None,
            None,
        )
    }

    #[tokio::test]
    async fn test_persist_stores_latest_value() {
        let persister = InMemoryPersister::new();

        persister.persist(patient("p-1")).await.unwrap();
        let active = Patient {
            status: PatientStatus::Active,
            ..patient("p-1")
        };
        persister.persist(active).await.unwrap();

        let stored = persister.get("p-1").unwrap().unwrap();
        assert_eq!(stored.status, PatientStatus::Active);
        assert_eq!(persister.write_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let persister: InMemoryPersister<Patient> = InMemoryPersister::new();
        assert!(persister.get("nobody").unwrap().is_none());
        assert_eq!(persister.write_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let persister = InMemoryPersister::new();
        let clone = persister.clone();
        clone.persist(patient("p-2")).await.unwrap();
        assert!(persister.get("p-2").unwrap().is_some());
    }
}
