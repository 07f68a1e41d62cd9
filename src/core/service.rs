//! Service traits for pushing record changes to a backend

use crate::core::error::CollectionError;
use crate::core::record::Record;
use anyhow::Result;
use async_trait::async_trait;

/// Persistence collaborator called on the write path
///
/// The collection validates a change locally first and only then hands the
/// new record value to the persister. What the persister returns becomes the
/// stored value, so a backend may normalise fields (e.g. server-side
/// timestamps), but it must keep the id and the requested status.
/// Retry policy, if any, lives in the implementation.
#[async_trait]
pub trait RecordPersister<R: Record>: Send + Sync {
    async fn persist(&self, record: R) -> Result<R>;
}

/// Persist an already validated `candidate` and check the backend's answer
///
/// Fails with [`CollectionError::Persistence`] when the persister errors or
/// returns a record whose id or status differs from the candidate's.
pub async fn persist_checked<R: Record>(
    persister: &dyn RecordPersister<R>,
    candidate: R,
) -> Result<R, CollectionError> {
    let id = candidate.id().to_string();
    let status = candidate.status();

    let persisted = persister
        .persist(candidate)
        .await
        .map_err(|e| persistence_error::<R>(&id, e.to_string()))?;

    if persisted.id() != id {
        return Err(persistence_error::<R>(
            &id,
            format!("persister returned id '{}'", persisted.id()),
        ));
    }
    if persisted.status() != status {
        return Err(persistence_error::<R>(
            &id,
            format!("persister returned status '{}' instead of '{status}'", persisted.status()),
        ));
    }

    Ok(persisted)
}

fn persistence_error<R: Record>(id: &str, message: String) -> CollectionError {
    tracing::warn!(resource = R::resource_name(), id, error = %message, "persister rejected status change");
    CollectionError::Persistence {
        resource: R::resource_name().to_string(),
        id: id.to_string(),
        message,
    }
}
