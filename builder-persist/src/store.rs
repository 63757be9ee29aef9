//! The project store interface shared by all backends.

use async_trait::async_trait;

use crate::{NewProject, PersistResult, ProjectId, ProjectPatch, ProjectRecord, Session};

/// Create, read, update and delete projects on behalf of a session.
///
/// Calls are not retried; failures are returned to the caller as-is.
/// A project owned by another user is reported as not found.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Store a new project owned by the session's user.
    ///
    /// # Errors
    ///
    /// Returns an error on validation failure, missing credentials or backend failure.
    async fn create(&self, session: &Session, project: NewProject) -> PersistResult<ProjectRecord>;

    /// Merge `patch` into an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PersistError::NotFound`] if the project is not visible
    /// to the session.
    async fn update(
        &self,
        session: &Session,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> PersistResult<ProjectRecord>;

    /// Fetch one project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PersistError::NotFound`] if the project is not visible
    /// to the session.
    async fn get(&self, session: &Session, id: ProjectId) -> PersistResult<ProjectRecord>;

    /// All projects owned by the session's user, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns an error on missing credentials or backend failure.
    async fn list(&self, session: &Session) -> PersistResult<Vec<ProjectRecord>>;

    /// Delete one project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PersistError::NotFound`] if the project is not visible
    /// to the session.
    async fn delete(&self, session: &Session, id: ProjectId) -> PersistResult<()>;
}

/// Sort most recently updated first, ties by name.
pub(crate) fn sort_recent_first(records: &mut [ProjectRecord]) {
    records.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.name.cmp(&b.name))
    });
}
