//! In-process project store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::project::current_timestamp_ms;
use crate::store::sort_recent_first;
use crate::{
    NewProject, PersistError, PersistResult, ProjectId, ProjectPatch, ProjectRecord, ProjectStore,
    Session,
};

/// Thread-safe project map keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryProjectStore {
    projects: Arc<RwLock<HashMap<ProjectId, ProjectRecord>>>,
}

impl MemoryProjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of projects across all owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no projects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a record as-is, replacing any record with the same id.
    pub(crate) fn insert(&self, record: ProjectRecord) {
        self.projects
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(record.id, record);
    }

    /// Remove a record by id regardless of owner.
    pub(crate) fn remove(&self, id: ProjectId) -> Option<ProjectRecord> {
        self.projects
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&id)
    }

    /// Build a new record for the session's user without storing it.
    pub(crate) fn new_record(session: &Session, project: NewProject) -> PersistResult<ProjectRecord> {
        let owner = session.require_user()?;
        project.validate()?;
        Ok(ProjectRecord::create(owner, project, current_timestamp_ms()))
    }

    /// The owned record with `patch` applied, without storing it.
    pub(crate) fn patched_record(
        &self,
        session: &Session,
        id: ProjectId,
        patch: &ProjectPatch,
    ) -> PersistResult<ProjectRecord> {
        patch.validate()?;
        let mut record = self.get_record(session, id)?;
        let now = current_timestamp_ms().max(record.updated_at);
        patch.apply_to(&mut record, now);
        Ok(record)
    }

    pub(crate) fn create_record(
        &self,
        session: &Session,
        project: NewProject,
    ) -> PersistResult<ProjectRecord> {
        let record = Self::new_record(session, project)?;
        self.insert(record.clone());
        tracing::info!("Created project {} for {}", record.id, record.owner);
        Ok(record)
    }

    pub(crate) fn update_record(
        &self,
        session: &Session,
        id: ProjectId,
        patch: &ProjectPatch,
    ) -> PersistResult<ProjectRecord> {
        let owner = session.require_user()?;
        patch.validate()?;
        let mut projects = self
            .projects
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let record = projects
            .get_mut(&id)
            .filter(|record| record.owner == owner)
            .ok_or_else(|| PersistError::NotFound(id.to_string()))?;
        let now = current_timestamp_ms().max(record.updated_at);
        patch.apply_to(record, now);
        tracing::info!("Updated project {id}");
        Ok(record.clone())
    }

    pub(crate) fn get_record(&self, session: &Session, id: ProjectId) -> PersistResult<ProjectRecord> {
        let owner = session.require_user()?;
        self.projects
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&id)
            .filter(|record| record.owner == owner)
            .cloned()
            .ok_or_else(|| PersistError::NotFound(id.to_string()))
    }

    pub(crate) fn list_records(&self, session: &Session) -> PersistResult<Vec<ProjectRecord>> {
        let owner = session.require_user()?;
        let mut records: Vec<ProjectRecord> = self
            .projects
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .values()
            .filter(|record| record.owner == owner)
            .cloned()
            .collect();
        sort_recent_first(&mut records);
        Ok(records)
    }

    pub(crate) fn delete_record(&self, session: &Session, id: ProjectId) -> PersistResult<()> {
        let owner = session.require_user()?;
        let mut projects = self
            .projects
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if !projects.get(&id).is_some_and(|record| record.owner == owner) {
            return Err(PersistError::NotFound(id.to_string()));
        }
        projects.remove(&id);
        tracing::info!("Deleted project {id}");
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn create(&self, session: &Session, project: NewProject) -> PersistResult<ProjectRecord> {
        self.create_record(session, project)
    }

    async fn update(
        &self,
        session: &Session,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> PersistResult<ProjectRecord> {
        self.update_record(session, id, &patch)
    }

    async fn get(&self, session: &Session, id: ProjectId) -> PersistResult<ProjectRecord> {
        self.get_record(session, id)
    }

    async fn list(&self, session: &Session) -> PersistResult<Vec<ProjectRecord>> {
        self.list_records(session)
    }

    async fn delete(&self, session: &Session, id: ProjectId) -> PersistResult<()> {
        self.delete_record(session, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Session {
        Session::new("ada")
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemoryProjectStore::new();
        let created = store
            .create(&ada(), NewProject::new("Bakery", "Food"))
            .await
            .expect("create");

        let fetched = store.get(&ada(), created.id).await.expect("get");
        assert_eq!(fetched, created);
        assert_eq!(fetched.owner, "ada");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn other_users_cannot_see_projects() {
        let store = MemoryProjectStore::new();
        let created = store
            .create(&ada(), NewProject::new("Bakery", "Food"))
            .await
            .expect("create");
        let grace = Session::new("grace");

        assert!(matches!(
            store.get(&grace, created.id).await,
            Err(PersistError::NotFound(_))
        ));
        assert!(store.list(&grace).await.expect("list").is_empty());
        assert!(store.delete(&grace, created.id).await.is_err());
        assert!(store
            .update(
                &grace,
                created.id,
                ProjectPatch {
                    name: Some("Mine".into()),
                    ..ProjectPatch::default()
                }
            )
            .await
            .is_err());
    }

    #[tokio::test]
    async fn update_merges_and_bumps_timestamp() {
        let store = MemoryProjectStore::new();
        let created = store
            .create(&ada(), NewProject::new("Bakery", "Food"))
            .await
            .expect("create");

        let updated = store
            .update(
                &ada(),
                created.id,
                ProjectPatch {
                    html_code: Some("<h1>Bread</h1>".into()),
                    ..ProjectPatch::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.name, "Bakery");
        assert_eq!(updated.html_code, "<h1>Bread</h1>");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn delete_removes_project() {
        let store = MemoryProjectStore::new();
        let created = store
            .create(&ada(), NewProject::new("Bakery", "Food"))
            .await
            .expect("create");

        store.delete(&ada(), created.id).await.expect("delete");
        assert!(store.is_empty());
        assert!(matches!(
            store.delete(&ada(), created.id).await,
            Err(PersistError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn blank_session_is_unauthorized() {
        let store = MemoryProjectStore::new();
        let result = store
            .create(&Session::new(""), NewProject::new("Bakery", "Food"))
            .await;
        assert!(matches!(result, Err(PersistError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn invalid_project_is_not_stored() {
        let store = MemoryProjectStore::new();
        let result = store.create(&ada(), NewProject::new("", "Food")).await;
        assert!(matches!(result, Err(PersistError::Validation(_))));
        assert!(store.is_empty());
    }
}
