//! Project store backed by a directory of JSON files.
//!
//! Each project lives in `<data_dir>/<id>.json`. The directory is read once
//! when the store is opened; every mutation writes the file first and only
//! then updates the in-memory view, so a failed write leaves both unchanged.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::memory::MemoryProjectStore;
use crate::{
    NewProject, PersistResult, ProjectId, ProjectPatch, ProjectRecord, ProjectStore, Session,
};

/// Directory-backed project store.
#[derive(Debug, Clone)]
pub struct FileProjectStore {
    data_dir: PathBuf,
    cache: MemoryProjectStore,
}

impl FileProjectStore {
    /// Open (creating if needed) a data directory and load its projects.
    ///
    /// Files that cannot be parsed are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or listed.
    pub async fn open(data_dir: impl Into<PathBuf>) -> PersistResult<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await?;
        let cache = MemoryProjectStore::new();

        let mut entries = tokio::fs::read_dir(&data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match load_record(&path).await {
                Ok(record) => cache.insert(record),
                Err(e) => tracing::warn!("Skipping unreadable project file {}: {e}", path.display()),
            }
        }
        tracing::debug!(
            "Opened project directory {} with {} projects",
            data_dir.display(),
            cache.len()
        );
        Ok(Self { data_dir, cache })
    }

    /// Directory holding the project files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, id: ProjectId) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", sanitize_filename(&id.to_string())))
    }

    async fn persist(&self, record: &ProjectRecord) -> PersistResult<()> {
        let json = serde_json::to_string_pretty(record)?;
        let path = self.path_for(record.id);
        tokio::fs::write(&path, json).await?;
        tracing::debug!("Wrote project {} to {}", record.id, path.display());
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for FileProjectStore {
    async fn create(&self, session: &Session, project: NewProject) -> PersistResult<ProjectRecord> {
        let record = MemoryProjectStore::new_record(session, project)?;
        self.persist(&record).await?;
        self.cache.insert(record.clone());
        tracing::info!("Created project {} for {}", record.id, record.owner);
        Ok(record)
    }

    async fn update(
        &self,
        session: &Session,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> PersistResult<ProjectRecord> {
        let record = self.cache.patched_record(session, id, &patch)?;
        self.persist(&record).await?;
        self.cache.insert(record.clone());
        tracing::info!("Updated project {id}");
        Ok(record)
    }

    async fn get(&self, session: &Session, id: ProjectId) -> PersistResult<ProjectRecord> {
        self.cache.get_record(session, id)
    }

    async fn list(&self, session: &Session) -> PersistResult<Vec<ProjectRecord>> {
        self.cache.list_records(session)
    }

    async fn delete(&self, session: &Session, id: ProjectId) -> PersistResult<()> {
        self.cache.get_record(session, id)?;
        let path = self.path_for(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Project file {} was already gone", path.display());
            }
            Err(e) => return Err(e.into()),
        }
        self.cache.remove(id);
        tracing::info!("Deleted project {id}");
        Ok(())
    }
}

async fn load_record(path: &Path) -> PersistResult<ProjectRecord> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

/// Replace any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
