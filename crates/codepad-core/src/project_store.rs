//! Project repository over a key-value store
//!
//! Every project lives in one JSON array under a single root key. Each
//! mutation reads the whole collection, edits it in memory and writes it back
//! as one value, so a failed write leaves the previous collection intact.

use crate::config::DEFAULT_PROJECTS_KEY;
use crate::error::{CodepadError, Result};
use crate::ports::KeyValueStore;
use codepad_types::{new_id, Project};
use tracing::{debug, warn};

pub struct ProjectStore<S> {
    store: S,
    root_key: String,
    default_name: String,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            root_key: DEFAULT_PROJECTS_KEY.to_string(),
            default_name: crate::config::DEFAULT_PROJECT_NAME.to_string(),
        }
    }

    /// Use a different root key for the collection
    pub fn with_root_key(mut self, key: impl Into<String>) -> Self {
        self.root_key = key.into();
        self
    }

    /// Name given to projects made by [`ProjectStore::create`]
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    /// The underlying key-value store
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// All projects in storage order.
    ///
    /// A missing or unparseable root value reads as an empty collection. The
    /// stored value is not touched.
    pub fn list(&self) -> Result<Vec<Project>> {
        let Some(raw) = self.store.get(&self.root_key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Project>>(&raw) {
            Ok(projects) => Ok(projects),
            Err(e) => {
                warn!(key = %self.root_key, "Failed to parse saved projects: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn load(&self, project_id: &str) -> Result<Project> {
        self.list()?
            .into_iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| CodepadError::ProjectNotFound(project_id.to_string()))
    }

    /// Replace any entry with the same id and append `project` at the end
    pub fn save(&self, project: &Project) -> Result<()> {
        let mut projects = self.list()?;
        projects.retain(|p| p.id != project.id);
        projects.push(project.clone());
        self.write(&projects)?;
        debug!(id = %project.id, "Saved project");
        Ok(())
    }

    pub fn create(&self) -> Result<Project> {
        let project = Project::new(new_id(), self.default_name.clone());
        self.save(&project)?;
        debug!(id = %project.id, "Created project");
        Ok(project)
    }

    /// Deep copy of `project` under a new id
    pub fn duplicate(&self, project: &Project) -> Result<Project> {
        let mut copy = project.clone();
        copy.id = new_id();
        copy.name = format!("{} (Copy)", project.name);
        copy.touch();
        self.save(&copy)?;
        debug!(from = %project.id, to = %copy.id, "Duplicated project");
        Ok(copy)
    }

    pub fn rename(&self, project_id: &str, name: &str) -> Result<Project> {
        let mut project = self.load(project_id)?;
        project.name = name.to_string();
        project.touch();
        self.save(&project)?;
        Ok(project)
    }

    /// Remove a project. Unknown ids are a no-op and write nothing.
    pub fn delete(&self, project_id: &str) -> Result<()> {
        let mut projects = self.list()?;
        let before = projects.len();
        projects.retain(|p| p.id != project_id);
        if projects.len() == before {
            return Ok(());
        }
        self.write(&projects)?;
        debug!(id = %project_id, "Deleted project");
        Ok(())
    }

    fn write(&self, projects: &[Project]) -> Result<()> {
        let raw = serde_json::to_string(projects)?;
        self.store.set(&self.root_key, &raw)
    }
}
