//! Open projects and their background indexing

use dashmap::DashMap;
use ignore::WalkBuilder;
use relay_foundation::paths::{display_path, file_extension};
use relay_foundation::{RelayError, RelayResult};
use relay_handler_api::{ProjectHandle, ProjectIndex};
use relay_plugin_api::SupportedLanguage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// State kept for one open project
#[derive(Debug, Clone)]
struct ProjectEntry {
    handle: ProjectHandle,
    indexing: Arc<AtomicBool>,
    indexed_files: Arc<AtomicUsize>,
}

/// Manages the collection of open projects in a thread-safe manner.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceManager {
    // Keyed by project name
    projects: Arc<DashMap<String, ProjectEntry>>,
}

impl WorkspaceManager {
    /// Creates a new, empty `WorkspaceManager`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a project and starts indexing it in the background.
    ///
    /// Re-opening a name replaces the previous registration.
    pub fn open(&self, name: &str, root: &Path) -> RelayResult<ProjectHandle> {
        let handle = self.register(name, root)?;
        self.start_indexing(name);
        Ok(handle)
    }

    /// Registers a project and waits for its first index to complete
    pub async fn open_indexed(&self, name: &str, root: &Path) -> RelayResult<ProjectHandle> {
        let handle = self.register(name, root)?;
        if let Some(task) = self.start_indexing(name) {
            if let Err(e) = task.await {
                warn!(project = %name, error = %e, "Indexing task failed");
            }
        }
        Ok(handle)
    }

    fn register(&self, name: &str, root: &Path) -> RelayResult<ProjectHandle> {
        let root = root.canonicalize().map_err(|_| {
            RelayError::resource_not_found(
                "project",
                format!("Project root does not exist: {}", display_path(root)),
            )
        })?;
        if !root.is_dir() {
            return Err(RelayError::invalid_field(
                "path",
                format!("Project root is not a directory: {}", display_path(&root)),
            ));
        }

        let handle = ProjectHandle::new(name, root);
        self.projects.insert(
            name.to_string(),
            ProjectEntry {
                handle: handle.clone(),
                indexing: Arc::new(AtomicBool::new(false)),
                indexed_files: Arc::new(AtomicUsize::new(0)),
            },
        );
        info!(project = %name, root = %display_path(&handle.root), "Project opened");
        Ok(handle)
    }

    /// Marks a project disposed and forgets it
    pub fn close(&self, name: &str) -> Option<ProjectHandle> {
        let (_, entry) = self.projects.remove(name)?;
        let mut handle = entry.handle;
        handle.disposed = true;
        info!(project = %name, "Project closed");
        Some(handle)
    }

    /// Re-index a project.
    ///
    /// Inside a tokio runtime the walk runs on the blocking pool and the task
    /// handle is returned; outside one it runs inline.
    pub fn start_indexing(&self, name: &str) -> Option<JoinHandle<()>> {
        let entry = self.projects.get(name)?.clone();
        entry.indexing.store(true, Ordering::SeqCst);

        let project = name.to_string();
        let index = move || {
            let files = collect_source_files(&entry.handle.root);
            entry.indexed_files.store(files.len(), Ordering::SeqCst);
            entry.indexing.store(false, Ordering::SeqCst);
            info!(project = %project, files = files.len(), "Indexing complete");
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => Some(runtime.spawn_blocking(index)),
            Err(_) => {
                index();
                None
            }
        }
    }

    /// Number of source files found by the last completed index
    pub fn indexed_files(&self, name: &str) -> Option<usize> {
        self.projects
            .get(name)
            .map(|entry| entry.indexed_files.load(Ordering::SeqCst))
    }

    fn live_projects(&self) -> Vec<ProjectHandle> {
        self.projects
            .iter()
            .map(|entry| entry.value().handle.clone())
            .filter(|handle| !handle.disposed)
            .collect()
    }
}

/// Every source file under a root, honouring ignore files
///
/// Files whose extension maps to no supported language are skipped.
pub fn collect_source_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| {
            let display = display_path(path);
            SupportedLanguage::detect(None, file_extension(&display)) != SupportedLanguage::Unknown
        })
        .collect();
    files.sort();
    files
}

impl ProjectIndex for WorkspaceManager {
    fn open_projects(&self) -> Vec<ProjectHandle> {
        let mut projects: Vec<ProjectHandle> =
            self.projects.iter().map(|entry| entry.value().handle.clone()).collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        projects
    }

    fn resolve_project(&self, file: &Path, hint: Option<&str>) -> RelayResult<ProjectHandle> {
        let shown = display_path(file);
        let contains = |project: &ProjectHandle| -> bool {
            if file.is_absolute() {
                let canonical = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
                canonical.starts_with(&project.root) || file.starts_with(&project.root)
            } else {
                project.root.join(file).exists()
            }
        };

        let mut candidates: Vec<ProjectHandle> =
            self.live_projects().into_iter().filter(|p| contains(p)).collect();

        if let Some(hint) = hint {
            candidates.retain(|p| p.name.eq_ignore_ascii_case(hint));
            return match candidates.len() {
                0 => Err(RelayError::project_not_found(&shown, Some(hint))),
                _ => Ok(candidates.remove(0)),
            };
        }

        match candidates.len() {
            0 => Err(RelayError::project_not_found(&shown, None)),
            1 => Ok(candidates.remove(0)),
            _ => {
                candidates.sort_by_key(|p| p.root.components().count());
                let deepest = candidates[candidates.len() - 1].clone();
                let nested = candidates.iter().all(|p| deepest.root.starts_with(&p.root));
                if nested {
                    debug!(file = %shown, project = %deepest.name, "Nested roots, deepest wins");
                    Ok(deepest)
                } else {
                    let mut names: Vec<String> = candidates.into_iter().map(|p| p.name).collect();
                    names.sort();
                    Err(RelayError::ambiguous_project(&shown, &names))
                }
            }
        }
    }

    fn is_indexing(&self, project: &str) -> bool {
        self.projects
            .get(project)
            .is_some_and(|entry| entry.indexing.load(Ordering::SeqCst))
    }
}
