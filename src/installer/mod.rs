//! Turning resolved components and themes into planned file operations
//!
//! The installer fetches every file a command needs from the registry,
//! rewrites imports for the project, and decides per file whether it is
//! created, updated, skipped or already up to date. All fetches finish
//! (or one fails) before anything is planned, so a network error never
//! leaves a half-installed component behind.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{ComponentryError, Result, theme_not_found};
use crate::fileops::FileOperation;
use crate::manifest::ComponentDescriptor;
use crate::progress::FetchProgress;
use crate::project::Project;
use crate::project::alias::rewrite_imports;
use crate::registry::{RegistrySource, validate_theme_name};
use crate::resolver::{Resolution, Resolver};

pub mod package_manager;
pub mod theme;


pub use package_manager::PackageManager;

/// What happens to one destination file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Create,
    Update,
    /// Exists with different content and overwriting was not requested
    Skip,
    /// Exists with identical content
    Unchanged,
}

impl FileAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Skip => "skip",
            Self::Unchanged => "unchanged",
        }
    }

    /// Whether this action writes to disk
    pub fn writes(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A destination file with its final content
#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub target: PathBuf,
    pub content: String,
    pub action: FileAction,
}

impl PlannedFile {
    fn operation(&self) -> Option<FileOperation> {
        match self.action {
            FileAction::Create => Some(FileOperation::create(&self.target, &self.content)),
            FileAction::Update => Some(FileOperation::update(&self.target, &self.content)),
            FileAction::Skip | FileAction::Unchanged => None,
        }
    }
}

/// Everything one command intends to write
#[derive(Debug, Clone, Default)]
pub struct InstallPlan {
    pub files: Vec<PlannedFile>,
    /// Components in install order
    pub components: Vec<String>,
    /// npm packages the components need
    pub external_dependencies: Vec<String>,
}

impl InstallPlan {
    /// File operations for every file that needs writing, in plan order
    pub fn operations(&self) -> Vec<FileOperation> {
        self.files.iter().filter_map(PlannedFile::operation).collect()
    }

    pub fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|f| f.action == action).count()
    }

    pub fn has_changes(&self) -> bool {
        self.files.iter().any(|f| f.action.writes())
    }

    pub fn extend(&mut self, other: InstallPlan) {
        self.files.extend(other.files);
        self.components.extend(other.components);
        self.external_dependencies
            .extend(other.external_dependencies);
    }
}

/// What to fetch for one destination file
enum FetchJob<'m> {
    Component(&'m ComponentDescriptor),
    Utility(String),
}

impl FetchJob<'_> {
    fn label(&self) -> &str {
        match self {
            Self::Component(descriptor) => &descriptor.name,
            Self::Utility(path) => path,
        }
    }
}

/// Fetched content bound to its destination
struct FetchedFile {
    target: PathBuf,
    content: String,
}

/// Plans installs for one project against one registry
pub struct Installer<'a> {
    project: &'a Project,
    registry: &'a dyn RegistrySource,
    overwrite: bool,
    show_progress: bool,
}

impl<'a> Installer<'a> {
    pub fn new(project: &'a Project, registry: &'a dyn RegistrySource) -> Self {
        Self {
            project,
            registry,
            overwrite: false,
            show_progress: false,
        }
    }

    /// Replace existing files whose content differs
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Draw a progress bar while fetching
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Plan every file of `resolution`: components in order, then utility files
    pub fn plan_components(
        &self,
        resolver: &Resolver,
        resolution: &Resolution,
    ) -> Result<InstallPlan> {
        let names = resolution.names();

        let mut jobs = Vec::with_capacity(names.len());
        for name in names {
            jobs.push(FetchJob::Component(resolver.component(name)?));
        }
        for path in resolver.utility_files(names)? {
            jobs.push(FetchJob::Utility(path));
        }

        let fetched = self.merge_shared_targets(self.fetch_all(&jobs)?)?;
        let files = fetched.into_iter().map(|f| self.classify(f)).collect();

        Ok(InstallPlan {
            files,
            components: names.to_vec(),
            external_dependencies: resolver.external_dependencies(names)?,
        })
    }

    /// Plan a theme file plus the regenerated theme index
    ///
    /// Fails with `ThemeNotFound` when the registry doesn't list `theme`.
    pub fn plan_theme(&self, theme: &str) -> Result<InstallPlan> {
        validate_theme_name(theme)?;
        let framework = self.project.framework();

        let available = self.registry.list_available_themes(framework)?;
        if !available.iter().any(|t| t == theme) {
            return Err(theme_not_found(theme, &available));
        }

        let source = self.registry.fetch_theme_source(framework, theme)?;
        let target = self.project.theme_destination(theme);
        let theme_file = self.classify(FetchedFile {
            content: self.rewrite(&source, &target),
            target,
        });

        // Other modules may live next to the themes; only registry themes are indexed
        let mut themes: Vec<String> = theme::installed_themes(&self.project.theme_dir())
            .into_iter()
            .filter(|installed| available.contains(installed))
            .collect();
        if !themes.iter().any(|t| t == theme) {
            themes.push(theme.to_string());
            themes.sort();
        }
        let index = generated(
            self.project.theme_index_path(),
            theme::render_theme_index(&themes),
        );

        Ok(InstallPlan {
            files: vec![theme_file, index],
            ..Default::default()
        })
    }

    /// Fetch every job concurrently; the first failure fails the whole set
    fn fetch_all(&self, jobs: &[FetchJob<'_>]) -> Result<Vec<FetchedFile>> {
        let framework = self.project.framework();
        let progress = if self.show_progress {
            FetchProgress::new(jobs.len() as u64)
        } else {
            FetchProgress::hidden()
        };

        let fetched: Result<Vec<FetchedFile>> = jobs
            .par_iter()
            .map(|job| -> Result<FetchedFile> {
                let (target, source) = match job {
                    FetchJob::Component(descriptor) => (
                        self.project.destination_for(descriptor),
                        self.registry.fetch_component_source(framework, descriptor)?,
                    ),
                    FetchJob::Utility(path) => (
                        self.project.utility_destination(path),
                        self.registry.fetch_utility_file(framework, path)?,
                    ),
                };
                progress.file_done(job.label());
                debug!(file = job.label(), "fetched");
                Ok(FetchedFile {
                    content: self.rewrite(&source, &target),
                    target,
                })
            })
            .collect();

        match &fetched {
            Ok(_) => progress.finish(),
            Err(_) => progress.abandon(),
        }
        fetched
    }

    /// Collapse files that land on the same path; their content must agree
    ///
    /// A `library-file` component and a utility file of the same name both
    /// install into the lib directory.
    fn merge_shared_targets(&self, fetched: Vec<FetchedFile>) -> Result<Vec<FetchedFile>> {
        let mut seen: HashMap<PathBuf, usize> = HashMap::new();
        let mut merged: Vec<FetchedFile> = Vec::with_capacity(fetched.len());

        for file in fetched {
            match seen.get(&file.target) {
                Some(&index) if merged[index].content == file.content => {
                    debug!(path = %file.target.display(), "duplicate target with identical content");
                }
                Some(_) => {
                    return Err(ComponentryError::ManifestInvalid {
                        reason: format!(
                            "two registry files with different content install to {}",
                            self.project.relative(&file.target).display()
                        ),
                    });
                }
                None => {
                    seen.insert(file.target.clone(), merged.len());
                    merged.push(file);
                }
            }
        }

        Ok(merged)
    }

    fn rewrite(&self, source: &str, target: &Path) -> String {
        rewrite_imports(source, self.project.config(), self.project.relative(target))
    }

    /// Decide the action for a fetched file against what is on disk
    fn classify(&self, file: FetchedFile) -> PlannedFile {
        let action = if !file.target.exists() {
            FileAction::Create
        } else if std::fs::read(&file.target).is_ok_and(|bytes| bytes == file.content.as_bytes()) {
            FileAction::Unchanged
        } else if self.overwrite {
            FileAction::Update
        } else {
            debug!(path = %file.target.display(), "exists, skipping");
            FileAction::Skip
        };

        PlannedFile {
            target: file.target,
            content: file.content,
            action,
        }
    }
}

/// Generated files are always brought up to date
fn generated(target: PathBuf, content: String) -> PlannedFile {
    let action = match std::fs::read(&target) {
        Ok(bytes) if bytes == content.as_bytes() => FileAction::Unchanged,
        Ok(_) => FileAction::Update,
        Err(_) => FileAction::Create,
    };
    PlannedFile {
        target,
        content,
        action,
    }
}

/// Plan for the project config file itself
pub fn plan_config(project: &Project) -> Result<PlannedFile> {
    let content = project.config().to_json()?;
    Ok(generated(project.config_path(), content))
}
