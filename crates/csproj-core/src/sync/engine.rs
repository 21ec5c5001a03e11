//! SyncEngine implementation
//!
//! The SyncEngine applies file events to the manifests that own the affected
//! source files. Each event resolves its manifest(s) afresh, then runs a
//! load-mutate-save cycle under that manifest's lock.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use csproj_document::ManifestDocument;
use csproj_fs::relativize;
use tracing::{debug, info, warn};

use super::lock::ManifestLocks;
use super::report::{SyncAction, SyncReport};
use crate::config::SyncConfig;
use crate::event::FileEvent;
use crate::resolver::{AssemblyResolver, AssemblyScope, manifest_label};
use crate::{Error, Result};

/// Options for event handling
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, mutate manifests in memory only. The report carries a diff of
    /// what would have been written.
    pub dry_run: bool,
}

/// Engine for keeping manifests in step with the file tree
///
/// The engine is idle until [`start`](Self::start) is called and refuses
/// events after [`stop`](Self::stop). It is `Send + Sync`; events touching the
/// same manifest from several threads are applied one after another.
#[derive(Debug)]
pub struct SyncEngine {
    root: PathBuf,
    config: SyncConfig,
    options: SyncOptions,
    resolver: AssemblyResolver,
    locks: ManifestLocks,
    running: AtomicBool,
}

impl SyncEngine {
    /// Create a stopped engine for the workspace at `root`.
    pub fn new(root: impl Into<PathBuf>, config: SyncConfig, options: SyncOptions) -> Self {
        Self {
            root: root.into(),
            resolver: AssemblyResolver::new(config.clone()),
            config,
            options,
            locks: ManifestLocks::new(),
            running: AtomicBool::new(false),
        }
    }

    pub fn start(&self) {
        if !self.running.swap(true, Ordering::SeqCst) {
            info!(root = %self.root.display(), dry_run = self.options.dry_run, "sync engine started");
        }
    }

    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!(root = %self.root.display(), "sync engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Resolve the scope of `path` against the workspace root.
    pub fn resolve(&self, path: &Path) -> Result<AssemblyScope> {
        self.resolver.resolve(path, &self.root)
    }

    /// Apply one file event.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotRunning` unless the engine is started. Resolution,
    /// load and parse failures abandon the event before anything is written.
    /// Failures of either half of a cross-manifest rename are recorded in the
    /// report instead.
    pub fn handle(&self, event: &FileEvent) -> Result<SyncReport> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }
        debug!(%event, "handling file event");

        match event {
            FileEvent::Created { path } => self.on_created(path),
            FileEvent::Deleted { path } => self.on_deleted(path),
            FileEvent::Renamed { old_path, new_path } => self.on_renamed(old_path, new_path),
        }
    }

    fn on_created(&self, path: &Path) -> Result<SyncReport> {
        let entry = self.entry_path(path)?;
        let scope = self.resolve(path)?;
        let mut report = SyncReport::success(self.options.dry_run);

        self.with_manifest(&scope.manifest_path, &mut report, |doc, manifest| {
            Ok(vec![insert_action(doc, &entry, manifest)?])
        })?;
        Ok(report)
    }

    fn on_deleted(&self, path: &Path) -> Result<SyncReport> {
        let entry = self.entry_path(path)?;
        let scope = self.resolve(path)?;
        let mut report = SyncReport::success(self.options.dry_run);

        self.with_manifest(&scope.manifest_path, &mut report, |doc, manifest| {
            Ok(vec![remove_action(doc, &entry, manifest)?])
        })?;
        Ok(report)
    }

    fn on_renamed(&self, old_path: &Path, new_path: &Path) -> Result<SyncReport> {
        let old_entry = self.entry_path(old_path)?;
        let new_entry = self.entry_path(new_path)?;
        let mut report = SyncReport::success(self.options.dry_run);

        if old_entry == new_entry {
            debug!(entry = %old_entry, "rename does not change the entry path");
            return Ok(report);
        }

        // Both resolutions must succeed before any manifest is touched
        let old_scope = self.resolve(old_path)?;
        let new_scope = self.resolve(new_path)?;

        if old_scope.manifest_path == new_scope.manifest_path {
            let manifest_path = &old_scope.manifest_path;
            self.with_manifest(manifest_path, &mut report, |doc, manifest| {
                if doc.remove_compile(&old_entry)?.is_none() {
                    return Err(Error::EntryNotFound {
                        entry: old_entry.clone(),
                        manifest: manifest_path.clone(),
                    });
                }
                doc.insert_compile(&new_entry)?;
                Ok(vec![SyncAction::Renamed {
                    from: old_entry.clone(),
                    to: new_entry.clone(),
                    manifest: manifest.to_string(),
                }])
            })?;
            return Ok(report);
        }

        debug!(
            from = %old_scope.scope_name,
            to = %new_scope.scope_name,
            "rename crosses assemblies, splitting into remove and add"
        );

        // Independent halves: a failure in one does not undo the other
        let removed = self.with_manifest(&old_scope.manifest_path, &mut report, |doc, manifest| {
            Ok(vec![remove_action(doc, &old_entry, manifest)?])
        });
        if let Err(e) = removed {
            warn!(error = %e, manifest = %old_scope.manifest_name(), "remove half of rename failed");
            report.push_error(format!("{}: {e}", old_scope.manifest_name()));
        }

        let added = self.with_manifest(&new_scope.manifest_path, &mut report, |doc, manifest| {
            Ok(vec![insert_action(doc, &new_entry, manifest)?])
        });
        if let Err(e) = added {
            warn!(error = %e, manifest = %new_scope.manifest_name(), "add half of rename failed");
            report.push_error(format!("{}: {e}", new_scope.manifest_name()));
        }

        Ok(report)
    }

    /// Entry path of `path` as stored in manifests.
    fn entry_path(&self, path: &Path) -> Result<String> {
        relativize(&self.root, path, self.config.path_style).ok_or_else(|| {
            Error::OutsideWorkspace {
                path: path.to_path_buf(),
                root: self.root.clone(),
            }
        })
    }

    /// Run one load-mutate-save cycle on the manifest at `path`.
    ///
    /// Nothing is written if `mutate` fails or leaves the document unchanged.
    /// In dry-run mode the diff goes into the report instead of the file.
    fn with_manifest<F>(&self, path: &Path, report: &mut SyncReport, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut ManifestDocument, &str) -> Result<Vec<SyncAction>>,
    {
        let label = manifest_label(path);
        self.locks.with_lock(path, || {
            let mut doc = ManifestDocument::load(path)?;
            let actions = mutate(&mut doc, &label)?;

            if doc.is_modified() {
                if self.options.dry_run {
                    debug!(manifest = %label, "dry run, manifest not written");
                    report.previews.push(doc.diff_preview(&label));
                } else {
                    doc.save(path)?;
                }
            }

            for action in actions {
                match &action {
                    SyncAction::NotRegistered { .. } => warn!("{action}"),
                    SyncAction::AlreadyPresent { .. } => debug!("{action}"),
                    _ => info!(dry_run = self.options.dry_run, "{action}"),
                }
                report.actions.push(action);
            }
            Ok(())
        })
    }
}

fn insert_action(doc: &mut ManifestDocument, entry: &str, manifest: &str) -> Result<SyncAction> {
    let entry = entry.to_string();
    let manifest = manifest.to_string();
    Ok(match doc.insert_compile(&entry)? {
        Some(_) => SyncAction::Added { entry, manifest },
        None => SyncAction::AlreadyPresent { entry, manifest },
    })
}

fn remove_action(doc: &mut ManifestDocument, entry: &str, manifest: &str) -> Result<SyncAction> {
    let entry = entry.to_string();
    let manifest = manifest.to_string();
    Ok(match doc.remove_compile(&entry)? {
        Some(_) => SyncAction::Removed { entry, manifest },
        None => SyncAction::NotRegistered { entry, manifest },
    })
}
