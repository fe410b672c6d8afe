use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::files::FileSystem;
use crate::library::{AssetId, AssetStore};
use crate::normalize::normalize;

use super::outcome::{FailureKind, RenameFailure, RenameOutcome, RenameSuccess};

// ============================================================================
// Path helpers
// ============================================================================

/// Directory, base name (no extension) and extension of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathParts {
    pub dir: PathBuf,
    pub base: String,
    pub extension: Option<String>,
}

pub(crate) fn split_path(path: &Path) -> PathParts {
    PathParts {
        dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        base: path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
        extension: path.extension().map(|e| e.to_string_lossy().to_string()),
    }
}

/// Filename with a normalized base and the extension left as-is.
pub(crate) fn normalized_filename(parts: &PathParts) -> String {
    let base = normalize(&parts.base);
    match &parts.extension {
        Some(ext) => format!("{}.{}", base, ext),
        None => base,
    }
}

fn same_ignoring_case(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

// ============================================================================
// Engine
// ============================================================================

enum MoveFailure {
    TargetExists,
    RenameFailed(String),
}

/// What a run would do with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Rename,
    CaseOnly,
    TargetExists,
    NotFound,
}

/// Read-only preview entry produced by [`RenameEngine::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRename {
    pub asset_id: AssetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub action: PlanAction,
}

/// Renames every asset's primary file and its variants to skeleton case,
/// keeping the store's records pointing at the renamed files.
///
/// Single-threaded and blocking; assumes exclusive access to the files and
/// records for the duration of a run.
pub struct RenameEngine<'a, S: AssetStore + ?Sized, F: FileSystem + ?Sized> {
    store: &'a mut S,
    fs: &'a F,
}

impl<'a, S: AssetStore + ?Sized, F: FileSystem + ?Sized> RenameEngine<'a, S, F> {
    pub fn new(store: &'a mut S, fs: &'a F) -> Self {
        Self { store, fs }
    }

    /// Process every asset once.
    ///
    /// Per-file failures land in the returned outcome; only store read
    /// failures abort the run.
    pub fn run(&mut self) -> Result<RenameOutcome> {
        let mut outcome = RenameOutcome::new();

        for asset in self.store.list_assets()? {
            self.rename_asset(asset.id, &mut outcome)?;
        }

        let summary = outcome.summary();
        log_status!(
            "rename",
            "Done: {} renamed, {} case-only, {} errors",
            summary.renamed,
            summary.case_only,
            summary.errors
        );

        Ok(outcome)
    }

    fn rename_asset(&mut self, asset_id: AssetId, outcome: &mut RenameOutcome) -> Result<()> {
        let old_path = match self.store.primary_path(asset_id)? {
            Some(path) if self.fs.exists(&path) => path,
            missing => {
                let path = missing.as_deref().map(display).unwrap_or_default();
                log_status!("rename", "File not found: {}", path);
                outcome.record_failure(RenameFailure {
                    asset_id,
                    variant: None,
                    kind: FailureKind::NotFound,
                    path,
                    reason: None,
                });
                return Ok(());
            }
        };

        let parts = split_path(&old_path);
        let new_path = parts.dir.join(normalized_filename(&parts));

        let case_only = match self.move_file(
            &old_path,
            &new_path,
            &parts.dir,
            parts.extension.as_deref(),
        ) {
            Ok(case_only) => case_only,
            Err(err) => {
                outcome.record_failure(failure(asset_id, None, err, &old_path, &new_path));
                return Ok(());
            }
        };

        outcome.record_success(RenameSuccess {
            asset_id,
            variant: None,
            from: display(&old_path),
            to: display(&new_path),
            case_only,
        });

        if let Err(err) = self.store.set_primary_path(asset_id, &new_path) {
            log_status!("rename", "Record update failed for asset {}: {}", asset_id, err.reason());
            outcome.record_failure(RenameFailure {
                asset_id,
                variant: None,
                kind: FailureKind::RecordWriteFailed,
                path: display(&new_path),
                reason: Some(err.reason()),
            });
        }

        self.rename_variants(asset_id, &parts.dir, &new_path, outcome)
    }

    /// Variants live in the primary file's directory. A failure skips only that
    /// variant; the registry is written back once, after the loop.
    fn rename_variants(
        &mut self,
        asset_id: AssetId,
        dir: &Path,
        primary_path: &Path,
        outcome: &mut RenameOutcome,
    ) -> Result<()> {
        let Some(mut registry) = self.store.variant_registry(asset_id)? else {
            return Ok(());
        };
        if !registry.has_sizes() {
            return Ok(());
        }

        if let Some(sizes) = registry.sizes.as_mut() {
            for (label, variant) in sizes.iter_mut() {
                let Some(old_filename) = variant.filename().map(str::to_string) else {
                    continue;
                };

                let parts = split_path(Path::new(&old_filename));
                let new_filename = parts
                    .dir
                    .join(normalized_filename(&parts))
                    .to_string_lossy()
                    .to_string();

                let old_path = dir.join(&old_filename);
                let new_path = dir.join(&new_filename);

                match self.move_file(&old_path, &new_path, dir, parts.extension.as_deref()) {
                    Ok(case_only) => {
                        outcome.record_success(RenameSuccess {
                            asset_id,
                            variant: Some(label.clone()),
                            from: display(&old_path),
                            to: display(&new_path),
                            case_only,
                        });
                        variant.file = Some(new_filename);
                    }
                    Err(err) => {
                        outcome.record_failure(failure(
                            asset_id,
                            Some(label.clone()),
                            err,
                            &old_path,
                            &new_path,
                        ));
                    }
                }
            }
        }

        if let Err(err) = self.store.put_variant_registry(asset_id, &registry) {
            log_status!("rename", "Registry write failed for asset {}: {}", asset_id, err.reason());
            outcome.record_failure(RenameFailure {
                asset_id,
                variant: None,
                kind: FailureKind::RecordWriteFailed,
                path: display(primary_path),
                reason: Some(err.reason()),
            });
        }

        Ok(())
    }

    /// Shared decision procedure for primary files and variants. Returns
    /// whether the case-only (temp file) path was taken.
    fn move_file(
        &self,
        from: &Path,
        to: &Path,
        dir: &Path,
        extension: Option<&str>,
    ) -> std::result::Result<bool, MoveFailure> {
        if same_ignoring_case(from, to) {
            // Case-insensitive filesystems treat a direct case-only rename as a no-op.
            let temp = self.fs.temp_path(dir, extension);
            self.fs
                .rename(from, &temp)
                .map_err(|e| MoveFailure::RenameFailed(e.reason()))?;
            self.fs.rename(&temp, to).map_err(|e| {
                MoveFailure::RenameFailed(format!("{} (file left at {})", e.reason(), temp.display()))
            })?;
            log_status!("rename", "{} -> {} (case-only)", from.display(), to.display());
            return Ok(true);
        }

        if self.fs.exists(to) {
            return Err(MoveFailure::TargetExists);
        }

        self.fs
            .rename(from, to)
            .map_err(|e| MoveFailure::RenameFailed(e.reason()))?;
        log_status!("rename", "{} -> {}", from.display(), to.display());
        Ok(false)
    }

    // ========================================================================
    // Preview
    // ========================================================================

    /// What [`run`](Self::run) would do, without touching files or records.
    pub fn plan(&self) -> Result<Vec<PlannedRename>> {
        let mut planned = Vec::new();

        for asset in self.store.list_assets()? {
            let asset_id = asset.id;
            let old_path = match self.store.primary_path(asset_id)? {
                Some(path) if self.fs.exists(&path) => path,
                missing => {
                    planned.push(PlannedRename {
                        asset_id,
                        variant: None,
                        from: missing.as_deref().map(display).unwrap_or_default(),
                        to: None,
                        action: PlanAction::NotFound,
                    });
                    continue;
                }
            };

            let parts = split_path(&old_path);
            let new_path = parts.dir.join(normalized_filename(&parts));
            let action = self.classify(&old_path, &new_path);
            planned.push(PlannedRename {
                asset_id,
                variant: None,
                from: display(&old_path),
                to: Some(display(&new_path)),
                action,
            });

            if action == PlanAction::TargetExists {
                continue;
            }

            let Some(registry) = self.store.variant_registry(asset_id)? else {
                continue;
            };
            for (label, variant) in registry.sizes.iter().flatten() {
                let Some(old_filename) = variant.filename() else {
                    continue;
                };
                let variant_parts = split_path(Path::new(old_filename));
                let old_variant = parts.dir.join(old_filename);
                let new_variant = parts
                    .dir
                    .join(&variant_parts.dir)
                    .join(normalized_filename(&variant_parts));

                let action = if self.fs.exists(&old_variant) {
                    self.classify(&old_variant, &new_variant)
                } else {
                    PlanAction::NotFound
                };
                planned.push(PlannedRename {
                    asset_id,
                    variant: Some(label.clone()),
                    from: display(&old_variant),
                    to: Some(display(&new_variant)),
                    action,
                });
            }
        }

        Ok(planned)
    }

    fn classify(&self, from: &Path, to: &Path) -> PlanAction {
        if same_ignoring_case(from, to) {
            PlanAction::CaseOnly
        } else if self.fs.exists(to) {
            PlanAction::TargetExists
        } else {
            PlanAction::Rename
        }
    }
}

fn failure(
    asset_id: AssetId,
    variant: Option<String>,
    err: MoveFailure,
    from: &Path,
    to: &Path,
) -> RenameFailure {
    match err {
        MoveFailure::TargetExists => {
            log_status!("rename", "Target file already exists: {}", to.display());
            RenameFailure {
                asset_id,
                variant,
                kind: FailureKind::TargetExists,
                path: display(to),
                reason: None,
            }
        }
        MoveFailure::RenameFailed(reason) => {
            log_status!("rename", "Failed to rename {}: {}", from.display(), reason);
            RenameFailure {
                asset_id,
                variant,
                kind: FailureKind::RenameFailed,
                path: display(from),
                reason: Some(reason),
            }
        }
    }
}
