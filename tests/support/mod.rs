#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use mediacase::{
    Asset, AssetId, AssetStore, Error, FileSystem, LocalFs, Result, Variant, VariantRegistry,
};

/// In-memory asset store that counts writes and can be told to fail them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub assets: Vec<MemoryAsset>,
    pub path_writes: usize,
    pub registry_writes: usize,
    pub fail_path_writes: bool,
    pub fail_registry_writes: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryAsset {
    pub id: AssetId,
    pub path: Option<PathBuf>,
    pub registry: Option<VariantRegistry>,
}

impl MemoryStore {
    pub fn with(assets: Vec<MemoryAsset>) -> Self {
        Self {
            assets,
            ..Self::default()
        }
    }

    pub fn asset(&self, id: AssetId) -> &MemoryAsset {
        self.assets.iter().find(|a| a.id == id).unwrap()
    }

    pub fn variant_file(&self, id: AssetId, label: &str) -> Option<String> {
        self.asset(id)
            .registry
            .as_ref()
            .and_then(|r| r.sizes.as_ref())
            .and_then(|s| s.get(label))
            .and_then(|v| v.file.clone())
    }

    fn find_mut(&mut self, id: AssetId) -> Result<&mut MemoryAsset> {
        self.assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::library_asset_not_found(id))
    }
}

impl AssetStore for MemoryStore {
    fn list_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.assets.iter().map(|a| Asset { id: a.id }).collect())
    }

    fn primary_path(&self, id: AssetId) -> Result<Option<PathBuf>> {
        Ok(self.asset(id).path.clone())
    }

    fn set_primary_path(&mut self, id: AssetId, path: &Path) -> Result<()> {
        if self.fail_path_writes {
            return Err(Error::internal_io("disk full", Some("update record".to_string())));
        }
        self.path_writes += 1;
        self.find_mut(id)?.path = Some(path.to_path_buf());
        Ok(())
    }

    fn variant_registry(&self, id: AssetId) -> Result<Option<VariantRegistry>> {
        Ok(self.asset(id).registry.clone())
    }

    fn put_variant_registry(&mut self, id: AssetId, registry: &VariantRegistry) -> Result<()> {
        if self.fail_registry_writes {
            return Err(Error::internal_io("database is locked", None));
        }
        self.registry_writes += 1;
        self.find_mut(id)?.registry = Some(registry.clone());
        Ok(())
    }
}

/// Registry with the given `(label, filename)` entries, in order.
pub fn registry(entries: &[(&str, Option<&str>)]) -> VariantRegistry {
    let mut sizes = IndexMap::new();
    for (label, file) in entries {
        let mut variant = Variant::new(file.map(str::to_string));
        variant
            .extra
            .insert("width".to_string(), serde_json::json!(150));
        sizes.insert(label.to_string(), variant);
    }
    VariantRegistry {
        sizes: Some(sizes),
        ..VariantRegistry::default()
    }
}

/// Local filesystem that records renames and fails those whose source is listed.
#[derive(Default)]
pub struct ScriptedFs {
    inner: LocalFs,
    pub fail_from: Vec<PathBuf>,
    pub renames: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl ScriptedFs {
    pub fn failing(paths: Vec<PathBuf>) -> Self {
        Self {
            fail_from: paths,
            ..Self::default()
        }
    }

    pub fn rename_count(&self) -> usize {
        self.renames.borrow().len()
    }
}

impl FileSystem for ScriptedFs {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if self.fail_from.iter().any(|p| p == from) {
            return Err(Error::internal_io(
                "permission denied",
                Some(format!("rename {}", from.display())),
            ));
        }
        self.inner.rename(from, to)?;
        self.renames
            .borrow_mut()
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    fn temp_path(&self, dir: &Path, extension: Option<&str>) -> PathBuf {
        self.inner.temp_path(dir, extension)
    }
}

pub fn touch(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Sorted filenames in a directory.
pub fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
