//! Media library records: assets, their primary file paths and variant registries.
//!
//! The rename engine only sees the [`AssetStore`] trait. [`JsonLibrary`] is the
//! store shipped with the crate, backed by a JSON manifest shaped like a
//! WordPress attachment export:
//!
//! ```json
//! {
//!   "baseDir": "uploads",
//!   "assets": [
//!     {
//!       "id": 42,
//!       "file": "2024/05/My File.png",
//!       "metadata": {
//!         "width": 1200,
//!         "sizes": {
//!           "thumbnail": { "file": "My File-150x150.png", "width": 150, "height": 150 }
//!         }
//!       }
//!     }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::files;

pub type AssetId = u64;

/// A managed media file, as enumerated by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub id: AssetId,
}

const FILE_KEY: &str = "file";
const FILENAME_KEY: &str = "filename";

/// Where a filename key sat among a variant record's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilenameSlot {
    key: &'static str,
    index: usize,
}

/// One derived rendition of an asset. Fields other than the filename are
/// carried through untouched.
///
/// The filename may be recorded under `file` or `filename`. It is written back
/// under the key(s) and at the position it was read from; a variant built in
/// code writes `file`. When a record carries both keys, `file` is read and both
/// receive the new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    pub file: Option<String>,
    pub extra: Map<String, Value>,
    slots: Vec<FilenameSlot>,
}

impl Variant {
    pub fn new(file: Option<String>) -> Self {
        Self {
            file,
            ..Self::default()
        }
    }

    /// The recorded filename, if it names anything.
    pub fn filename(&self) -> Option<&str> {
        self.file.as_deref().filter(|file| !file.is_empty())
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut variant = Variant::default();

        for (index, (key, value)) in fields.into_iter().enumerate() {
            let slot_key = match key.as_str() {
                FILE_KEY => FILE_KEY,
                FILENAME_KEY => FILENAME_KEY,
                _ => {
                    variant.extra.insert(key, value);
                    continue;
                }
            };

            let file = match value {
                Value::String(file) => Some(file),
                Value::Null => None,
                other => {
                    return Err(D::Error::custom(format!(
                        "`{}` must be a string, found {}",
                        slot_key, other
                    )))
                }
            };
            if slot_key == FILE_KEY || variant.file.is_none() {
                variant.file = file;
            }
            variant.slots.push(FilenameSlot {
                key: slot_key,
                index,
            });
        }

        Ok(variant)
    }
}

impl Serialize for Variant {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let added = [FilenameSlot {
            key: FILE_KEY,
            index: 0,
        }];
        let slots: &[FilenameSlot] = if self.slots.is_empty() && self.file.is_some() {
            &added
        } else {
            &self.slots
        };

        let mut map = serializer.serialize_map(Some(self.extra.len() + slots.len()))?;
        let mut fields = self.extra.iter();
        let mut slots = slots.iter().peekable();
        let mut index = 0;
        loop {
            if let Some(slot) = slots.next_if(|slot| slot.index <= index) {
                map.serialize_entry(slot.key, &self.file)?;
            } else if let Some((key, value)) = fields.next() {
                map.serialize_entry(key, value)?;
            } else if let Some(slot) = slots.next() {
                map.serialize_entry(slot.key, &self.file)?;
            } else {
                break;
            }
            index += 1;
        }
        map.end()
    }
}

/// Per-asset mapping of variant label to variant record, plus whatever else
/// the asset's metadata document holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantRegistry {
    #[serde(
        default,
        deserialize_with = "deserialize_sizes",
        skip_serializing_if = "Option::is_none"
    )]
    pub sizes: Option<IndexMap<String, Variant>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VariantRegistry {
    /// Whether there is at least one variant entry to process.
    pub fn has_sizes(&self) -> bool {
        self.sizes.as_ref().is_some_and(|sizes| !sizes.is_empty())
    }
}

// PHP exports an empty associative array as `[]`. A bad entry is reported by
// its label.
fn deserialize_sizes<'de, D>(deserializer: D) -> std::result::Result<Option<IndexMap<String, Variant>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(_)) => Ok(Some(IndexMap::new())),
        Some(Value::Object(entries)) => {
            let mut sizes = IndexMap::with_capacity(entries.len());
            for (label, entry) in entries {
                let variant = Variant::deserialize(entry).map_err(|e| {
                    D::Error::custom(format!("invalid variant `{}`: {}", label, e))
                })?;
                sizes.insert(label, variant);
            }
            Ok(Some(sizes))
        }
        Some(other) => Err(D::Error::custom(format!(
            "`sizes` must be an object, found {}",
            other
        ))),
    }
}

/// Records collaborator consumed by the rename engine.
pub trait AssetStore {
    fn list_assets(&self) -> Result<Vec<Asset>>;
    /// Current primary file path; `None` when the record has no path.
    fn primary_path(&self, id: AssetId) -> Result<Option<PathBuf>>;
    /// Record a new canonical path. Never touches the file itself.
    fn set_primary_path(&mut self, id: AssetId, path: &Path) -> Result<()>;
    fn variant_registry(&self, id: AssetId) -> Result<Option<VariantRegistry>>;
    fn put_variant_registry(&mut self, id: AssetId, registry: &VariantRegistry) -> Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_dir: Option<String>,
    #[serde(default)]
    assets: Vec<AssetRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AssetRecord {
    id: AssetId,
    #[serde(default)]
    file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<VariantRegistry>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// JSON-manifest backed [`AssetStore`]. Every mutation is written back to the
/// manifest before returning.
#[derive(Debug)]
pub struct JsonLibrary {
    path: PathBuf,
    base_dir: PathBuf,
    manifest: Manifest,
}

impl JsonLibrary {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::library_not_found(path.display().to_string()));
        }

        let content = files::read(path)?;
        let manifest: Manifest = serde_json::from_str(&content)
            .map_err(|e| Error::library_invalid_json(path.display().to_string(), e))?;

        let manifest_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let base_dir = match manifest.base_dir.as_deref() {
            Some(dir) => manifest_dir.join(dir),
            None => manifest_dir.to_path_buf(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative record paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record(&self, id: AssetId) -> Result<&AssetRecord> {
        self.manifest
            .assets
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::library_asset_not_found(id))
    }

    fn record_mut(&mut self, id: AssetId) -> Result<&mut AssetRecord> {
        self.manifest
            .assets
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::library_asset_not_found(id))
    }

    fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn relativize(&self, path: &Path) -> String {
        path.strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.manifest).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize media library".to_string()))
        })?;
        files::write_atomic(&self.path, &content)?;
        log_status!("library", "Saved {}", self.path.display());
        Ok(())
    }
}

impl AssetStore for JsonLibrary {
    fn list_assets(&self) -> Result<Vec<Asset>> {
        Ok(self
            .manifest
            .assets
            .iter()
            .map(|r| Asset { id: r.id })
            .collect())
    }

    fn primary_path(&self, id: AssetId) -> Result<Option<PathBuf>> {
        let record = self.record(id)?;
        if record.file.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.resolve(&record.file)))
    }

    fn set_primary_path(&mut self, id: AssetId, path: &Path) -> Result<()> {
        let stored = self.relativize(path);
        self.record_mut(id)?.file = stored;
        self.save()
    }

    fn variant_registry(&self, id: AssetId) -> Result<Option<VariantRegistry>> {
        Ok(self.record(id)?.metadata.clone())
    }

    fn put_variant_registry(&mut self, id: AssetId, registry: &VariantRegistry) -> Result<()> {
        self.record_mut(id)?.metadata = Some(registry.clone());
        self.save()
    }
}
