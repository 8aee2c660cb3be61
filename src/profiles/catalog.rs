//! Profile catalog loaded from YAML/JSON documents, with atomic reload.

use super::{DataCenterProfile, HardwareProfile, ModelProfile};
use crate::{Error, ErrorContext, Result};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Resolves profile ids. The real deployment backs this with a database; the
/// engine only ever sees the trait.
pub trait ProfileLookup: Send + Sync {
    fn hardware(&self, id: &str) -> Option<HardwareProfile>;
    fn data_center(&self, id: &str) -> Option<DataCenterProfile>;
    fn model(&self, id: &str) -> Option<ModelProfile>;
}

/// On-disk catalog layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub hardware: Vec<HardwareProfile>,
    #[serde(default)]
    pub data_centers: Vec<DataCenterProfile>,
    #[serde(default)]
    pub models: Vec<ModelProfile>,
}

/// In-memory profile store keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    hardware: BTreeMap<String, HardwareProfile>,
    data_centers: BTreeMap<String, DataCenterProfile>,
    models: BTreeMap<String, ModelProfile>,
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    id: &str,
    value: T,
    section: &str,
    index: usize,
) -> Result<()> {
    if map.contains_key(id) {
        return Err(Error::configuration_with_context(
            format!("duplicate profile id '{}'", id),
            ErrorContext::new()
                .with_field_path(format!("{}[{}].id", section, index))
                .with_source("profile_catalog"),
        ));
    }
    map.insert(id.to_string(), value);
    Ok(())
}

impl ProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting duplicate ids within a section.
    pub fn from_document(doc: CatalogDocument) -> Result<Self> {
        let mut catalog = Self::new();
        for (i, hw) in doc.hardware.into_iter().enumerate() {
            let id = hw.id().to_string();
            insert_unique(&mut catalog.hardware, &id, hw, "hardware", i)?;
        }
        for (i, dc) in doc.data_centers.into_iter().enumerate() {
            let id = dc.id().to_string();
            insert_unique(&mut catalog.data_centers, &id, dc, "dataCenters", i)?;
        }
        for (i, model) in doc.models.into_iter().enumerate() {
            let id = model.id().to_string();
            insert_unique(&mut catalog.models, &id, model, "models", i)?;
        }
        Ok(catalog)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_yaml::from_str(s)?;
        Self::from_document(doc)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(s)?;
        Self::from_document(doc)
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let catalog = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        tracing::info!(
            path = %path.display(),
            hardware = catalog.hardware.len(),
            data_centers = catalog.data_centers.len(),
            models = catalog.models.len(),
            "loaded profile catalog"
        );
        Ok(catalog)
    }

    /// Representative profiles shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(include_str!("builtin_profiles.yaml"))
    }

    pub fn insert_hardware(&mut self, profile: HardwareProfile) -> Option<HardwareProfile> {
        self.hardware.insert(profile.id().to_string(), profile)
    }

    pub fn insert_data_center(&mut self, profile: DataCenterProfile) -> Option<DataCenterProfile> {
        self.data_centers.insert(profile.id().to_string(), profile)
    }

    pub fn insert_model(&mut self, profile: ModelProfile) -> Option<ModelProfile> {
        self.models.insert(profile.id().to_string(), profile)
    }

    pub fn hardware_profiles(&self) -> impl Iterator<Item = &HardwareProfile> {
        self.hardware.values()
    }

    pub fn data_center_profiles(&self) -> impl Iterator<Item = &DataCenterProfile> {
        self.data_centers.values()
    }

    pub fn model_profiles(&self) -> impl Iterator<Item = &ModelProfile> {
        self.models.values()
    }

    pub fn is_empty(&self) -> bool {
        self.hardware.is_empty() && self.data_centers.is_empty() && self.models.is_empty()
    }
}

impl ProfileLookup for ProfileCatalog {
    fn hardware(&self, id: &str) -> Option<HardwareProfile> {
        self.hardware.get(id).cloned()
    }
    fn data_center(&self, id: &str) -> Option<DataCenterProfile> {
        self.data_centers.get(id).cloned()
    }
    fn model(&self, id: &str) -> Option<ModelProfile> {
        self.models.get(id).cloned()
    }
}

/// A catalog that can be swapped out while readers keep resolving against it.
pub struct SharedCatalog {
    inner: ArcSwap<ProfileCatalog>,
}

impl SharedCatalog {
    pub fn new(catalog: ProfileCatalog) -> Self {
        Self {
            inner: ArcSwap::from_pointee(catalog),
        }
    }

    pub fn snapshot(&self) -> Arc<ProfileCatalog> {
        self.inner.load_full()
    }

    pub fn replace(&self, catalog: ProfileCatalog) {
        self.inner.store(Arc::new(catalog));
    }

    /// Reload from disk. On error the current catalog stays in place.
    pub fn reload_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let catalog = ProfileCatalog::from_path(path)?;
        self.replace(catalog);
        Ok(())
    }
}

impl ProfileLookup for SharedCatalog {
    fn hardware(&self, id: &str) -> Option<HardwareProfile> {
        self.inner.load().hardware(id)
    }
    fn data_center(&self, id: &str) -> Option<DataCenterProfile> {
        self.inner.load().data_center(id)
    }
    fn model(&self, id: &str) -> Option<ModelProfile> {
        self.inner.load().model(id)
    }
}
