//! Merchandise and car model catalogs
//!
//! Named presets for the goods the market trades and the load cars the
//! depot sells. Catalogs ship with hardcoded defaults and can also be
//! loaded from TOML.

use std::sync::Arc;

use ahash::AHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::core::error::TrainError;
use crate::core::types::{Health, MerchId, Quantity, Weight, MAX_HEALTH};
use crate::train::car::LoadCar;
use crate::train::merchandise::{Merch, MerchLoad, MerchType};

/// Catalog of known merchandises, indexed by id
///
/// Hands out shared `Arc<Merch>` handles; every load referencing a
/// merchandise points at the same catalog entry.
#[derive(Debug, Clone, Default)]
pub struct MerchCatalog {
    entries: AHashMap<MerchId, Arc<Merch>>,
}

impl MerchCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the built-in merchandise table
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for (id, name, merch_type) in [
            (1, "alcohol", MerchType::Drinkable),
            (2, "antiques", MerchType::Box),
            (3, "caviar", MerchType::Box),
            (4, "fish", MerchType::Box),
            (5, "fishing rods", MerchType::Box),
            (6, "furs", MerchType::Box),
            (7, "gasoline", MerchType::Toxic),
            (8, "line inspection car", MerchType::Box),
            (9, "mammoth dung", MerchType::Box),
            (10, "missiles", MerchType::Box),
            (11, "oil", MerchType::Toxic),
            (12, "plants", MerchType::Vegetal),
            (13, "rails", MerchType::Box),
            (14, "salt", MerchType::Box),
            (15, "wolf meat", MerchType::Box),
            (16, "wood", MerchType::Box),
        ] {
            catalog.add(Merch::new(MerchId(id), name, merch_type));
        }
        catalog
    }

    /// Add a merchandise, replacing any entry with the same id
    pub fn add(&mut self, merch: Merch) {
        self.entries.insert(merch.id(), Arc::new(merch));
    }

    /// Get a shared handle to a merchandise by id
    pub fn get(&self, id: MerchId) -> Option<&Arc<Merch>> {
        self.entries.get(&id)
    }

    /// All entries, in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Merch>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a merchandise table from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse a merchandise table from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, CatalogError> {
        let data: TomlMerchs =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut catalog = Self::new();
        for entry in data.merchandises {
            let merch = entry.into_merch()?;
            if catalog.entries.contains_key(&merch.id()) {
                return Err(CatalogError::DuplicateId(merch.id().0));
            }
            catalog.add(merch);
        }
        Ok(catalog)
    }
}

/// Named template that manufactures load cars on demand
///
/// A model is a factory, not a stateful entity: every build mints a fresh
/// car with its own id.
#[derive(Debug, Clone)]
pub struct LoadCarModel {
    pub model_id: u32,
    pub name: String,
    pub base_weight: Weight,
    pub max_quantity: Quantity,
    pub accepted: MerchType,
}

impl LoadCarModel {
    /// Build an empty car with full health
    pub fn build(&self) -> LoadCar {
        self.build_with_health(MAX_HEALTH)
    }

    /// Build an empty car with the given health
    pub fn build_with_health(&self, health: Health) -> LoadCar {
        LoadCar::new(
            self.name.clone(),
            health,
            self.base_weight,
            self.max_quantity,
            self.accepted,
        )
    }

    /// Build a car with full health, seeded with a load
    pub fn build_loaded(&self, load: MerchLoad) -> Result<LoadCar, TrainError> {
        self.build_with(MAX_HEALTH, load)
    }

    /// Build a car with the given health, seeded with a load
    pub fn build_with(&self, health: Health, load: MerchLoad) -> Result<LoadCar, TrainError> {
        LoadCar::with_load(
            self.name.clone(),
            health,
            self.base_weight,
            self.max_quantity,
            self.accepted,
            load,
        )
    }
}

/// Catalog of load car models, indexed by model id
#[derive(Debug, Clone, Default)]
pub struct CarModelCatalog {
    models: AHashMap<u32, LoadCarModel>,
}

impl CarModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the built-in car model table
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for (model_id, name, base_weight, max_quantity, accepted) in [
            (101, "merchandise", 45.0, 20, MerchType::Box),
            (102, "merchandise XL", 55.0, 40, MerchType::Box),
            (103, "bio greenhouse", 40.0, 10, MerchType::Vegetal),
            (104, "tank", 40.0, 20, MerchType::Drinkable),
            (105, "oil tank", 45.0, 20, MerchType::Toxic),
        ] {
            catalog.add(LoadCarModel {
                model_id,
                name: name.into(),
                base_weight,
                max_quantity,
                accepted,
            });
        }
        catalog
    }

    /// Add a model, replacing any entry with the same id
    pub fn add(&mut self, model: LoadCarModel) {
        self.models.insert(model.model_id, model);
    }

    /// Get a model by id
    pub fn get(&self, model_id: u32) -> Option<&LoadCarModel> {
        self.models.get(&model_id)
    }

    /// All models, in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &LoadCarModel> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Load a car model table from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse a car model table from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, CatalogError> {
        let data: TomlModels =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut catalog = Self::new();
        for entry in data.models {
            let model = entry.into_model()?;
            if catalog.models.contains_key(&model.model_id) {
                return Err(CatalogError::DuplicateId(model.model_id));
            }
            catalog.add(model);
        }
        Ok(catalog)
    }
}

/// Error type for catalog loading
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid merch type: {0}")]
    InvalidMerchType(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(u32),
}

/// TOML representation of a merchandise table
#[derive(Debug, Deserialize)]
struct TomlMerchs {
    merchandises: Vec<TomlMerch>,
}

/// TOML representation of a single merchandise
#[derive(Debug, Deserialize)]
struct TomlMerch {
    id: u32,
    name: String,
    merch_type: String,
}

impl TomlMerch {
    fn into_merch(self) -> Result<Merch, CatalogError> {
        let merch_type = parse_merch_type(&self.merch_type)?;
        Ok(Merch::new(MerchId(self.id), self.name, merch_type))
    }
}

/// TOML representation of a car model table
#[derive(Debug, Deserialize)]
struct TomlModels {
    models: Vec<TomlModel>,
}

/// TOML representation of a single car model
#[derive(Debug, Deserialize)]
struct TomlModel {
    id: u32,
    name: String,
    weight: f32,
    capacity: u32,
    merch_type: String,
}

impl TomlModel {
    fn into_model(self) -> Result<LoadCarModel, CatalogError> {
        let accepted = parse_merch_type(&self.merch_type)?;
        Ok(LoadCarModel {
            model_id: self.id,
            name: self.name,
            base_weight: self.weight,
            max_quantity: self.capacity,
            accepted,
        })
    }
}

fn parse_merch_type(value: &str) -> Result<MerchType, CatalogError> {
    match value.to_lowercase().as_str() {
        "box" => Ok(MerchType::Box),
        "drinkable" => Ok(MerchType::Drinkable),
        "toxic" => Ok(MerchType::Toxic),
        "vegetal" => Ok(MerchType::Vegetal),
        _ => Err(CatalogError::InvalidMerchType(value.into())),
    }
}
