use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const DEFAULT_CATALOG: &str = "data/memory-cards.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub image: String,
}

pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Item>, CatalogError> {
    let items: Vec<Item> = serde_json::from_slice(bytes)?;
    if items.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(items)
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Item>, CatalogError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_catalog(&bytes)?;
    log::info!("Loaded {} catalog items from {}", items.len(), path.display());
    Ok(items)
}

/// Parses fetched bytes. Failures are logged and collapse to an empty list;
/// an empty list means the games cannot start.
pub fn parse_or_empty(bytes: &[u8], location: &str) -> Vec<Item> {
    match parse_catalog(bytes) {
        Ok(items) => {
            log::info!("Loaded {} catalog items from {location}", items.len());
            items
        }
        Err(err) => {
            log::error!("Error loading items from {location}: {err}");
            Vec::new()
        }
    }
}

/// Reads and parses a catalog file with the same fallback as
/// [`parse_or_empty`].
pub fn load_or_empty(path: impl AsRef<Path>) -> Vec<Item> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => parse_or_empty(&bytes, &path.display().to_string()),
        Err(err) => {
            log::error!("Error fetching catalog {}: {err}", path.display());
            Vec::new()
        }
    }
}
