//! Loading the catalog document from disk

use std::path::Path;

use tracing::{debug, warn};

use super::model::Catalog;
use crate::error::{Error, Result};

impl Catalog {
    /// Read and parse a catalog document.
    ///
    /// A missing, unreadable or malformed document is an
    /// [`Error::CatalogLoad`]; `{}` is a valid, empty catalog.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            warn!("catalog read failed for {}: {}", path.display(), e);
            Error::CatalogLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let catalog = Self::from_json_str(&text).map_err(|e| {
            warn!("catalog parse failed for {}: {}", path.display(), e);
            Error::CatalogLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        debug!(
            "loaded catalog from {} ({} categories, {} materials)",
            path.display(),
            catalog.categories().len(),
            catalog.len()
        );
        Ok(catalog)
    }
}

/// Load state of the catalog as seen by the UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogStatus {
    #[default]
    Unloaded,
    Loading,
    Loaded(Catalog),
    Failed(String),
}

impl CatalogStatus {
    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Whether a load request should be issued now
    pub fn needs_load(&self) -> bool {
        matches!(self, Self::Unloaded | Self::Failed(_))
    }

    /// Apply the outcome of a load
    pub fn finish(&mut self, result: Result<Catalog>) {
        *self = match result {
            Ok(catalog) => Self::Loaded(catalog),
            Err(e) => Self::Failed(e.to_string()),
        };
    }
}
