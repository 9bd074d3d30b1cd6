//! JSON inputs: type models and lens manifests

use std::fs;
use std::path::{Path, PathBuf};

use lens_check::LensDeclaration;
use lens_resolve::TypeTable;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown root type '{0}'")]
    UnknownType(String),
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// A type model plus the lenses declared on its types
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub model: TypeTable,
    #[serde(default)]
    pub lenses: Vec<ManifestLens>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestLens {
    /// Type the lens is declared on
    pub root: String,
    #[serde(flatten)]
    pub lens: LensDeclaration,
}

impl Manifest {
    /// Lenses grouped by the type they are declared on, roots in the order
    /// they first appear
    pub fn lenses_by_root(&self) -> Vec<(&str, Vec<LensDeclaration>)> {
        let mut groups: Vec<(&str, Vec<LensDeclaration>)> = Vec::new();
        for entry in &self.lenses {
            match groups.iter_mut().find(|(root, _)| *root == entry.root) {
                Some((_, lenses)) => lenses.push(entry.lens.clone()),
                None => groups.push((&entry.root, vec![entry.lens.clone()])),
            }
        }
        groups
    }
}

pub fn load_model(path: &Path) -> Result<TypeTable, DriverError> {
    read_json(path)
}

pub fn load_manifest(path: &Path) -> Result<Manifest, DriverError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DriverError> {
    let text = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&text).map_err(|source| DriverError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded JSON input");
    Ok(value)
}
