use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{coauthor::Coauthor, error::AppError};

/// Manifest location used when `PARTNER_MANIFEST` is not set
pub const DEFAULT_MANIFEST_PATH: &str = "~/.config/partner/manifest.json";

/// All known coauthors, keyed by lowercased ID
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Manifest {
    coauthors: BTreeMap<String, Coauthor>,
}

/// On-disk shape; `coauthors` may be missing or null in hand-edited files
#[derive(Serialize, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    coauthors: Option<BTreeMap<String, Coauthor>>,
}

impl Manifest {
    /// Loads the manifest at `path`
    ///
    /// A missing or blank file is an empty manifest.
    pub fn load(path: &Path) -> Result<Manifest, AppError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "manifest not found, starting empty");
                return Ok(Manifest::default());
            }
            Err(err) => return Err(err.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Manifest::default());
        }

        let file: ManifestFile = serde_json::from_str(&contents)?;
        let manifest = Manifest {
            coauthors: file.coauthors.unwrap_or_default(),
        };
        debug!(path = %path.display(), count = manifest.len(), "loaded manifest");
        Ok(manifest)
    }

    /// Writes the manifest to `path`, creating parent directories
    ///
    /// The file is written next to its destination and renamed over it, so
    /// readers never see a half-written manifest.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = ManifestFile {
            coauthors: Some(self.coauthors.clone()),
        };
        let mut json = serde_json::to_string_pretty(&file)?;
        json.push('\n');

        let staging = staging_path(path);
        fs::write(&staging, json)?;
        if let Err(err) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        debug!(path = %path.display(), count = self.len(), "saved manifest");
        Ok(())
    }

    /// Inserts coauthors, rejecting the whole batch if any ID is taken
    pub fn add(&mut self, coauthors: impl IntoIterator<Item = Coauthor>) -> Result<(), AppError> {
        let mut batch: BTreeMap<String, Coauthor> = BTreeMap::new();
        for coauthor in coauthors {
            let key = coauthor.key();
            if self.coauthors.contains_key(&key) || batch.contains_key(&key) {
                return Err(AppError::DuplicateCoauthor(coauthor.id));
            }
            batch.insert(key, coauthor);
        }
        self.coauthors.extend(batch);
        Ok(())
    }

    /// Removes coauthors, rejecting the whole batch if any ID is unknown
    pub fn remove<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<(), AppError> {
        let keys = self.resolve_keys(ids)?;
        for key in keys {
            self.coauthors.remove(&key);
        }
        Ok(())
    }

    /// Looks up coauthors by ID, sorted case-insensitively by ID
    pub fn find<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Coauthor>, AppError> {
        let mut found: Vec<Coauthor> = self
            .resolve_keys(ids)?
            .iter()
            .filter_map(|key| self.coauthors.get(key).cloned())
            .collect();
        sort_by_id(&mut found);
        Ok(found)
    }

    /// Every coauthor, sorted case-insensitively by ID
    pub fn coauthors(&self) -> Vec<Coauthor> {
        let mut all: Vec<Coauthor> = self.coauthors.values().cloned().collect();
        sort_by_id(&mut all);
        all
    }

    pub fn len(&self) -> usize {
        self.coauthors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coauthors.is_empty()
    }

    fn resolve_keys<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<String>, AppError> {
        ids.iter()
            .map(|id| {
                let key = id.as_ref().to_lowercase();
                if self.coauthors.contains_key(&key) {
                    Ok(key)
                } else {
                    Err(AppError::UnknownCoauthor(id.as_ref().to_string()))
                }
            })
            .collect()
    }
}

fn sort_by_id(coauthors: &mut [Coauthor]) {
    coauthors.sort_by_key(Coauthor::key);
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
