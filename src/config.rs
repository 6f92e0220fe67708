use std::path::{Path, PathBuf};

use crate::{error::AppError, git, manifest::DEFAULT_MANIFEST_PATH};

/// Environment variable overriding the manifest location
pub const MANIFEST_ENV: &str = "PARTNER_MANIFEST";
/// Template location relative to the repository root
const TEMPLATE_FILE: &str = ".git/gitmessage.txt";

/// Files and directories a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub repository_root: PathBuf,
    pub template_file: PathBuf,
    pub manifest_file: PathBuf,
}

impl Paths {
    /// Computes paths from already-gathered inputs
    ///
    /// # Arguments
    /// * `repository_root` - Top-level directory of the enclosing repository
    /// * `manifest_override` - Value of `PARTNER_MANIFEST`, if set
    /// * `home` - Home directory used to expand a leading `~`
    pub fn resolve(
        repository_root: &Path,
        manifest_override: Option<&str>,
        home: Option<&Path>,
    ) -> Result<Paths, AppError> {
        let manifest = manifest_override
            .filter(|path| !path.trim().is_empty())
            .unwrap_or(DEFAULT_MANIFEST_PATH);

        Ok(Paths {
            repository_root: repository_root.to_path_buf(),
            template_file: repository_root.join(TEMPLATE_FILE),
            manifest_file: expand_home(manifest, home)?,
        })
    }

    /// Gathers inputs from the process environment and the enclosing repository
    pub fn from_env(working_dir: &Path) -> Result<Paths, AppError> {
        let repository_root = git::repository_root(working_dir)?;
        let manifest_override = std::env::var(MANIFEST_ENV).ok();
        let home = dirs::home_dir();
        Paths::resolve(
            &repository_root,
            manifest_override.as_deref(),
            home.as_deref(),
        )
    }
}

/// Expands a leading `~` to `home`
fn expand_home(path: &str, home: Option<&Path>) -> Result<PathBuf, AppError> {
    let rest = match path.strip_prefix('~') {
        None => return Ok(PathBuf::from(path)),
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        // `~user` forms are left alone
        Some(_) => return Ok(PathBuf::from(path)),
    };
    let home = home.ok_or_else(|| {
        AppError::Validation("failed to find the home directory".to_string())
    })?;
    Ok(home.join(rest))
}
