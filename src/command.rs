use std::{collections::HashSet, fs, io::ErrorKind};

use tracing::{debug, info, warn};

use crate::{
    coauthor::Coauthor,
    config::Paths,
    error::AppError,
    fetch::UserFetcher,
    git::{GitConfig, TemplateConfig},
    manifest::Manifest,
    template,
    validation::{validate_input_email, validate_input_id, validate_input_name},
};

/// Manifest and commit template operations for one repository
pub struct Partner<C = GitConfig> {
    pub paths: Paths,
    config: C,
}

impl Partner<GitConfig> {
    pub fn new(paths: Paths) -> Self {
        Partner::with_config(paths, GitConfig)
    }
}

impl<C: TemplateConfig> Partner<C> {
    pub fn with_config(paths: Paths, config: C) -> Self {
        Partner { paths, config }
    }

    fn load_manifest(&self) -> Result<Manifest, AppError> {
        Manifest::load(&self.paths.manifest_file)
    }

    /// Adds a manually entered coauthor
    pub fn manifest_add(&self, id: &str, name: &str, email: &str) -> Result<Coauthor, AppError> {
        let mut manifest = self.load_manifest()?;
        validate_input_id(id, &manifest)?;
        validate_input_name(name)?;
        validate_input_email(email)?;

        let coauthor = Coauthor::manual(id, name, email);
        manifest.add([coauthor.clone()])?;
        manifest.save(&self.paths.manifest_file)?;
        info!(id, "added coauthor");
        Ok(coauthor)
    }

    /// Adds coauthors looked up through `fetcher`
    ///
    /// Every username is resolved before the manifest is touched.
    pub fn manifest_fetch_add<S: AsRef<str>>(
        &self,
        fetcher: &dyn UserFetcher,
        usernames: &[S],
    ) -> Result<Vec<Coauthor>, AppError> {
        let coauthors = usernames
            .iter()
            .map(|username| fetcher.fetch(username.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut manifest = self.load_manifest()?;
        manifest.add(coauthors.iter().cloned())?;
        manifest.save(&self.paths.manifest_file)?;
        info!(count = coauthors.len(), "added fetched coauthors");
        Ok(coauthors)
    }

    /// Every coauthor in the manifest, sorted by ID
    pub fn manifest_list(&self) -> Result<Vec<Coauthor>, AppError> {
        Ok(self.load_manifest()?.coauthors())
    }

    /// Removes coauthors from the manifest
    pub fn manifest_remove<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), AppError> {
        let mut manifest = self.load_manifest()?;
        manifest.remove(ids)?;
        manifest.save(&self.paths.manifest_file)?;
        info!(count = ids.len(), "removed coauthors");
        Ok(())
    }

    /// Activates coauthors for the next commit, keeping those already active
    ///
    /// Nothing is written unless every ID resolves.
    pub fn template_set<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Coauthor>, AppError> {
        let manifest = self.load_manifest()?;
        let existing = template::extract_active_ids(&self.paths.template_file)?;

        let requested = ids.iter().map(|id| id.as_ref().to_string());
        let merged = unique_ids(requested.chain(existing));
        debug!(?merged, "activating coauthors");

        self.write_active(&manifest, &merged)
    }

    /// Makes exactly `ids` the active coauthors, dropping any others
    ///
    /// Nothing is written unless every ID resolves.
    pub fn template_replace<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Coauthor>, AppError> {
        let manifest = self.load_manifest()?;
        let selected = unique_ids(ids.iter().map(|id| id.as_ref().to_string()));
        debug!(?selected, "replacing active coauthors");

        self.write_active(&manifest, &selected)
    }

    fn write_active(&self, manifest: &Manifest, ids: &[String]) -> Result<Vec<Coauthor>, AppError> {
        let coauthors = manifest.find(ids)?;
        template::save(&self.paths.template_file, &coauthors)?;
        self.config
            .set_commit_template(&self.paths.repository_root, &self.paths.template_file)?;
        info!(count = coauthors.len(), "commit template updated");
        Ok(coauthors)
    }

    /// Coauthors active in the current commit template, sorted by ID
    pub fn template_status(&self) -> Result<Vec<Coauthor>, AppError> {
        if !self.paths.manifest_file.exists() {
            return Ok(Vec::new());
        }
        let manifest = self.load_manifest()?;
        let active = unique_ids(template::extract_active_ids(&self.paths.template_file)?);
        manifest.find(&active)
    }

    /// Deactivates every coauthor by removing the commit template
    pub fn template_clear(&self) -> Result<(), AppError> {
        let removed = match fs::remove_file(&self.paths.template_file) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        };

        // The setting may never have been made; either way it is gone now.
        if let Err(err) = self.config.unset_commit_template(&self.paths.repository_root) {
            debug!(%err, "commit template was not configured");
        }

        if let Err(err) = &removed {
            warn!(%err, path = %self.paths.template_file.display(), "failed to remove commit template");
        }
        removed?;
        Ok(())
    }
}

/// Drops repeated IDs, ignoring case, keeping the first occurrence
fn unique_ids(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coauthor::CoauthorType;
    use pretty_assertions::assert_eq;
    use std::{
        cell::RefCell,
        path::{Path, PathBuf},
    };
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingConfig {
        calls: RefCell<Vec<String>>,
        unset_fails: bool,
    }

    impl TemplateConfig for &RecordingConfig {
        fn set_commit_template(&self, _root: &Path, template: &Path) -> Result<(), AppError> {
            self.calls.borrow_mut().push(format!("set {}", template.display()));
            Ok(())
        }

        fn unset_commit_template(&self, _root: &Path) -> Result<(), AppError> {
            self.calls.borrow_mut().push("unset".to_string());
            if self.unset_fails {
                return Err(AppError::GitCommand(String::new()));
            }
            Ok(())
        }
    }

    struct StubFetcher;

    impl UserFetcher for StubFetcher {
        fn fetch(&self, username: &str) -> Result<Coauthor, AppError> {
            if username == "ghost" {
                return Err(AppError::UserNotFound {
                    provider: "GitHub".to_string(),
                    username: username.to_string(),
                });
            }
            Ok(Coauthor {
                id: username.to_string(),
                kind: CoauthorType::GitHub,
                name: username.to_uppercase(),
                email: format!("1+{username}@users.noreply.github.com"),
            })
        }
    }

    fn workspace() -> (TempDir, Paths) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let root = dir.path().to_path_buf();
        let paths = Paths {
            template_file: root.join(".git/gitmessage.txt"),
            manifest_file: root.join("manifest.json"),
            repository_root: root,
        };
        (dir, paths)
    }

    fn ids(coauthors: &[Coauthor]) -> Vec<&str> {
        coauthors.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn add_list_remove() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);

        partner.manifest_add("brett", "Brett Buddin", "brett@buddin.org").unwrap();
        assert_eq!(
            partner.manifest_list().unwrap(),
            vec![Coauthor::manual("brett", "Brett Buddin", "brett@buddin.org")]
        );

        partner.manifest_remove(&["brett"]).unwrap();
        assert!(partner.manifest_list().unwrap().is_empty());
    }

    #[test]
    fn manual_add_rejects_duplicate() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);

        partner.manifest_add("brett", "Brett Buddin", "brett@buddin.org").unwrap();
        let err = partner.manifest_add("Brett", "Other", "other@buddin.org").unwrap_err();
        assert!(matches!(err, AppError::DuplicateCoauthor(_)));
        assert_eq!(partner.manifest_list().unwrap().len(), 1);
    }

    #[test]
    fn activation_workflow() {
        let (_dir, paths) = workspace();
        let template_file: PathBuf = paths.template_file.clone();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);

        partner.manifest_add("brett", "Brett Buddin", "brett@buddin.org").unwrap();
        partner.manifest_add("persona", "Person A", "a@buddin.org").unwrap();

        partner.template_set(&["brett"]).unwrap();
        assert_eq!(
            fs::read_to_string(&template_file).unwrap(),
            "\n\n# Managed by partner\n#\n# partner-id: brett\nCo-Authored-By: \"Brett Buddin\" <brett@buddin.org>\n"
        );

        partner.template_set(&["persona"]).unwrap();
        assert_eq!(ids(&partner.template_status().unwrap()), vec!["brett", "persona"]);
        assert_eq!(
            fs::read_to_string(&template_file).unwrap(),
            "\n\n# Managed by partner\n#\n\
             # partner-id: brett\nCo-Authored-By: \"Brett Buddin\" <brett@buddin.org>\n\
             # partner-id: persona\nCo-Authored-By: \"Person A\" <a@buddin.org>\n"
        );

        partner.template_clear().unwrap();
        assert!(partner.template_status().unwrap().is_empty());
        assert!(!template_file.exists());

        let set = format!("set {}", template_file.display());
        assert_eq!(*config.calls.borrow(), vec![set.clone(), set, "unset".to_string()]);
    }

    #[test]
    fn activating_twice_keeps_single_entry() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);
        partner.manifest_add("brett", "Brett Buddin", "brett@buddin.org").unwrap();

        partner.template_set(&["brett"]).unwrap();
        partner.template_set(&["BRETT"]).unwrap();

        let text = fs::read_to_string(&partner.paths.template_file).unwrap();
        assert_eq!(template::parse_active_ids(&text), vec!["brett"]);
    }

    #[test]
    fn unknown_id_writes_nothing() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);
        partner.manifest_add("brett", "Brett Buddin", "brett@buddin.org").unwrap();

        let err = partner.template_set(&["brett", "ghost"]).unwrap_err();
        assert!(matches!(err, AppError::UnknownCoauthor(id) if id == "ghost"));
        assert!(!partner.paths.template_file.exists());
        assert!(config.calls.borrow().is_empty());
    }

    #[test]
    fn unknown_id_leaves_existing_template_alone() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);
        partner.manifest_add("brett", "Brett Buddin", "brett@buddin.org").unwrap();
        partner.template_set(&["brett"]).unwrap();
        let before = fs::read_to_string(&partner.paths.template_file).unwrap();

        assert!(partner.template_set(&["ghost"]).is_err());
        assert_eq!(fs::read_to_string(&partner.paths.template_file).unwrap(), before);
    }

    #[test]
    fn replace_drops_unselected_coauthors() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);
        partner.manifest_add("brett", "Brett Buddin", "brett@buddin.org").unwrap();
        partner.manifest_add("persona", "Person A", "a@buddin.org").unwrap();
        partner.template_set(&["brett", "persona"]).unwrap();

        partner.template_replace(&["persona"]).unwrap();
        assert_eq!(ids(&partner.template_status().unwrap()), vec!["persona"]);
        assert_eq!(config.calls.borrow().len(), 2);
    }

    #[test]
    fn replace_with_unknown_id_keeps_active_set() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);
        partner.manifest_add("brett", "Brett Buddin", "brett@buddin.org").unwrap();
        partner.template_set(&["brett"]).unwrap();
        let before = fs::read_to_string(&partner.paths.template_file).unwrap();

        let err = partner.template_replace(&["ghost"]).unwrap_err();
        assert!(matches!(err, AppError::UnknownCoauthor(id) if id == "ghost"));
        assert_eq!(fs::read_to_string(&partner.paths.template_file).unwrap(), before);
        assert_eq!(config.calls.borrow().len(), 1);
    }

    #[test]
    fn status_without_manifest_is_empty() {
        let (_dir, paths) = workspace();
        fs::write(&paths.template_file, "# partner-id: brett\n").unwrap();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);
        assert!(partner.template_status().unwrap().is_empty());
    }

    #[test]
    fn clear_is_idempotent_and_swallows_unset_failure() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig {
            unset_fails: true,
            ..Default::default()
        };
        let partner = Partner::with_config(paths, &config);

        partner.template_clear().unwrap();
        partner.template_clear().unwrap();
        assert!(!partner.paths.template_file.exists());
        assert_eq!(config.calls.borrow().len(), 2);
    }

    #[test]
    fn fetch_add_is_all_or_nothing() {
        let (_dir, paths) = workspace();
        let config = RecordingConfig::default();
        let partner = Partner::with_config(paths, &config);

        let err = partner
            .manifest_fetch_add(&StubFetcher, &["octocat", "ghost"])
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound { .. }));
        assert!(!partner.paths.manifest_file.exists());

        partner.manifest_fetch_add(&StubFetcher, &["octocat"]).unwrap();
        partner.template_set(&["octocat"]).unwrap();
        let active = partner.template_status().unwrap();
        assert_eq!(active[0].kind, CoauthorType::GitHub);
        assert_eq!(active[0].email, "1+octocat@users.noreply.github.com");
    }

    #[test]
    fn unique_ids_keeps_first_occurrence() {
        let merged = unique_ids(["b", "a", "B", "c", "a"].map(String::from));
        assert_eq!(merged, vec!["b", "a", "c"]);
    }
}
