use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tracing::debug;

use crate::error::AppError;

/// Git config key holding the default commit message file
const COMMIT_TEMPLATE_KEY: &str = "commit.template";

/// Commit template configuration of a repository
pub trait TemplateConfig {
    /// Makes `template` the default message for the next commit in `root`
    fn set_commit_template(&self, root: &Path, template: &Path) -> Result<(), AppError>;
    /// Removes the commit template setting from `root`
    fn unset_commit_template(&self, root: &Path) -> Result<(), AppError>;
}

/// [`TemplateConfig`] backed by the `git` executable
#[derive(Debug, Default, Clone, Copy)]
pub struct GitConfig;

impl TemplateConfig for GitConfig {
    fn set_commit_template(&self, root: &Path, template: &Path) -> Result<(), AppError> {
        set_commit_template(root, template)
    }

    fn unset_commit_template(&self, root: &Path) -> Result<(), AppError> {
        unset_commit_template(root)
    }
}

/// Runs git in `dir` and returns its stdout
///
/// # Arguments
/// * `dir` - Directory to run git in
/// * `args` - Arguments passed to git
fn run_git<I, S>(dir: &Path, args: I) -> Result<String, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let git_command_output: Output = Command::new("git").current_dir(dir).args(args).output()?;

    if !git_command_output.status.success() {
        return Err(AppError::GitCommand(
            String::from_utf8(git_command_output.stderr)?.trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&git_command_output.stdout).to_string())
}

/// Finds the top-level directory of the repository containing `dir`
pub fn repository_root(dir: &Path) -> Result<PathBuf, AppError> {
    let root = run_git(dir, ["rev-parse", "--show-toplevel"])?;
    Ok(PathBuf::from(root.trim()))
}

/// Points `commit.template` of the repository at `root` to `template`
pub fn set_commit_template(root: &Path, template: &Path) -> Result<(), AppError> {
    debug!(root = %root.display(), template = %template.display(), "setting commit template");
    run_git(
        root,
        [OsStr::new("config"), OsStr::new(COMMIT_TEMPLATE_KEY), template.as_os_str()],
    )?;
    Ok(())
}

/// Removes `commit.template` from the repository at `root`
///
/// Fails if the key was never set; callers that only care about the end
/// state can ignore the error.
pub fn unset_commit_template(root: &Path) -> Result<(), AppError> {
    debug!(root = %root.display(), "unsetting commit template");
    run_git(root, ["config", "--unset", COMMIT_TEMPLATE_KEY])?;
    Ok(())
}
