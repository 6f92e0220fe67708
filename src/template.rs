use std::{fmt::Write as _, fs, io::ErrorKind, path::Path};

use tracing::debug;

use crate::{coauthor::Coauthor, error::AppError};

/// Comment prefix that marks which coauthor the following trailer belongs to
const MARKER_PREFIX: &str = "# partner-id: ";
const HEADER: &str = "# Managed by partner";
const TRAILER_KEY: &str = "Co-Authored-By";

/// Reads the IDs of the coauthors active in the commit template at `path`
///
/// IDs are returned in file order, duplicates included. A missing file has
/// no active coauthors.
pub fn extract_active_ids(path: &Path) -> Result<Vec<String>, AppError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    let ids = parse_active_ids(&contents);
    debug!(path = %path.display(), ?ids, "read active coauthors");
    Ok(ids)
}

/// Scans template text for marker lines; anything else is ignored
pub fn parse_active_ids(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix(MARKER_PREFIX))
        .map(str::trim_end)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders the template body for `coauthors`, in the order given
///
/// No coauthors renders nothing at all.
pub fn render(coauthors: &[Coauthor]) -> String {
    if coauthors.is_empty() {
        return String::new();
    }

    let mut out = format!("\n\n{HEADER}\n#\n");
    for coauthor in coauthors {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{MARKER_PREFIX}{}", coauthor.id);
        let _ = writeln!(out, "{TRAILER_KEY}: {:?} <{}>", coauthor.name, coauthor.email);
    }
    out
}

/// Overwrites the template at `path` with the rendering of `coauthors`
pub fn save(path: &Path, coauthors: &[Coauthor]) -> Result<(), AppError> {
    fs::write(path, render(coauthors))?;
    debug!(path = %path.display(), count = coauthors.len(), "wrote commit template");
    Ok(())
}
