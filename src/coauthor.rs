use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a coauthor record came from
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoauthorType {
    Manual,
    GitHub,
    GitLab,
}

impl CoauthorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoauthorType::Manual => "manual",
            CoauthorType::GitHub => "github",
            CoauthorType::GitLab => "gitlab",
        }
    }
}

impl fmt::Display for CoauthorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identity that can be credited as a commit coauthor
///
/// Field order matches the on-disk manifest layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Coauthor {
    /// Lookup identifier, compared case-insensitively
    pub id: String,
    /// Provider tag
    #[serde(rename = "type")]
    pub kind: CoauthorType,
    /// Display name used in the trailer
    pub name: String,
    /// Email address used in the trailer
    pub email: String,
}

impl Coauthor {
    pub fn manual(id: &str, name: &str, email: &str) -> Self {
        Coauthor {
            id: id.to_string(),
            kind: CoauthorType::Manual,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    /// Manifest key for this coauthor
    pub fn key(&self) -> String {
        self.id.to_lowercase()
    }
}
