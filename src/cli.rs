use clap::{Parser, Subcommand};

use crate::fetch::{GITHUB_BASE_URL, GITLAB_BASE_URL};

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(name = "partner", version, about = "Manage git coauthors")]
pub struct Cli {
    /// Subcommand chosen to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Coauthor manifest operations
    #[command(subcommand)]
    Manifest(ManifestCommands),
    /// Set active coauthors
    #[command(visible_alias = "activate")]
    Set {
        /// IDs of coauthors to activate
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },
    /// Show active coauthors
    Status,
    /// Clear active coauthors
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ManifestCommands {
    /// Add a coauthor by manually entering their information
    Add {
        /// Identifier for referring to the coauthor
        #[arg(long)]
        id: String,
        /// Full name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
    },
    /// Add coauthors by fetching their information from GitHub
    #[command(name = "github-add", visible_alias = "gh-add")]
    GitHubAdd {
        /// GitHub usernames
        #[arg(required = true, value_name = "USERNAME")]
        usernames: Vec<String>,
        /// API root, for GitHub Enterprise
        #[arg(long, default_value = GITHUB_BASE_URL)]
        base_url: String,
    },
    /// Add coauthors by fetching their information from GitLab
    #[command(name = "gitlab-add", visible_alias = "gl-add")]
    GitLabAdd {
        /// GitLab usernames
        #[arg(required = true, value_name = "USERNAME")]
        usernames: Vec<String>,
        /// Instance root, for self-hosted GitLab
        #[arg(long, default_value = GITLAB_BASE_URL)]
        base_url: String,
    },
    /// List coauthors
    #[command(visible_alias = "ls")]
    List,
    /// Remove coauthors
    #[command(visible_alias = "rm")]
    Remove {
        /// IDs of coauthors to remove
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },
}
