//! Manage a list of Git coauthors and activate them for the next commit
//! through a generated commit message template.

pub mod cli;
pub mod coauthor;
pub mod command;
pub mod config;
pub mod error;
pub mod fetch;
pub mod git;
pub mod manifest;
pub mod menu;
pub mod table;
pub mod template;
pub mod validation;
