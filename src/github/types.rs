// src/github/types.rs
// =============================================================================
// Data types exchanged with the GitHub REST API.
//
// - RepositoryReference: owner/name pair parsed from the user's URL
// - RepositoryHandle: what GitHub tells us about the repository
// - ContentEntry: one item of a directory listing (contents API)
// - RateLimit: the "core" bucket of /rate_limit
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner and repository name, e.g. ("octocat", "Hello-World")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
}

impl RepositoryReference {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// "owner/name", the form GitHub uses everywhere
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// Subset of GET /repos/{owner}/{repo}
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryHandle {
    pub full_name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub private: bool,
}

// The "type" field of a contents entry
//
// Only directories are walked into. Symlinks and submodules are drawn like
// plain files. Anything GitHub adds in the future lands in Other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

// One item from GET /repos/{owner}/{repo}/contents/{path}
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

impl ContentEntry {
    /// Dotfiles and dot-directories (.github, .gitignore, ...) are never drawn
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

// The contents endpoint answers with an array for directories and with a
// single object when the path points at a file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentsResponse {
    Listing(Vec<ContentEntry>),
    Single(ContentEntry),
}

impl ContentsResponse {
    pub(crate) fn into_entries(self) -> Vec<ContentEntry> {
        match self {
            ContentsResponse::Listing(entries) => entries,
            ContentsResponse::Single(entry) => vec![entry],
        }
    }
}

/// Core API quota for the current caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    /// Unix timestamp when the quota resets
    pub reset: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitResponse {
    pub(crate) resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitResources {
    pub(crate) core: RateLimit,
}

// GET /user, we only care about the login
#[derive(Debug, Deserialize)]
pub(crate) struct AuthenticatedUser {
    pub(crate) login: String,
}
