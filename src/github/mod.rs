// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to (or about) GitHub.
//
// Currently implements:
// - Parsing repository URLs (HTTPS and SSH) into owner/repo
// - A small REST client: token check, rate limit, repository lookup and
//   directory listings via the contents API
//
// The tree walker never sees the client directly, it goes through the
// DirectoryLister trait (see src/tree/walk.rs) so it can be tested offline.
// =============================================================================

mod client;
mod types;
mod repo_url;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use types::{ContentEntry, ContentType, RepositoryHandle, RepositoryReference};
pub use repo_url::parse_repository_url;
