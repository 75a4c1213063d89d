// src/github/repo_url.rs
// =============================================================================
// Turns the repository URL the user typed into an owner/name pair.
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - http://github.example.com/owner/repo/   (one trailing slash is fine)
//   - git@github.com:owner/repo.git
//
// Anything else (missing owner, missing repo, extra path segments such as
// /tree/main, other schemes) is rejected with InvalidUrlFormat.
// The host is not checked, so GitHub Enterprise URLs work too.
// =============================================================================

use crate::error::{Result, VisualizerError};
use crate::github::types::RepositoryReference;
use url::Url;

/// Parses a repository URL into a RepositoryReference
///
/// Example:
///   "https://github.com/rust-lang/rust" -> rust-lang/rust
pub fn parse_repository_url(input: &str) -> Result<RepositoryReference> {
    let input = input.trim();

    let path = if let Some(rest) = input.strip_prefix("git@") {
        // SSH form: everything after the first ':' is the path
        match rest.split_once(':') {
            Some((host, path)) if !host.is_empty() => path.to_string(),
            _ => return Err(invalid(input)),
        }
    } else {
        let parsed = Url::parse(input).map_err(|_| invalid(input))?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid(input));
        }

        // Url always gives us a path starting with '/'
        parsed
            .path()
            .strip_prefix('/')
            .unwrap_or(parsed.path())
            .to_string()
    };

    let path = path.strip_suffix('/').unwrap_or(&path);
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();

    match segments.as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => {
            Ok(RepositoryReference::new(*owner, *name))
        }
        _ => Err(invalid(input)),
    }
}

fn invalid(input: &str) -> VisualizerError {
    VisualizerError::InvalidUrlFormat(input.to_string())
}
