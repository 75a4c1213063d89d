// src/error.rs
// =============================================================================
// Error types shared by the URL parser, the GitHub client and the renderer.
//
// The top of the binary (main.rs) works with anyhow, but the modules below it
// return this typed enum so the pipeline can decide which failures abort the
// run and which ones are only logged.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualizerError {
    #[error("Invalid GitHub repository URL format: {0}")]
    InvalidUrlFormat(String),

    #[error("Invalid token or token has been revoked")]
    InvalidCredentials,

    #[error(
        "Repository '{full_name}' not found. Please verify:\n\
         1. The repository exists\n\
         2. Your access token has the 'repo' scope for private repositories\n\
         3. You have access to this repository in your GitHub account\n\
         4. The repository name is correct (case-sensitive)"
    )]
    RepositoryNotFound { full_name: String },

    #[error(
        "Access denied to repository '{full_name}'. Please verify:\n\
         1. The token has sufficient permissions (needs 'repo' scope)\n\
         2. You are a collaborator on this repository\n\
         3. The organization allows your token access (check organization settings)"
    )]
    RepositoryAccessDenied { full_name: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VisualizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_every_cause() {
        let err = VisualizerError::RepositoryNotFound {
            full_name: "octocat/Hello-World".to_string(),
        };
        let message = err.to_string();

        assert!(message.starts_with("Repository 'octocat/Hello-World' not found"));
        assert!(message.contains("1. The repository exists"));
        assert!(message.contains("'repo' scope"));
        assert!(message.contains("3. You have access"));
        assert!(message.contains("case-sensitive"));
        assert_eq!(message.lines().count(), 5);
    }

    #[test]
    fn test_access_denied_is_multi_line() {
        let err = VisualizerError::RepositoryAccessDenied {
            full_name: "octocat/secret".to_string(),
        };
        assert_eq!(err.to_string().lines().count(), 4);
    }
}
