// src/config.rs
// =============================================================================
// The options of one visualization run.
//
// Everything the pipeline needs is in VisualizeConfig. It is built from the
// command line, nothing is read from the environment or from config files.
// =============================================================================

use std::path::PathBuf;
use url::Url;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct VisualizeConfig {
    pub repository_url: String,
    pub access_token: Option<String>,
    /// Base name of the output files (.png and .dot are appended)
    pub output_file: PathBuf,
    pub debug: bool,
    pub max_depth: usize,
    pub api_url: Url,
    pub dot_binary: String,
    pub view: bool,
    pub json: bool,
}

impl From<Cli> for VisualizeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            repository_url: cli.repo_url,
            // surrounding whitespace is dropped, an empty --token "" means no token
            access_token: cli
                .token
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty()),
            output_file: cli.output,
            debug: cli.debug,
            max_depth: cli.max_depth,
            api_url: cli.api_url,
            dot_binary: cli.dot_bin,
            view: cli.view,
            json: cli.json,
        }
    }
}
