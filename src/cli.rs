// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). The parsed Cli is turned
// into a VisualizeConfig (src/config.rs) before anything else runs.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::github::DEFAULT_API_URL;
use crate::tree::DEFAULT_MAX_DEPTH;

#[derive(Parser, Debug)]
#[command(
    name = "repo-visualizer",
    version,
    about = "Draw a GitHub repository's file tree as a directory graph",
    long_about = "repo-visualizer walks a GitHub repository through the REST API and renders \
                  its directories and files as a left-to-right graph (PNG, via Graphviz)."
)]
pub struct Cli {
    /// Repository URL (https://github.com/owner/repo or git@github.com:owner/repo.git)
    pub repo_url: String,

    /// GitHub access token, needed for private repositories and higher rate limits
    #[arg(long)]
    pub token: Option<String>,

    /// Output file name without extension; writes <OUTPUT>.png and <OUTPUT>.dot
    #[arg(short, long, default_value = "repo_visualization")]
    pub output: PathBuf,

    /// Print debug information (token scopes, rate limit, every request)
    #[arg(long)]
    pub debug: bool,

    /// Do not list directories nested deeper than this
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// GitHub API root, e.g. https://github.example.com/api/v3 for Enterprise
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Graphviz `dot` executable used for rendering
    #[arg(long, default_value = "dot")]
    pub dot_bin: String,

    /// Open the rendered image when done
    #[arg(long)]
    pub view: bool,

    /// Print a JSON summary instead of the human-readable one
    #[arg(long)]
    pub json: bool,
}
