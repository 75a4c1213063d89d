// src/visualize.rs
// =============================================================================
// One visualization run, start to finish.
//
// Steps:
// 1. Parse the repository URL                     (abort on failure)
// 2. Check the token and the rate limit           (debug only, log only)
// 3. Look the repository up                       (abort on failure)
// 4. Walk the tree                                (skips bad directories)
// 5. Write DOT + render PNG                       (log only)
// 6. Open the image if --view was given           (log only)
// =============================================================================

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::config::VisualizeConfig;
use crate::error::Result;
use crate::github::{parse_repository_url, GitHubClient, RepositoryReference};
use crate::tree::{rasterize, to_dot, walk_repository, write_source, RemoteContents, SkippedSubtree};

/// What a finished run produced
#[derive(Debug, Serialize)]
pub struct VisualizationSummary {
    pub repository: RepositoryReference,
    pub nodes: usize,
    pub edges: usize,
    pub skipped: Vec<SkippedSubtree>,
    /// None when rendering failed
    pub image: Option<PathBuf>,
    /// None when the .dot file could not be written
    pub source: Option<PathBuf>,
}

pub async fn visualize(config: &VisualizeConfig) -> Result<VisualizationSummary> {
    debug!(url = %config.repository_url, "Repository URL");
    debug!(
        "Token provided: {}",
        if config.access_token.is_some() { "Yes" } else { "No" }
    );

    let reference = parse_repository_url(&config.repository_url)?;
    debug!(owner = %reference.owner, repository = %reference.name, "Parsed repository URL");

    let client = GitHubClient::new(config.api_url.clone(), config.access_token.as_deref())?;

    if config.debug {
        if config.access_token.is_some() {
            client.verify_credentials().await;
        }

        match client.rate_limit().await {
            Ok(limit) => info!("API Rate Limit: {}/{}", limit.remaining, limit.limit),
            Err(e) => warn!("Could not read rate limit: {}", e),
        }
    }

    let handle = client.resolve_repository(&reference).await?;

    let lister = RemoteContents::new(&client, &handle);
    let report = walk_repository(&lister, config.max_depth).await;

    info!(
        nodes = report.graph.len(),
        edges = report.graph.edge_count(),
        skipped = report.skipped.len(),
        duplicates = report.graph.duplicates(),
        "Walked repository"
    );
    if report.graph.is_empty() {
        warn!("No visible files found in {}", reference);
    }

    let dot = to_dot(&report.graph, &reference.full_name());

    let source = match write_source(&dot, &config.output_file).await {
        Ok(source) => Some(source),
        Err(e) => {
            error!("Error saving graph description: {}", e);
            None
        }
    };

    let image = match &source {
        Some(source) => match rasterize(source, &config.output_file, &config.dot_binary).await {
            Ok(image) => Some(image),
            Err(e) => {
                error!("Error saving visualization: {}", e);
                None
            }
        },
        None => None,
    };

    if config.view {
        if let Some(image) = &image {
            if let Err(e) = open::that(image) {
                warn!("Could not open {}: {}", image.display(), e);
            }
        }
    }

    Ok(VisualizationSummary {
        repository: reference,
        nodes: report.graph.len(),
        edges: report.graph.edge_count(),
        skipped: report.skipped,
        image,
        source,
    })
}
