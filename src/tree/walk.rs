// src/tree/walk.rs
// =============================================================================
// Depth-first walk of a repository's directory listings.
//
// How it works:
// 1. List the root directory ("")
// 2. For every entry that is not hidden (name starts with '.'):
//    - add a node (directories get a trailing '/' in their label)
//    - add an edge from the directory that listed it
//    - if it is a directory, walk into it before moving to the next entry
// 3. Entries are visited in the order the API returns them
//
// Failure policy:
// - a directory whose listing fails is logged and skipped, the rest of the
//   walk carries on
// - directories deeper than max_depth are drawn but not listed
// Every skipped directory is reported back in TraversalReport::skipped.
//
// Requests are made one at a time, the next listing only starts once the
// previous subtree is finished.
// =============================================================================

use crate::error::Result;
use crate::github::{ContentEntry, ContentType, GitHubClient, RepositoryHandle};
use crate::tree::graph::{flatten_path, GraphNode, RepoGraph, ROOT_ID};
use futures::future::{FutureExt, LocalBoxFuture};
use serde::Serialize;
use std::future::Future;
use tracing::{debug, error, warn};

/// Default recursion limit, far deeper than any real repository
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Something that can list a directory of a repository
///
/// The GitHub implementation is RemoteContents, tests use an in-memory map.
pub trait DirectoryLister {
    fn list_directory(&self, path: &str) -> impl Future<Output = Result<Vec<ContentEntry>>>;
}

/// Lists directories of one resolved repository through the GitHub API
pub struct RemoteContents<'a> {
    client: &'a GitHubClient,
    handle: &'a RepositoryHandle,
}

impl<'a> RemoteContents<'a> {
    pub fn new(client: &'a GitHubClient, handle: &'a RepositoryHandle) -> Self {
        Self { client, handle }
    }
}

impl DirectoryLister for RemoteContents<'_> {
    async fn list_directory(&self, path: &str) -> Result<Vec<ContentEntry>> {
        self.client.list_directory(self.handle, path).await
    }
}

/// Why a directory was not walked into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The listing request failed (message of the error)
    ListingFailed(String),
    /// The directory sits at the depth limit
    DepthLimit(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSubtree {
    pub path: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of visiting one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtreeOutcome {
    /// The directory was listed; `entries` counts the visible ones
    Listed { path: String, entries: usize },
    Skipped(SkippedSubtree),
}

/// Everything the walk produced
#[derive(Debug, Default)]
pub struct TraversalReport {
    pub graph: RepoGraph,
    pub skipped: Vec<SkippedSubtree>,
}

/// Walks the whole repository starting at the root
pub async fn walk_repository<L: DirectoryLister>(lister: &L, max_depth: usize) -> TraversalReport {
    let mut walker = TreeWalker {
        report: TraversalReport::default(),
        max_depth,
    };

    let root = walker
        .visit(lister, String::new(), ROOT_ID.to_string(), 0)
        .await;
    match root {
        SubtreeOutcome::Listed { path, entries } => {
            debug!(root = %display_path(&path), entries, "Finished walking repository")
        }
        SubtreeOutcome::Skipped(skipped) => {
            warn!(reason = ?skipped.reason, "Repository root could not be listed")
        }
    }

    walker.report
}

struct TreeWalker {
    report: TraversalReport,
    max_depth: usize,
}

impl TreeWalker {
    // Lists `path` and adds its children below `parent_id`.
    // Boxed because it calls itself for every subdirectory.
    fn visit<'a, L: DirectoryLister>(
        &'a mut self,
        lister: &'a L,
        path: String,
        parent_id: String,
        depth: usize,
    ) -> LocalBoxFuture<'a, SubtreeOutcome> {
        async move {
            if depth > self.max_depth {
                warn!(path = %path, max_depth = self.max_depth, "Depth limit reached, not listing");
                return self.skip(path, SkipReason::DepthLimit(self.max_depth));
            }

            let entries = match lister.list_directory(&path).await {
                Ok(entries) => entries,
                Err(e) => {
                    error!("Error processing {}: {}", display_path(&path), e);
                    return self.skip(path, SkipReason::ListingFailed(e.to_string()));
                }
            };

            let mut visible = 0;
            for entry in entries {
                if entry.is_hidden() {
                    continue;
                }
                visible += 1;

                let node_id = flatten_path(&entry.path);
                let (label, is_directory) = match entry.content_type {
                    ContentType::Dir => (format!("{}/", entry.name), true),
                    _ => (entry.name.clone(), false),
                };

                self.report.graph.add_node(GraphNode {
                    id: node_id.clone(),
                    label,
                    is_directory,
                });
                self.report.graph.add_edge(parent_id.as_str(), node_id.as_str());

                if is_directory {
                    self.visit(lister, entry.path, node_id, depth + 1).await;
                }
            }

            SubtreeOutcome::Listed {
                path,
                entries: visible,
            }
        }
        .boxed_local()
    }

    fn skip(&mut self, path: String, reason: SkipReason) -> SubtreeOutcome {
        let skipped = SkippedSubtree { path, reason };
        self.report.skipped.push(skipped.clone());
        SubtreeOutcome::Skipped(skipped)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is visit() not an `async fn`?
//    - An async fn that awaits itself would need a future of infinite size
//    - Returning LocalBoxFuture puts each level on the heap instead
//    - "Local" means the future is not Send, which is fine because we never
//      hand it to another thread
//
// 2. Why a trait for listing directories?
//    - walk_repository() only needs "give me the entries of this path"
//    - RemoteContents answers with GitHub, the tests answer from a HashMap
//    - `impl Future` in the trait lets implementations just write `async fn`
//
// 3. Why `for entry in entries` and not `.iter()`?
//    - We consume the Vec, so entry.path can be moved into the recursive call
//      without cloning
// -----------------------------------------------------------------------------
