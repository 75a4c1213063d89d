// src/tree/render.rs
// =============================================================================
// Turns a RepoGraph into Graphviz DOT and rasterizes it with the `dot` tool.
//
// Output files for `--output repo_visualization`:
//   repo_visualization.dot   the graph description
//   repo_visualization.png   the rendered image
//
// Layout is left-to-right (rankdir=LR), every node is a rounded box and
// directories are filled light blue.
// =============================================================================

use crate::error::{Result, VisualizerError};
use crate::tree::graph::{GraphNode, RepoGraph};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Builds the DOT description of the graph
///
/// `root_label` is shown on the implicit root node, usually "owner/repo".
pub fn to_dot(graph: &RepoGraph, root_label: &str) -> String {
    DotDocument { graph, root_label }.to_string()
}

struct DotDocument<'a> {
    graph: &'a RepoGraph,
    root_label: &'a str,
}

impl fmt::Display for DotDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.graph.root();

        // Labels go through {:?} so quotes and backslashes come out escaped
        let node_attributes = |_: &DiGraph<GraphNode, ()>, (index, node): (NodeIndex, &GraphNode)| {
            if index == root {
                format!("label = {:?} shape=folder ", self.root_label)
            } else if node.is_directory {
                format!(
                    "label = {:?} fillcolor=lightblue style=\"rounded,filled\" ",
                    node.label
                )
            } else {
                format!("label = {:?} ", node.label)
            }
        };
        let edge_attributes =
            |_: &DiGraph<GraphNode, ()>, _: EdgeReference<'_, ()>| String::new();

        let body = Dot::with_attr_getters(
            self.graph.inner(),
            &[
                Config::NodeNoLabel,
                Config::EdgeNoLabel,
                Config::GraphContentOnly,
            ],
            &edge_attributes,
            &node_attributes,
        );

        writeln!(f, "// Repository Structure")?;
        writeln!(f, "digraph {{")?;
        writeln!(f, "    rankdir=LR")?;
        writeln!(f, "    node [shape=box style=rounded]")?;
        // Labels are disabled, so Debug and Display print the same thing
        write!(f, "{:?}", body)?;
        writeln!(f, "}}")
    }
}

/// Writes the graph description to `<output>.dot`
pub async fn write_source(dot_source: &str, output: &Path) -> Result<PathBuf> {
    let source = with_extension(output, "dot");
    tokio::fs::write(&source, dot_source).await?;
    debug!(source = %source.display(), "Wrote graph description");
    Ok(source)
}

/// Renders `source` to `<output>.png` with the given `dot` binary
pub async fn rasterize(source: &Path, output: &Path, dot_binary: &str) -> Result<PathBuf> {
    let image = with_extension(output, "png");

    let result = Command::new(dot_binary)
        .arg("-Tpng")
        .arg("-o")
        .arg(&image)
        .arg(source)
        .output()
        .await;

    let finished = match result {
        Ok(finished) => finished,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(VisualizerError::Render(format!(
                "Graphviz executable '{}' not found, install Graphviz or pass --dot-bin",
                dot_binary
            )));
        }
        Err(e) => {
            return Err(VisualizerError::Render(format!(
                "failed to run '{}': {}",
                dot_binary, e
            )));
        }
    };

    if !finished.status.success() {
        return Err(VisualizerError::Render(format!(
            "'{}' exited with {}: {}",
            dot_binary,
            finished.status,
            String::from_utf8_lossy(&finished.stderr).trim()
        )));
    }

    Ok(image)
}

// "out" -> "out.png", "dir/out.v1" -> "dir/out.v1.png"
fn with_extension(output: &Path, extension: &str) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::graph::ROOT_ID;

    fn sample_graph() -> RepoGraph {
        let mut graph = RepoGraph::default();
        graph.add_node(GraphNode {
            id: "README.md".to_string(),
            label: "README.md".to_string(),
            is_directory: false,
        });
        graph.add_node(GraphNode {
            id: "src".to_string(),
            label: "src/".to_string(),
            is_directory: true,
        });
        graph.add_edge(ROOT_ID, "README.md");
        graph.add_edge(ROOT_ID, "src");
        graph
    }

    #[test]
    fn test_dot_output() {
        let dot = to_dot(&sample_graph(), "octocat/Hello-World");

        assert!(dot.starts_with("// Repository Structure\ndigraph {\n"));
        assert!(dot.contains("    rankdir=LR\n"));
        assert!(dot.contains("    node [shape=box style=rounded]\n"));
        assert!(dot.contains("label = \"octocat/Hello-World\" shape=folder"));
        assert!(dot.contains("label = \"README.md\" ]"));
        assert!(dot.contains("label = \"src/\" fillcolor=lightblue style=\"rounded,filled\""));
        // root is node 0, README.md 1, src 2
        assert!(dot.contains("0 -> 1 ["));
        assert!(dot.contains("0 -> 2 ["));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut graph = RepoGraph::default();
        graph.add_node(GraphNode {
            id: "say_hi".to_string(),
            label: "say \"hi\"\\".to_string(),
            is_directory: false,
        });
        graph.add_edge(ROOT_ID, "say_hi");

        let dot = to_dot(&graph, "octocat/Hello-World");
        assert!(dot.contains("label = \"say \\\"hi\\\"\\\\\" ]"));
    }

    #[test]
    fn test_with_extension_keeps_dots() {
        assert_eq!(
            with_extension(Path::new("out/repo.v1"), "png"),
            PathBuf::from("out/repo.v1.png")
        );
    }

    #[tokio::test]
    async fn test_missing_binary_still_writes_source() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("repo_structure");
        let dot = to_dot(&sample_graph(), "octocat/Hello-World");

        let source = write_source(&dot, &output).await.unwrap();
        assert_eq!(source, dir.path().join("repo_structure.dot"));

        let result = rasterize(&source, &output, "definitely-not-a-graphviz-binary").await;

        match result {
            Err(VisualizerError::Render(message)) => assert!(message.contains("not found")),
            other => panic!("expected Render error, got {other:?}"),
        }

        let written = std::fs::read_to_string(&source).unwrap();
        assert_eq!(written, dot);
        assert!(!dir.path().join("repo_structure.png").exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("no-such-dir").join("repo");

        let result = write_source("digraph {}", &output).await;
        assert!(matches!(result, Err(VisualizerError::Io(_))));
    }
}
