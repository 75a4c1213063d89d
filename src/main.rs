// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing), more verbose with --debug
// 3. Run one visualization (src/visualize.rs)
// 4. Print a summary, as a table-like text or as JSON
// 5. Exit with proper code (0 = image produced or run finished, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - options of one run
mod error;         // src/error.rs - typed errors
mod github;        // src/github/ - URL parsing and the REST client
mod tree;          // src/tree/ - walking and drawing the tree
mod visualize;     // src/visualize.rs - the pipeline

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::VisualizeConfig;
use tracing::Level;
use visualize::VisualizationSummary;

#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Anything that aborted the run ends up here as one line
            eprintln!("\nError: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let config = VisualizeConfig::from(Cli::parse());

    init_logging(config.debug);

    if !config.json {
        println!("🔍 Visualizing repository: {}", config.repository_url);
    }

    let summary = visualize::visualize(&config).await?;

    print_summary(&summary, config.json)?;

    Ok(0)
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &VisualizationSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("📊 Summary for {}:", summary.repository);
    println!("   📄 Nodes: {}", summary.nodes);
    println!("   🔗 Edges: {}", summary.edges);

    if !summary.skipped.is_empty() {
        println!("   ⚠️  Skipped directories: {}", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("      {} ({:?})", display_path(&skipped.path), skipped.reason);
        }
    }

    match &summary.image {
        Some(image) => println!("\n✅ Visualization saved as {}", image.display()),
        None => println!("\n❌ No image was rendered"),
    }
    if let Some(source) = &summary.source {
        println!("   Graph description: {}", source.display());
    }

    Ok(())
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
