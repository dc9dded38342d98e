//! Migmap CLI - scan repositories and plan their GCP migration.

mod scan;
mod source;
mod store;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use migmap_assess_schema::{PatternId, ScanRun};
use migmap_common::ScanFailure;
use std::path::PathBuf;
use store::Store;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "migmap")]
#[command(author, version, about = "Cloud migration assessment toolkit")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Record store directory
    #[arg(long, global = true, default_value = ".migmap")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan repositories and classify them into migration patterns
    Scan {
        /// Repositories to scan (owner/repo, or directory names with --local-root)
        #[arg(required = true)]
        repos: Vec<String>,

        /// Scan local directories under this root instead of GitHub
        #[arg(long)]
        local_root: Option<PathBuf>,

        /// GitHub token for API access
        #[arg(long, env = "MIGMAP_GITHUB_TOKEN")]
        token: Option<String>,
    },

    /// Show a scan run's status and summary
    Status {
        /// Run id (defaults to the latest run)
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Print the dependency graph for a run
    Graph {
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Print migration bundles for a run
    Bundles {
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Generate migration artifacts for every application in a run
    Plan {
        #[arg(long)]
        run_id: Option<String>,

        /// Output directory for generated artifacts
        #[arg(long, short)]
        out: PathBuf,
    },

    /// Search sampled code chunks by semantic similarity
    Search {
        /// Free-text query
        query: String,

        /// Number of results
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Manage per-pattern classification instructions
    Instructions {
        #[command(subcommand)]
        action: InstructionsCmd,
    },
}

#[derive(Subcommand)]
enum InstructionsCmd {
    /// Print all pattern instructions
    Get,
    /// Set the keyword instructions for one pattern
    Set {
        /// Pattern id (P1..P5)
        pattern: String,
        /// Comma-separated keywords
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let store = Store::open(&cli.store)?;

    match cli.command {
        Commands::Scan {
            repos,
            local_root,
            token,
        } => {
            let mut run = store.begin_run(repos)?;
            info!("Started scan run {}", run.id);

            match (local_root, token) {
                (Some(root), _) => {
                    let source = source::LocalDirSource::new(root);
                    scan::run_scan(&store, &source, &run.id).await?;
                }
                (None, Some(token)) => {
                    let source = source::GithubSource::new(token);
                    scan::run_scan(&store, &source, &run.id).await?;
                }
                (None, None) => {
                    scan::fail_run(&store, &mut run, ScanFailure::not_connected())?;
                }
            }

            let done = store.get_run(&run.id)?;
            print_json(&done)?;
        }

        Commands::Status { run_id } => {
            let run = resolve_run(&store, run_id)?;
            print_json(&run)?;
        }

        Commands::Graph { run_id } => {
            let run = resolve_run(&store, run_id)?;
            let apps = store.applications_for_run(&run.id)?;
            let graph = migmap_engine::graph::build_graph(&run.id, &apps);
            print_json(&graph)?;
        }

        Commands::Bundles { run_id } => {
            let run = resolve_run(&store, run_id)?;
            let apps = store.applications_for_run(&run.id)?;
            let bundles = migmap_engine::bundles::cluster_bundles(&apps);
            print_json(&bundles)?;
        }

        Commands::Plan { run_id, out } => {
            let run = resolve_run(&store, run_id)?;
            let apps = store.applications_for_run(&run.id)?;
            if apps.is_empty() {
                bail!("run {} has no applications to plan", run.id);
            }
            for app in &apps {
                let plan = migmap_planner::build_plan(app);
                migmap_planner::generate_artifacts(&plan, &out)?;
            }
            info!("Artifacts for {} applications written to {:?}", apps.len(), out);
        }

        Commands::Search { query, top } => {
            let query = query.trim();
            if query.is_empty() {
                bail!("query required");
            }
            let results = search_chunks(&store, query, top)?;
            print_json(&results)?;
        }

        Commands::Instructions { action } => match action {
            InstructionsCmd::Get => {
                print_json(&store.instructions()?)?;
            }
            InstructionsCmd::Set { pattern, text } => {
                let pattern_id: PatternId = pattern.parse()?;
                store.set_instruction(pattern_id, text)?;
                info!("Updated instructions for {pattern_id}");
            }
        },
    }

    Ok(())
}

fn resolve_run(store: &Store, run_id: Option<String>) -> anyhow::Result<ScanRun> {
    match run_id {
        Some(id) => Ok(store.get_run(&id)?),
        None => store
            .latest_run()?
            .context("no scan runs recorded yet"),
    }
}

#[derive(serde::Serialize)]
struct SearchHit {
    id: String,
    app_id: String,
    file_path: String,
    chunk_text: String,
    score: f64,
}

fn search_chunks(store: &Store, query: &str, top: usize) -> anyhow::Result<Vec<SearchHit>> {
    let q_vec = migmap_engine::embeddings::embed_text(query);
    let mut hits: Vec<SearchHit> = store
        .all_chunks()?
        .into_iter()
        .map(|c| {
            let score = migmap_engine::embeddings::cosine_similarity(&q_vec, &c.embedding);
            SearchHit {
                id: c.id,
                app_id: c.app_id,
                file_path: c.file_path,
                chunk_text: c.chunk_text,
                score: (score * 10_000.0).round() / 10_000.0,
            }
        })
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(top);
    Ok(hits)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
