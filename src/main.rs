use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wand_config::{GraphSpec, RunRequest};
use wand_engine::RunService;
use wand_registry::Registry;
use wand_store::FsRunStore;
use wand_workflow::Workflow;

/// Wand - run graphs of agents with retries, timeouts and bounded concurrency
#[derive(Parser)]
#[command(name = "wand")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.wand)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Execute a graph and record the run
  Run {
    /// Path to a run request or bare graph (JSON); reads stdin when omitted
    file: Option<PathBuf>,

    /// Override the request's concurrency cap
    #[arg(long)]
    concurrency: Option<usize>,
  },

  /// Check a graph and print its layers without running it
  Validate {
    /// Path to a run request or bare graph (JSON); reads stdin when omitted
    file: Option<PathBuf>,
  },

  /// Print a recorded run
  Show {
    /// The run ID to print
    run_id: String,
  },

  /// List recorded runs
  Runs,

  /// List available agents and tools
  Agents,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".wand"),
  };

  match cli.command {
    Some(Commands::Run { file, concurrency }) => run(file, concurrency, data_dir)?,
    Some(Commands::Validate { file }) => validate(file)?,
    Some(Commands::Show { run_id }) => block_on(show(run_id, data_dir))?,
    Some(Commands::Runs) => block_on(runs(data_dir))?,
    Some(Commands::Agents) => agents(),
    None => {
      println!("wand - use --help to see available commands");
    }
  }

  Ok(())
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(future)
}

fn service(data_dir: &Path) -> RunService {
  let store = FsRunStore::new(data_dir);
  RunService::new(Arc::new(Registry::builtin()), Arc::new(store))
}

fn run(file: Option<PathBuf>, concurrency: Option<usize>, data_dir: PathBuf) -> Result<()> {
  let mut request = load_request(file.as_deref())?;
  if let Some(concurrency) = concurrency {
    request.concurrency = concurrency;
  }

  eprintln!(
    "Loaded graph with {} nodes and {} edges",
    request.graph.nodes.len(),
    request.graph.edges.len()
  );

  block_on(async move {
    let record = service(&data_dir)
      .execute(request)
      .await
      .context("failed to record run")?;

    eprintln!("Run {} {}", record.run_id, record.status);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
  })
}

fn validate(file: Option<PathBuf>) -> Result<()> {
  let request = load_request(file.as_deref())?;
  let workflow = Workflow::from_spec(request.graph).context("graph is invalid")?;

  println!("Graph is valid: {} nodes", workflow.len());
  for (index, layer) in workflow.layers().iter().enumerate() {
    println!("  layer {}: {}", index, layer.join(", "));
  }

  Ok(())
}

async fn show(run_id: String, data_dir: PathBuf) -> Result<()> {
  let record = service(&data_dir)
    .get(&run_id)
    .await
    .with_context(|| format!("failed to load run '{}'", run_id))?;

  println!("{}", serde_json::to_string_pretty(&record)?);
  Ok(())
}

async fn runs(data_dir: PathBuf) -> Result<()> {
  let records = service(&data_dir)
    .list()
    .await
    .context("failed to list runs")?;

  if records.is_empty() {
    println!("No runs recorded in {}", data_dir.display());
    return Ok(());
  }

  for record in records {
    println!(
      "{}  {:<9}  {}",
      record.run_id,
      record.status.to_string(),
      record.started_at.to_rfc3339()
    );
  }

  Ok(())
}

fn agents() {
  let registry = Registry::builtin();

  println!("Agents:");
  for name in registry.agent_names() {
    println!("  {}", name);
  }

  println!("Tools:");
  for name in registry.tool_names() {
    println!("  {}", name);
  }
}

/// Read a run request from a file, or from stdin when no file is given.
///
/// A document without a `graph` key is treated as a bare graph and run with
/// the default concurrency.
fn load_request(file: Option<&Path>) -> Result<RunRequest> {
  let (content, source) = match file {
    Some(path) => (
      std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file: {}", path.display()))?,
      path.display().to_string(),
    ),
    None => {
      let mut input = String::new();
      io::stdin()
        .read_to_string(&mut input)
        .context("failed to read graph from stdin")?;
      (input, "stdin".to_string())
    }
  };

  let document: serde_json::Value =
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", source))?;

  if document.get("graph").is_some() {
    serde_json::from_value(document).with_context(|| format!("invalid run request: {}", source))
  } else {
    let graph: GraphSpec =
      serde_json::from_value(document).with_context(|| format!("invalid graph: {}", source))?;
    Ok(RunRequest::new(graph))
  }
}
