use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use eventmap_facts::FactStore;
use eventmap_model::Project;
use eventmap_render::{render_dot, write_json, DomainGraph, RenderConfig};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

mod summary;

#[derive(Parser)]
#[command(name = "eventmap")]
#[command(about = "Map the event flow of an event-sourced application from source facts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the event flow as a Graphviz DOT digraph
    Dot(DotArgs),

    /// Write the assembled project as JSON
    Json(JsonArgs),

    /// Print entity and fact counts as JSON
    Summary(InputArgs),

    /// List everything downstream of one identity (events, subscribers, ...)
    Trace(TraceArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Fact file (JSON array or JSON Lines); `-` reads stdin
    facts: PathBuf,
}

#[derive(Args)]
struct DotArgs {
    #[command(flatten)]
    input: InputArgs,

    /// TOML render configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct JsonArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Single-line output instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct TraceArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Fully qualified identity to start from
    identity: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Dot(args) => run_dot(args),
        Commands::Json(args) => run_json(args),
        Commands::Summary(args) => run_summary(args),
        Commands::Trace(args) => run_trace(args),
    }
}

fn run_dot(args: DotArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load render config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let project = load_project(&args.input.facts)?;
    let dot = render_dot(&project, &config);

    match &args.output {
        Some(path) => {
            fs::write(path, dot).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Graph written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(dot.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn run_json(args: JsonArgs) -> Result<()> {
    let project = load_project(&args.input.facts)?;
    let pretty = !args.compact;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_json(&mut writer, &project, pretty)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            writer.flush()?;
            log::info!("Project written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            write_json(&mut stdout, &project, pretty).context("Failed to write project")?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}

fn run_summary(args: InputArgs) -> Result<()> {
    let facts = load_facts(&args.facts)?;
    let project = Project::from_facts(&facts);

    let report = summary::Summary::new(&facts, &project);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn run_trace(args: TraceArgs) -> Result<()> {
    let project = load_project(&args.input.facts)?;
    let graph = DomainGraph::from_project(&project);

    let Some(start) = graph.find_node(&args.identity).and_then(|idx| graph.get_node(idx)) else {
        anyhow::bail!("Unknown identity: {}", args.identity);
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{} [{}] {}", start.label, start.role.as_str(), start.identity)?;
    for (node, depth) in graph.downstream(&args.identity) {
        writeln!(
            stdout,
            "{}{} [{}] {}",
            "  ".repeat(depth),
            node.label,
            node.role.as_str(),
            node.identity
        )?;
    }

    Ok(())
}

fn load_project(path: &Path) -> Result<Project> {
    let facts = load_facts(path)?;
    Ok(Project::from_facts(&facts))
}

fn load_facts(path: &Path) -> Result<FactStore> {
    let facts = if path == Path::new("-") {
        FactStore::from_reader(io::stdin().lock()).context("Failed to read facts from stdin")?
    } else {
        FactStore::load(path)
            .with_context(|| format!("Failed to load facts from {}", path.display()))?
    };

    log::debug!("Fact counts: {:?}", facts.kind_counts());

    Ok(facts)
}
