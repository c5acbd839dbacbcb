//! tiergraph CLI
//!
//! Usage:
//!   tiergraph serve [OPTIONS]
//!   tiergraph chart [OPTIONS]
//!   tiergraph list  [OPTIONS]

use std::io::{Write, stdout};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use tiergraph::{
    ExportPaths, FieldPair, TierGraphConfig, build_graph, export_chart_report,
    find_config_file, load_config_file,
    web::{AppState, ServerConfig, start_server},
};

/// tiergraph - Pay tier vs. experience as an adjacency list and a chart
#[derive(Parser, Debug)]
#[command(name = "tiergraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the adjacency list page over HTTP
    Serve(ServeArgs),
    /// Export the stacked bar chart and its HTML report
    Chart(ChartArgs),
    /// Print the grouped adjacency list
    List(ListArgs),
}

/// Options shared by every command
#[derive(Args, Debug)]
struct InputArgs {
    /// Input CSV file (default: Employee_cleaned.csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Config file path (default: search for .tiergraph.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Column holding the pay tier
    #[arg(long)]
    source_field: Option<String>,

    /// Column holding the years of experience
    #[arg(long)]
    destination_field: Option<String>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Port for web server (default: 5000)
    #[arg(long)]
    port: Option<u16>,

    /// Open the browser once the server is listening
    #[arg(long)]
    open: bool,
}

#[derive(Args, Debug)]
struct ChartArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output PNG file
    #[arg(long)]
    image: Option<PathBuf>,

    /// Output HTML report
    #[arg(long)]
    html: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Input settings after applying CLI > config > defaults
struct Resolved {
    config: TierGraphConfig,
    input: PathBuf,
    fields: FieldPair,
}

impl InputArgs {
    fn resolve(&self) -> Resolved {
        let config = load_or_default(self.config.as_ref());

        let input = self
            .input
            .clone()
            .unwrap_or_else(|| config.input.file.clone());
        let mut fields = config.input.fields();
        if let Some(source) = &self.source_field {
            fields.source = source.clone();
        }
        if let Some(destination) = &self.destination_field {
            fields.destination = destination.clone();
        }

        Resolved {
            config,
            input,
            fields,
        }
    }
}

fn load_or_default(explicit: Option<&PathBuf>) -> TierGraphConfig {
    let path = match explicit {
        Some(path) => Some(path.clone()),
        None => std::env::current_dir()
            .ok()
            .and_then(|dir| find_config_file(&dir)),
    };

    let Some(path) = path else {
        return TierGraphConfig::default();
    };

    match load_config_file(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            config
        }
        Err(e) => {
            eprintln!("Note: No config file loaded: {}", e);
            TierGraphConfig::default()
        }
    }
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args),
        Commands::Chart(args) => chart(args),
        Commands::List(args) => list(args),
    }
}

fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let resolved = args.input.resolve();

    let state = AppState {
        input: resolved.input,
        fields: resolved.fields,
    };
    let server_config = ServerConfig {
        port: args.port.unwrap_or(resolved.config.server.port),
        open_browser: args.open,
    };

    // Run the web server using tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(start_server(state, server_config))
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    Ok(())
}

fn chart(args: ChartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let resolved = args.input.resolve();
    let defaults = resolved.config.chart.export_paths();
    let paths = ExportPaths {
        image: args.image.unwrap_or(defaults.image),
        html: args.html.unwrap_or(defaults.html),
    };

    eprintln!("Reading '{}'...", resolved.input.display());

    let summary = match export_chart_report(&resolved.input, &resolved.fields, &paths) {
        Ok(summary) => summary,
        Err(e) if e.is_input_missing() => {
            return Err(format!("input file {} not found", resolved.input.display()).into());
        }
        Err(e) => return Err(e.into()),
    };

    eprintln!(
        "Tabulated {} records: {} tiers x {} experience values",
        summary.records,
        summary.tiers.len(),
        summary.experience_values.len()
    );
    eprintln!("Chart written to: {}", paths.image.display());
    eprintln!("Chart report written to: {}", paths.html.display());
    eprintln!("Open {} in a browser to view it.", paths.html.display());

    Ok(())
}

fn list(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let resolved = args.input.resolve();
    let view = build_graph(&resolved.input, &resolved.fields)?.grouped_adjacencies();

    let mut out = stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &view)?;
        writeln!(out)?;
        return Ok(());
    }

    for group in &view.groups {
        writeln!(out, "{}", group.source)?;
        for neighbor in &group.neighbors {
            writeln!(out, "  -> {} ({})", neighbor.destination, neighbor.count)?;
        }
    }

    Ok(())
}
