//! mapscope CLI
//!
//! - `detect`: report which mapping format a document is in
//! - `parse`: normalize a mapping document (RML, YARRRML, inline v1/v2)
//! - `config`: load a config that is inline or points at an external mapping file
//! - `graph`: build the bounded ontology graph, optionally tagged with mapping coverage

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use mapscope_graph::{build_graph_elements, coverage_from_mapping, GraphConfig, OntologyPayload};
use mapscope_ingest::{
    detect_format, load_mapping_config, parse_mapping_document, FsFetcher, IdentifierStrategy,
    ParseOptions, ParseOutcome,
};

mod report;

#[derive(Parser)]
#[command(name = "mapscope")]
#[command(author, version, about = "Inspect and normalize tabular-to-ontology mappings")]
struct Cli {
    /// Emit parser diagnostics at DEBUG level.
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected format of a mapping document.
    Detect {
        input: PathBuf,
    },

    /// Normalize a mapping document and print it as JSON.
    Parse {
        input: PathBuf,
        /// Write JSON here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print a human-readable summary instead of JSON.
        #[arg(long)]
        summary: bool,
        /// Accept `<Id>` and `prefix:Id` triple maps in the same RML document.
        #[arg(long)]
        merge_identifiers: bool,
    },

    /// Load a mapping config (inline v1/v2, or `mapping.file` wrapper).
    Config {
        input: PathBuf,
        /// Directory holding externally referenced mapping files
        /// (default: the config's own directory).
        #[arg(long)]
        base_dir: Option<PathBuf>,
        #[arg(long)]
        summary: bool,
    },

    /// Build ontology graph elements as JSON.
    Graph {
        /// Ontology JSON: `{ "classes": [...], "properties": [...] }`.
        #[arg(long)]
        ontology: PathBuf,
        /// Mapping document used to tag mapped classes/properties.
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Graph settings file (JSON or YAML).
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long)]
        max_classes: Option<usize>,
        #[arg(long)]
        max_properties: Option<usize>,
        #[arg(long)]
        no_stubs: bool,
        #[arg(long)]
        allow_data_properties: bool,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "mapscope_ingest={level},mapscope_graph={level},mapscope={level}"
        )))
        .with_writer(std::io::stderr)
        .init();

    let options = ParseOptions::default().with_debug(cli.debug);

    match cli.command {
        Commands::Detect { input } => cmd_detect(&input),
        Commands::Parse {
            input,
            out,
            summary,
            merge_identifiers,
        } => {
            let options = if merge_identifiers {
                options.with_identifier_strategy(IdentifierStrategy::Merged)
            } else {
                options
            };
            cmd_parse(&input, out.as_deref(), summary, &options)
        }
        Commands::Config {
            input,
            base_dir,
            summary,
        } => cmd_config(&input, base_dir, summary, &options).await,
        Commands::Graph {
            ontology,
            mapping,
            settings,
            max_classes,
            max_properties,
            no_stubs,
            allow_data_properties,
            out,
        } => {
            let mut config = match settings {
                Some(path) => load_graph_settings(&path)?,
                None => GraphConfig::default(),
            };
            if let Some(n) = max_classes {
                config.max_classes = n;
            }
            if let Some(n) = max_properties {
                config.max_properties = n;
            }
            if no_stubs {
                config.include_stubs = false;
            }
            if allow_data_properties {
                config.allow_data_properties = true;
            }
            config.debug |= cli.debug;
            cmd_graph(&ontology, mapping.as_deref(), config, out.as_deref(), &options)
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_detect(input: &Path) -> Result<()> {
    let text = read_input(input)?;
    println!("{}", detect_format(&text));
    Ok(())
}

fn cmd_parse(input: &Path, out: Option<&Path>, summary: bool, options: &ParseOptions) -> Result<()> {
    let text = read_input(input)?;
    let outcome = parse_mapping_document(&text, options);
    emit_outcome(input, outcome, out, summary)
}

async fn cmd_config(
    input: &Path,
    base_dir: Option<PathBuf>,
    summary: bool,
    options: &ParseOptions,
) -> Result<()> {
    let text = read_input(input)?;
    let base_dir = base_dir.unwrap_or_else(|| {
        input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let fetcher = FsFetcher::new(base_dir);
    let outcome = load_mapping_config(&text, &fetcher, options).await;
    emit_outcome(input, outcome, None, summary)
}

fn emit_outcome(input: &Path, outcome: ParseOutcome, out: Option<&Path>, summary: bool) -> Result<()> {
    let mapping = match outcome {
        ParseOutcome::Parsed(mapping) => mapping,
        ParseOutcome::Unrecognized => {
            return Err(anyhow!("{}: unrecognized mapping format", input.display()));
        }
        ParseOutcome::Failed { format, message } => {
            let format = format.map(|f| f.to_string()).unwrap_or_else(|| "config".to_string());
            return Err(anyhow!("{}: {format} mapping could not be parsed: {message}", input.display()));
        }
    };

    if mapping.is_empty() {
        eprintln!(
            "{} {}: no sources recognized",
            "warning".yellow().bold(),
            input.display()
        );
    }

    if summary {
        report::print_mapping_summary(&mapping);
        return Ok(());
    }
    write_json(&serde_json::to_string_pretty(&mapping)?, out)
}

fn load_graph_settings(path: &Path) -> Result<GraphConfig> {
    let text = read_input(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let config = if is_json {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    Ok(config)
}

fn cmd_graph(
    ontology: &Path,
    mapping: Option<&Path>,
    mut config: GraphConfig,
    out: Option<&Path>,
    options: &ParseOptions,
) -> Result<()> {
    let payload = OntologyPayload::from_json(&read_input(ontology)?)
        .with_context(|| format!("invalid ontology JSON in {}", ontology.display()))?;

    if let Some(path) = mapping {
        match parse_mapping_document(&read_input(path)?, options) {
            ParseOutcome::Parsed(parsed) => {
                config = config.with_coverage(coverage_from_mapping(&parsed));
            }
            _ => {
                eprintln!(
                    "{} {}: mapping not usable, coverage left unmapped",
                    "warning".yellow().bold(),
                    path.display()
                );
            }
        }
    }

    let elements = build_graph_elements(&payload.classes, &payload.properties, &config);
    report::print_graph_counts(&elements);
    write_json(&serde_json::to_string_pretty(&elements)?, out)
}

fn write_json(json: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{json}"),
    }
    Ok(())
}
