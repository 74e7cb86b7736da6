//! spatial2ccf
//!
//! Builds the CCF spatial ontology from spatial registration records:
//! create the ontology once, mutate it once per input (in the order given),
//! write Turtle once.

use anyhow::{Context, Result};
use ccf_spatial::{OntologyConfig, SchemaVersion, SpatialOntology, UnknownTypePolicy};
use clap::{ArgAction, Parser};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod input;

use input::{InputSource, Loader};

#[derive(Parser, Debug)]
#[command(name = "spatial2ccf")]
#[command(
    author,
    version,
    about = "Convert spatial registration records (JSON-LD) into the CCF spatial ontology (Turtle)"
)]
struct Cli {
    /// IRI of the ontology being built
    #[arg(long, value_name = "IRI")]
    ontology_iri: String,

    /// Output Turtle file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Input location: http(s):// URL, file:// URL or local path (repeatable)
    #[arg(long = "input-url", value_name = "URL")]
    input_urls: Vec<String>,

    /// Local input file (repeatable); read after every `--input-url`
    #[arg(long = "input", value_name = "PATH")]
    inputs: Vec<PathBuf>,

    /// Record schema version: v1, v2, v3 or v4
    #[arg(long, value_name = "VERSION")]
    schema_version: Option<SchemaVersion>,

    /// What to do with unrecognized records: reject or skip
    #[arg(long, value_name = "POLICY")]
    unknown_types: Option<UnknownTypePolicy>,

    /// Rewrite `UBERON:` references the way V3 graphs were produced
    #[arg(long, value_name = "BOOL")]
    legacy_uberon_rewrite: Option<bool>,

    /// JSON file with an `OntologyConfig`; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Re-read the written file and compare it with the in-memory graph
    #[arg(long)]
    verify: bool,

    /// HTTP timeout for remote inputs
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// More log output (-v debug, -vv trace); `RUST_LOG` takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn ontology_config(&self) -> Result<OntologyConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                OntologyConfig::from_json_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => OntologyConfig::default(),
        };
        if let Some(version) = self.schema_version {
            config.schema_version = version;
        }
        if let Some(policy) = self.unknown_types {
            config.unknown_types = Some(policy);
        }
        if let Some(legacy) = self.legacy_uberon_rewrite {
            config.legacy_uberon_rewrite = Some(legacy);
        }
        Ok(config)
    }

    fn sources(&self) -> Result<Vec<InputSource>> {
        let mut sources = self
            .input_urls
            .iter()
            .map(|raw| InputSource::parse(raw))
            .collect::<Result<Vec<_>>>()?;
        sources.extend(self.inputs.iter().cloned().map(InputSource::File));
        Ok(sources)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.ontology_config()?;
    let sources = cli.sources()?;
    if sources.is_empty() {
        tracing::warn!("no inputs given; writing an ontology without records");
    }

    let loader = Loader::new(Some(Duration::from_secs(cli.timeout_secs)))?;
    let mut ontology = SpatialOntology::with_config(&cli.ontology_iri, config)?;

    for source in &sources {
        let data = loader.load(source)?;
        ontology
            .mutate(&data)
            .with_context(|| format!("failed to map records from {source}"))?;
        let batch = ontology.last_batch();
        eprintln!(
            "{} {} ({} records, {} skipped, +{} triples)",
            "read".green().bold(),
            source,
            batch.records,
            batch.skipped,
            batch.triples_added
        );
    }

    ontology
        .serialize(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    eprintln!(
        "{} {} ({} triples, schema {})",
        "wrote".green().bold(),
        cli.output.display().to_string().bold(),
        ontology.len(),
        ontology.config().schema_version
    );

    if cli.verify {
        let text = std::fs::read_to_string(&cli.output)
            .with_context(|| format!("failed to re-read {}", cli.output.display()))?;
        let parsed = ccf_spatial::verify::check_round_trip(ontology.graph(), &text)
            .with_context(|| format!("verification of {} failed", cli.output.display()))?;
        eprintln!("{} re-read {parsed} triples", "ok".green().bold());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}
