//! Stress Flux CLI - Command-line interface for Stress Flux
//!
//! Commands:
//! - aggregate: Aggregate a log batch from a file or stdin
//! - fetch: Fetch a log batch over HTTP and aggregate it (`http` feature)
//! - validate: Validate log labels
//! - config: Print the default configuration
//! - schema: Print schema information

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stress_flux::encoder::{BubbleLayout, ChartEncoder};
use stress_flux::schema::{LogAdapter, RawStressLog, SCHEMA_VERSION};
use stress_flux::source::{run_cycle, CycleOutcome, FetchError, FileSource, RecordSource};
use stress_flux::{Aggregation, Aggregator, AggregatorConfig, ReasonScope, SeverityVocabulary};
use stress_flux::FLUX_VERSION;

/// Stress Flux - Deterministic aggregation engine for classified stress logs
#[derive(Parser)]
#[command(name = "stressflux")]
#[command(version = FLUX_VERSION)]
#[command(about = "Turn classified stress logs into chart-ready metrics", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a log batch from a file or stdin
    Aggregate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        #[command(flatten)]
        options: AggregateOptions,
    },

    /// Fetch a log batch over HTTP and aggregate it
    #[cfg(feature = "http")]
    Fetch {
        /// Logs endpoint returning a JSON array
        #[arg(long)]
        url: String,

        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        #[command(flatten)]
        options: AggregateOptions,
    },

    /// Validate log labels
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON
    Config,

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Args)]
struct AggregateOptions {
    /// Output file path (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Output format
    #[arg(long, default_value = "dashboard")]
    output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Aggregator configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Severity vocabulary override, e.g. "Low,Moderate,High"
    #[arg(long)]
    vocabulary: Option<String>,

    /// Counting scope override
    #[arg(long)]
    scope: Option<Scope>,

    /// Bubble layout for dashboard output
    #[arg(long, default_value = "plot")]
    layout: Layout,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// JSON array of logs
    Json,
    /// Newline-delimited JSON (one log per line)
    Ndjson,
}

impl From<InputFormat> for stress_flux::InputFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Json => stress_flux::InputFormat::Json,
            InputFormat::Ndjson => stress_flux::InputFormat::Ndjson,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Raw metrics snapshot
    Snapshot,
    /// Chart-ready dashboard payload
    Dashboard,
}

#[derive(Clone, ValueEnum)]
enum Scope {
    /// Count severity and reasons over stressed records only
    StressedOnly,
    /// Count severity and reasons over every record
    AllRecords,
}

#[derive(Clone, ValueEnum)]
enum Layout {
    /// 2-D bubble plot with x/y positions
    Plot,
    /// Free-flow grid without positions
    Grid,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (stress.log.v1)
    Input,
    /// Output schema (dashboard payload)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StressCliError> {
    match cli.command {
        Commands::Aggregate {
            input,
            input_format,
            options,
        } => cmd_aggregate(&input, input_format, &options),

        #[cfg(feature = "http")]
        Commands::Fetch {
            url,
            timeout_secs,
            options,
        } => cmd_fetch(&url, timeout_secs, &options),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Config => {
            println!("{}", AggregatorConfig::default().to_json()?);
            Ok(())
        }

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_aggregate(
    input: &Path,
    input_format: InputFormat,
    options: &AggregateOptions,
) -> Result<(), StressCliError> {
    let aggregator = build_aggregator(options)?;

    let aggregation = if input.to_string_lossy() == "-" {
        let logs = read_logs(input, input_format)?;
        aggregator.aggregate_logs(&logs)
    } else {
        let source = FileSource::new(input, input_format.into());
        match run_cycle(&source, &aggregator) {
            CycleOutcome::Snapshot(aggregation) => aggregation,
            CycleOutcome::Unavailable(e) => return Err(e.into()),
        }
    };

    write_aggregation(&aggregation, aggregator.config(), options)
}

#[cfg(feature = "http")]
fn cmd_fetch(url: &str, timeout_secs: u64, options: &AggregateOptions) -> Result<(), StressCliError> {
    let aggregator = build_aggregator(options)?;
    let source = stress_flux::HttpSource::with_timeout(
        url,
        std::time::Duration::from_secs(timeout_secs),
    )
    .map_err(StressCliError::from)?;

    match run_cycle(&source, &aggregator) {
        CycleOutcome::Snapshot(aggregation) => {
            write_aggregation(&aggregation, aggregator.config(), options)
        }
        CycleOutcome::Unavailable(e) => Err(e.into()),
    }
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), StressCliError> {
    let logs = read_logs(input, input_format)?;
    let violations = LogAdapter::validate_logs(&logs);

    let report = ValidationReport {
        total_logs: logs.len(),
        valid_logs: logs.len() - violations.len(),
        invalid_logs: violations.len(),
        errors: violations
            .iter()
            .map(|v| ValidationErrorDetail {
                index: v.index,
                record_id: v.record_id.clone(),
                error: v.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total logs:   {}", report.total_logs);
        println!("Valid logs:   {}", report.valid_logs);
        println!("Invalid logs: {}", report.invalid_logs);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - (index {}): {}", err.index, err.error);
            }
        }
    }

    if report.invalid_logs > 0 {
        Err(StressCliError::ValidationFailed(report.invalid_logs))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), StressCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SCHEMA_VERSION);
                println!();
                println!("A JSON array (or NDJSON stream) of classified messages:");
                println!();
                println!("- _id: optional identifier (string or {{\"$oid\": ...}})");
                println!("- Stress_label: \"Stressed\" | \"Not Stressed\" (required)");
                println!("- Stress_category: severity in the configured vocabulary (optional)");
                println!("- Stress_Reason: free-text stress cause tag (optional)");
                println!();
                println!("Logs with any other Stress_label are reported and dropped.");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: dashboard payload");
                println!();
                println!("- dashboard_version: Payload version");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- computed_at_utc: RFC 3339 timestamp");
                println!("- summary: {{ total_count, stressed_count, not_stressed_count, stressed_ratio }}");
                println!("- donut: {{ title, labels, data, colors }}");
                println!("- severity: {{ title, labels, data, colors }} in Low/Medium/High order");
                println!("- bubbles: [{{ label, count, radius, x, y, color }}] in first-seen order");
            }
        }
    }

    Ok(())
}

// Helper functions

fn build_aggregator(options: &AggregateOptions) -> Result<Aggregator, StressCliError> {
    let mut config = match &options.config {
        Some(path) => AggregatorConfig::from_json(&fs::read_to_string(path)?)?,
        None => AggregatorConfig::default(),
    };

    if let Some(vocabulary) = &options.vocabulary {
        config = config.with_vocabulary(vocabulary.parse::<SeverityVocabulary>()?);
    }

    if let Some(scope) = &options.scope {
        config = config.with_scope(match scope {
            Scope::StressedOnly => ReasonScope::StressedOnly,
            Scope::AllRecords => ReasonScope::AllRecords,
        });
    }

    Ok(Aggregator::new(config)?)
}

fn read_logs(input: &Path, input_format: InputFormat) -> Result<Vec<RawStressLog>, StressCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(stress_flux::InputFormat::from(input_format).parse(&buffer)?)
    } else {
        let source = FileSource::new(input, input_format.into());
        source
            .fetch()
            .map_err(StressCliError::from)
    }
}

fn write_aggregation(
    aggregation: &Aggregation,
    config: &AggregatorConfig,
    options: &AggregateOptions,
) -> Result<(), StressCliError> {
    let value = match options.output_format {
        OutputFormat::Snapshot => serde_json::to_value(&aggregation.snapshot)?,
        OutputFormat::Dashboard => {
            let layout = match options.layout {
                Layout::Plot => BubbleLayout::Plot,
                Layout::Grid => BubbleLayout::Grid,
            };
            let encoder = ChartEncoder::new().with_layout(layout);
            serde_json::to_value(encoder.encode(&aggregation.snapshot, config))?
        }
    };

    let output_data = if options.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };

    if options.output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(&options.output, output_data + "\n")?;
    }

    Ok(())
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": SCHEMA_VERSION,
        "description": "Classified stress message log",
        "type": "object",
        "required": ["Stress_label"],
        "properties": {
            "_id": { "type": ["string", "object"] },
            "Stress_label": {
                "type": "string",
                "enum": ["Stressed", "Not Stressed"]
            },
            "Stress_category": { "type": ["string", "null"] },
            "Stress_Reason": { "type": ["string", "null"] }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    let dataset = serde_json::json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "labels": { "type": "array", "items": { "type": "string" } },
            "data": { "type": "array", "items": { "type": "integer" } },
            "colors": { "type": "array", "items": { "type": "string" } }
        }
    });

    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "stress.dashboard.v1",
        "description": "Chart-ready stress dashboard payload",
        "type": "object",
        "required": ["dashboard_version", "producer", "computed_at_utc", "summary", "donut", "severity", "bubbles"],
        "properties": {
            "dashboard_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "computed_at_utc": { "type": "string", "format": "date-time" },
            "summary": {
                "type": "object",
                "properties": {
                    "total_count": { "type": "integer" },
                    "stressed_count": { "type": "integer" },
                    "not_stressed_count": { "type": "integer" },
                    "stressed_ratio": { "type": ["number", "null"] }
                }
            },
            "donut": dataset.clone(),
            "severity": dataset,
            "bubbles": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["label", "count", "radius", "color"],
                    "properties": {
                        "label": { "type": "string" },
                        "count": { "type": "integer" },
                        "radius": { "type": "number" },
                        "x": { "type": "integer" },
                        "y": { "type": "integer" },
                        "color": { "type": "string" }
                    }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum StressCliError {
    Io(io::Error),
    Compute(stress_flux::ComputeError),
    Json(serde_json::Error),
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    Unavailable(String),
    ValidationFailed(usize),
}

impl From<io::Error> for StressCliError {
    fn from(e: io::Error) -> Self {
        StressCliError::Io(e)
    }
}

impl From<stress_flux::ComputeError> for StressCliError {
    fn from(e: stress_flux::ComputeError) -> Self {
        StressCliError::Compute(e)
    }
}

/// Local read and parse failures are not retryable; only network failures are
impl From<FetchError> for StressCliError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Parse(e) => StressCliError::Compute(e),
            FetchError::Io { path, source } => StressCliError::Io(io::Error::new(
                source.kind(),
                format!("{}: {}", path.display(), source),
            )),
            #[cfg(feature = "http")]
            other => StressCliError::Unavailable(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StressCliError {
    fn from(e: serde_json::Error) -> Self {
        StressCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<StressCliError> for CliError {
    fn from(e: StressCliError) -> Self {
        match e {
            StressCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            StressCliError::Compute(stress_flux::ComputeError::InvalidConfig(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Run 'stressflux config' for a valid starting point".to_string()),
            },
            StressCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the stress.log.v1 schema".to_string()),
            },
            StressCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            StressCliError::Unavailable(msg) => CliError {
                code: "NO_SNAPSHOT".to_string(),
                message: msg,
                hint: Some("No snapshot is available for this cycle; retry later".to_string()),
            },
            StressCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} logs failed validation", count),
                hint: Some("Fix Stress_label values and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_logs: usize,
    valid_logs: usize,
    invalid_logs: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    record_id: Option<String>,
    error: String,
}
