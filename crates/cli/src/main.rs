use clap::{Parser, Subcommand};
use eps_core::{ConversionError, ConversionResult, ConversionService, EndpointConfig, RunConfig};
use fhir::Format;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "eps")]
#[command(about = "Convert EPS prescription extract files into FHIR message bundles")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert using positional arguments
    Convert {
        /// Prescription (header) records file
        prescriptions: PathBuf,
        /// Line-item records file
        items: PathBuf,
        /// Directory for one bundle per prescription
        output: PathBuf,
        /// Output format: json or xml (first letter decides)
        format: String,
        /// Spine ASID of the sending system
        asid: String,
        /// Short name (ODS code) of the sending system
        ods: String,
        /// Endpoint URL of the sending system
        url: String,
        /// Directory for deduplicated practitioners, organisations, roles and patients
        shared_dir: Option<PathBuf>,
        /// Mint counter-backed identifiers so repeat runs are byte-identical
        #[arg(long)]
        deterministic_ids: bool,
    },
    /// Convert using a YAML configuration file
    Run {
        /// Path to the configuration file
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = resolve_config(cli.command).and_then(|config| {
        tracing::debug!(?config, "resolved run configuration");
        ConversionService::new(config).execute()
    });

    match outcome {
        Ok(summary) => {
            println!("Converted {summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(command: Commands) -> ConversionResult<RunConfig> {
    match command {
        Commands::Convert {
            prescriptions,
            items,
            output,
            format,
            asid,
            ods,
            url,
            shared_dir,
            deterministic_ids,
        } => {
            let format = format
                .parse::<Format>()
                .map_err(|e| ConversionError::InvalidInput(e.to_string()))?;
            let endpoint = EndpointConfig::from_raw(&asid, &ods, &url)?;
            Ok(
                RunConfig::new(prescriptions, items, output, format, endpoint, shared_dir)
                    .with_deterministic_ids(deterministic_ids),
            )
        }
        Commands::Run { config } => RunConfig::from_yaml_file(&config),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "eps=debug" } else { "eps=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
