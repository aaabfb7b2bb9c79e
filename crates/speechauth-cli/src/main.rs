// Rust guideline compliant 2026-10-18

//! speechauth CLI Application
//!
//! Command-line interface for Azure Speech resource identifiers and tokens.

use clap::Parser;
use speechauth_cli::commands::{self, token::TokenArgs};
use speechauth_cli::logging::init_tracing;
use speechauth_cli::{create_formatter, should_use_color, OutputFormatter};
use speechauth_core::config::DEFAULT_CONFIG_FILE;
use speechauth_core::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "speechauth",
    version,
    about = "speechauth: Azure Speech resource IDs and Entra ID authorization tokens",
    long_about = "speechauth validates Azure Speech resource identifiers, resolves resource names from ARM paths and custom endpoints, and builds aad# authorization tokens for the Speech service.",
    after_help = "Examples:\n  speechauth validate my-speech /subscriptions/<sub>/resourceGroups/rg/providers/Microsoft.CognitiveServices/accounts/my-speech\n  speechauth extract my-speech --custom-endpoint https://my-domain.cognitiveservices.azure.com/\n  speechauth token --resource-id my-speech\n  speechauth ssml podcast.json > podcast.ssml\n  speechauth check-tenant \"$X_MS_CLIENT_PRINCIPAL\" --tenant 72f988bf-86f1-41af-91ab-2d7cd011db47\n"
)]
struct Cli {
    /// Enable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Custom config file path
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (error, warn, info, debug)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Append JSON logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Table,
    Plain,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Validate resource IDs or names
    Validate {
        /// ARM resource IDs or resource names
        #[arg(required = true)]
        resource_ids: Vec<String>,
    },

    /// Resolve the resource name for an ID
    Extract {
        /// ARM resource ID or resource name
        resource_id: String,

        /// Custom endpoint whose subdomain takes precedence
        #[arg(long)]
        custom_endpoint: Option<String>,
    },

    /// Build a speech authorization token
    Token {
        /// ARM resource ID or resource name (default: speech.resource_id)
        #[arg(long)]
        resource_id: Option<String>,

        /// Custom endpoint (default: speech.custom_endpoint)
        #[arg(long)]
        custom_endpoint: Option<String>,

        /// Tenant for the Azure CLI credential
        #[arg(long)]
        tenant: Option<String>,

        /// Print the full token
        #[arg(long)]
        reveal: bool,
    },

    /// Convert a podcast script to SSML
    Ssml {
        /// Podcast script JSON file ('-' for stdin)
        file: String,
    },

    /// Check a client principal against authorized tenants
    CheckTenant {
        /// Base64-encoded client principal
        principal: String,

        /// Authorized tenant IDs (default: auth.authorized_tenants)
        #[arg(long, value_delimiter = ',')]
        tenant: Vec<String>,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let use_color = !cli.no_color && should_use_color();
    let format = match cli.format {
        Some(OutputFormat::Json) => "json",
        Some(OutputFormat::Table) => "table",
        Some(OutputFormat::Plain) => "plain",
        None => {
            if cli.json {
                "json"
            } else {
                "table"
            }
        }
    };
    let formatter = create_formatter(format, use_color);

    match run(cli, formatter.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", formatter.format_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, formatter: &dyn OutputFormatter) -> anyhow::Result<()> {
    let _guard = init_tracing(&cli.log_level, cli.log_file.as_deref())?;

    match cli.command {
        Some(Commands::Validate { resource_ids }) => {
            commands::validate::execute(&resource_ids, formatter)?;
        }
        Some(Commands::Extract {
            resource_id,
            custom_endpoint,
        }) => {
            commands::extract::execute(&resource_id, custom_endpoint.as_deref(), formatter);
        }
        Some(Commands::Token {
            resource_id,
            custom_endpoint,
            tenant,
            reveal,
        }) => {
            let config = load_config(&cli.config)?;
            let args = TokenArgs {
                resource_id,
                custom_endpoint,
                tenant,
                reveal,
            };
            commands::token::execute(&args, &config.speech, formatter)?;
        }
        Some(Commands::Ssml { file }) => {
            let config = load_config(&cli.config)?;
            commands::ssml::execute(&file, &config.voices, formatter)?;
        }
        Some(Commands::CheckTenant { principal, tenant }) => {
            let tenants = if tenant.is_empty() {
                load_config(&cli.config)?.auth.authorized_tenants
            } else {
                tenant
            };
            commands::check_tenant::execute(&principal, &tenants, formatter)?;
        }
        Some(Commands::Config) => {
            let config = load_config(&cli.config)?;
            commands::config::execute(&config, formatter);
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    Ok(Config::load(path).map_err(speechauth_app::AppError::from)?)
}
