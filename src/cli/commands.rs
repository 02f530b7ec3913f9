use crate::config::ComposeConfig;
use crate::domain::CustomDomain;
use crate::index::{DuplicatePolicy, MethodIndex};
use crate::spec::load_document;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Command-line interface for apigw-compose
#[derive(Parser)]
#[command(name = "apigw-compose")]
#[command(about = "Compose API gateway and Lambda declarations from an OpenAPI document", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compose a CloudFormation template from a configuration file
    ///
    /// Function code is not packaged: upload each archive as
    /// `{name_prefix}-{id}.zip` to the bucket passed as the `AssetBucket`
    /// parameter. The local `source_path` is recorded in each function's
    /// `Metadata`.
    Compose {
        /// Path to the composition configuration (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Write the template here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Attach a custom domain (overrides `custom_domain` in the config)
        #[arg(long, requires_all = ["certificate_arn", "zone_name"])]
        domain_name: Option<String>,

        /// Certificate covering --domain-name
        #[arg(long, requires = "domain_name")]
        certificate_arn: Option<String>,

        /// Hosted zone for the DNS records of --domain-name
        #[arg(long, requires = "domain_name")]
        zone_name: Option<String>,
    },
    /// Print the integration identifier index of a specification document
    Index {
        /// Path to the specification document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Fail when two operations share an identifier instead of keeping the later one
        #[arg(long, default_value_t = false)]
        reject_duplicates: bool,
    },
    /// Check that a specification document has the shape needed for composition
    Check {
        /// Path to the specification document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
}

/// Parse the process arguments and run the selected command
pub fn run_cli() -> anyhow::Result<()> {
    execute(Cli::parse())
}

/// Run an already parsed command line
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, the document is
/// malformed, or composition fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Compose {
            config,
            output,
            domain_name,
            certificate_arn,
            zone_name,
        } => {
            let mut cfg = ComposeConfig::load(&config)
                .with_context(|| format!("loading configuration {}", config.display()))?;
            if let (Some(domain_name), Some(certificate_arn), Some(zone_name)) =
                (domain_name, certificate_arn, zone_name)
            {
                cfg.custom_domain = Some(CustomDomain::new(domain_name, certificate_arn, zone_name));
            }
            let composition = cfg.compose()?;
            let rendered = composition.to_template()?.to_json_pretty()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{rendered}\n"))
                        .with_context(|| format!("writing template {}", path.display()))?;
                    info!(path = %path.display(), "template written");
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{rendered}")?;
                }
            }
            Ok(())
        }
        Commands::Index {
            spec,
            reject_duplicates,
        } => {
            let document = load_document(&spec)?;
            let policy = if reject_duplicates {
                DuplicatePolicy::Reject
            } else {
                DuplicatePolicy::LastWriteWins
            };
            let index = MethodIndex::build(&document, policy)?;
            let mut stdout = std::io::stdout().lock();
            for (id, target) in index.iter() {
                writeln!(stdout, "{id}\t{}\t{}", target.method, target.path)?;
            }
            Ok(())
        }
        Commands::Check { spec } => {
            let document = load_document(&spec)?;
            let operations = document.operations()?;
            println!("ok: {} operation(s)", operations.len());
            Ok(())
        }
    }
}
