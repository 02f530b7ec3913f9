//! # CLI Module
//!
//! Command-line front end of the `apigw-compose` binary.
//!
//! ## Commands
//!
//! ### `compose`
//!
//! Compose a CloudFormation template from a configuration file:
//!
//! ```bash
//! apigw-compose compose --config compose.yaml --output template.json
//! ```
//!
//! Options:
//! - `--config <FILE>` - Composition configuration (required)
//! - `--output <FILE>` - Where to write the template (default: stdout)
//! - `--domain-name`, `--certificate-arn`, `--zone-name` - Attach a custom domain
//!
//! The template takes one parameter, `AssetBucket`. Code is not packaged or
//! uploaded: each function expects `{name_prefix}-{id}.zip` in that bucket.
//!
//! ### `index`
//!
//! Print the integration identifier → `(method, path)` index:
//!
//! ```bash
//! apigw-compose index --spec openapi.yaml
//! ```
//!
//! ### `check`
//!
//! Validate the document shape without composing anything:
//!
//! ```bash
//! apigw-compose check --spec openapi.yaml
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
