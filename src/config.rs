//! # Configuration Module
//!
//! A composition is described by one YAML (or JSON) file:
//!
//! ```yaml
//! name_prefix: shop
//! spec_path: openapi.yaml        # relative to this file
//! variant: body                  # or `routed`
//! duplicate_policy: last-write-wins
//! integrations:
//!   - id: listItems
//!     handler: bootstrap
//!     runtime: provided.al2023
//!     source_path: target/lambda/list-items
//!     memory_size: 256
//! authorizer:
//!   function_arn: arn:aws:lambda:eu-west-1:123456789012:function:auth
//! allow_all_origins: true
//! custom_domain:
//!   domain_name: api.example.com
//!   certificate_arn: arn:aws:acm:eu-west-1:123456789012:certificate/abc
//!   zone_name: example.com
//! ```

use crate::authorizer::AuthorizerConfig;
use crate::compose::{compose, ComposeOptions, Composition, GatewayVariant};
use crate::cors::CorsConfig;
use crate::domain::CustomDomain;
use crate::error::{ComposeError, Result};
use crate::index::DuplicatePolicy;
use crate::integration::IntegrationDeclaration;
use crate::spec::{load_document, DocumentFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of a composition configuration file
///
/// Unknown keys are rejected, so a misspelled setting fails the load instead
/// of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct ComposeConfig {
    /// Path of the specification document
    pub spec_path: PathBuf,
    pub custom_domain: Option<CustomDomain>,
    pub options: ComposeOptions,
}

/// On-disk layout: every key at the top level
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    spec_path: PathBuf,
    #[serde(default)]
    custom_domain: Option<CustomDomain>,
    name_prefix: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    variant: GatewayVariant,
    #[serde(default)]
    duplicate_policy: DuplicatePolicy,
    #[serde(default)]
    integrations: Vec<IntegrationDeclaration>,
    #[serde(default)]
    authorizer: Option<AuthorizerConfig>,
    #[serde(default)]
    cors: Option<CorsConfig>,
    #[serde(default)]
    allow_all_origins: bool,
    #[serde(default)]
    web_acl_arn: Option<String>,
}

impl From<ConfigFile> for ComposeConfig {
    fn from(file: ConfigFile) -> Self {
        ComposeConfig {
            spec_path: file.spec_path,
            custom_domain: file.custom_domain,
            options: ComposeOptions {
                name_prefix: file.name_prefix,
                description: file.description,
                variant: file.variant,
                duplicate_policy: file.duplicate_policy,
                integrations: file.integrations,
                authorizer: file.authorizer,
                cors: file.cors,
                allow_all_origins: file.allow_all_origins,
                web_acl_arn: file.web_acl_arn,
            },
        }
    }
}

impl ComposeConfig {
    /// Read a configuration file. A relative `spec_path` is resolved against
    /// the directory holding the configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ComposeError::Io {
            path: origin.clone(),
            source,
        })?;
        let mut config = Self::parse(&content, DocumentFormat::from_path(path), &origin)?;
        if config.spec_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.spec_path = dir.join(&config.spec_path);
            }
        }
        Ok(config)
    }

    pub fn parse(content: &str, format: DocumentFormat, origin: &str) -> Result<Self> {
        let parsed = match format {
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ComposeError::Parse {
            path: origin.to_string(),
            message,
        })
    }

    /// Load the document, compose it, and attach the custom domain if one is configured
    pub fn compose(&self) -> Result<Composition> {
        let document = load_document(&self.spec_path)?;
        let mut composition = compose(document, &self.options)?;
        if let Some(domain) = &self.custom_domain {
            composition.attach_custom_domain(domain)?;
        }
        Ok(composition)
    }
}
