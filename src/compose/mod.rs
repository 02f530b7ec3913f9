//! # Compose Module
//!
//! Turns a specification document and a list of integration declarations
//! into a resource graph.
//!
//! ## Pipeline
//!
//! Every step takes the document produced by the previous one and returns a
//! new document; nothing is shared between compositions.
//!
//! 1. [`MethodIndex::build`] validates the document shape and indexes the
//!    integration identifiers.
//! 2. The binder resolves each declaration, synthesizes its compute unit and
//!    points the operation at it (plus the authorizer requirement, if any).
//! 3. The patcher adds the authorizer scheme and, for the body variant, the
//!    CORS extension.
//! 4. Permissions, routes (routed variant), the gateway, its default stage
//!    and the optional web ACL association are synthesized.
//!
//! ## Failure
//!
//! Composition is all or nothing: [`compose`] returns either a complete
//! [`Composition`] or the first error. There is no partial result.

mod binder;
mod patcher;
mod routes;

pub use binder::Binding;
pub use routes::RouteDeclaration;

use crate::authorizer::AuthorizerConfig;
use crate::cors::CorsConfig;
use crate::domain::DomainResources;
use crate::error::{ComposeError, Result};
use crate::index::{DuplicatePolicy, MethodIndex};
use crate::integration::{ComputeUnit, IntegrationDeclaration};
use crate::permission::{self, Permission};
use crate::spec::SpecDocument;
use crate::template::{get_att, reference, Output, Resource, Template, ASSET_BUCKET_PARAMETER};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

/// Logical id of the gateway resource
pub const API_LOGICAL_ID: &str = "HttpApi";
/// Logical id of the default stage
pub const STAGE_LOGICAL_ID: &str = "DefaultStage";

/// How the gateway is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayVariant {
    /// The patched document is the literal body of the gateway resource
    #[default]
    Body,
    /// Discrete integration and route resources, one per integration
    Routed,
}

/// Everything the composer needs besides the document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComposeOptions {
    /// Prefix of every function name (`{prefix}-{id}`)
    pub name_prefix: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variant: GatewayVariant,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    #[serde(default)]
    pub integrations: Vec<IntegrationDeclaration>,
    #[serde(default)]
    pub authorizer: Option<AuthorizerConfig>,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub allow_all_origins: bool,
    /// ARN of a web ACL to associate with the gateway
    #[serde(default)]
    pub web_acl_arn: Option<String>,
}

impl ComposeOptions {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        ComposeOptions {
            name_prefix: name_prefix.into(),
            description: None,
            variant: GatewayVariant::default(),
            duplicate_policy: DuplicatePolicy::default(),
            integrations: Vec::new(),
            authorizer: None,
            cors: None,
            allow_all_origins: false,
            web_acl_arn: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name_prefix.trim().is_empty() {
            return Err(ComposeError::invalid_config("name_prefix must not be empty"));
        }
        if let Some(decl) = self.integrations.iter().find(|d| d.id.trim().is_empty()) {
            return Err(ComposeError::invalid_config(format!(
                "integration with handler '{}' has an empty id",
                decl.handler
            )));
        }
        if let Some(a) = &self.authorizer {
            if a.key.trim().is_empty() || a.function_arn.trim().is_empty() {
                return Err(ComposeError::invalid_config(
                    "authorizer key and function_arn must not be empty",
                ));
            }
            if self.integrations.iter().any(|d| d.id == a.key) {
                return Err(ComposeError::invalid_config(format!(
                    "authorizer key '{}' collides with an integration id",
                    a.key
                )));
            }
        }
        if matches!(&self.web_acl_arn, Some(arn) if arn.trim().is_empty()) {
            return Err(ComposeError::invalid_config("web_acl_arn must not be empty"));
        }
        Ok(())
    }
}

/// The result of a successful composition
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub variant: GatewayVariant,
    pub description: Option<String>,
    /// The fully patched document
    pub document: SpecDocument,
    /// Bound integrations in declaration order
    pub bindings: Vec<Binding>,
    /// Invoke permissions keyed by operation id or authorizer key
    pub permissions: BTreeMap<String, Permission>,
    /// Route declarations (routed variant only), in declaration order
    pub routes: Vec<RouteDeclaration>,
    pub api: Resource,
    pub stage: Resource,
    /// Native authorizer resource (routed variant only)
    pub authorizer: Option<Resource>,
    pub web_acl_association: Option<Resource>,
    pub custom_domain: Option<DomainResources>,
}

impl Composition {
    /// Compute unit for operation `id`
    pub fn compute_unit(&self, id: &str) -> Option<&ComputeUnit> {
        self.bindings.iter().find(|b| b.id == id).map(|b| &b.unit)
    }

    /// Compute units keyed by operation id
    pub fn compute_units(&self) -> BTreeMap<&str, &ComputeUnit> {
        self.bindings
            .iter()
            .map(|b| (b.id.as_str(), &b.unit))
            .collect()
    }

    /// Render every declaration into a template
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::InvalidConfig`] if two declarations end up
    /// with the same logical id.
    pub fn to_template(&self) -> Result<Template> {
        let mut template = Template::new(self.description.clone());
        // code is not uploaded by the composer; name the keys the functions expect
        let archives: Vec<String> = self
            .bindings
            .iter()
            .map(|b| format!("{}.zip", b.unit.function_name))
            .collect();
        template.parameters.insert(
            ASSET_BUCKET_PARAMETER.to_string(),
            json!({
                "Type": "String",
                "Description": format!(
                    "S3 bucket holding the function code archives (upload before deploying: {})",
                    archives.join(", ")
                )
            }),
        );

        template.add(self.api.clone())?;
        template.add(self.stage.clone())?;
        if let Some(authorizer) = &self.authorizer {
            template.add(authorizer.clone())?;
        }
        for b in &self.bindings {
            template.extend(b.unit.resources())?;
        }
        for r in &self.routes {
            template.add(r.integration.clone())?;
            template.add(r.route.clone())?;
        }
        // bindings first, then the authorizer grant
        for b in &self.bindings {
            if let Some(p) = self.permissions.get(&b.id) {
                template.add(p.resource.clone())?;
            }
        }
        for (key, p) in &self.permissions {
            if !self.bindings.iter().any(|b| &b.id == key) {
                template.add(p.resource.clone())?;
            }
        }
        if let Some(acl) = &self.web_acl_association {
            template.add(acl.clone())?;
        }

        template.outputs.push(Output {
            name: "ApiId".into(),
            description: "Gateway identifier".into(),
            value: reference(API_LOGICAL_ID),
        });
        template.outputs.push(Output {
            name: "ApiEndpoint".into(),
            description: "Default endpoint of the gateway".into(),
            value: get_att(API_LOGICAL_ID, "ApiEndpoint"),
        });

        if let Some(domain) = &self.custom_domain {
            template.extend(domain.resources()?)?;
            template.outputs.push(Output {
                name: "CustomDomainUrl".into(),
                description: "Custom domain serving the gateway".into(),
                value: json!(format!("https://{}", domain.domain_name)),
            });
        }
        Ok(template)
    }
}

/// Compose `document` with `options`
///
/// # Errors
///
/// * [`ComposeError::InvalidConfig`] for invalid options
/// * [`ComposeError::MalformedDocument`] if the document cannot be indexed
/// * [`ComposeError::DuplicateIntegrationId`] under [`DuplicatePolicy::Reject`]
/// * [`ComposeError::UnknownIntegration`] if a declaration has no operation
/// * [`ComposeError::DuplicateIntegration`] if a declaration is repeated
pub fn compose(document: SpecDocument, options: &ComposeOptions) -> Result<Composition> {
    options.validate()?;
    let index = MethodIndex::build(&document, options.duplicate_policy)?;
    info!(
        prefix = %options.name_prefix,
        operations = index.len(),
        integrations = options.integrations.len(),
        variant = ?options.variant,
        "composing gateway"
    );

    let (document, bindings) = binder::bind_integrations(document, &index, options)?;
    let document = patcher::apply_authorizer(document, options.authorizer.as_ref())?;
    let cors = CorsConfig::resolve(options.cors.as_ref(), options.allow_all_origins);

    let (document, api) = match options.variant {
        GatewayVariant::Body => {
            let document = patcher::apply_cors_extension(document, cors.as_ref())?;
            let api = Resource::new(API_LOGICAL_ID, "AWS::ApiGatewayV2::Api")
                .property("Body", document.root().clone())
                .property("FailOnWarnings", json!(true));
            (document, api)
        }
        GatewayVariant::Routed => {
            let mut api = Resource::new(API_LOGICAL_ID, "AWS::ApiGatewayV2::Api")
                .property("Name", json!(format!("{}-api", options.name_prefix)))
                .property("ProtocolType", json!("HTTP"));
            if let Some(c) = &cors {
                api = api.property("CorsConfiguration", c.to_resource_property());
            }
            (document, api)
        }
    };

    let stage = Resource::new(STAGE_LOGICAL_ID, "AWS::ApiGatewayV2::Stage")
        .property("ApiId", reference(API_LOGICAL_ID))
        .property("StageName", json!("$default"))
        .property("AutoDeploy", json!(true));

    let permissions =
        patcher::invoke_permissions(&bindings, options.authorizer.as_ref(), API_LOGICAL_ID)?;

    let (routes, authorizer) = match options.variant {
        GatewayVariant::Body => (Vec::new(), None),
        GatewayVariant::Routed => (
            routes::synthesize_routes(&bindings, options.authorizer.as_ref(), API_LOGICAL_ID),
            options.authorizer.as_ref().map(|a| a.resource(API_LOGICAL_ID)),
        ),
    };

    let web_acl_association = options
        .web_acl_arn
        .as_deref()
        .map(|arn| permission::web_acl_association(arn, API_LOGICAL_ID, STAGE_LOGICAL_ID))
        .transpose()?;

    info!(
        functions = bindings.len(),
        permissions = permissions.len(),
        routes = routes.len(),
        "composition complete"
    );

    Ok(Composition {
        variant: options.variant,
        description: options.description.clone(),
        document,
        bindings,
        permissions,
        routes,
        api,
        stage,
        authorizer,
        web_acl_association,
        custom_domain: None,
    })
}
