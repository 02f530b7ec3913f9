//! # Integration Module
//!
//! Caller-declared integrations and the compute units synthesized from them.
//!
//! Each [`IntegrationDeclaration`] becomes one [`ComputeUnit`]: a Lambda
//! function, its execution role and a log group with a retention policy.
//! Units are built once and never changed afterwards.

use crate::template::{self, get_att, reference, sub, Resource, ASSET_BUCKET_PARAMETER};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Function timeout in seconds when none is configured
pub const DEFAULT_TIMEOUT_SECS: u32 = 3;
/// Function memory in MB when none is configured
pub const DEFAULT_MEMORY_MB: u32 = 128;
/// Log retention in days when none is configured
pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 90;

/// One operation to wire to a serverless function
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct IntegrationDeclaration {
    /// Identifier matched against the document's integration identifiers
    pub id: String,
    /// Handler reference, e.g. `index.handler` or `bootstrap`
    pub handler: String,
    /// Runtime identifier, e.g. `provided.al2023`
    pub runtime: String,
    /// Path of the function's code on disk
    pub source_path: String,
    #[serde(default)]
    pub timeout: Option<u32>,
    #[serde(default)]
    pub memory_size: Option<u32>,
    #[serde(default)]
    pub log_retention: Option<u32>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Layer ARNs attached to the function
    #[serde(default)]
    pub layers: Vec<String>,
}

impl IntegrationDeclaration {
    pub fn new(
        id: impl Into<String>,
        handler: impl Into<String>,
        runtime: impl Into<String>,
        source_path: impl Into<String>,
    ) -> Self {
        IntegrationDeclaration {
            id: id.into(),
            handler: handler.into(),
            runtime: runtime.into(),
            source_path: source_path.into(),
            timeout: None,
            memory_size: None,
            log_retention: None,
            environment: BTreeMap::new(),
            layers: Vec::new(),
        }
    }

    pub fn timeout_secs(&self) -> u32 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn memory_mb(&self) -> u32 {
        self.memory_size.unwrap_or(DEFAULT_MEMORY_MB)
    }

    pub fn log_retention_days(&self) -> u32 {
        self.log_retention.unwrap_or(DEFAULT_LOG_RETENTION_DAYS)
    }
}

/// A synthesized serverless function and its supporting resources
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeUnit {
    pub id: String,
    /// Physical function name: `{prefix}-{id}`
    pub function_name: String,
    pub function: Resource,
    pub role: Resource,
    pub log_group: Resource,
}

impl ComputeUnit {
    pub fn synthesize(prefix: &str, decl: &IntegrationDeclaration) -> Self {
        let function_name = format!("{}-{}", prefix, decl.id);
        let function_id = template::logical_id(&decl.id, "Function");
        let role_id = template::logical_id(&decl.id, "FunctionRole");
        let log_group_id = template::logical_id(&decl.id, "FunctionLogGroup");

        let role = Resource::new(role_id.as_str(), "AWS::IAM::Role")
            .property(
                "AssumeRolePolicyDocument",
                json!({
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": { "Service": "lambda.amazonaws.com" },
                        "Action": "sts:AssumeRole"
                    }]
                }),
            )
            .property(
                "ManagedPolicyArns",
                json!([sub(
                    "arn:${AWS::Partition}:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"
                )]),
            );

        let log_group = Resource::new(log_group_id.as_str(), "AWS::Logs::LogGroup")
            .property("LogGroupName", json!(format!("/aws/lambda/{function_name}")))
            .property("RetentionInDays", json!(decl.log_retention_days()));

        let mut function = Resource::new(function_id.as_str(), "AWS::Lambda::Function")
            .property("FunctionName", json!(function_name))
            .property("Handler", json!(decl.handler))
            .property("Runtime", json!(decl.runtime))
            .property("Timeout", json!(decl.timeout_secs()))
            .property("MemorySize", json!(decl.memory_mb()))
            .property("Role", get_att(&role_id, "Arn"))
            .property(
                "Code",
                json!({
                    "S3Bucket": reference(ASSET_BUCKET_PARAMETER),
                    "S3Key": format!("{function_name}.zip"),
                }),
            )
            .metadata(json!({ "apigw-compose:asset-path": decl.source_path }))
            .depends_on(log_group_id.as_str());

        if !decl.environment.is_empty() {
            let variables: Map<String, Value> = decl
                .environment
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            function = function.property("Environment", json!({ "Variables": variables }));
        }
        if !decl.layers.is_empty() {
            function = function.property("Layers", json!(decl.layers));
        }

        ComputeUnit {
            id: decl.id.clone(),
            function_name,
            function,
            role,
            log_group,
        }
    }

    /// Invocation identifier the gateway uses to call this function
    pub fn invoke_uri(&self) -> Value {
        template::lambda_invoke_uri(&self.function.logical_id)
    }

    pub fn function_arn(&self) -> Value {
        get_att(&self.function.logical_id, "Arn")
    }

    /// Resources in declaration order (role and log group before the function)
    pub fn resources(&self) -> Vec<Resource> {
        vec![self.role.clone(), self.log_group.clone(), self.function.clone()]
    }
}
