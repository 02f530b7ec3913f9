use super::ComposeOptions;
use crate::error::{ComposeError, Result};
use crate::index::MethodIndex;
use crate::integration::ComputeUnit;
use crate::spec::{MethodTarget, SpecDocument, INTEGRATION_EXTENSION};
use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::debug;

/// An integration resolved to its operation
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub id: String,
    pub target: MethodTarget,
    pub unit: ComputeUnit,
}

/// Resolve every declared integration and point its operation at the
/// synthesized compute unit.
///
/// Integrations are processed in declaration order. The first one that
/// cannot be resolved aborts the whole step; since the document is consumed
/// and only returned on success, no partially bound document escapes.
pub(crate) fn bind_integrations(
    mut document: SpecDocument,
    index: &MethodIndex,
    options: &ComposeOptions,
) -> Result<(SpecDocument, Vec<Binding>)> {
    let mut seen = HashSet::new();
    let mut bindings = Vec::with_capacity(options.integrations.len());
    let security = options.authorizer.as_ref().map(|a| a.security_requirement());

    for decl in &options.integrations {
        if !seen.insert(decl.id.as_str()) {
            return Err(ComposeError::DuplicateIntegration { id: decl.id.clone() });
        }
        let target = index
            .lookup(&decl.id)
            .cloned()
            .ok_or_else(|| ComposeError::UnknownIntegration { id: decl.id.clone() })?;

        let unit = ComputeUnit::synthesize(&options.name_prefix, decl);
        let integration = integration_extension(unit.invoke_uri());
        document = document.with_operation(&target, |op| {
            op.insert(INTEGRATION_EXTENSION.to_string(), integration);
            if let Some(security) = &security {
                op.insert("security".to_string(), security.clone());
            }
        })?;
        debug!(id = %decl.id, target = %target, function = %unit.function_name, "bound integration");

        bindings.push(Binding {
            id: decl.id.clone(),
            target,
            unit,
        });
    }
    Ok((document, bindings))
}

fn integration_extension(uri: Value) -> Value {
    json!({
        "type": "aws_proxy",
        "httpMethod": "POST",
        "uri": uri,
        "payloadFormatVersion": "2.0",
    })
}
