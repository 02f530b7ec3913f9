use super::binder::Binding;
use crate::authorizer::AuthorizerConfig;
use crate::cors::CorsConfig;
use crate::error::Result;
use crate::permission::Permission;
use crate::spec::{SpecDocument, CORS_EXTENSION};
use crate::template;
use serde_json::json;
use std::collections::BTreeMap;

/// Inject the authorizer's security scheme. The scheme is keyed by the
/// authorizer key, so the document holds exactly one definition however
/// many operations require it.
pub(crate) fn apply_authorizer(
    document: SpecDocument,
    authorizer: Option<&AuthorizerConfig>,
) -> Result<SpecDocument> {
    match authorizer {
        Some(a) => document.with_security_scheme(&a.key, a.security_scheme()),
        None => Ok(document),
    }
}

/// Attach CORS as the document-level vendor extension
pub(crate) fn apply_cors_extension(
    document: SpecDocument,
    cors: Option<&CorsConfig>,
) -> Result<SpecDocument> {
    match cors {
        Some(c) => document.with_extension(CORS_EXTENSION, c.to_extension()),
        None => Ok(document),
    }
}

/// One invoke permission per compute unit, plus one for the authorizer,
/// keyed by operation id (or authorizer key).
pub(crate) fn invoke_permissions(
    bindings: &[Binding],
    authorizer: Option<&AuthorizerConfig>,
    api_logical_id: &str,
) -> Result<BTreeMap<String, Permission>> {
    let mut permissions = BTreeMap::new();
    for b in bindings {
        let permission = Permission::invoke(
            template::logical_id(&b.id, "Permission"),
            b.unit.function_arn(),
            api_logical_id,
        )?;
        permissions.insert(b.id.clone(), permission);
    }
    if let Some(a) = authorizer {
        let permission = Permission::invoke(
            template::logical_id(&a.key, "Permission"),
            json!(a.function_arn),
            api_logical_id,
        )?;
        permissions.insert(a.key.clone(), permission);
    }
    Ok(permissions)
}
