//! Invoke permissions and web ACL associations granted to the gateway

use crate::error::Result;
use crate::template::{execute_api_arn, Resource};
use serde_json::{json, Value};

/// Principal the gateway invokes functions as
pub const GATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";

/// A `lambda:InvokeFunction` grant for the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct Permission {
    pub resource: Resource,
}

impl Permission {
    /// Grant the gateway `api_logical_id` permission to invoke `function`
    /// from any stage, method and path.
    ///
    /// The scope is the fixed `/*` path, so the [`ComposeError::InvalidPath`]
    /// check of [`execute_api_arn`] cannot fire here; it guards callers
    /// building narrower scopes.
    ///
    /// [`ComposeError::InvalidPath`]: crate::error::ComposeError::InvalidPath
    pub fn invoke(logical_id: impl Into<String>, function: Value, api_logical_id: &str) -> Result<Self> {
        let source_arn = execute_api_arn(api_logical_id, "*", "/*", "*")?;
        let resource = Resource::new(logical_id, "AWS::Lambda::Permission")
            .property("Action", json!("lambda:InvokeFunction"))
            .property("FunctionName", function)
            .property("Principal", json!(GATEWAY_PRINCIPAL))
            .property("SourceArn", source_arn);
        Ok(Permission { resource })
    }

    pub fn logical_id(&self) -> &str {
        &self.resource.logical_id
    }
}

/// Associate a web ACL with the gateway, covering all stages, methods and paths
pub fn web_acl_association(web_acl_arn: &str, api_logical_id: &str, stage_logical_id: &str) -> Result<Resource> {
    Ok(Resource::new("WebAclAssociation", "AWS::WAFv2::WebACLAssociation")
        .property("WebACLArn", json!(web_acl_arn))
        .property("ResourceArn", execute_api_arn(api_logical_id, "*", "/*", "*")?)
        .depends_on(stage_logical_id))
}
