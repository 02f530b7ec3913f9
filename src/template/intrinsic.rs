//! CloudFormation intrinsic function helpers

use crate::error::{ComposeError, Result};
use serde_json::{json, Value};

/// `{"Ref": logical_id}`
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [logical_id, attribute]}`
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::Sub": template}`
pub fn sub(template: impl Into<String>) -> Value {
    json!({ "Fn::Sub": template.into() })
}

/// Lambda invocation URI for a function declared in the same template
pub fn lambda_invoke_uri(function_logical_id: &str) -> Value {
    sub(format!(
        "arn:${{AWS::Partition}}:apigateway:${{AWS::Region}}:lambda:path/2015-03-31/functions/${{{function_logical_id}.Arn}}/invocations"
    ))
}

/// Lambda invocation URI for a function referenced by its ARN
pub fn lambda_invoke_uri_for_arn(function_arn: &str) -> Value {
    sub(format!(
        "arn:${{AWS::Partition}}:apigateway:${{AWS::Region}}:lambda:path/2015-03-31/functions/{function_arn}/invocations"
    ))
}

/// `execute-api` ARN for `api_logical_id` scoped to `stage`, `method` and `path`
///
/// Use `"*"` for any stage or method and `"/*"` for any path. The composer
/// itself always passes `"/*"`; a concrete path such as `/items/{id}` scopes
/// a grant to one route.
///
/// # Errors
///
/// Returns [`ComposeError::InvalidPath`] if `path` does not start with `/`.
pub fn execute_api_arn(api_logical_id: &str, method: &str, path: &str, stage: &str) -> Result<Value> {
    if !path.starts_with('/') {
        return Err(ComposeError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(sub(format!(
        "arn:${{AWS::Partition}}:execute-api:${{AWS::Region}}:${{AWS::AccountId}}:${{{api_logical_id}}}/{stage}/{method}{path}"
    )))
}

/// CloudFormation logical id for `name`: ASCII alphanumerics only,
/// PascalCase across separators, followed by `suffix`.
///
/// `listItems` + `Function` → `ListItemsFunction`,
/// `get-item_v2` + `Route` → `GetItemV2Route`.
pub fn logical_id(name: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(name.len() + suffix.len());
    for segment in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    out.push_str(suffix);
    out
}
