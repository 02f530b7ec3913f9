//! # Authorizer Module
//!
//! A request-based Lambda authorizer referenced by ARN. When configured,
//! every bound operation requires it and the document gains a single
//! security scheme describing it.

use crate::spec::AUTHORIZER_EXTENSION;
use crate::template::{intrinsic::lambda_invoke_uri_for_arn, reference, Resource};
use serde::Deserialize;
use serde_json::{json, Value};

/// Security-scheme key used when the configuration does not name one
pub const DEFAULT_AUTHORIZER_KEY: &str = "LambdaAuthorizer";

/// How long the gateway caches an authorizer decision, in seconds
pub const AUTHORIZER_RESULT_TTL_SECS: u32 = 300;

/// Where the authorizer reads the caller identity from
pub const IDENTITY_SOURCE: &str = "$request.header.Authorization";

fn default_key() -> String {
    DEFAULT_AUTHORIZER_KEY.to_string()
}

/// An external authorizer function
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizerConfig {
    /// Name of the security scheme (and of the security requirement)
    #[serde(default = "default_key")]
    pub key: String,
    /// ARN of the authorizer function
    pub function_arn: String,
}

impl AuthorizerConfig {
    pub fn new(function_arn: impl Into<String>) -> Self {
        AuthorizerConfig {
            key: default_key(),
            function_arn: function_arn.into(),
        }
    }

    pub fn invoke_uri(&self) -> Value {
        lambda_invoke_uri_for_arn(&self.function_arn)
    }

    /// Entry for `components.securitySchemes.<key>`
    pub fn security_scheme(&self) -> Value {
        json!({
            "type": "apiKey",
            "name": "Authorization",
            "in": "header",
            AUTHORIZER_EXTENSION: {
                "type": "request",
                "identitySource": IDENTITY_SOURCE,
                "authorizerUri": self.invoke_uri(),
                "authorizerResultTtlInSeconds": AUTHORIZER_RESULT_TTL_SECS,
                "authorizerPayloadFormatVersion": "2.0",
            }
        })
    }

    /// Value of an operation's `security` field: exactly one requirement
    pub fn security_requirement(&self) -> Value {
        json!([{ self.key.as_str(): [] }])
    }

    /// Logical id of the routed variant's authorizer resource
    pub fn logical_id(&self) -> String {
        crate::template::logical_id(&self.key, "")
    }

    /// Native authorizer resource for the routed variant
    pub fn resource(&self, api_logical_id: &str) -> Resource {
        Resource::new(self.logical_id(), "AWS::ApiGatewayV2::Authorizer")
            .property("ApiId", reference(api_logical_id))
            .property("Name", json!(self.key))
            .property("AuthorizerType", json!("REQUEST"))
            .property("IdentitySource", json!([IDENTITY_SOURCE]))
            .property("AuthorizerUri", self.invoke_uri())
            .property("AuthorizerResultTtlInSeconds", json!(AUTHORIZER_RESULT_TTL_SECS))
            .property("AuthorizerPayloadFormatVersion", json!("2.0"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key_from_yaml() {
        let cfg: AuthorizerConfig =
            serde_yaml::from_str("function_arn: arn:aws:lambda:eu-west-1:1:function:auth").unwrap();
        assert_eq!(cfg.key, DEFAULT_AUTHORIZER_KEY);
    }

    #[test]
    fn test_security_scheme_shape() {
        let cfg = AuthorizerConfig::new("arn:aws:lambda:eu-west-1:1:function:auth");
        let scheme = cfg.security_scheme();
        let ext = &scheme[AUTHORIZER_EXTENSION];
        assert_eq!(ext["type"], "request");
        assert_eq!(ext["identitySource"], IDENTITY_SOURCE);
        assert_eq!(ext["authorizerResultTtlInSeconds"], 300);
        assert!(ext["authorizerUri"]["Fn::Sub"]
            .as_str()
            .unwrap()
            .contains("function:auth/invocations"));
    }

    #[test]
    fn test_security_requirement() {
        let cfg = AuthorizerConfig::new("arn");
        assert_eq!(cfg.security_requirement(), json!([{ "LambdaAuthorizer": [] }]));
    }
}
