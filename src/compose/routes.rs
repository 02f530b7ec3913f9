use super::binder::Binding;
use crate::authorizer::AuthorizerConfig;
use crate::spec::MethodTarget;
use crate::template::{self, reference, Resource};
use serde_json::json;

/// Discrete integration and route declarations for one bound operation
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDeclaration {
    pub id: String,
    pub target: MethodTarget,
    pub integration: Resource,
    pub route: Resource,
}

impl RouteDeclaration {
    /// Route key, e.g. `GET /items`
    pub fn route_key(&self) -> String {
        self.target.route_key()
    }
}

/// One integration and one route per binding, in binding order
pub(crate) fn synthesize_routes(
    bindings: &[Binding],
    authorizer: Option<&AuthorizerConfig>,
    api_logical_id: &str,
) -> Vec<RouteDeclaration> {
    bindings
        .iter()
        .map(|b| {
            let integration_id = template::logical_id(&b.id, "Integration");
            let integration = Resource::new(integration_id.as_str(), "AWS::ApiGatewayV2::Integration")
                .property("ApiId", reference(api_logical_id))
                .property("IntegrationType", json!("AWS_PROXY"))
                .property("IntegrationUri", b.unit.function_arn())
                .property("PayloadFormatVersion", json!("2.0"));

            let mut route = Resource::new(template::logical_id(&b.id, "Route"), "AWS::ApiGatewayV2::Route")
                .property("ApiId", reference(api_logical_id))
                .property("RouteKey", json!(b.target.route_key()))
                .property(
                    "Target",
                    json!({ "Fn::Join": ["/", ["integrations", reference(&integration_id)]] }),
                );
            if let Some(a) = authorizer {
                route = route
                    .property("AuthorizationType", json!("CUSTOM"))
                    .property("AuthorizerId", reference(&a.logical_id()));
            }

            RouteDeclaration {
                id: b.id.clone(),
                target: b.target.clone(),
                integration,
                route,
            }
        })
        .collect()
}
