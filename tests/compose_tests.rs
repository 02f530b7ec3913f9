#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apigw_compose::spec::{AUTHORIZER_EXTENSION, CORS_EXTENSION, INTEGRATION_EXTENSION};
use apigw_compose::{
    compose, AuthorizerConfig, ComposeError, CorsConfig, GatewayVariant, MethodTarget,
};
use common::fixtures::{declaration, items_document, items_options};
use http::Method;
use serde_json::json;

#[test]
fn test_two_operation_end_to_end() {
    let composition = compose(items_document(), &items_options("shop")).unwrap();

    let units = composition.compute_units();
    assert_eq!(units.len(), 2);
    assert_eq!(units["listItems"].function_name, "shop-listItems");
    assert_eq!(units["createItem"].function_name, "shop-createItem");
    assert_eq!(composition.permissions.len(), 2);

    for (id, method) in [("listItems", Method::GET), ("createItem", Method::POST)] {
        let op = composition
            .document
            .operation(&MethodTarget::new("/items", method))
            .unwrap();
        assert_eq!(op[INTEGRATION_EXTENSION]["uri"], units[id].invoke_uri());
        assert!(op.get("security").is_none());
    }

    // no authorizer, no CORS
    assert!(composition.document.root().get(CORS_EXTENSION).is_none());
    assert!(composition.document.root()["components"]
        .get("securitySchemes")
        .is_none());

    let template = composition.to_template().unwrap();
    assert_eq!(template.of_type("AWS::Lambda::Function").count(), 2);
    assert_eq!(template.of_type("AWS::Lambda::Permission").count(), 2);
    assert_eq!(template.of_type("AWS::ApiGatewayV2::Api").count(), 1);
    assert_eq!(template.of_type("AWS::ApiGatewayV2::Route").count(), 0);
    let api = template.get("HttpApi").unwrap();
    assert_eq!(api.get("Body"), Some(composition.document.root()));
}

#[test]
fn test_unknown_integration_produces_nothing() {
    let mut options = items_options("shop");
    options.integrations.push(declaration("deleteItem"));

    let err = compose(items_document(), &options).unwrap_err();
    assert!(matches!(err, ComposeError::UnknownIntegration { ref id } if id == "deleteItem"));
}

#[test]
fn test_failure_on_first_integration_is_reported_first() {
    let mut options = items_options("shop");
    options.integrations.insert(0, declaration("missing"));
    let err = compose(items_document(), &options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "integration 'missing' has no matching operation in the specification document"
    );
}

#[test]
fn test_explicit_cors_beats_allow_all() {
    let explicit = CorsConfig {
        allow_origins: vec!["https://shop.example.com".into()],
        allow_methods: vec!["GET".into(), "POST".into()],
        ..CorsConfig::default()
    };
    let mut options = items_options("shop");
    options.cors = Some(explicit.clone());
    options.allow_all_origins = true;

    let body = compose(items_document(), &options).unwrap();
    assert_eq!(body.document.root()[CORS_EXTENSION], explicit.to_extension());
    assert_ne!(
        body.document.root()[CORS_EXTENSION],
        CorsConfig::permissive().to_extension()
    );

    options.variant = GatewayVariant::Routed;
    let routed = compose(items_document(), &options).unwrap();
    assert_eq!(
        routed.api.get("CorsConfiguration"),
        Some(&explicit.to_resource_property())
    );
    assert!(routed.document.root().get(CORS_EXTENSION).is_none());
}

#[test]
fn test_allow_all_origins_alone_is_permissive() {
    let mut options = items_options("shop");
    options.allow_all_origins = true;
    let composition = compose(items_document(), &options).unwrap();
    assert_eq!(
        composition.document.root()[CORS_EXTENSION],
        json!({ "allowOrigins": ["*"], "allowMethods": ["*"], "allowHeaders": ["*"] })
    );
}

#[test]
fn test_authorizer_single_requirement_and_scheme() {
    let mut options = items_options("shop");
    options.authorizer = Some(AuthorizerConfig::new(
        "arn:aws:lambda:eu-west-1:123456789012:function:auth",
    ));

    let composition = compose(items_document(), &options).unwrap();
    for method in [Method::GET, Method::POST] {
        let op = composition
            .document
            .operation(&MethodTarget::new("/items", method))
            .unwrap();
        let security = op["security"].as_array().unwrap();
        assert_eq!(security.len(), 1);
        assert_eq!(security[0], json!({ "LambdaAuthorizer": [] }));
    }

    let components = &composition.document.root()["components"];
    let schemes = components["securitySchemes"].as_object().unwrap();
    assert_eq!(schemes.len(), 1);
    let authorizer = &schemes["LambdaAuthorizer"][AUTHORIZER_EXTENSION];
    assert_eq!(authorizer["identitySource"], "$request.header.Authorization");
    assert_eq!(authorizer["authorizerResultTtlInSeconds"], 300);
    // existing components survive the patch
    assert!(components["schemas"]["Item"].is_object());

    assert_eq!(composition.permissions.len(), 3);
    assert!(composition.permissions.contains_key("LambdaAuthorizer"));
}

#[test]
fn test_routed_variant_declares_routes_in_order() {
    let mut options = items_options("shop");
    options.variant = GatewayVariant::Routed;
    options.authorizer = Some(AuthorizerConfig::new("arn:aws:lambda:eu-west-1:1:function:auth"));

    let composition = compose(items_document(), &options).unwrap();
    let keys: Vec<_> = composition.routes.iter().map(|r| r.route_key()).collect();
    assert_eq!(keys, vec!["GET /items", "POST /items"]);

    let route = &composition.routes[0].route;
    assert_eq!(route.get("AuthorizationType"), Some(&json!("CUSTOM")));
    assert_eq!(route.get("AuthorizerId"), Some(&json!({ "Ref": "LambdaAuthorizer" })));
    assert!(composition.api.get("Body").is_none());

    let template = composition.to_template().unwrap();
    assert_eq!(template.of_type("AWS::ApiGatewayV2::Integration").count(), 2);
    assert_eq!(template.of_type("AWS::ApiGatewayV2::Route").count(), 2);
    assert_eq!(template.of_type("AWS::ApiGatewayV2::Authorizer").count(), 1);
}

#[test]
fn test_web_acl_association() {
    let mut options = items_options("shop");
    options.web_acl_arn = Some("arn:aws:wafv2:eu-west-1:123456789012:regional/webacl/shop/1".into());
    let composition = compose(items_document(), &options).unwrap();
    let acl = composition.web_acl_association.as_ref().unwrap();
    assert_eq!(
        acl.get("WebACLArn"),
        Some(&json!("arn:aws:wafv2:eu-west-1:123456789012:regional/webacl/shop/1"))
    );
    assert!(acl.get("ResourceArn").unwrap()["Fn::Sub"]
        .as_str()
        .unwrap()
        .ends_with("${HttpApi}/*/*/*"));
}

#[test]
fn test_composition_does_not_touch_caller_document() {
    let original = items_document();
    let _ = compose(original.clone(), &items_options("shop")).unwrap();
    assert_eq!(
        original.root()["paths"]["/items"]["get"][INTEGRATION_EXTENSION]["uri"],
        "listItems"
    );
}

#[test]
fn test_colliding_logical_ids_rejected_at_render() {
    let doc = apigw_compose::SpecDocument::from_value(json!({
        "paths": {
            "/a": { "get": { "x-amazon-apigateway-integration": { "uri": "get-item" } } },
            "/b": { "get": { "x-amazon-apigateway-integration": { "uri": "get_item" } } }
        }
    }));
    let mut options = apigw_compose::ComposeOptions::new("shop");
    options.integrations = vec![declaration("get-item"), declaration("get_item")];
    let composition = compose(doc, &options).unwrap();
    assert!(matches!(
        composition.to_template().unwrap_err(),
        ComposeError::InvalidConfig { .. }
    ));
}

#[test]
fn test_catch_all_operation_is_bound() {
    let doc = apigw_compose::SpecDocument::from_value(json!({
        "paths": {
            "/proxy": {
                "x-amazon-apigateway-any-method": {
                    "x-amazon-apigateway-integration": { "uri": "proxyAll" }
                }
            }
        }
    }));
    let mut options = apigw_compose::ComposeOptions::new("shop");
    options.integrations = vec![declaration("proxyAll")];
    options.variant = GatewayVariant::Routed;

    let composition = compose(doc, &options).unwrap();
    assert_eq!(composition.routes[0].route_key(), "ANY /proxy");
    let op = composition
        .document
        .operation(&MethodTarget::any("/proxy"))
        .unwrap();
    assert_eq!(
        op[INTEGRATION_EXTENSION]["uri"],
        composition.compute_unit("proxyAll").unwrap().invoke_uri()
    );
}

#[test]
fn test_asset_bucket_names_expected_archives() {
    let composition = compose(items_document(), &items_options("shop")).unwrap();
    let template = composition.to_template().unwrap().to_value();
    let description = template["Parameters"]["AssetBucket"]["Description"]
        .as_str()
        .unwrap();
    assert!(description.contains("shop-listItems.zip"));
    assert!(description.contains("shop-createItem.zip"));
    assert_eq!(
        template["Resources"]["ListItemsFunction"]["Properties"]["Code"]["S3Key"],
        "shop-listItems.zip"
    );
}
