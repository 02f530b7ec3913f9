#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apigw_compose::{load_document, ComposeError, DuplicatePolicy, MethodIndex, MethodTarget};
use common::fixtures::spec_file;
use http::Method;

const YAML_SPEC: &str = r#"openapi: 3.0.1
info:
  title: Pets
  version: "1.0"
paths:
  /pets:
    parameters:
      - name: tenant
        in: header
        schema: { type: string }
    get:
      x-amazon-apigateway-integration: { uri: listPets }
    post:
      x-amazon-apigateway-integration: { uri: addPet }
  /pets/{id}:
    summary: One pet
    get:
      x-amazon-apigateway-integration: { uri: getPet }
    delete:
      x-amazon-apigateway-integration: { uri: deletePet }
"#;

#[test]
fn test_load_yaml_and_json_index_the_same() {
    let yaml_file = spec_file(YAML_SPEC, ".yaml");
    let yaml_doc = load_document(yaml_file.path()).unwrap();

    let json_str = serde_json::to_string(yaml_doc.root()).unwrap();
    let json_file = spec_file(&json_str, ".json");
    let json_doc = load_document(json_file.path()).unwrap();

    let yaml_index = MethodIndex::build(&yaml_doc, DuplicatePolicy::default()).unwrap();
    let json_index = MethodIndex::build(&json_doc, DuplicatePolicy::default()).unwrap();

    assert_eq!(yaml_index.len(), 4);
    let yaml_entries: Vec<_> = yaml_index.iter().collect();
    let json_entries: Vec<_> = json_index.iter().collect();
    assert_eq!(yaml_entries, json_entries);
}

#[test]
fn test_every_unique_identifier_resolves_to_its_origin() {
    let file = spec_file(YAML_SPEC, ".yaml");
    let doc = load_document(file.path()).unwrap();
    let index = MethodIndex::build(&doc, DuplicatePolicy::default()).unwrap();

    let expected = [
        ("listPets", MethodTarget::new("/pets", Method::GET)),
        ("addPet", MethodTarget::new("/pets", Method::POST)),
        ("getPet", MethodTarget::new("/pets/{id}", Method::GET)),
        ("deletePet", MethodTarget::new("/pets/{id}", Method::DELETE)),
    ];
    assert_eq!(index.len(), expected.len());
    for (id, target) in &expected {
        assert_eq!(index.lookup(id), Some(target), "lookup of {id}");
    }
}

const YAML_DUPLICATE: &str = r#"paths:
  /first:
    get:
      x-amazon-apigateway-integration: { uri: shared }
  /second:
    patch:
      x-amazon-apigateway-integration: { uri: shared }
  /third:
    get:
      x-amazon-apigateway-integration: { uri: unique }
"#;

#[test]
fn test_duplicate_identifier_last_write_wins() {
    let file = spec_file(YAML_DUPLICATE, ".yaml");
    let doc = load_document(file.path()).unwrap();
    let index = MethodIndex::build(&doc, DuplicatePolicy::LastWriteWins).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(
        index.lookup("shared"),
        Some(&MethodTarget::new("/second", Method::PATCH))
    );

    let err = MethodIndex::build(&doc, DuplicatePolicy::Reject).unwrap_err();
    assert!(matches!(err, ComposeError::DuplicateIntegrationId { .. }));
}

#[test]
fn test_operation_without_extension_is_malformed() {
    let file = spec_file(
        "paths:\n  /x:\n    get:\n      operationId: x\n      responses: {}\n",
        ".yaml",
    );
    let doc = load_document(file.path()).unwrap();
    let err = MethodIndex::build(&doc, DuplicatePolicy::default()).unwrap_err();
    match err {
        ComposeError::MalformedDocument { location, reason } => {
            assert_eq!(location, "paths./x.get");
            assert!(reason.contains("x-amazon-apigateway-integration"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unreadable_document_is_io_error() {
    let err = load_document("/nonexistent/dir/openapi.yaml").unwrap_err();
    match err {
        ComposeError::Io { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
        }
        other => panic!("unexpected error: {other}"),
    }
}
