#![allow(dead_code)]

pub mod fixtures {
    use apigw_compose::spec::DocumentFormat;
    use apigw_compose::{ComposeOptions, IntegrationDeclaration, SpecDocument};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a temp file ending in `suffix`; removed on drop
    pub fn spec_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("apigw_spec_")
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// Two operations on `/items`, both pointing at placeholder identifiers
    pub const ITEMS_SPEC: &str = r#"openapi: 3.0.1
info:
  title: Items API
  version: "1.0.0"
paths:
  /items:
    get:
      operationId: listItems
      x-amazon-apigateway-integration:
        uri: listItems
      responses:
        "200":
          description: OK
    post:
      operationId: createItem
      x-amazon-apigateway-integration:
        uri: createItem
      responses:
        "201":
          description: Created
components:
  schemas:
    Item:
      type: object
      properties:
        id: { type: string }
"#;

    pub fn items_document() -> SpecDocument {
        SpecDocument::parse(ITEMS_SPEC, DocumentFormat::Yaml, "<items>").unwrap()
    }

    pub fn declaration(id: &str) -> IntegrationDeclaration {
        IntegrationDeclaration::new(id, "bootstrap", "provided.al2023", format!("target/lambda/{id}"))
    }

    pub fn items_options(prefix: &str) -> ComposeOptions {
        let mut options = ComposeOptions::new(prefix);
        options.integrations = vec![declaration("listItems"), declaration("createItem")];
        options
    }
}
