//! # apigw-compose
//!
//! **apigw-compose** turns an OpenAPI document into API gateway and Lambda
//! resource declarations (a CloudFormation template).
//!
//! ## Overview
//!
//! The document's author marks every operation with an
//! `x-amazon-apigateway-integration` extension whose `uri` is a placeholder
//! identifier. The caller supplies one integration declaration per
//! identifier (handler, runtime, code location, limits). Composition
//! resolves each declaration to its operation, synthesizes a function for
//! it, rewrites the operation to invoke that function, and applies the
//! cross-cutting settings (authorizer, CORS, web ACL).
//!
//! ## Architecture
//!
//! - **[`spec`]** - Loading and typed access to the specification document
//! - **[`index`]** - Integration identifier → `(path, method)` index
//! - **[`integration`]** - Integration declarations and compute units
//! - **[`compose`]** - The composition pipeline and its result
//! - **[`cors`]**, **[`authorizer`]**, **[`permission`]** - Cross-cutting settings
//! - **[`domain`]** - Custom-domain attachment
//! - **[`template`]** - CloudFormation template model
//! - **[`config`]** - Configuration file format
//! - **[`cli`]** - The `apigw-compose` command line
//!
//! ### Composition Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(apigw-compose)
//!     participant Spec as spec::load_document
//!     participant Index as index::MethodIndex
//!     participant Binder as compose (binder)
//!     participant Patcher as compose (patcher)
//!     participant Template as template::Template
//!
//!     User->>CLI: apigw-compose compose --config compose.yaml
//!     CLI->>Spec: load_document("openapi.yaml")
//!     Spec-->>CLI: SpecDocument
//!     CLI->>Index: MethodIndex::build(&doc, policy)
//!     Index->>Index: Validate shape,<br/>walk paths and methods
//!     Index-->>CLI: id → (path, method)
//!     CLI->>Binder: bind integrations
//!     Binder->>Binder: Resolve id, synthesize function,<br/>rewrite operation
//!     Binder-->>CLI: patched document + bindings
//!     CLI->>Patcher: authorizer scheme, CORS
//!     Patcher-->>CLI: final document
//!     CLI->>Template: Composition::to_template()
//!     Template-->>User: template JSON
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use apigw_compose::{compose, load_document, ComposeOptions, IntegrationDeclaration};
//!
//! let document = load_document("openapi.yaml").expect("readable document");
//! let mut options = ComposeOptions::new("shop");
//! options.integrations.push(IntegrationDeclaration::new(
//!     "listItems",
//!     "bootstrap",
//!     "provided.al2023",
//!     "target/lambda/list-items",
//! ));
//! let composition = compose(document, &options).expect("composition");
//! println!("{}", composition.to_template().unwrap().to_json_pretty().unwrap());
//! ```

pub mod authorizer;
pub mod cli;
pub mod compose;
pub mod config;
pub mod cors;
pub mod dag;
pub mod domain;
pub mod error;
pub mod index;
pub mod integration;
pub mod logging;
pub mod permission;
pub mod spec;
pub mod template;

pub use authorizer::AuthorizerConfig;
pub use compose::{compose, ComposeOptions, Composition, GatewayVariant};
pub use config::ComposeConfig;
pub use cors::CorsConfig;
pub use domain::CustomDomain;
pub use error::{ComposeError, Result};
pub use index::{DuplicatePolicy, MethodIndex};
pub use integration::{ComputeUnit, IntegrationDeclaration};
pub use spec::{load_document, MethodTarget, SpecDocument};
