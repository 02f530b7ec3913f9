//! # Spec Module
//!
//! Loading and typed access to the API specification document.
//!
//! The document is kept as an ordered tree ([`serde_json::Value`] with
//! insertion order preserved) and viewed through [`SpecNode`] when walking
//! it. [`SpecDocument::operations`] performs the only structural check the
//! composer needs: every operation carries an
//! `x-amazon-apigateway-integration.uri` naming its integration identifier.

mod document;
mod load;
mod types;

pub use document::*;
pub use load::*;
pub use types::*;
