use super::types::{
    DocumentFormat, MethodTarget, OperationEntry, SpecNode, ANY_METHOD_KEY, INTEGRATION_EXTENSION, METHODS,
};
use crate::error::{ComposeError, Result};
use http::Method;
use serde_json::{Map, Value};

/// A parsed specification document
///
/// The tree is never mutated behind the caller's back: every patching step
/// consumes the document and returns the transformed one, so the order of
/// the steps is visible in the code that chains them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    root: Value,
}

impl SpecDocument {
    /// Wrap an already parsed tree
    pub fn from_value(root: Value) -> Self {
        SpecDocument { root }
    }

    /// Parse document text. `origin` is only used in error messages.
    pub fn parse(content: &str, format: DocumentFormat, origin: &str) -> Result<Self> {
        let root: Value = match format {
            // through serde_yaml::Value so non-string keys (`200:`) become strings
            DocumentFormat::Yaml => serde_yaml::from_str::<serde_yaml::Value>(content)
                .map_err(|e| e.to_string())
                .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string()))
                .map_err(|message| ComposeError::Parse {
                    path: origin.to_string(),
                    message,
                })?,
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| ComposeError::Parse {
                    path: origin.to_string(),
                    message: e.to_string(),
                })?
            }
        };
        Ok(SpecDocument { root })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Validate the shape required for indexing and return every operation
    /// in traversal order (document order of `paths`, then of methods).
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::MalformedDocument`] naming the first location
    /// that does not have the expected shape.
    pub fn operations(&self) -> Result<Vec<OperationEntry>> {
        let root = SpecNode::of(&self.root).as_mapping().ok_or_else(|| {
            ComposeError::malformed(
                "$",
                format!("document root must be a mapping, found {}", SpecNode::of(&self.root).kind()),
            )
        })?;
        let paths = root
            .get("paths")
            .ok_or_else(|| ComposeError::malformed("$", "missing 'paths' mapping"))?;
        let paths = SpecNode::of(paths).as_mapping().ok_or_else(|| {
            ComposeError::malformed(
                "paths",
                format!("expected a mapping, found {}", SpecNode::of(paths).kind()),
            )
        })?;

        let mut entries = Vec::new();
        for (path, item) in paths {
            if path.starts_with("x-") {
                continue;
            }
            if !path.starts_with('/') {
                return Err(ComposeError::malformed(
                    format!("paths.{path}"),
                    "path must start with '/'",
                ));
            }
            let item = SpecNode::of(item).as_mapping().ok_or_else(|| {
                ComposeError::malformed(
                    format!("paths.{path}"),
                    format!("path item must be a mapping, found {}", SpecNode::of(item).kind()),
                )
            })?;

            for (key, operation) in item {
                let lk = key.to_ascii_lowercase();
                let target = if lk == ANY_METHOD_KEY {
                    MethodTarget::any(path.clone())
                } else if METHODS.contains(&lk.as_str()) {
                    let method = Method::from_bytes(lk.to_ascii_uppercase().as_bytes()).map_err(|e| {
                        ComposeError::malformed(format!("paths.{path}.{key}"), e.to_string())
                    })?;
                    MethodTarget::new(path.clone(), method)
                } else {
                    continue;
                };
                let integration_id = integration_id_of(operation, &target)?;
                entries.push(OperationEntry {
                    integration_id,
                    target,
                });
            }
        }
        Ok(entries)
    }

    /// Run the shape check without keeping the result
    pub fn validate_shape(&self) -> Result<()> {
        self.operations().map(|_| ())
    }

    /// Operation object at `target`, if present
    pub fn operation(&self, target: &MethodTarget) -> Option<&Map<String, Value>> {
        self.root
            .get("paths")?
            .get(&target.path)?
            .as_object()?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(&target.method_key()))
            .and_then(|(_, v)| v.as_object())
    }

    /// Apply `patch` to the operation object at `target`
    pub fn with_operation<F>(mut self, target: &MethodTarget, patch: F) -> Result<Self>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let method_key = target.method_key();
        let operation = self
            .root
            .get_mut("paths")
            .and_then(|p| p.get_mut(&target.path))
            .and_then(Value::as_object_mut)
            .and_then(|item| {
                item.iter_mut()
                    .find(|(k, _)| k.eq_ignore_ascii_case(&method_key))
                    .map(|(_, v)| v)
            })
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ComposeError::malformed(target.location(), "operation not found"))?;
        patch(operation);
        Ok(self)
    }

    /// Set a top-level vendor extension
    pub fn with_extension(mut self, key: &str, value: Value) -> Result<Self> {
        let root = self
            .root
            .as_object_mut()
            .ok_or_else(|| ComposeError::malformed("$", "document root must be a mapping"))?;
        root.insert(key.to_string(), value);
        Ok(self)
    }

    /// Insert (or replace) `components.securitySchemes.<name>`, creating the
    /// intermediate mappings when the document has none.
    pub fn with_security_scheme(mut self, name: &str, scheme: Value) -> Result<Self> {
        let root = self
            .root
            .as_object_mut()
            .ok_or_else(|| ComposeError::malformed("$", "document root must be a mapping"))?;
        let components = root
            .entry("components")
            .or_insert_with(|| Value::Object(Map::new()));
        let components = components
            .as_object_mut()
            .ok_or_else(|| ComposeError::malformed("components", "expected a mapping"))?;
        let schemes = components
            .entry("securitySchemes")
            .or_insert_with(|| Value::Object(Map::new()));
        let schemes = schemes.as_object_mut().ok_or_else(|| {
            ComposeError::malformed("components.securitySchemes", "expected a mapping")
        })?;
        schemes.insert(name.to_string(), scheme);
        Ok(self)
    }
}

fn integration_id_of(operation: &Value, target: &MethodTarget) -> Result<String> {
    let location = target.location();
    let operation = SpecNode::of(operation).as_mapping().ok_or_else(|| {
        ComposeError::malformed(
            location.as_str(),
            format!("operation must be a mapping, found {}", SpecNode::of(operation).kind()),
        )
    })?;
    let extension = operation.get(INTEGRATION_EXTENSION).ok_or_else(|| {
        ComposeError::malformed(location.as_str(), format!("missing '{INTEGRATION_EXTENSION}'"))
    })?;
    extension
        .get("uri")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ComposeError::malformed(
                format!("{location}.{INTEGRATION_EXTENSION}"),
                "missing string field 'uri'",
            )
        })
}
