//! # Template Module
//!
//! Minimal CloudFormation template model. Resources keep their insertion
//! order so the emitted JSON is stable across runs.

pub mod intrinsic;

use crate::error::{ComposeError, Result};
use serde_json::{Map, Value};

pub use intrinsic::{execute_api_arn, get_att, lambda_invoke_uri, logical_id, reference, sub};

/// Template parameter naming the bucket that holds function code archives
pub const ASSET_BUCKET_PARAMETER: &str = "AssetBucket";

/// One resource declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub logical_id: String,
    pub resource_type: String,
    pub properties: Map<String, Value>,
    pub depends_on: Vec<String>,
    pub metadata: Option<Value>,
}

impl Resource {
    pub fn new(logical_id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Resource {
            logical_id: logical_id.into(),
            resource_type: resource_type.into(),
            properties: Map::new(),
            depends_on: Vec::new(),
            metadata: None,
        }
    }

    pub fn property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        let id = logical_id.into();
        if !self.depends_on.contains(&id) {
            self.depends_on.push(id);
        }
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// `Ref` to this resource
    pub fn reference(&self) -> Value {
        reference(&self.logical_id)
    }

    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("Type".into(), Value::String(self.resource_type.clone()));
        if !self.depends_on.is_empty() {
            out.insert(
                "DependsOn".into(),
                Value::Array(self.depends_on.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(metadata) = &self.metadata {
            out.insert("Metadata".into(), metadata.clone());
        }
        if !self.properties.is_empty() {
            out.insert("Properties".into(), Value::Object(self.properties.clone()));
        }
        Value::Object(out)
    }
}

/// An output of the template (`Outputs.<name>`)
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: String,
    pub description: String,
    pub value: Value,
}

/// A complete CloudFormation template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub description: Option<String>,
    pub parameters: Map<String, Value>,
    resources: Vec<Resource>,
    pub outputs: Vec<Output>,
}

impl Template {
    pub fn new(description: Option<String>) -> Self {
        Template {
            description,
            ..Template::default()
        }
    }

    /// Add a resource
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::InvalidConfig`] when the logical id is already
    /// taken, which happens when two integration ids normalise to the same
    /// logical id (e.g. `get-item` and `get_item`).
    pub fn add(&mut self, resource: Resource) -> Result<()> {
        if self.get(&resource.logical_id).is_some() {
            return Err(ComposeError::invalid_config(format!(
                "logical id '{}' is declared twice",
                resource.logical_id
            )));
        }
        self.resources.push(resource);
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = Resource>>(&mut self, resources: I) -> Result<()> {
        for r in resources {
            self.add(r)?;
        }
        Ok(())
    }

    pub fn get(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.logical_id == logical_id)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Resources of the given CloudFormation type
    pub fn of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources
            .iter()
            .filter(move |r| r.resource_type == resource_type)
    }

    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert(
            "AWSTemplateFormatVersion".into(),
            Value::String("2010-09-09".into()),
        );
        if let Some(description) = &self.description {
            out.insert("Description".into(), Value::String(description.clone()));
        }
        if !self.parameters.is_empty() {
            out.insert("Parameters".into(), Value::Object(self.parameters.clone()));
        }
        let resources: Map<String, Value> = self
            .resources
            .iter()
            .map(|r| (r.logical_id.clone(), r.to_value()))
            .collect();
        out.insert("Resources".into(), Value::Object(resources));
        if !self.outputs.is_empty() {
            let outputs: Map<String, Value> = self
                .outputs
                .iter()
                .map(|o| {
                    let mut v = Map::new();
                    v.insert("Description".into(), Value::String(o.description.clone()));
                    v.insert("Value".into(), o.value.clone());
                    (o.name.clone(), Value::Object(v))
                })
                .collect();
            out.insert("Outputs".into(), Value::Object(outputs));
        }
        Value::Object(out)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_value()).map_err(|e| ComposeError::Parse {
            path: "<template>".into(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_to_value() {
        let r = Resource::new("Fn", "AWS::Lambda::Function")
            .property("Timeout", json!(3))
            .depends_on("Logs")
            .depends_on("Logs");
        assert_eq!(
            r.to_value(),
            json!({
                "Type": "AWS::Lambda::Function",
                "DependsOn": ["Logs"],
                "Properties": { "Timeout": 3 }
            })
        );
    }

    #[test]
    fn test_duplicate_logical_id_rejected() {
        let mut t = Template::new(None);
        t.add(Resource::new("A", "X")).unwrap();
        assert!(t.add(Resource::new("A", "Y")).is_err());
        assert_eq!(t.resources().len(), 1);
    }

    #[test]
    fn test_template_keeps_insertion_order() {
        let mut t = Template::new(Some("demo".into()));
        t.add(Resource::new("Zed", "X")).unwrap();
        t.add(Resource::new("Alpha", "X")).unwrap();
        let v = t.to_value();
        let keys: Vec<_> = v["Resources"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Zed", "Alpha"]);
        assert_eq!(v["Description"], "demo");
    }
}
