use http::Method;
use serde_json::{Map, Value};
use std::path::Path;

/// Vendor extension carrying an operation's invocation target
pub const INTEGRATION_EXTENSION: &str = "x-amazon-apigateway-integration";

/// Vendor extension carrying the document-level CORS configuration
pub const CORS_EXTENSION: &str = "x-amazon-apigateway-cors";

/// Vendor extension describing a custom authorizer inside a security scheme
pub const AUTHORIZER_EXTENSION: &str = "x-amazon-apigateway-authorizer";

/// Path-item key of the catch-all operation, routed as `ANY {path}`
pub const ANY_METHOD_KEY: &str = "x-amazon-apigateway-any-method";

/// Verb of the catch-all operation
pub const ANY_METHOD: &str = "ANY";

/// Path-item keys that name operations, besides [`ANY_METHOD_KEY`]. Everything else in a path item
/// (`parameters`, `summary`, `x-*`, ...) is not an operation.
pub const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Textual format of a specification document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` are YAML, anything else is treated as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Borrowed, typed view of one node of the parsed document tree
#[derive(Debug, Clone, Copy)]
pub enum SpecNode<'a> {
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    Scalar(&'a Value),
}

impl<'a> SpecNode<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => SpecNode::Mapping(map),
            Value::Array(items) => SpecNode::Sequence(items),
            other => SpecNode::Scalar(other),
        }
    }

    /// Short name of the node kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            SpecNode::Mapping(_) => "mapping",
            SpecNode::Sequence(_) => "sequence",
            SpecNode::Scalar(_) => "scalar",
        }
    }

    pub fn as_mapping(&self) -> Option<&'a Map<String, Value>> {
        match self {
            SpecNode::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

/// The `(path, method)` pair an integration identifier resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTarget {
    pub path: String,
    pub method: Method,
}

impl MethodTarget {
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        MethodTarget {
            path: path.into(),
            method,
        }
    }

    /// Catch-all target for `path`
    pub fn any(path: impl Into<String>) -> Self {
        // ANY is a valid extension token, parsing cannot fail
        let method = Method::from_bytes(ANY_METHOD.as_bytes()).unwrap_or(Method::GET);
        MethodTarget::new(path, method)
    }

    pub fn is_any(&self) -> bool {
        self.method.as_str() == ANY_METHOD
    }

    /// Key used for the method inside a path item
    pub fn method_key(&self) -> String {
        if self.is_any() {
            ANY_METHOD_KEY.to_string()
        } else {
            self.method.as_str().to_ascii_lowercase()
        }
    }

    /// HTTP API route key, e.g. `GET /items`
    pub fn route_key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Location string used in log lines and error messages
    pub fn location(&self) -> String {
        format!("paths.{}.{}", self.path, self.method_key())
    }
}

impl std::fmt::Display for MethodTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// One validated operation, in document traversal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationEntry {
    /// Identifier taken from the operation's invocation-target extension
    pub integration_id: String,
    pub target: MethodTarget,
}
