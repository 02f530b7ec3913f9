use std::fmt;

/// Error raised while loading a specification document or composing resources
///
/// Every variant aborts the composition. Nothing is downgraded to a warning
/// and no partial template is produced.
#[derive(Debug)]
pub enum ComposeError {
    /// The specification or configuration file could not be read
    Io {
        /// Path that failed to read
        path: String,
        /// Underlying I/O error, propagated unchanged
        source: std::io::Error,
    },
    /// The file content is not valid YAML/JSON
    Parse {
        /// Path (or `<inline>`) of the document
        path: String,
        /// Parser message
        message: String,
    },
    /// The document does not have the shape required for indexing
    MalformedDocument {
        /// Location inside the document (e.g. `paths./items.get`)
        location: String,
        /// What is wrong at that location
        reason: String,
    },
    /// An integration declaration has no matching operation in the document
    UnknownIntegration {
        /// The caller-chosen operation identifier
        id: String,
    },
    /// Two operations in the document declare the same integration identifier
    /// and the index was built with [`DuplicatePolicy::Reject`](crate::index::DuplicatePolicy)
    DuplicateIntegrationId {
        /// The shared identifier
        id: String,
        /// Location of the first declaration
        first: String,
        /// Location of the second declaration
        second: String,
    },
    /// The same operation identifier was declared twice in the integration list
    DuplicateIntegration {
        /// The repeated identifier
        id: String,
    },
    /// A path argument failed the structural check (must start with `/`)
    InvalidPath {
        /// The rejected path
        path: String,
    },
    /// Invalid composition configuration
    InvalidConfig {
        /// Human-readable description
        message: String,
    },
    /// The declared resource ordering contains a cycle
    DependencyCycle {
        /// Nodes along the cycle, in order
        cycle: Vec<String>,
    },
}

impl ComposeError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        ComposeError::MalformedDocument {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        ComposeError::InvalidConfig {
            message: message.into(),
        }
    }
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::Io { path, source } => {
                write!(f, "failed to read '{}': {}", path, source)
            }
            ComposeError::Parse { path, message } => {
                write!(f, "failed to parse '{}': {}", path, message)
            }
            ComposeError::MalformedDocument { location, reason } => {
                write!(f, "malformed specification document at {}: {}", location, reason)
            }
            ComposeError::UnknownIntegration { id } => {
                write!(
                    f,
                    "integration '{}' has no matching operation in the specification document",
                    id
                )
            }
            ComposeError::DuplicateIntegrationId { id, first, second } => {
                write!(
                    f,
                    "integration identifier '{}' is declared by both {} and {}",
                    id, first, second
                )
            }
            ComposeError::DuplicateIntegration { id } => {
                write!(f, "integration '{}' is declared more than once", id)
            }
            ComposeError::InvalidPath { path } => {
                write!(f, "path must start with '/', got '{}'", path)
            }
            ComposeError::InvalidConfig { message } => {
                write!(f, "invalid configuration: {}", message)
            }
            ComposeError::DependencyCycle { cycle } => {
                write!(f, "resource dependency cycle: {}", cycle.join(" -> "))
            }
        }
    }
}

impl std::error::Error for ComposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComposeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ComposeError>;
