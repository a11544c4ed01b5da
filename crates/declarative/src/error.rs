//! Error types for declarative state handling

/// Result type alias for declarative operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by schema validation, the state document, or a lifecycle
/// operation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Attribute not declared by the schema
    #[error("unsupported attribute \"{0}\"")]
    UnknownAttribute(String),

    /// Required attribute absent from configuration
    #[error("missing required attribute \"{0}\"")]
    MissingRequired(String),

    /// Configuration tried to set a server-computed attribute
    #[error("attribute \"{0}\" is computed and cannot be configured")]
    ComputedOnly(String),

    /// Value does not match the declared type
    #[error("attribute \"{path}\": expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Nested list longer than `max_items`
    #[error("attribute \"{path}\": at most {max} element(s) allowed, found {found}")]
    TooManyItems {
        path: String,
        max: usize,
        found: usize,
    },

    /// Required nested list is empty
    #[error("attribute \"{0}\": at least 1 element required")]
    TooFewItems(String),

    /// Resource or data source type not served by the provider
    #[error("unknown type \"{0}\"")]
    UnknownType(String),

    /// Configuration for one instance failed validation
    #[error("{address}: {source}")]
    InvalidConfig {
        address: String,
        #[source]
        source: Box<Error>,
    },

    /// The remote object behind an identity no longer exists
    #[error("remote object {id} no longer exists")]
    Gone { id: String },

    /// An operation that needs an identity ran on an absent instance
    #[error("resource has no identity")]
    MissingId,

    /// Failure reported by the provider implementation
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

impl Error {
    /// Attach the instance address to a validation error
    pub fn at(self, address: impl Into<String>) -> Self {
        Self::InvalidConfig {
            address: address.into(),
            source: Box::new(self),
        }
    }

    /// Whether the remote object has disappeared
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Gone { .. })
    }
}
