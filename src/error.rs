//! Provider errors

/// Errors raised by the HashiCups resources and data sources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport, status, or decoding failure from the API client
    #[error(transparent)]
    Api(#[from] hashicups_client::Error),

    /// Attribute tree does not match the resource schema
    #[error("invalid attribute \"{path}\": {reason}")]
    Contract { path: String, reason: String },

    /// The remote order no longer exists
    #[error("order {id} not found")]
    NotFound { id: String },

    /// State document rejected a read or write
    #[error(transparent)]
    State(#[from] declarative::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn contract(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Contract {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Map an API error for `id`, distinguishing a missing order
    pub fn from_api(id: &str, err: hashicups_client::Error) -> Self {
        if err.is_not_found() {
            Self::NotFound { id: id.to_string() }
        } else {
            Self::Api(err)
        }
    }
}

impl From<Error> for declarative::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { id } => Self::Gone { id },
            Error::State(inner) => inner,
            other => Self::Provider(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_gone() {
        let api = hashicups_client::Error::http("order 9 not found", Some(404));
        let err = Error::from_api("9", api);
        assert!(matches!(err, Error::NotFound { ref id } if id == "9"));

        let converted: declarative::Error = err.into();
        assert!(converted.is_gone());
    }

    #[test]
    fn test_other_api_errors_stay_api() {
        let api = hashicups_client::Error::http("boom", Some(500));
        let err = Error::from_api("9", api);
        assert!(matches!(err, Error::Api(_)));

        let converted: declarative::Error = err.into();
        assert!(!converted.is_gone());
        assert!(converted.to_string().contains("boom"));
    }

    #[test]
    fn test_contract_message() {
        let err = Error::contract("items.0.coffee", "expected exactly one element, found 2");
        assert_eq!(
            err.to_string(),
            "invalid attribute \"items.0.coffee\": expected exactly one element, found 2"
        );
    }
}
