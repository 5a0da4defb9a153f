/// Every condition that turns a lookup into a `FAILED` callback.
///
/// The `Display` text is what ends up in the callback `Reason`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("{message}")]
    MissingOrInvalidInput { message: String },
    #[error("{0}")]
    InventoryQuery(String),
    #[error("no issued certificate found matching domain '{domain_name}'")]
    NoMatchFound { domain_name: String },
}

impl LookupError {
    pub fn missing_property(name: &str) -> Self {
        Self::MissingOrInvalidInput {
            message: format!("missing required property ResourceProperties.{name}"),
        }
    }

    pub fn missing_request_field(name: &str) -> Self {
        Self::MissingOrInvalidInput {
            message: format!("request is missing required field {name}"),
        }
    }

    pub fn invalid_property(name: &str, detail: &str) -> Self {
        Self::MissingOrInvalidInput {
            message: format!("invalid property ResourceProperties.{name}: {detail}"),
        }
    }
}

/// The inbound event cannot be answered because it lacks the callback address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackTargetError {
    #[error("request payload must be a JSON object")]
    NotAnObject,
    #[error("request is missing callback field {0}")]
    MissingField(&'static str),
}
