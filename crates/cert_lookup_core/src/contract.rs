use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CallbackTargetError, LookupError};

pub const DOMAIN_NAME_PROPERTY: &str = "DomainName";
pub const CERTIFICATE_ARN_KEY: &str = "CertificateArn";
pub const REASON_KEY: &str = "Reason";
pub const LOG_STREAM_REASON_PREFIX: &str = "See the details in CloudWatch Log Stream: ";

/// Correlation data copied verbatim from the inbound event into the callback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallbackTarget {
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub domain_name: String,
    pub callback_target: CallbackTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateSummary {
    pub domain_name: String,
    pub certificate_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Success { certificate_arn: String },
    Failure { reason: String },
}

impl LookupResult {
    pub fn status(&self) -> CallbackStatus {
        match self {
            Self::Success { .. } => CallbackStatus::Success,
            Self::Failure { .. } => CallbackStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallbackStatus {
    Success,
    Failed,
}

/// Body PUT to the pre-signed `ResponseURL`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackResponse {
    pub status: CallbackStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: BTreeMap<String, String>,
}

/// Only `ResponseURL` is mandatory here; the correlation fields fall back to empty
/// strings so a `FAILED` response can still be sent. See [`check_correlation_fields`].
pub fn parse_callback_target(event: &Value) -> Result<CallbackTarget, CallbackTargetError> {
    let Some(object) = event.as_object() else {
        return Err(CallbackTargetError::NotAnObject);
    };

    let field = |name: &str| -> String {
        object
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let response_url = field("ResponseURL");
    if response_url.trim().is_empty() {
        return Err(CallbackTargetError::MissingField("ResponseURL"));
    }

    Ok(CallbackTarget {
        response_url,
        stack_id: field("StackId"),
        request_id: field("RequestId"),
        logical_resource_id: field("LogicalResourceId"),
        physical_resource_id: object
            .get("PhysicalResourceId")
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
    })
}

pub fn check_correlation_fields(target: &CallbackTarget) -> Result<(), LookupError> {
    let fields = [
        ("StackId", &target.stack_id),
        ("RequestId", &target.request_id),
        ("LogicalResourceId", &target.logical_resource_id),
    ];
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(LookupError::missing_request_field(name)),
        None => Ok(()),
    }
}

pub fn parse_domain_name(event: &Value) -> Result<String, LookupError> {
    let value = event
        .get("ResourceProperties")
        .and_then(|properties| properties.get(DOMAIN_NAME_PROPERTY))
        .ok_or_else(|| LookupError::missing_property(DOMAIN_NAME_PROPERTY))?;

    match value {
        Value::String(text) if text.is_empty() => Err(LookupError::invalid_property(
            DOMAIN_NAME_PROPERTY,
            "must not be empty",
        )),
        Value::String(text) => Ok(text.clone()),
        Value::Null => Err(LookupError::missing_property(DOMAIN_NAME_PROPERTY)),
        _ => Err(LookupError::invalid_property(
            DOMAIN_NAME_PROPERTY,
            "must be a string",
        )),
    }
}

pub fn build_callback_response(
    target: &CallbackTarget,
    result: &LookupResult,
    log_stream_name: &str,
) -> CallbackResponse {
    let (reason, data) = match result {
        LookupResult::Success { certificate_arn } => (
            format!("{LOG_STREAM_REASON_PREFIX}{log_stream_name}"),
            BTreeMap::from([(CERTIFICATE_ARN_KEY.to_string(), certificate_arn.clone())]),
        ),
        LookupResult::Failure { reason } => (
            reason.clone(),
            BTreeMap::from([(REASON_KEY.to_string(), reason.clone())]),
        ),
    };

    CallbackResponse {
        status: result.status(),
        reason,
        physical_resource_id: target
            .physical_resource_id
            .clone()
            .unwrap_or_else(|| log_stream_name.to_string()),
        stack_id: target.stack_id.clone(),
        request_id: target.request_id.clone(),
        logical_resource_id: target.logical_resource_id.clone(),
        no_echo: false,
        data,
    }
}
