use cert_lookup_core::contract::{
    build_callback_response, check_correlation_fields, parse_callback_target, parse_domain_name,
    CallbackStatus, LookupRequest, LookupResult,
};
use cert_lookup_core::error::{CallbackTargetError, LookupError};
use cert_lookup_core::matching::resolve_certificate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::adapters::callback::OutcomeNotifier;
use crate::adapters::inventory::CertificateInventory;

const COMPONENT: &str = "lookup_handler";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
    pub log_stream_name: String,
}

/// What the runtime gets back once the callback step has run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupReport {
    pub status: CallbackStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub callback_delivered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("cannot send custom resource response: {0}")]
    UnaddressableRequest(#[from] CallbackTargetError),
}

/// Resolves `ResourceProperties.DomainName` to an issued certificate and sends
/// exactly one callback for any event that carries a `ResponseURL`.
///
/// Lookup failures become a `FAILED` callback. Callback delivery failures are
/// logged and surface only as `callback_delivered: false`.
pub fn handle_lookup_event(
    event: &Value,
    context: &InvocationContext,
    inventory: &dyn CertificateInventory,
    notifier: &dyn OutcomeNotifier,
) -> Result<LookupReport, HandlerError> {
    let span = tracing::info_span!("cert_lookup", request_id = %context.request_id);
    let _guard = span.enter();

    info!(
        component = COMPONENT,
        event = "request_received",
        request_type = event.get("RequestType").and_then(|value| value.as_str()),
        payload = %event,
        "received custom resource request"
    );

    let target = match parse_callback_target(event) {
        Ok(value) => value,
        Err(target_error) => {
            error!(
                component = COMPONENT,
                event = "request_unaddressable",
                error = %target_error,
                "request has no usable callback address"
            );
            return Err(target_error.into());
        }
    };

    let request = check_correlation_fields(&target)
        .and_then(|()| parse_domain_name(event))
        .map(|domain_name| LookupRequest {
            domain_name,
            callback_target: target.clone(),
        });
    let result = match request.and_then(|request| lookup_certificate(&request, inventory)) {
        Ok(certificate_arn) => LookupResult::Success { certificate_arn },
        Err(lookup_error) => {
            error!(
                component = COMPONENT,
                event = "lookup_failed",
                error = %lookup_error,
                "certificate lookup failed"
            );
            LookupResult::Failure {
                reason: lookup_error.to_string(),
            }
        }
    };

    let response = build_callback_response(&target, &result, &context.log_stream_name);
    let callback_delivered = match notifier.notify_outcome(&target, &response) {
        Ok(()) => {
            info!(
                component = COMPONENT,
                event = "callback_sent",
                status = ?response.status,
                logical_resource_id = %target.logical_resource_id,
            );
            true
        }
        Err(delivery_error) => {
            error!(
                component = COMPONENT,
                event = "callback_failed",
                status = ?response.status,
                error = %delivery_error,
                "failed to deliver custom resource response"
            );
            false
        }
    };

    let (certificate_arn, reason) = match result {
        LookupResult::Success { certificate_arn } => (Some(certificate_arn), None),
        LookupResult::Failure { reason } => (None, Some(reason)),
    };
    Ok(LookupReport {
        status: response.status,
        certificate_arn,
        reason,
        callback_delivered,
    })
}

fn lookup_certificate(
    request: &LookupRequest,
    inventory: &dyn CertificateInventory,
) -> Result<String, LookupError> {
    let domain_name = &request.domain_name;
    let certificates = inventory
        .list_issued_certificates()
        .map_err(LookupError::InventoryQuery)?;

    let matched = resolve_certificate(domain_name, &certificates)?;
    info!(
        component = COMPONENT,
        event = "certificate_matched",
        domain_name = %domain_name,
        matched_domain = %matched.domain_name,
        certificate_arn = %matched.certificate_arn,
        stack_id = %request.callback_target.stack_id,
        inventory_size = certificates.len(),
    );
    Ok(matched.certificate_arn.clone())
}
